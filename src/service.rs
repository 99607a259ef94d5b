use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::buyma::{BuymaScraper, Product};
use crate::config::{ScraperConfig, DEFAULT_ITEM_LIMIT, DEFAULT_LIST_URL};
use crate::error::ScraperError;
use crate::export;
use crate::traits::Scraper;

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub list_url: String,
    pub output_dir: PathBuf,
    pub headless: bool,
    pub item_limit: usize,
}

impl ScrapeRequest {
    pub fn new(list_url: impl Into<String>) -> Self {
        Self {
            list_url: list_url.into(),
            output_dir: PathBuf::from("."),
            headless: true,
            item_limit: DEFAULT_ITEM_LIMIT,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_item_limit(mut self, limit: usize) -> Self {
        self.item_limit = limit;
        self
    }
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_URL)
    }
}

impl From<ScrapeRequest> for ScraperConfig {
    fn from(req: ScrapeRequest) -> Self {
        ScraperConfig::new(req.list_url)
            .with_output_dir(req.output_dir)
            .with_headless(req.headless)
            .with_item_limit(req.item_limit)
    }
}

/// スクレイピング結果
#[derive(Debug)]
pub struct ScrapeResult {
    /// 取得した商品レコード
    pub products: Vec<Product>,
    /// 出力したCSVファイルのパス（商品が0件の場合はNone）
    pub csv_path: Option<PathBuf>,
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    // 将来的な拡張用（レートリミット、キャッシュなど）
}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("スクレイピングリクエスト受信: url={}", req.list_url);

        Box::pin(async move {
            let config: ScraperConfig = req.into();
            let output_dir = config.output_dir.clone();

            let mut scraper = BuymaScraper::new(config);
            let products = scraper.execute().await?;

            // 商品が0件の場合はCSVを出力しない
            let csv_path = if products.is_empty() {
                None
            } else {
                let path = output_dir.join(export::default_filename());
                Some(export::write_products(&path, &products)?)
            };

            info!(
                "スクレイピング完了: products={}, csv={:?}",
                products.len(),
                csv_path
            );

            Ok(ScrapeResult { products, csv_path })
        })
    }
}
