use async_trait::async_trait;

use crate::buyma::Product;
use crate::error::ScraperError;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// スクレイピング実行
    async fn scrape(&mut self) -> Result<Vec<Product>, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → scrape → close）
    ///
    /// scrapeが失敗してもブラウザは必ず解放する
    async fn execute(&mut self) -> Result<Vec<Product>, ScraperError> {
        self.initialize().await?;
        let result = self.scrape().await;
        self.close().await?;
        result
    }
}
