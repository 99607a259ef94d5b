//! BUYMA スクレイパー実装
//!
//! リストページをスクロールして遅延読み込みをトリガーし、
//! 商品リンクを収集してから各詳細ページを巡回する

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use regex::Regex;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::Scraper;

use super::types::{ListingItem, Product, NOT_AVAILABLE};

const BUYMA_BASE_URL: &str = "https://www.buyma.com";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// リストページ読み込み後の安定待機（秒）
const LIST_SETTLE_SECS: u64 = 3;
/// スクロール後の遅延読み込み待機（秒）
const SCROLL_SETTLE_SECS: u64 = 2;
/// 詳細ページのナビゲーションタイムアウト（秒）
const DETAIL_NAV_TIMEOUT_SECS: u64 = 15;
/// 詳細ページ読み込み後の待機（ミリ秒）
const DETAIL_SETTLE_MS: u64 = 1000;

/// リストページをスクロールして遅延読み込みをトリガー
/// （500pxずつ200ms間隔、合計5000pxまたはページ末尾まで）
const SCROLL_SCRIPT: &str = r#"
    new Promise((resolve) => {
        let totalHeight = 0;
        const distance = 500;
        const timer = setInterval(() => {
            window.scrollBy(0, distance);
            totalHeight += distance;
            if (totalHeight >= document.body.scrollHeight || totalHeight > 5000) {
                clearInterval(timer);
                resolve(true);
            }
        }, 200);
    })
"#;

/// 商品リンク候補を収集（重複除去とフィルタリングはRust側で行う）
const LISTING_SCRIPT: &str = r#"
    (() => {
        const out = [];
        document.querySelectorAll('a[href*="/item/"]').forEach((link) => {
            const img = link.querySelector('img');
            out.push({
                href: link.getAttribute('href') || '',
                name: img ? (img.getAttribute('alt') || '') : '',
                imageUrl: img
                    ? (img.getAttribute('src') || img.getAttribute('data-src') || '')
                    : ''
            });
        });
        return JSON.stringify(out);
    })()
"#;

/// 詳細ページからブランドと価格のテキストを抽出
const DETAIL_SCRIPT: &str = r#"
    (() => {
        const brandEl = document.querySelector(
            '[class*="brand"] a, [class*="Brand"] a, .product_Brand a');
        const priceEl = document.querySelector(
            '[class*="price"], .product_price, [class*="Price"]');
        return JSON.stringify({
            brand: brandEl ? brandEl.textContent.trim() : '',
            price: priceEl ? priceEl.textContent.trim() : ''
        });
    })()
"#;

/// リストページのJavaScriptが返す生のアンカー情報
#[derive(Debug, Deserialize)]
struct RawAnchor {
    href: String,
    name: String,
    #[serde(rename = "imageUrl")]
    image_url: String,
}

/// 詳細ページのJavaScriptが返す抽出結果
#[derive(Debug, Deserialize)]
struct DetailFields {
    brand: String,
    price: String,
}

/// BUYMA スクレイパー
pub struct BuymaScraper {
    config: ScraperConfig,
    browser: Option<Browser>,
    price_re: Regex,
}

impl BuymaScraper {
    /// 新しいスクレイパーを作成
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
            // "¥12,800（税込）" のようなテキストから価格部分だけを抜き出す
            price_re: Regex::new(r"¥[\d,]+").expect("価格抽出の正規表現が不正"),
        }
    }

    /// ページの完全なロードを待機
    async fn wait_page_ready(&self, page: &Page) -> Result<(), ScraperError> {
        for i in 0..30 {
            let ready_state = page
                .evaluate("document.readyState")
                .await
                .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

            let state = ready_state.into_value::<String>().unwrap_or_default();
            if state == "complete" {
                debug!("Page load complete after {}s", i + 1);
                return Ok(());
            }

            if i % 5 == 0 {
                info!("ページ読み込み待機中... ({}/30) state={}", i + 1, state);
            }
            sleep(Duration::from_secs(1)).await;
        }

        warn!("ページ読み込み待機がタイムアウト、処理を続行します");
        Ok(())
    }

    /// スクロールして遅延読み込みをトリガー
    async fn auto_scroll(&self, page: &Page) -> Result<(), ScraperError> {
        debug!("Scrolling listing page to trigger lazy loading...");
        page.evaluate(SCROLL_SCRIPT)
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(())
    }

    /// デバッグスクリーンショットをログ出力
    async fn debug_screenshot(&self, page: &Page, label: &str) {
        if let Ok(screenshot) = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
            debug!("{} screenshot: data:image/png;base64,{}", label, encoded);
        }
    }

    /// リストページから商品リンクを収集
    async fn collect_listing_items(&self, page: &Page) -> Result<Vec<ListingItem>, ScraperError> {
        let result = page
            .evaluate(LISTING_SCRIPT)
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

        let json_str = result.into_value::<String>().unwrap_or_default();
        parse_listing_items(&json_str)
    }

    /// 詳細ページからブランドと価格を取得して商品レコードを作成
    async fn scrape_detail(
        &self,
        page: &Page,
        item: &ListingItem,
    ) -> Result<Product, ScraperError> {
        let nav_timeout = Duration::from_secs(DETAIL_NAV_TIMEOUT_SECS);
        match tokio::time::timeout(nav_timeout, page.goto(item.url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(ScraperError::Navigation(e.to_string())),
            Err(_) => {
                return Err(ScraperError::Timeout(format!(
                    "詳細ページの読み込みが{}秒以内に完了しませんでした",
                    DETAIL_NAV_TIMEOUT_SECS
                )))
            }
        }

        sleep(Duration::from_millis(DETAIL_SETTLE_MS)).await;

        let result = page
            .evaluate(DETAIL_SCRIPT)
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

        let json_str = result.into_value::<String>().unwrap_or_default();
        let fields: DetailFields = serde_json::from_str(&json_str)?;

        let brand = if fields.brand.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            fields.brand
        };

        let price = self.normalize_price(&fields.price);
        let price = if price.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            price
        };

        Ok(Product {
            name: item.name.clone(),
            brand,
            price,
            url: item.url.clone(),
            image_url: item.image_url.clone(),
        })
    }

    /// 価格テキストから "¥12,800" 形式の部分だけを抽出
    /// （マッチしない場合は元のテキストをそのまま返す）
    fn normalize_price(&self, raw: &str) -> String {
        match self.price_re.find(raw) {
            Some(m) => m.as_str().to_string(),
            None => raw.trim().to_string(),
        }
    }
}

#[async_trait]
impl Scraper for BuymaScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("ブラウザを初期化中...");

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("buyma-scraper-{}", unique_id));

        // Chrome パスを取得
        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .unwrap_or_else(|_| "chromium".to_string());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir);

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .window_size(1280, 800)
            .request_timeout(self.config.timeout)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if self.config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        self.browser = Some(browser);
        info!("ブラウザ初期化完了");

        Ok(())
    }

    async fn scrape(&mut self) -> Result<Vec<Product>, ScraperError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("ブラウザが初期化されていません".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // Bot検出を避けるため通常のChromeのUAを名乗る
        let ua_params = SetUserAgentOverrideParams::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("UserAgent設定エラー: {}", e)))?;
        page.execute(ua_params)
            .await
            .map_err(|e| ScraperError::BrowserInit(format!("UserAgent設定エラー: {}", e)))?;

        info!("リストページにアクセス: {}", self.config.list_url);
        page.goto(self.config.list_url.as_str())
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;

        self.wait_page_ready(&page).await?;
        sleep(Duration::from_secs(LIST_SETTLE_SECS)).await;

        if self.config.debug {
            self.debug_screenshot(&page, "Listing").await;
        }

        // スクロールして遅延読み込みをトリガー
        self.auto_scroll(&page).await?;
        sleep(Duration::from_secs(SCROLL_SETTLE_SECS)).await;

        let items = self.collect_listing_items(&page).await?;
        info!("{}件の商品リンクを検出", items.len());

        // 各商品の詳細ページから情報を取得
        let limit = items.len().min(self.config.item_limit);
        let mut products = Vec::with_capacity(limit);

        for (i, item) in items.iter().take(limit).enumerate() {
            info!("商品詳細を取得中... ({}/{})", i + 1, limit);

            match self.scrape_detail(&page, item).await {
                Ok(product) => products.push(product),
                Err(e) => {
                    // 失敗した商品はプレースホルダーを記録して続行
                    warn!("詳細ページの取得に失敗: url={}, error={}", item.url, e);
                    products.push(Product::placeholder(item));
                }
            }
        }

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        info!("{}件の商品を取得しました", products.len());
        Ok(products)
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("ブラウザを終了中...");
        self.browser = None;
        Ok(())
    }
}

/// リストページのJSON文字列を商品リンクのリストに変換
///
/// - hrefで重複を除去する
/// - 商品名も画像も取れないアンカーは除外する
/// - 相対URLは絶対URLに変換する
/// - 商品名が取れない場合は "N/A" とする
fn parse_listing_items(json_str: &str) -> Result<Vec<ListingItem>, ScraperError> {
    let anchors: Vec<RawAnchor> = serde_json::from_str(json_str)?;

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for anchor in anchors {
        if !anchor.href.contains("/item/") || !seen.insert(anchor.href.clone()) {
            continue;
        }
        if anchor.name.is_empty() && anchor.image_url.is_empty() {
            continue;
        }

        let name = if anchor.name.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            anchor.name
        };

        items.push(ListingItem {
            name,
            url: absolute_url(&anchor.href),
            image_url: anchor.image_url,
        });
    }

    Ok(items)
}

/// 相対hrefをBUYMAの絶対URLに変換
fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", BUYMA_BASE_URL, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyma_scraper_new() {
        let scraper = BuymaScraper::new(ScraperConfig::default());
        assert!(scraper.browser.is_none());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("/item/12345/"),
            "https://www.buyma.com/item/12345/"
        );
        assert_eq!(
            absolute_url("https://www.buyma.com/item/67890/"),
            "https://www.buyma.com/item/67890/"
        );
    }

    #[test]
    fn test_parse_listing_items_dedup_and_filter() {
        let json = r#"[
            {"href": "/item/111/", "name": "バッグA", "imageUrl": "https://static.buyma.com/a.jpg"},
            {"href": "/item/111/", "name": "バッグA", "imageUrl": "https://static.buyma.com/a.jpg"},
            {"href": "/item/222/", "name": "", "imageUrl": ""},
            {"href": "/buyer/333/", "name": "バイヤー", "imageUrl": "https://static.buyma.com/b.jpg"},
            {"href": "/item/444/", "name": "", "imageUrl": "https://static.buyma.com/c.jpg"}
        ]"#;

        let items = parse_listing_items(json).unwrap();
        assert_eq!(items.len(), 2);

        // 重複は1件にまとめられる
        assert_eq!(items[0].name, "バッグA");
        assert_eq!(items[0].url, "https://www.buyma.com/item/111/");

        // 画像だけ取れた商品は名前が "N/A" になる
        assert_eq!(items[1].name, NOT_AVAILABLE);
        assert_eq!(items[1].image_url, "https://static.buyma.com/c.jpg");
    }

    #[test]
    fn test_parse_listing_items_invalid_json() {
        assert!(parse_listing_items("not json").is_err());
    }

    #[test]
    fn test_normalize_price() {
        let scraper = BuymaScraper::new(ScraperConfig::default());

        assert_eq!(scraper.normalize_price("¥12,800"), "¥12,800");
        assert_eq!(scraper.normalize_price("¥12,800（税込・送料込）"), "¥12,800");
        assert_eq!(scraper.normalize_price("  お問い合わせください  "), "お問い合わせください");
        assert_eq!(scraper.normalize_price(""), "");
    }

    #[tokio::test]
    #[ignore] // 実環境テスト用: cargo test test_live_scrape -- --ignored --nocapture
    async fn test_live_scrape() {
        tracing_subscriber::fmt()
            .with_env_filter("info,buyma_scraper=debug")
            .init();

        let config = ScraperConfig::default().with_item_limit(3);
        let mut scraper = BuymaScraper::new(config);

        let products = scraper.execute().await.expect("scrape failed");
        println!("\n=== Scrape Result ===");
        for p in &products {
            println!("{} / {} / {} / {}", p.name, p.brand, p.price, p.url);
        }
        assert!(products.len() <= 3);
    }
}
