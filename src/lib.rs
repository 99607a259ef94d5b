//! BUYMA スクレイパーライブラリ
//!
//! - 商品リストページから商品リンクを収集
//! - 各詳細ページからブランドと価格を抽出
//! - 結果をBOM付きCSVとして出力
//!
//! # スクレイパー使用例
//!
//! ```rust,ignore
//! use buyma_scraper::{BuymaScraper, Scraper, ScraperConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScraperConfig::new("https://www.buyma.com/r/-C3260/")
//!         .with_item_limit(10)
//!         .with_headless(true);
//!
//!     let mut scraper = BuymaScraper::new(config);
//!     let products = scraper.execute().await.unwrap();
//!     println!("Products: {}", products.len());
//! }
//! ```
//!
//! # tower Service 使用例
//!
//! ```rust,ignore
//! use buyma_scraper::{ScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!
//!     let request = ScrapeRequest::new("https://www.buyma.com/r/-C3260/")
//!         .with_output_dir("./out");
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("CSV written: {:?}", result.csv_path);
//! }
//! ```

pub mod buyma;
pub mod config;
pub mod error;
pub mod export;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use buyma::{BuymaScraper, ListingItem, Product};
pub use config::{ScraperConfig, DEFAULT_ITEM_LIMIT, DEFAULT_LIST_URL};
pub use error::ScraperError;
pub use service::{ScrapeRequest, ScrapeResult, ScraperService};
pub use traits::Scraper;
