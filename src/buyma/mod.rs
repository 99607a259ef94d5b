//! BUYMA スクレイパーモジュール
//!
//! 商品リストページから商品リンクを収集し、各詳細ページから
//! ブランドと価格を抽出する

mod scraper;
mod types;

pub use scraper::BuymaScraper;
pub use types::{ListingItem, Product};
