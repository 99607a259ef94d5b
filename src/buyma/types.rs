//! BUYMA 関連の型定義

use serde::{Deserialize, Serialize};

/// 取得できなかった項目のプレースホルダー
pub const NOT_AVAILABLE: &str = "N/A";

/// 商品レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 商品名
    pub name: String,
    /// ブランド名
    pub brand: String,
    /// 価格（例: "¥12,800"）
    pub price: String,
    /// 商品詳細ページのURL
    pub url: String,
    /// 商品画像のURL
    pub image_url: String,
}

impl Product {
    /// 詳細ページの取得に失敗した場合のプレースホルダーレコードを作成
    pub fn placeholder(item: &ListingItem) -> Self {
        Self {
            name: item.name.clone(),
            brand: NOT_AVAILABLE.to_string(),
            price: NOT_AVAILABLE.to_string(),
            url: item.url.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

/// リストページで収集した商品リンク
#[derive(Debug, Clone, PartialEq)]
pub struct ListingItem {
    /// 商品名（img要素のalt属性、取れない場合は "N/A"）
    pub name: String,
    /// 商品詳細ページの絶対URL
    pub url: String,
    /// 商品画像のURL（src または data-src）
    pub image_url: String,
}
