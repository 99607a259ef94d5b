//! CSV出力
//!
//! Excelでそのまま開けるようにUTF-8 BOM付きで出力する

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::buyma::Product;
use crate::error::ScraperError;

/// CSVヘッダー（5列固定）
const CSV_HEADERS: [&str; 5] = ["商品名", "ブランド", "価格", "URL", "画像URL"];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// デフォルトの出力ファイル名（例: "buyma_products_2026-08-27.csv"）
pub fn default_filename() -> String {
    format!("buyma_products_{}.csv", Local::now().format("%Y-%m-%d"))
}

/// 商品リストをCSVファイルに書き出す
///
/// 1商品につき1行を出力する。区切り文字や引用符、改行を含む
/// フィールドはCSVの規則どおりエスケープされる。
pub fn write_products(path: &Path, products: &[Product]) -> Result<PathBuf, ScraperError> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CSV_HEADERS)?;

    for product in products {
        writer.write_record([
            product.name.as_str(),
            product.brand.as_str(),
            product.price.as_str(),
            product.url.as_str(),
            product.image_url.as_str(),
        ])?;
    }

    writer.flush()?;
    info!("CSVファイルを出力しました: {}", path.display());

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_csv_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.csv", name, std::process::id()))
    }

    fn sample_product() -> Product {
        Product {
            name: "トートバッグ".to_string(),
            brand: "GUCCI".to_string(),
            price: "¥128,000".to_string(),
            url: "https://www.buyma.com/item/12345/".to_string(),
            image_url: "https://static.buyma.com/img/12345.jpg".to_string(),
        }
    }

    #[test]
    fn test_default_filename_shape() {
        let name = default_filename();
        assert!(name.starts_with("buyma_products_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_write_products_bom_and_header() {
        let path = temp_csv_path("test_bom_header");
        write_products(&path, &[sample_product()]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);

        let content = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("商品名,ブランド,価格,URL,画像URL"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_products_row_per_product() {
        let path = temp_csv_path("test_row_count");
        let products = vec![sample_product(), sample_product(), sample_product()];
        write_products(&path, &products).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let content = String::from_utf8(bytes[3..].to_vec()).unwrap();

        // ヘッダー1行 + 商品3行
        assert_eq!(content.lines().count(), 4);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_products_escapes_malformed_fields() {
        let path = temp_csv_path("test_escape");
        let mut product = sample_product();
        product.name = "ニット \"新作\", 秋冬\nモデル".to_string();
        write_products(&path, &[product.clone()]).unwrap();

        // CSVとして読み戻して値が一致することを確認
        let bytes = std::fs::read(&path).unwrap();
        let mut reader = csv::Reader::from_reader(&bytes[3..]);
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], product.name.as_str());
        assert_eq!(&records[0][2], "¥128,000");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_products_empty_list() {
        let path = temp_csv_path("test_empty");
        write_products(&path, &[]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let content = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(content.lines().count(), 1);

        std::fs::remove_file(&path).unwrap();
    }
}
