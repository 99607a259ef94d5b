use tower::Service;
use tracing_subscriber::EnvFilter;

use buyma_scraper::{ScrapeRequest, ScraperService, DEFAULT_LIST_URL};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LIST_URL.to_string());

    println!("BUYMAスクレイピング開始...");
    println!("ブラウザを起動中...\n");

    let mut service = ScraperService::new();

    match service.call(ScrapeRequest::new(url)).await {
        Ok(result) => {
            if result.products.is_empty() {
                println!("商品が見つかりませんでした。");
                return;
            }

            println!("{}件の商品を取得しました", result.products.len());
            if let Some(path) = &result.csv_path {
                println!("CSVファイルを出力しました: {}", path.display());
            }

            // 最初の5件を表示
            println!("\n--- 取得した商品（最初の5件）---");
            for (i, product) in result.products.iter().take(5).enumerate() {
                println!("{}. {}", i + 1, product.name);
                println!("   ブランド: {}", product.brand);
                println!("   価格: {}", product.price);
                println!("   URL: {}", product.url);
                println!();
            }
        }
        Err(e) => {
            eprintln!("エラーが発生しました: {}", e);
            std::process::exit(1);
        }
    }
}
