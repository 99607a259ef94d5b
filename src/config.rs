use std::path::PathBuf;
use std::time::Duration;

/// デフォルトの商品リストページ（レディースファッションカテゴリ）
pub const DEFAULT_LIST_URL: &str = "https://www.buyma.com/r/-C3260/";

/// 詳細ページを取得する商品数の上限
pub const DEFAULT_ITEM_LIMIT: usize = 30;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// 商品リストページのURL
    pub list_url: String,
    /// CSV出力先ディレクトリ
    pub output_dir: PathBuf,
    /// ヘッドレスモード
    pub headless: bool,
    /// 詳細ページを取得する商品数の上限
    pub item_limit: usize,
    /// CDPリクエストタイムアウト
    pub timeout: Duration,
    /// デバッグモード（スクリーンショット出力など）
    pub debug: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.to_string(),
            output_dir: PathBuf::from("."),
            headless: true,
            item_limit: DEFAULT_ITEM_LIMIT,
            timeout: Duration::from_secs(60),
            debug: false,
        }
    }
}

impl ScraperConfig {
    pub fn new(list_url: impl Into<String>) -> Self {
        Self {
            list_url: list_url.into(),
            ..Default::default()
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ScraperConfig::default();
        assert_eq!(config.list_url, DEFAULT_LIST_URL);
        assert_eq!(config.item_limit, DEFAULT_ITEM_LIMIT);
        assert!(config.headless);
        assert!(!config.debug);
    }

    #[test]
    fn test_config_builder() {
        let config = ScraperConfig::new("https://www.buyma.com/r/-C2002/")
            .with_output_dir("/tmp/out")
            .with_headless(false)
            .with_item_limit(5)
            .with_timeout(Duration::from_secs(120))
            .with_debug(true);

        assert_eq!(config.list_url, "https://www.buyma.com/r/-C2002/");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.headless);
        assert_eq!(config.item_limit, 5);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.debug);
    }
}
