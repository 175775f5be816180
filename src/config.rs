use std::path::PathBuf;
use std::time::Duration;

use crate::google_jobs::Selectors;

/// Google検索のベースURL
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub headless: bool,
    /// 求人パネル出現の待機上限
    pub timeout: Duration,
    /// スクロール回数の上限
    pub max_scroll: usize,
    /// 1回のスクロール量 (px)
    pub scroll_delta: f64,
    /// スクロール後の待機
    pub scroll_settle: Duration,
    /// ページ遷移後の待機
    pub page_settle: Duration,
    /// ナビゲーション試行回数 (1 = 再試行なし)
    pub navigation_attempts: u32,
    pub chrome_executable: Option<PathBuf>,
    pub debug: bool,
    pub search_url: String,
    pub selectors: Selectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout: Duration::from_secs(30),
            max_scroll: 100,
            scroll_delta: 5000.0,
            scroll_settle: Duration::from_secs(2),
            page_settle: Duration::from_secs(7),
            navigation_attempts: 1,
            chrome_executable: None,
            debug: false,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            selectors: Selectors::default(),
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_scroll(mut self, max_scroll: usize) -> Self {
        self.max_scroll = max_scroll;
        self
    }

    pub fn with_scroll_delta(mut self, delta: f64) -> Self {
        self.scroll_delta = delta;
        self
    }

    pub fn with_scroll_settle(mut self, settle: Duration) -> Self {
        self.scroll_settle = settle;
        self
    }

    pub fn with_page_settle(mut self, settle: Duration) -> Self {
        self.page_settle = settle;
        self
    }

    pub fn with_navigation_attempts(mut self, attempts: u32) -> Self {
        self.navigation_attempts = attempts.max(1);
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// 求人パネル付きの検索URLを組み立てる
    pub fn search_url_for(&self, query: &str) -> String {
        format!(
            "{}?hl=en&q={}&ibp=htl;jobs",
            self.search_url,
            urlencoding::encode(query)
        )
    }

    /// Chromeの実行ファイル (設定 > CHROME_PATH > CHROMIUM_PATH)
    pub fn resolve_chrome_executable(&self) -> Option<PathBuf> {
        self.chrome_executable.clone().or_else(|| {
            std::env::var("CHROME_PATH")
                .or_else(|_| std::env::var("CHROMIUM_PATH"))
                .ok()
                .map(PathBuf::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScraperConfig::new()
            .with_headless(false)
            .with_max_scroll(5)
            .with_scroll_settle(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(120))
            .with_navigation_attempts(0);

        assert!(!config.headless);
        assert_eq!(config.max_scroll, 5);
        assert_eq!(config.scroll_settle, Duration::from_millis(10));
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.navigation_attempts, 1);
    }

    #[test]
    fn test_default_scroll_budget() {
        let config = ScraperConfig::default();
        assert_eq!(config.max_scroll, 100);
        assert_eq!(config.scroll_delta, 5000.0);
    }

    #[test]
    fn test_search_url_encodes_query() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.search_url_for("rust developer in New York"),
            "https://www.google.com/search?hl=en&q=rust%20developer%20in%20New%20York&ibp=htl;jobs"
        );
    }
}
