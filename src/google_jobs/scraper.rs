//! Google 求人検索スクレイパー実装

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::browser::ChromePage;
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::{JobsPage, Scraper};

use super::parser::parse_listing_page;
use super::scroll::{scroll_until_stalled, ScrollSettings};
use super::types::RecordCollection;

/// ナビゲーション再試行の初期バックオフ
const INITIAL_BACKOFF_MS: u64 = 1000;

/// バックオフの上限
const MAX_BACKOFF_MS: u64 = 60_000;

/// `attempt` 回目（0始まり）の失敗後に待つ時間
fn backoff_delay(attempt: u32) -> Duration {
    let ms = INITIAL_BACKOFF_MS
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(MAX_BACKOFF_MS);
    Duration::from_millis(ms)
}

/// 最大 `attempts` 回までバックオフ付きでナビゲーション。
/// 再試行するのは `is_retryable` なエラーのみ
pub async fn navigate_with_retry<P: JobsPage>(
    page: &P,
    url: &str,
    attempts: u32,
) -> Result<(), ScraperError> {
    let attempts = attempts.max(1);
    let mut attempt = 0;
    loop {
        match page.navigate(url).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                let backoff = backoff_delay(attempt);
                warn!(
                    "Navigation attempt {}/{} failed, retrying in {:?}: {}",
                    attempt + 1,
                    attempts,
                    backoff,
                    e
                );
                page.sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 1クエリ分の検索: 遷移 → 待機 → パネル取得 → スクロール → パース。
/// パネルが現れなければ0件として空のコレクションを返す
pub async fn collect_listings<P: JobsPage>(
    page: &P,
    config: &ScraperConfig,
    query: &str,
) -> Result<RecordCollection, ScraperError> {
    let selectors = &config.selectors;

    let url = config.search_url_for(query);
    navigate_with_retry(page, &url, config.navigation_attempts).await?;
    page.sleep(config.page_settle).await;

    let mut records = RecordCollection::new();

    let panel = page
        .wait_for_selector(&selectors.panel, config.timeout)
        .await?
        .into_iter()
        .next();
    let Some(panel) = panel else {
        debug!("No listing panel for `{}`, treating as zero results", query);
        return Ok(records);
    };

    let outcome = scroll_until_stalled(page, &panel, ScrollSettings::from(config)).await?;
    info!("Scrolling finished: {:?}", outcome);

    parse_listing_page(page, selectors, config.timeout, &mut records).await?;
    Ok(records)
}

/// 1クエリ = 1ブラウザセッションのスクレイパー
pub struct GoogleJobsScraper {
    config: ScraperConfig,
    browser: Option<Browser>,
    page: Option<ChromePage>,
}

impl GoogleJobsScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn get_page(&self) -> Result<&ChromePage, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("Browser not initialized".into()))
    }

    async fn log_debug_screenshot(&self, page: &ChromePage) {
        match page.screenshot().await {
            Ok(screenshot) => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
                debug!("Result screenshot: data:image/png;base64,{}", encoded);
            }
            Err(e) => debug!("Failed to capture screenshot: {}", e),
        }
    }
}

#[async_trait]
impl Scraper for GoogleJobsScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("Initializing browser for google jobs scraper...");

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("google-jobs-{}", unique_id));

        let mut builder = BrowserConfig::builder()
            .user_data_dir(&user_data_dir)
            .window_size(1280, 800);

        if let Some(chrome_path) = self.config.resolve_chrome_executable() {
            builder = builder.chrome_executable(chrome_path);
        }

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--lang=en-US");

        if self.config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder.build().map_err(ScraperError::BrowserInit)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        self.browser = Some(browser);
        self.page = Some(ChromePage::new(page));

        info!("Browser initialized successfully");
        Ok(())
    }

    async fn search(&mut self, query: &str) -> Result<RecordCollection, ScraperError> {
        let page = self.get_page()?;
        let start = Instant::now();
        info!("Searching jobs for `{}`", query);

        let records = collect_listings(page, &self.config, query).await?;

        if self.config.debug {
            self.log_debug_screenshot(page).await;
        }

        info!(
            "Finished `{}`: {} listings in {:?}",
            query,
            records.len(),
            start.elapsed()
        );
        Ok(records)
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");

        if let Some(page) = self.page.take() {
            page.close().await;
        }
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                debug!("Failed to close browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                debug!("Failed to wait for browser exit: {}", e);
            }
        }

        info!("Browser closed");
        Ok(())
    }
}
