use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;
use crate::google_jobs::RecordCollection;

/// wait_for_selector のポーリング間隔
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 要素の矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 描画済みDOM要素への参照
#[async_trait]
pub trait ElementHandle: Send + Sync + Sized {
    /// 子孫要素をセレクタで全件取得（0件は空Vec）
    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, ScraperError>;

    /// テキスト内容
    async fn inner_text(&self) -> Result<String, ScraperError>;

    async fn bounding_box(&self) -> Result<BoundingBox, ScraperError>;

    /// 最初の一致要素。無ければ ElementNotFound
    async fn find_one(&self, selector: &str) -> Result<Self, ScraperError> {
        self.find_all(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScraperError::ElementNotFound(selector.to_string()))
    }
}

/// 操作可能なブラウザページ
#[async_trait]
pub trait JobsPage: Send + Sync {
    type Element: ElementHandle;

    async fn navigate(&self, url: &str) -> Result<(), ScraperError>;

    async fn locate(&self, selector: &str) -> Result<Vec<Self::Element>, ScraperError>;

    /// クリック（ポインタ位置も要素上へ移動する）
    async fn click(&self, element: &Self::Element) -> Result<(), ScraperError>;

    /// 現在のポインタ位置でホイールスクロール
    async fn scroll(&self, delta_x: f64, delta_y: f64) -> Result<(), ScraperError>;

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// セレクタが1件以上現れるまで待つ。タイムアウト時は空Vec（エラーにしない）
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<Self::Element>, ScraperError> {
        let start = tokio::time::Instant::now();
        loop {
            let found = self.locate(selector).await?;
            if !found.is_empty() {
                return Ok(found);
            }
            if start.elapsed() >= timeout {
                return Ok(Vec::new());
            }
            self.sleep(SELECTOR_POLL_INTERVAL.min(timeout)).await;
        }
    }
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// 1クエリ分の求人を収集
    async fn search(&mut self, query: &str) -> Result<RecordCollection, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → search → close）。検索が失敗してもブラウザは閉じる
    async fn execute(&mut self, query: &str) -> Result<RecordCollection, ScraperError> {
        self.initialize().await?;
        let result = self.search(query).await;
        self.close().await?;
        result
    }
}
