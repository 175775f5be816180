//! chromiumoxide による JobsPage / ElementHandle 実装

use std::sync::Mutex;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use tracing::debug;

use crate::error::ScraperError;
use crate::traits::{BoundingBox, ElementHandle, JobsPage};

pub struct ChromeElement(Element);

#[async_trait]
impl ElementHandle for ChromeElement {
    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, ScraperError> {
        let elements = self
            .0
            .find_elements(selector)
            .await
            .map_err(|e| ScraperError::JavaScript(format!("{}: {}", selector, e)))?;
        Ok(elements.into_iter().map(ChromeElement).collect())
    }

    async fn inner_text(&self) -> Result<String, ScraperError> {
        let text = self
            .0
            .inner_text()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn bounding_box(&self) -> Result<BoundingBox, ScraperError> {
        let bb = self
            .0
            .bounding_box()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(BoundingBox {
            x: bb.x,
            y: bb.y,
            width: bb.width,
            height: bb.height,
        })
    }
}

/// ページ遷移の失敗を分類する。CDP応答の待ち切れは Timeout
fn navigation_error(e: CdpError) -> ScraperError {
    match e {
        CdpError::Timeout => ScraperError::Timeout(format!("navigation: {}", e)),
        e => ScraperError::Navigation(e.to_string()),
    }
}

pub struct ChromePage {
    page: Page,
    /// 最後にクリックした座標（ホイールイベントの発生位置）
    pointer: Mutex<(f64, f64)>,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            pointer: Mutex::new((0.0, 0.0)),
        }
    }

    /// フルページのスクリーンショット (PNG)
    pub async fn screenshot(&self) -> Result<Vec<u8>, ScraperError> {
        self.page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))
    }

    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!("Failed to close page: {}", e);
        }
    }

    fn pointer(&self) -> (f64, f64) {
        self.pointer.lock().map(|p| *p).unwrap_or((0.0, 0.0))
    }
}

#[async_trait]
impl JobsPage for ChromePage {
    type Element = ChromeElement;

    async fn navigate(&self, url: &str) -> Result<(), ScraperError> {
        self.page
            .goto(url)
            .await
            .map_err(navigation_error)?;
        Ok(())
    }

    async fn locate(&self, selector: &str) -> Result<Vec<ChromeElement>, ScraperError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| ScraperError::JavaScript(format!("{}: {}", selector, e)))?;
        Ok(elements.into_iter().map(ChromeElement).collect())
    }

    async fn click(&self, element: &ChromeElement) -> Result<(), ScraperError> {
        element
            .0
            .click()
            .await
            .map_err(|e| ScraperError::JavaScript(format!("click: {}", e)))?;

        let point = element
            .0
            .clickable_point()
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        if let Ok(mut pointer) = self.pointer.lock() {
            *pointer = (point.x, point.y);
        }
        Ok(())
    }

    async fn scroll(&self, delta_x: f64, delta_y: f64) -> Result<(), ScraperError> {
        let (x, y) = self.pointer();
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(x)
            .y(y)
            .delta_x(delta_x)
            .delta_y(delta_y)
            .build()
            .map_err(ScraperError::JavaScript)?;

        self.page
            .execute(params)
            .await
            .map_err(|e| ScraperError::JavaScript(format!("mouse wheel: {}", e)))?;
        Ok(())
    }
}
