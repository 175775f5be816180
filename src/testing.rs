//! テスト用のインメモリ ページ/要素

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::google_jobs::Selectors;
use crate::traits::{BoundingBox, ElementHandle, JobsPage};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    children: HashMap<String, Vec<FakeElement>>,
    /// bounding_box() が順に返す y 座標。最後の値は繰り返す
    positions: Option<Arc<Mutex<VecDeque<f64>>>>,
}

impl FakeElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, selector: &str, children: Vec<FakeElement>) -> Self {
        self.children
            .entry(selector.to_string())
            .or_default()
            .extend(children);
        self
    }

    pub fn with_child(self, selector: &str, child: FakeElement) -> Self {
        self.with_children(selector, vec![child])
    }

    pub fn with_positions(mut self, ys: Vec<f64>) -> Self {
        self.positions = Some(Arc::new(Mutex::new(ys.into())));
        self
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, ScraperError> {
        Ok(self.children.get(selector).cloned().unwrap_or_default())
    }

    async fn inner_text(&self) -> Result<String, ScraperError> {
        Ok(self.text.clone())
    }

    async fn bounding_box(&self) -> Result<BoundingBox, ScraperError> {
        let y = match &self.positions {
            Some(positions) => {
                let mut positions = positions.lock().unwrap();
                if positions.len() > 1 {
                    positions.pop_front().unwrap_or_default()
                } else {
                    positions.front().copied().unwrap_or_default()
                }
            }
            None => 0.0,
        };
        Ok(BoundingBox {
            x: 0.0,
            y,
            width: 400.0,
            height: 800.0,
        })
    }
}

#[derive(Debug, Default)]
pub struct FakePage {
    elements: HashMap<String, Vec<FakeElement>>,
    /// navigate() が先頭から順に返すエラー。尽きたら成功
    navigation_failures: Mutex<VecDeque<ScraperError>>,
    visited: Mutex<Vec<String>>,
    slept: Mutex<Vec<Duration>>,
    pub clicks: AtomicUsize,
    pub scrolls: AtomicUsize,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }

    pub fn with_navigation_failures(self, failures: Vec<ScraperError>) -> Self {
        *self.navigation_failures.lock().unwrap() = failures.into();
        self
    }

    /// navigate() に渡されたURL（失敗した試行も含む）
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    /// sleep() に渡された時間。実際には待たない
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobsPage for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<(), ScraperError> {
        self.visited.lock().unwrap().push(url.to_string());
        match self.navigation_failures.lock().unwrap().pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn locate(&self, selector: &str) -> Result<Vec<FakeElement>, ScraperError> {
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }

    async fn click(&self, _element: &FakeElement) -> Result<(), ScraperError> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn scroll(&self, _delta_x: f64, _delta_y: f64) -> Result<(), ScraperError> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

/// 求人詳細要素を組み立てる
pub fn listing(
    selectors: &Selectors,
    title: Option<&str>,
    employer: &str,
    descriptions: &[&str],
    highlight_groups: &[&[&str]],
) -> FakeElement {
    let mut element = FakeElement::new("");
    if let Some(title) = title {
        element = element.with_child(&selectors.title, FakeElement::new(title));
    }
    element = element
        .with_child(&selectors.employer, FakeElement::new(employer))
        .with_children(
            &selectors.description,
            descriptions.iter().map(|d| FakeElement::new(*d)).collect(),
        );
    let groups = highlight_groups
        .iter()
        .map(|lines| {
            FakeElement::new("").with_children(
                &selectors.highlight_line,
                lines.iter().map(|l| FakeElement::new(*l)).collect(),
            )
        })
        .collect();
    element.with_children(&selectors.highlight_group, groups)
}
