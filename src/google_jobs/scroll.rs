//! 仮想化された求人リストのスクロール収集
//!
//! 一覧の総件数は事前に分からないため、スクロールごとにリストの
//! 矩形 y 座標を読み、前回と同じなら読み込みが止まったとみなす。

use std::time::Duration;

use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::{ElementHandle, JobsPage};

/// スクロール設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSettings {
    /// スクロール回数の上限
    pub max_steps: usize,
    pub delta_y: f64,
    /// 各スクロール後の待機
    pub settle: Duration,
}

impl From<&ScraperConfig> for ScrollSettings {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            max_steps: config.max_scroll,
            delta_y: config.scroll_delta,
            settle: config.scroll_settle,
        }
    }
}

/// スクロール収集の終了状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// 位置が変わらなくなった（全件表示済み）
    Stalled { steps: usize },
    /// 上限回数に達した（途中までの結果を採用）
    BudgetExhausted { steps: usize },
}

impl ScrollOutcome {
    pub fn steps(&self) -> usize {
        match self {
            Self::Stalled { steps } | Self::BudgetExhausted { steps } => *steps,
        }
    }
}

/// リストをクリックしてフォーカスした後、停滞か上限までスクロールする
pub async fn scroll_until_stalled<P: JobsPage>(
    page: &P,
    panel: &P::Element,
    settings: ScrollSettings,
) -> Result<ScrollOutcome, ScraperError> {
    page.click(panel).await?;

    let mut previous_y = 0.0;
    for step in 1..=settings.max_steps {
        page.scroll(0.0, settings.delta_y).await?;
        page.sleep(settings.settle).await;

        let y = panel.bounding_box().await?.y;
        if y == previous_y {
            debug!("Listing panel stalled at y={} after {} steps", y, step);
            return Ok(ScrollOutcome::Stalled { steps: step });
        }
        previous_y = y;

        if step % 10 == 0 || step == settings.max_steps {
            info!("Scrolling... ({}/{})", step, settings.max_steps);
        }
    }

    debug!("Scroll budget of {} steps exhausted", settings.max_steps);
    Ok(ScrollOutcome::BudgetExhausted {
        steps: settings.max_steps,
    })
}
