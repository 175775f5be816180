//! 描画済み求人一覧のパース

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ScraperError;
use crate::traits::JobsPage;

use super::extractor::extract_listing;
use super::selectors::Selectors;
use super::types::RecordCollection;

/// 現在描画されている求人詳細を描画順に抽出し `records` に追加する。
///
/// タブが `timeout` 内に現れなければ検索結果0件として 0 を返す。
/// 必須要素の欠けた求人はログを出して読み飛ばす。戻り値は追加件数
pub async fn parse_listing_page<P: JobsPage>(
    page: &P,
    selectors: &Selectors,
    timeout: Duration,
    records: &mut RecordCollection,
) -> Result<usize, ScraperError> {
    let tabs = page.wait_for_selector(&selectors.listing_tab, timeout).await?;
    if tabs.is_empty() {
        debug!("No listing tabs within {:?}, treating as zero results", timeout);
        return Ok(0);
    }

    // 詳細はタブより遅れて描画されることがあるため詳細側を正とする
    let details = page.locate(&selectors.listing_detail).await?;
    debug!("Parsing {} listings ({} tabs)", details.len(), tabs.len());

    let mut added = 0;
    for (i, detail) in details.iter().enumerate() {
        match extract_listing(detail, selectors).await {
            Ok(record) => {
                debug!("Extracted listing {}: {}", i, record.title);
                records.push(record);
                added += 1;
            }
            Err(ScraperError::ElementNotFound(selector)) => {
                warn!("Skipping listing {}: element not found ({})", i, selector);
            }
            Err(e) => return Err(e),
        }
    }

    debug!("Parsed {}/{} listings", added, details.len());
    Ok(added)
}
