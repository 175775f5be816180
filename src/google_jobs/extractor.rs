//! 求人詳細要素 → JobRecord

use crate::clean::{clean_fragments, clean_text};
use crate::error::ScraperError;
use crate::traits::ElementHandle;

use super::selectors::Selectors;
use super::types::JobRecord;

/// 求人詳細要素1件から JobRecord を抽出する。
/// 職種名・企業名が無い場合は ElementNotFound
pub async fn extract_listing<E: ElementHandle>(
    element: &E,
    selectors: &Selectors,
) -> Result<JobRecord, ScraperError> {
    let title = element.find_one(&selectors.title).await?.inner_text().await?;
    let employer = element
        .find_one(&selectors.employer)
        .await?
        .inner_text()
        .await?;

    let descriptions = read_texts(&element.find_all(&selectors.description).await?).await?;

    // ハイライトは全グループの行を文書順に平坦化
    let mut highlights = Vec::new();
    for group in element.find_all(&selectors.highlight_group).await? {
        let lines = group.find_all(&selectors.highlight_line).await?;
        highlights.extend(read_texts(&lines).await?);
    }

    Ok(JobRecord {
        title: clean_text(&title),
        employer: clean_text(&employer),
        job_description: clean_fragments(&descriptions),
        job_highlights: clean_fragments(&highlights),
    })
}

async fn read_texts<E: ElementHandle>(elements: &[E]) -> Result<Vec<String>, ScraperError> {
    let mut texts = Vec::with_capacity(elements.len());
    for element in elements {
        texts.push(element.inner_text().await?);
    }
    Ok(texts)
}
