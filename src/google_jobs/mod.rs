//! Google 求人検索スクレイパーモジュール
//!
//! 求人パネルをスクロールして全件表示させ、各求人の
//! 職種名・企業名・説明・ハイライトを抽出する

mod extractor;
mod parser;
mod scraper;
mod scroll;
mod selectors;
mod types;

pub use extractor::extract_listing;
pub use parser::parse_listing_page;
pub use scraper::{collect_listings, navigate_with_retry, GoogleJobsScraper};
pub use scroll::{scroll_until_stalled, ScrollOutcome, ScrollSettings};
pub use selectors::Selectors;
pub use types::{FrequencyTable, GroupedFrequencies, JobRecord, QueryRecords, RecordCollection};
