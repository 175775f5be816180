//! Google求人検索スクレイパー
//!
//! - 求人パネルをスクロールして全件表示させ、各求人を抽出
//! - 説明文・ハイライトから技術キーワードを集計してJSONに保存
//!
//! # 使用例
//!
//! ```rust,ignore
//! use google_jobs_scraper::{JobSearchService, ScraperConfig, SearchRequest};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = JobSearchService::new();
//!
//!     let request = SearchRequest::new("rust developer")
//!         .with_locations(["New York City", "San Francisco"])
//!         .with_config(ScraperConfig::new().with_max_scroll(50));
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("Results in {:?}", result.output_dir);
//! }
//! ```
//!
//! # 単一クエリ
//!
//! ```rust,ignore
//! use google_jobs_scraper::{GoogleJobsScraper, Scraper, ScraperConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut scraper = GoogleJobsScraper::new(ScraperConfig::default());
//!     let records = scraper.execute("python developer").await.unwrap();
//!     println!("Listings: {}", records.len());
//! }
//! ```

pub mod aggregate;
pub mod browser;
pub mod clean;
pub mod config;
pub mod error;
pub mod google_jobs;
pub mod persistence;
pub mod service;
pub mod traits;
pub mod vocabulary;

#[cfg(test)]
mod testing;

// 主要な型をリエクスポート
pub use aggregate::{Aggregator, CountingPolicy, Summary};
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use google_jobs::{
    FrequencyTable, GoogleJobsScraper, GroupedFrequencies, JobRecord, QueryRecords,
    RecordCollection, Selectors,
};
pub use service::{JobSearchService, SearchRequest, SearchResult};
pub use traits::{ElementHandle, JobsPage, Scraper};
pub use vocabulary::Vocabulary;
