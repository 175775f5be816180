use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::Service;
use tracing::{info, warn};

use crate::aggregate::{Aggregator, CountingPolicy, Summary};
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::google_jobs::{GoogleJobsScraper, QueryRecords};
use crate::persistence::{write_json, write_summary, OutputLayout};
use crate::traits::Scraper;
use crate::vocabulary::Vocabulary;

/// 検索リクエスト（検索語 × 地域ごとに1クエリ）
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub term: String,
    pub locations: Vec<String>,
    pub output_root: PathBuf,
    pub config: ScraperConfig,
    pub vocabulary: Arc<Vocabulary>,
    pub counting: CountingPolicy,
    /// クエリ内の完全一致重複を集計前に除去
    pub dedupe: bool,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            locations: Vec::new(),
            output_root: PathBuf::from("./results"),
            config: ScraperConfig::default(),
            vocabulary: Arc::new(Vocabulary::builtin().clone()),
            counting: CountingPolicy::default(),
            dedupe: false,
        }
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = path.into();
        self
    }

    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Arc::new(vocabulary);
        self
    }

    pub fn with_counting(mut self, counting: CountingPolicy) -> Self {
        self.counting = counting;
        self
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// 実行するクエリ一覧。地域指定が無ければ検索語そのもの
    pub fn queries(&self) -> Vec<String> {
        if self.locations.is_empty() {
            return vec![self.term.clone()];
        }
        self.locations
            .iter()
            .map(|location| format!("{} in {}", self.term, location))
            .collect()
    }
}

/// クエリ1件の結果
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    pub record_count: usize,
    pub jobs_path: PathBuf,
    pub keywords_path: PathBuf,
}

/// 検索結果
#[derive(Debug)]
pub struct SearchResult {
    pub output_dir: PathBuf,
    pub outcomes: Vec<QueryOutcome>,
    /// (クエリ, エラー内容)
    pub failures: Vec<(String, String)>,
    pub records: QueryRecords,
    pub summary: Summary,
}

/// tower::Serviceを実装した求人検索サービス
#[derive(Clone)]
pub struct JobSearchService<F> {
    factory: F,
}

impl JobSearchService<fn(ScraperConfig) -> GoogleJobsScraper> {
    pub fn new() -> Self {
        Self {
            factory: GoogleJobsScraper::new,
        }
    }
}

impl Default for JobSearchService<fn(ScraperConfig) -> GoogleJobsScraper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> JobSearchService<F> {
    /// クエリごとのスクレイパー生成関数を差し替える
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }
}

impl<F, S> Service<SearchRequest> for JobSearchService<F>
where
    F: Fn(ScraperConfig) -> S + Clone + Send + 'static,
    S: Scraper + 'static,
{
    type Response = SearchResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SearchRequest) -> Self::Future {
        info!("Search request received: term={}", req.term);
        let factory = self.factory.clone();

        Box::pin(async move { run_batch(factory, req).await })
    }
}

async fn run_batch<F, S>(factory: F, req: SearchRequest) -> Result<SearchResult, ScraperError>
where
    F: Fn(ScraperConfig) -> S,
    S: Scraper,
{
    let start = Instant::now();
    let layout = OutputLayout::new(&req.output_root, &req.term, chrono::Local::now().date_naive());
    layout.create()?;
    info!("Writing results into {:?}", layout.dir());

    let aggregator = Aggregator::new(&req.vocabulary, req.counting);
    let mut records = QueryRecords::new();
    let mut outcomes = Vec::new();
    let mut failures = Vec::new();

    for query in req.queries() {
        // クエリごとにブラウザセッションを作り直す
        let mut scraper = factory(req.config.clone());
        let collected = match scraper.execute(&query).await {
            Ok(collected) => collected,
            Err(e) => {
                warn!("Query `{}` failed: {}", query, e);
                failures.push((query, e.to_string()));
                continue;
            }
        };

        let counted = if req.dedupe {
            collected.deduplicated()
        } else {
            collected.clone()
        };
        let keywords = aggregator.keyword_frequency(&counted);

        let jobs_path = layout.jobs_path(&query);
        let keywords_path = layout.keywords_path(&query);
        write_json(&jobs_path, &collected)?;
        write_json(&keywords_path, &keywords)?;
        info!(
            "Saved {} listings and {} keywords for `{}`",
            collected.len(),
            keywords.len(),
            query
        );

        outcomes.push(QueryOutcome {
            query: query.clone(),
            record_count: collected.len(),
            jobs_path,
            keywords_path,
        });
        records.insert(query, collected);
    }

    // 全クエリ横断の集計
    let all_records = records.flatten(req.dedupe);
    let summary = aggregator.summarize(&all_records);
    write_json(&layout.all_jobs_path(), &records)?;
    write_summary(layout.dir(), &summary)?;

    info!(
        "Search completed: {} queries, {} failed, {} listings in {:?}",
        outcomes.len() + failures.len(),
        failures.len(),
        all_records.len(),
        start.elapsed()
    );

    Ok(SearchResult {
        output_dir: layout.dir().to_path_buf(),
        outcomes,
        failures,
        records,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::google_jobs::{FrequencyTable, GroupedFrequencies, JobRecord, RecordCollection};
    use crate::persistence::{read_json, read_records, TITLE_KEYWORD_OCCURRENCES_FILE};

    fn record(title: &str, employer: &str, description: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            employer: employer.to_string(),
            job_description: description.to_string(),
            job_highlights: String::new(),
        }
    }

    /// クエリごとに固定の結果を返すスクレイパー
    struct FakeScraper {
        results: Arc<HashMap<String, Vec<JobRecord>>>,
        initialized: bool,
    }

    #[async_trait]
    impl Scraper for FakeScraper {
        async fn initialize(&mut self) -> Result<(), ScraperError> {
            self.initialized = true;
            Ok(())
        }

        async fn search(&mut self, query: &str) -> Result<RecordCollection, ScraperError> {
            assert!(self.initialized);
            self.results
                .get(query)
                .map(|r| r.clone().into())
                .ok_or_else(|| ScraperError::Navigation(format!("no route to `{}`", query)))
        }

        async fn close(&mut self) -> Result<(), ScraperError> {
            self.initialized = false;
            Ok(())
        }
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "google-jobs-service-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn test_search_request_builder() {
        let req = SearchRequest::new("rust developer")
            .with_locations(["New York City", "San Francisco"])
            .with_output_root("/tmp/results")
            .with_counting(CountingPolicy::PerRecord)
            .with_dedupe(true);

        assert_eq!(
            req.queries(),
            vec![
                "rust developer in New York City",
                "rust developer in San Francisco"
            ]
        );
        assert_eq!(req.output_root, PathBuf::from("/tmp/results"));
        assert_eq!(req.counting, CountingPolicy::PerRecord);
        assert!(req.dedupe);
    }

    #[test]
    fn test_queries_without_locations() {
        let req = SearchRequest::new("python developer");
        assert_eq!(req.queries(), vec!["python developer"]);
    }

    #[tokio::test]
    async fn test_batch_writes_per_query_and_summary_files() {
        let mut results = HashMap::new();
        results.insert(
            "dev in NYC".to_string(),
            vec![
                record("Software Engineer", "Acme", "python python django"),
                record("Software Engineer", "Acme", "python python django"),
            ],
        );
        results.insert(
            "dev in SF".to_string(),
            vec![record("Software Engineer", "Globex", "python flask")],
        );
        let results = Arc::new(results);

        let factory = move |_config: ScraperConfig| FakeScraper {
            results: results.clone(),
            initialized: false,
        };
        let mut service = JobSearchService::with_factory(factory);

        let root = temp_root();
        let req = SearchRequest::new("dev")
            .with_locations(["NYC", "Boston", "SF"])
            .with_output_root(&root)
            .with_vocabulary(Vocabulary::from_terms(["python", "django", "flask"]))
            .with_dedupe(true);

        let result = service.call(req).await.unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].0, "dev in Boston");

        // 生データは重複込みで保存
        let nyc = read_records(&result.outcomes[0].jobs_path).unwrap();
        assert_eq!(nyc.len(), 2);
        let nyc_keywords: FrequencyTable = read_json(&result.outcomes[0].keywords_path).unwrap();
        assert_eq!(nyc_keywords.get("python"), Some(2));

        // 横断集計は重複除去後
        let by_title: GroupedFrequencies =
            read_json(&result.output_dir.join(TITLE_KEYWORD_OCCURRENCES_FILE)).unwrap();
        let table = by_title.get("software engineer").unwrap();
        assert_eq!(
            table.entries(),
            &[
                ("python".to_string(), 3),
                ("django".to_string(), 1),
                ("flask".to_string(), 1),
            ]
        );
        assert_eq!(result.summary.title_occurrences.get("software engineer"), Some(2));
        assert_eq!(result.records.len(), 2);

        std::fs::remove_dir_all(&root).ok();
    }
}
