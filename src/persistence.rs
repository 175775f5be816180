//! JSONファイルの読み書きと出力先レイアウト

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::aggregate::Summary;
use crate::error::ScraperError;
use crate::google_jobs::{QueryRecords, RecordCollection};

/// 4スペースインデントでJSONを書き出す（親ディレクトリは作成）
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ScraperError::Json(e.to_string()))?;

    fs::write(path, buf)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ScraperError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ScraperError::Json(format!("{:?}: {}", path, e)))
}

fn decode_error(path: &Path, e: serde_json::Error) -> ScraperError {
    if e.classify() == serde_json::error::Category::Data {
        ScraperError::MalformedRecord(format!("{:?}: {}", path, e))
    } else {
        ScraperError::Json(format!("{:?}: {}", path, e))
    }
}

/// 求人JSON配列を読む。フィールド欠落・型違いは MalformedRecord
pub fn read_records(path: &Path) -> Result<RecordCollection, ScraperError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| decode_error(path, e))
}

/// 保存済み求人ファイルの中身
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedJobs {
    /// 1クエリ分の配列
    Single(RecordCollection),
    /// クエリ→配列のオブジェクト
    ByQuery(QueryRecords),
}

impl SavedJobs {
    /// 全求人を連結する。`dedupe` ならクエリごとに重複を除く
    pub fn into_records(self, dedupe: bool) -> RecordCollection {
        match self {
            Self::Single(records) if dedupe => records.deduplicated(),
            Self::Single(records) => records,
            Self::ByQuery(queries) => queries.flatten(dedupe),
        }
    }
}

/// 最上位の値の形（配列/オブジェクト）で読み分ける。
/// 形が合っていて中身が壊れていれば、その形での MalformedRecord を返す
pub fn read_saved_jobs(path: &Path) -> Result<SavedJobs, ScraperError> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| decode_error(path, e))?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .map(SavedJobs::Single)
            .map_err(|e| decode_error(path, e)),
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(SavedJobs::ByQuery)
            .map_err(|e| decode_error(path, e)),
        _ => Err(ScraperError::MalformedRecord(format!(
            "{:?}: expected an array of listings or an object of query -> listings",
            path
        ))),
    }
}

/// 集計テーブル4種 + キーワード全体を `dir` に書き出す
pub fn write_summary(dir: &Path, summary: &Summary) -> Result<(), ScraperError> {
    write_json(&dir.join(KEYWORDS_ALL_FILE), &summary.keywords)?;
    write_occurrence_tables(dir, summary)
}

/// 職種名・企業名の出現回数とキーワード内訳を `dir` に書き出す
pub fn write_occurrence_tables(dir: &Path, summary: &Summary) -> Result<(), ScraperError> {
    write_json(&dir.join(TITLE_OCCURRENCES_FILE), &summary.title_occurrences)?;
    write_json(&dir.join(EMPLOYER_OCCURRENCES_FILE), &summary.employer_occurrences)?;
    write_json(
        &dir.join(TITLE_KEYWORD_OCCURRENCES_FILE),
        &summary.keywords_by_title,
    )?;
    write_json(
        &dir.join(EMPLOYER_KEYWORD_OCCURRENCES_FILE),
        &summary.keywords_by_employer,
    )?;
    info!("Wrote occurrence tables to {:?}", dir);
    Ok(())
}

pub const JOBS_ALL_FILE: &str = "jobs_all.json";
pub const KEYWORDS_ALL_FILE: &str = "keywords_all.json";
pub const TITLE_OCCURRENCES_FILE: &str = "job_title_occurrences.json";
pub const EMPLOYER_OCCURRENCES_FILE: &str = "employer_occurrences.json";
pub const TITLE_KEYWORD_OCCURRENCES_FILE: &str = "job_title_keyword_occurrences.json";
pub const EMPLOYER_KEYWORD_OCCURRENCES_FILE: &str = "employer_keyword_occurrences.json";

/// 1回の実行の出力先: `<root>/<term> <YYYY-MM-DD>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl AsRef<Path>, term: &str, date: NaiveDate) -> Self {
        let name = sanitize_file_name(&format!("{} {}", term, date.format("%Y-%m-%d")));
        Self {
            dir: root.as_ref().join(name),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn create(&self) -> Result<(), ScraperError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn jobs_path(&self, query: &str) -> PathBuf {
        self.dir.join(sanitize_file_name(&format!("jobs {}.json", query)))
    }

    pub fn keywords_path(&self, query: &str) -> PathBuf {
        self.dir
            .join(sanitize_file_name(&format!("keywords {}.json", query)))
    }

    pub fn all_jobs_path(&self) -> PathBuf {
        self.dir.join(JOBS_ALL_FILE)
    }
}

/// パス区切りなどファイル名に使えない文字を '_' に置換
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
