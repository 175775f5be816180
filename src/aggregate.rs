//! 求人データからのキーワード集計

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScraperError;
use crate::google_jobs::{FrequencyTable, GroupedFrequencies, JobRecord};
use crate::vocabulary::Vocabulary;

/// キーワードの数え方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountingPolicy {
    /// 出現ごとに数える
    #[default]
    Raw,
    /// 1求人につき各キーワード最大1回
    PerRecord,
}

impl FromStr for CountingPolicy {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "per-record" => Ok(Self::PerRecord),
            other => Err(ScraperError::InvalidConfig(format!(
                "unknown counting policy `{}` (expected raw or per-record)",
                other
            ))),
        }
    }
}

/// 集計結果一式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub keywords: FrequencyTable,
    pub title_occurrences: FrequencyTable,
    pub employer_occurrences: FrequencyTable,
    pub keywords_by_title: GroupedFrequencies,
    pub keywords_by_employer: GroupedFrequencies,
}

/// 職種名・企業名の正規化（前後空白除去 + 小文字化）
fn group_key(value: &str) -> String {
    value.trim().to_lowercase()
}

pub struct Aggregator<'v> {
    vocabulary: &'v Vocabulary,
    policy: CountingPolicy,
}

impl<'v> Aggregator<'v> {
    pub fn new(vocabulary: &'v Vocabulary, policy: CountingPolicy) -> Self {
        Self { vocabulary, policy }
    }

    /// 説明とハイライトを小文字化・空白分割し、語彙で絞り込む。
    /// PerRecord のときは初出順に重複を除く
    pub fn record_keywords(&self, record: &JobRecord) -> Vec<String> {
        let text = format!(
            "{} {}",
            record.job_description.to_lowercase(),
            record.job_highlights.to_lowercase()
        );
        let tokens = self
            .vocabulary
            .filter(text.split_whitespace())
            .into_iter()
            .map(String::from);

        match self.policy {
            CountingPolicy::Raw => tokens.collect(),
            CountingPolicy::PerRecord => {
                let mut seen = HashSet::new();
                tokens.filter(|t| seen.insert(t.clone())).collect()
            }
        }
    }

    /// 全求人のキーワード出現回数
    pub fn keyword_frequency<'r, I>(&self, records: I) -> FrequencyTable
    where
        I: IntoIterator<Item = &'r JobRecord>,
    {
        FrequencyTable::count(records.into_iter().flat_map(|r| self.record_keywords(r)))
    }

    pub fn title_occurrences<'r, I>(&self, records: I) -> FrequencyTable
    where
        I: IntoIterator<Item = &'r JobRecord>,
    {
        FrequencyTable::count(records.into_iter().map(|r| group_key(&r.title)))
    }

    pub fn employer_occurrences<'r, I>(&self, records: I) -> FrequencyTable
    where
        I: IntoIterator<Item = &'r JobRecord>,
    {
        FrequencyTable::count(records.into_iter().map(|r| group_key(&r.employer)))
    }

    pub fn keywords_by_title<'r, I>(&self, records: I) -> GroupedFrequencies
    where
        I: IntoIterator<Item = &'r JobRecord> + Clone,
    {
        self.keywords_by(records, |r| r.title.as_str())
    }

    pub fn keywords_by_employer<'r, I>(&self, records: I) -> GroupedFrequencies
    where
        I: IntoIterator<Item = &'r JobRecord> + Clone,
    {
        self.keywords_by(records, |r| r.employer.as_str())
    }

    /// グループごとにキーワードを集め、グループは出現回数の降順で並べる
    fn keywords_by<'r, I, F>(&self, records: I, field: F) -> GroupedFrequencies
    where
        I: IntoIterator<Item = &'r JobRecord> + Clone,
        F: Fn(&JobRecord) -> &str,
    {
        let mut keywords: HashMap<String, Vec<String>> = HashMap::new();
        for record in records.clone() {
            keywords
                .entry(group_key(field(record)))
                .or_default()
                .extend(self.record_keywords(record));
        }

        let order = FrequencyTable::count(records.into_iter().map(|r| group_key(field(r))));
        let groups = order
            .keys()
            .map(|group| {
                let table = FrequencyTable::count(keywords.remove(group).unwrap_or_default());
                (group.to_string(), table)
            })
            .collect();
        GroupedFrequencies::from_groups(groups)
    }

    pub fn summarize<'r, I>(&self, records: I) -> Summary
    where
        I: IntoIterator<Item = &'r JobRecord> + Clone,
    {
        let summary = Summary {
            keywords: self.keyword_frequency(records.clone()),
            title_occurrences: self.title_occurrences(records.clone()),
            employer_occurrences: self.employer_occurrences(records.clone()),
            keywords_by_title: self.keywords_by_title(records.clone()),
            keywords_by_employer: self.keywords_by_employer(records),
        };
        debug!(
            "Summarized {} keywords, {} titles, {} employers",
            summary.keywords.len(),
            summary.title_occurrences.len(),
            summary.employer_occurrences.len()
        );
        summary
    }
}
