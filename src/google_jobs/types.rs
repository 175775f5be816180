//! 求人データと集計テーブルの型定義

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// 求人1件
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub employer: String,
    pub job_description: String,
    pub job_highlights: String,
}

/// 1クエリ分の求人（描画順）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection {
    records: Vec<JobRecord>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: JobRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[JobRecord] {
        &self.records
    }

    /// 完全一致する重複を除去（最初の出現を残す）
    pub fn deduplicated(&self) -> Self {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(*r))
            .cloned()
            .collect()
    }

    pub fn into_inner(self) -> Vec<JobRecord> {
        self.records
    }
}

impl FromIterator<JobRecord> for RecordCollection {
    fn from_iter<T: IntoIterator<Item = JobRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<JobRecord>> for RecordCollection {
    fn from(records: Vec<JobRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a JobRecord;
    type IntoIter = std::slice::Iter<'a, JobRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// クエリごとの求人。JSONではクエリ→配列のオブジェクト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryRecords {
    #[serde(with = "ordered_map")]
    queries: Vec<(String, RecordCollection)>,
}

impl QueryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query: impl Into<String>, records: RecordCollection) {
        self.queries.push((query.into(), records));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordCollection)> {
        self.queries.iter().map(|(q, r)| (q.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// 全クエリの求人をクエリ順に連結
    pub fn flatten(&self, dedupe_per_query: bool) -> RecordCollection {
        self.queries
            .iter()
            .flat_map(|(_, records)| {
                if dedupe_per_query {
                    records.deduplicated().into_inner()
                } else {
                    records.as_slice().to_vec()
                }
            })
            .collect()
    }
}

/// 出現回数テーブル（降順、同数は初出順）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    #[serde(with = "ordered_map")]
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    /// 文字列列を数え上げ、出現回数の降順に並べる（安定ソート）
    pub fn count<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<(String, u64)> = Vec::new();
        for item in items {
            let key = item.into();
            match index.get(&key) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, 1));
                }
            }
        }
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// グループ（職種名・企業名）ごとのキーワード出現回数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedFrequencies {
    #[serde(with = "ordered_map")]
    groups: Vec<(String, FrequencyTable)>,
}

impl GroupedFrequencies {
    pub(crate) fn from_groups(groups: Vec<(String, FrequencyTable)>) -> Self {
        Self { groups }
    }

    pub fn get(&self, group: &str) -> Option<&FrequencyTable> {
        self.groups
            .iter()
            .find(|(g, _)| g == group)
            .map(|(_, table)| table)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &FrequencyTable)> {
        self.groups.iter().map(|(g, t)| (g.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// 順序付き (キー, 値) 列を JSON オブジェクトとして読み書きする
mod ordered_map {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, V>(entries: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Vec<(String, V)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
