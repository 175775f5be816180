//! 技術キーワードの統制語彙

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::ScraperError;

const BUILTIN_TERMS: &str = include_str!("../data/computer_science_terms.txt");

static BUILTIN: OnceLock<Vocabulary> = OnceLock::new();

/// 小文字の技術用語集合。構築後は読み取り専用
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: HashSet<String>,
}

impl Vocabulary {
    /// 組み込み語彙（初回呼び出し時に一度だけ構築）
    pub fn builtin() -> &'static Vocabulary {
        BUILTIN.get_or_init(|| {
            let vocabulary = Self::parse(BUILTIN_TERMS);
            debug!("Loaded {} built-in vocabulary terms", vocabulary.len());
            vocabulary
        })
    }

    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// 1行1語のテキストファイルから読み込む（空行と # 行は無視）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScraperError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let vocabulary = Self::parse(&content);
        if vocabulary.is_empty() {
            return Err(ScraperError::InvalidConfig(format!(
                "vocabulary file {:?} has no terms",
                path.as_ref()
            )));
        }
        Ok(vocabulary)
    }

    fn parse(content: &str) -> Self {
        Self::from_terms(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    pub fn contains(&self, token: &str) -> bool {
        self.terms.contains(token)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 語彙に含まれるトークンだけを順序を保って残す。
    /// トークンは呼び出し側で小文字化済みであること
    pub fn filter<I, S>(&self, tokens: I) -> Vec<S>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .filter(|t| self.contains(t.as_ref()))
            .collect()
    }
}
