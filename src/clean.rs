//! テキスト正規化

/// 複数断片を連結する区切り
pub const FRAGMENT_SEPARATOR: &str = " | ";

/// 連続空白を1つにまとめ、前後を除去
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 各断片を clean_text したうえで " | " で連結
pub fn clean_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .map(|f| clean_text(f.as_ref()))
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}
