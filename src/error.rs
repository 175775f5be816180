use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("JavaScript/CDPエラー: {0}")]
    JavaScript(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("JSONエラー: {0}")]
    Json(String),

    #[error("求人データの形式不正: {0}")]
    MalformedRecord(String),

    #[error("設定エラー: {0}")]
    InvalidConfig(String),
}

impl ScraperError {
    /// 再試行で回復しうるエラーか
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Navigation(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ScraperError::Navigation("net::ERR_ABORTED".into()).is_retryable());
        assert!(ScraperError::Timeout("listing panel".into()).is_retryable());
        assert!(!ScraperError::ElementNotFound("h2".into()).is_retryable());
        assert!(!ScraperError::MalformedRecord("missing field `title`".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ScraperError::Navigation("net::ERR_ABORTED".into());
        assert_eq!(err.to_string(), "ナビゲーションエラー: net::ERR_ABORTED");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ScraperError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "jobs.json").into();
        assert!(matches!(err, ScraperError::FileIO(_)));
    }
}
