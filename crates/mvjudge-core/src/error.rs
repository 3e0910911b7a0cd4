use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Message shown for any failure of the analysis request itself.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "评审过程发生错误。这可能是由于网络不稳定、视频格式不支持或 API 限制导致的。请稍后重试。";

/// Errors raised along the review flow: upload, analysis, record building and
/// history persistence.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("upload is {size} bytes, over the {limit} byte limit")]
    UploadSizeExceeded { size: u64, limit: u64 },

    #[error("failed to read upload '{}'", path.display())]
    UploadReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis request failed: {0}")]
    AnalysisRequestFailure(String),

    #[error("malformed analysis result: {0}")]
    MalformedAnalysisResult(String),

    #[error("failed to persist review history: {0}")]
    PersistenceError(#[from] StorageError),

    #[error("an analysis is already in progress")]
    AnalysisInProgress,

    #[error("a record with id '{0}' already exists")]
    DuplicateRecord(String),
}

impl ReviewError {
    /// The single message a user sees for this error.
    ///
    /// Analysis request and payload failures fold into one generic message.
    pub fn user_message(&self) -> String {
        match self {
            ReviewError::UploadSizeExceeded { .. } => "文件大小不能超过 100MB".to_string(),
            ReviewError::UploadReadFailure { .. } => "文件读取失败".to_string(),
            ReviewError::AnalysisRequestFailure(_) | ReviewError::MalformedAnalysisResult(_) => {
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
            ReviewError::PersistenceError(_) => "评审历史保存失败，本次评审结果未写入历史记录。".to_string(),
            ReviewError::AnalysisInProgress => "评审正在进行中，请稍候。".to_string(),
            ReviewError::DuplicateRecord(id) => format!("记录 {id} 已存在"),
        }
    }

    /// True for errors that abort the analysis flow before a record exists.
    pub fn is_analysis_flow(&self) -> bool {
        matches!(
            self,
            ReviewError::UploadSizeExceeded { .. }
                | ReviewError::UploadReadFailure { .. }
                | ReviewError::AnalysisRequestFailure(_)
                | ReviewError::MalformedAnalysisResult(_)
                | ReviewError::AnalysisInProgress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_failures_share_one_message() {
        let request = ReviewError::AnalysisRequestFailure("timeout".to_string());
        let malformed = ReviewError::MalformedAnalysisResult("missing scores".to_string());
        assert_eq!(request.user_message(), malformed.user_message());
        assert_eq!(request.user_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn test_upload_errors_have_specific_messages() {
        let size = ReviewError::UploadSizeExceeded {
            size: 200,
            limit: 100,
        };
        assert!(size.user_message().contains("100MB"));
        assert!(size.to_string().contains("200 bytes"));
        assert!(size.is_analysis_flow());
    }

    #[test]
    fn test_persistence_is_not_analysis_flow() {
        let err = ReviewError::PersistenceError(StorageError::QuotaExceeded {
            key: "reviewHistory".to_string(),
            size: 10,
            quota: 5,
        });
        assert!(!err.is_analysis_flow());
        assert!(err.user_message().starts_with("评审历史保存失败"));
    }
}
