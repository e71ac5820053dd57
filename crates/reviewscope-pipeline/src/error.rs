//! Error types for every pipeline stage.
//!
//! Each error maps to an `errors.*` translation key so front ends can show a
//! localized banner, optionally followed by the backend's own message.

use reviewscope_api_models::ErrorBody;
use reviewscope_report::TranslationBundle;
use thiserror::Error;

/// Errors that carry a user-facing translation key.
pub trait UserFacing {
    /// Translation key of the banner text.
    fn message_key(&self) -> &'static str;

    /// Message supplied by the backend, if any.
    fn backend_message(&self) -> Option<&str> {
        None
    }

    /// Localized banner text with the backend detail appended.
    fn localized(&self, bundle: &TranslationBundle) -> String {
        let base = bundle.t(self.message_key());
        match self.backend_message().map(str::trim) {
            Some(detail) if !detail.is_empty() && detail != base => format!("{base} ({detail})"),
            _ => base,
        }
    }
}

/// Reasons a picked file is rejected before any upload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileRejection {
    /// Neither the extension nor the MIME type is a spreadsheet format.
    #[error("unsupported file format: {name}")]
    UnsupportedFormat {
        /// File name as picked.
        name: String,
    },
    /// Zero-byte file.
    #[error("file is empty: {name}")]
    Empty {
        /// File name as picked.
        name: String,
    },
    /// File above the size limit.
    #[error("file {name} is {size} bytes, above the {limit} byte limit")]
    TooLarge {
        /// File name as picked.
        name: String,
        /// Actual size in bytes.
        size: u64,
        /// Limit in bytes.
        limit: u64,
    },
}

impl UserFacing for FileRejection {
    fn message_key(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "errors.unsupported_format",
            Self::Empty { .. } => "errors.empty_file",
            Self::TooLarge { .. } => "errors.too_large",
        }
    }
}

/// Reasons a category is refused at submit time.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CategoryRejection {
    /// Fewer than the minimum characters after trimming.
    #[error("category must be at least {min} characters (got {len})")]
    TooShort {
        /// Trimmed length in characters.
        len: usize,
        /// Minimum length.
        min: usize,
    },
    /// More than the maximum characters after trimming.
    #[error("category must be at most {max} characters (got {len})")]
    TooLong {
        /// Trimmed length in characters.
        len: usize,
        /// Maximum length.
        max: usize,
    },
}

impl UserFacing for CategoryRejection {
    fn message_key(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "errors.category_too_short",
            Self::TooLong { .. } => "errors.category_too_long",
        }
    }
}

/// Transport-level failure talking to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Non-success HTTP status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status text.
        message: String,
    },
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error, reading the message from an error body when present.
    #[must_use]
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = ErrorBody::message_from_bytes(body)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self::Status { status, message }
    }

    /// HTTP status code, when the failure came from one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Network, decode and 5xx failures are worth another attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Network(_) | Self::Decode(_) => true,
        }
    }

    /// Human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. } | Self::Network(message) | Self::Decode(message) => {
                message
            }
        }
    }
}

impl UserFacing for ApiError {
    fn message_key(&self) -> &'static str {
        match self {
            Self::Status { status: 404, .. } => "errors.not_found",
            Self::Network(_) => "errors.network",
            Self::Status { .. } | Self::Decode(_) => "errors.generic",
        }
    }

    fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}

/// Upload failure, categorized for the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    /// Refused locally; no request was made.
    #[error(transparent)]
    Rejected(#[from] FileRejection),
    /// Backend refused the format (415, or a 400 that says so).
    #[error("unsupported file format: {message}")]
    UnsupportedFormat {
        /// Backend message.
        message: String,
    },
    /// Backend refused the size (413).
    #[error("file too large: {message}")]
    TooLarge {
        /// Backend message.
        message: String,
    },
    /// Storage kept failing after every retry.
    #[error("file storage unavailable: {message}")]
    StorageUnavailable {
        /// Backend message.
        message: String,
    },
    /// Anything else, network and decode failures included.
    #[error("upload failed: {message}")]
    Generic {
        /// Backend or transport message.
        message: String,
    },
}

impl UploadError {
    /// Categorize a final transport error.
    #[must_use]
    pub fn from_api(error: ApiError) -> Self {
        match error {
            ApiError::Status {
                status: 415,
                message,
            } => Self::UnsupportedFormat { message },
            ApiError::Status {
                status: 400,
                message,
            } if mentions_format(&message) => Self::UnsupportedFormat { message },
            ApiError::Status {
                status: 413,
                message,
            } => Self::TooLarge { message },
            ApiError::Status { status, message } if status >= 500 => {
                Self::StorageUnavailable { message }
            }
            other => Self::Generic {
                message: other.message().to_string(),
            },
        }
    }
}

fn mentions_format(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ["format", "extension", "file type", "unsupported", "格式", "类型"]
        .iter()
        .any(|needle| lowered.contains(needle))
}

impl UserFacing for UploadError {
    fn message_key(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.message_key(),
            Self::UnsupportedFormat { .. } => "errors.unsupported_format",
            Self::TooLarge { .. } => "errors.too_large",
            Self::StorageUnavailable { .. } => "errors.storage_unavailable",
            Self::Generic { .. } => "errors.upload_failed",
        }
    }

    fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(_) => None,
            Self::UnsupportedFormat { message }
            | Self::TooLarge { message }
            | Self::StorageUnavailable { message }
            | Self::Generic { message } => Some(message),
        }
    }
}

/// Submission failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// No own-brand file has been uploaded.
    #[error("own-brand file has not been uploaded")]
    OwnFileMissing,
    /// Category failed validation.
    #[error(transparent)]
    Category(#[from] CategoryRejection),
    /// A job is already being submitted or polled.
    #[error("an analysis is already running")]
    Busy,
    /// The backend refused or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UserFacing for SubmitError {
    fn message_key(&self) -> &'static str {
        match self {
            Self::OwnFileMissing => "errors.own_file_missing",
            Self::Category(rejection) => rejection.message_key(),
            Self::Busy => "errors.busy",
            Self::Api(error) => error.message_key(),
        }
    }

    fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api(error) => error.backend_message(),
            _ => None,
        }
    }
}

/// Polling failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    /// The job reached `failed`.
    #[error("analysis failed: {}", .message.as_deref().unwrap_or("no detail"))]
    Failed {
        /// Backend failure text.
        message: Option<String>,
    },
    /// A status or result fetch failed terminally.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UserFacing for PollError {
    fn message_key(&self) -> &'static str {
        match self {
            Self::Failed { .. } => "errors.analysis_failed",
            Self::Api(error) => error.message_key(),
        }
    }

    fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => message.as_deref(),
            Self::Api(error) => error.backend_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewscope_api_models::Language;

    fn status(status: u16, message: &str) -> ApiError {
        ApiError::Status {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn upload_errors_are_categorized() {
        assert!(matches!(
            UploadError::from_api(status(415, "nope")),
            UploadError::UnsupportedFormat { .. }
        ));
        assert!(matches!(
            UploadError::from_api(status(400, "Unsupported file format .pdf")),
            UploadError::UnsupportedFormat { .. }
        ));
        assert!(matches!(
            UploadError::from_api(status(400, "missing field")),
            UploadError::Generic { .. }
        ));
        assert!(matches!(
            UploadError::from_api(status(413, "too big")),
            UploadError::TooLarge { .. }
        ));
        assert!(matches!(
            UploadError::from_api(status(507, "disk full")),
            UploadError::StorageUnavailable { .. }
        ));
        assert!(matches!(
            UploadError::from_api(ApiError::Network("reset".into())),
            UploadError::Generic { .. }
        ));
    }

    #[test]
    fn status_errors_read_the_body_message() {
        let error = ApiError::from_status(422, br#"{"detail": [{"msg": "bad category"}]}"#);
        assert_eq!(error.message(), "bad category");
        let fallback = ApiError::from_status(502, b"");
        assert_eq!(fallback.message(), "request failed with status 502");
        assert!(fallback.is_transient());
        assert!(!error.is_transient());
    }

    #[test]
    fn localized_text_appends_backend_detail() {
        let bundle = TranslationBundle::new(Language::En);
        let failed = PollError::Failed {
            message: Some("model timeout".into()),
        };
        assert_eq!(failed.localized(&bundle), "The analysis failed. (model timeout)");
        let bare = PollError::Failed { message: None };
        assert_eq!(bare.localized(&bundle), "The analysis failed.");
        assert_eq!(
            SubmitError::OwnFileMissing.localized(&TranslationBundle::new(Language::Zh)),
            "请先上传本品评论文件。"
        );
    }
}
