//! Transport seam between the pipeline and the analysis backend.

use crate::error::ApiError;
use async_trait::async_trait;
use reviewscope_api_models::{
    AnalyzeAccepted, AnalyzeRequest, FileRole, ReportSummary, StatusResponse, UploadedFile,
};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// A picked file as far as validation and upload are concerned.
pub trait FileSource {
    /// File name including the extension.
    fn name(&self) -> String;
    /// MIME type reported by the picker, when known.
    fn mime(&self) -> Option<String>;
    /// Size in bytes.
    fn size(&self) -> u64;
}

/// Which stored result to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultRef {
    /// Result of one analysis job.
    Job(String),
    /// Result of the most recent analysis.
    Latest,
    /// A historical report.
    Report(String),
}

impl ResultRef {
    /// Parse `latest` or treat the input as a job id.
    #[must_use]
    pub fn job_or_latest(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            Self::Latest
        } else {
            Self::Job(trimmed.to_string())
        }
    }
}

impl Display for ResultRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job(id) => write!(f, "job {id}"),
            Self::Latest => f.write_str("latest"),
            Self::Report(id) => write!(f, "report {id}"),
        }
    }
}

/// Backend operations used by the front ends.
///
/// Futures are not required to be `Send` so the same trait serves the browser
/// and native runtimes.
#[async_trait(?Send)]
pub trait AnalysisApi {
    /// Picked-file type this transport can upload.
    type File: FileSource + ?Sized;

    /// `POST /upload`.
    async fn upload(&self, file: &Self::File, role: FileRole) -> Result<UploadedFile, ApiError>;

    /// `POST /analyze`.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeAccepted, ApiError>;

    /// `GET /analysis/{id}/status`.
    async fn status(&self, job_id: &str) -> Result<StatusResponse, ApiError>;

    /// `GET /analysis/{id}/result`, `GET /analysis/latest/result` or `GET /report/{id}`.
    async fn result(&self, source: &ResultRef) -> Result<Value, ApiError>;

    /// `GET /report/{id}`.
    async fn report(&self, id: &str) -> Result<Value, ApiError> {
        self.result(&ResultRef::Report(id.to_string())).await
    }

    /// `GET /reports`.
    async fn list_reports(&self) -> Result<Vec<ReportSummary>, ApiError>;

    /// `DELETE /reports/{id}`.
    async fn delete_report(&self, id: &str) -> Result<(), ApiError>;
}
