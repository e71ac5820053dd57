#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the ReviewScope analysis backend.
//!
//! Both the CLI transport and the wasm UI encode requests and decode responses
//! through these types so the wire contract lives in one place. The backend has
//! shipped several field spellings over time; decoding is deliberately lenient
//! (aliases, numbers sent as strings, unknown status labels) while encoding
//! always uses the current spelling.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Endpoint paths relative to the configured API base URL.
///
/// Ids are percent-encoded as a single path segment.
pub mod paths {
    /// Multipart upload endpoint.
    pub const UPLOAD: &str = "/upload";
    /// Analysis submission endpoint.
    pub const ANALYZE: &str = "/analyze";
    /// Result of the most recent analysis.
    pub const LATEST_RESULT: &str = "/analysis/latest/result";
    /// Historical report listing.
    pub const REPORTS: &str = "/reports";

    /// Status endpoint for a job.
    #[must_use]
    pub fn status(id: &str) -> String {
        format!("/analysis/{}/status", urlencoding::encode(id))
    }

    /// Result endpoint for a job.
    #[must_use]
    pub fn result(id: &str) -> String {
        format!("/analysis/{}/result", urlencoding::encode(id))
    }

    /// Single historical report.
    #[must_use]
    pub fn report(id: &str) -> String {
        format!("/report/{}", urlencoding::encode(id))
    }

    /// Deletion endpoint for a stored report.
    #[must_use]
    pub fn delete_report(id: &str) -> String {
        format!("/reports/{}", urlencoding::encode(id))
    }
}

/// Role of an uploaded review dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// Reviews for the brand being analysed (required).
    Own,
    /// Reviews for a comparison product (optional).
    Competitor,
}

impl FileRole {
    /// Wire value sent in the `fileType` form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Competitor => "competitor",
        }
    }

    /// Parse a wire or CLI value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "own" | "own_brand" | "ownbrand" => Some(Self::Own),
            "competitor" | "comp" => Some(Self::Competitor),
            _ => None,
        }
    }
}

/// Output language requested from the backend and used for rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Chinese (Simplified).
    Zh,
}

impl Language {
    /// All supported languages in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::En, Self::Zh]
    }

    /// Two-letter code used on the wire and in storage.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Native label for language pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Zh => "中文",
        }
    }

    /// The other language, for two-state toggles.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::En => Self::Zh,
            Self::Zh => Self::En,
        }
    }

    /// Map a browser language tag (`zh-CN`, `en_US`) to a supported language.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let base = lowered.split(['-', '_']).next().unwrap_or_default();
        Self::all().into_iter().find(|lang| lang.code() == base)
    }
}

/// Stored-file reference returned by `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    /// Server-side name used to reference the file in `/analyze`.
    #[serde(rename = "fileName", alias = "file_name")]
    pub stored_name: String,
    /// Name of the file as picked by the user.
    #[serde(rename = "originalName", alias = "original_name", default)]
    pub original_name: String,
    /// Role the file was uploaded for.
    #[serde(rename = "fileType", alias = "file_type")]
    pub role: FileRole,
    /// Size in bytes as reported by the backend.
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
}

impl UploadedFile {
    /// Name to show in the UI, falling back to the stored name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.original_name.is_empty() {
            &self.stored_name
        } else {
            &self.original_name
        }
    }
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Stored name of the own-brand dataset.
    pub own_brand_file: String,
    /// Stored name of the competitor dataset, sent as `null` when absent.
    pub competitor_file: Option<String>,
    /// Trimmed product category.
    pub target_category: String,
    /// Output language.
    pub language: Language,
}

/// Response of `POST /analyze` under the asynchronous contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawAccepted")]
pub struct AnalyzeAccepted {
    /// Job identifier to poll.
    pub analysis_id: String,
}

#[derive(Deserialize)]
struct RawAccepted {
    #[serde(default)]
    analysis_id: Option<Value>,
    #[serde(default, rename = "analysisId")]
    analysis_id_camel: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

impl TryFrom<RawAccepted> for AnalyzeAccepted {
    type Error = String;

    fn try_from(raw: RawAccepted) -> Result<Self, Self::Error> {
        [raw.analysis_id, raw.analysis_id_camel, raw.id]
            .into_iter()
            .flatten()
            .find_map(|value| scalar_to_string(&value))
            .map(|analysis_id| Self { analysis_id })
            .ok_or_else(|| "response did not contain an analysis id".to_string())
    }
}

/// Lifecycle state of a backend analysis job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "Option<String>", into = "String")]
pub enum JobStatus {
    /// Accepted, not yet processing.
    #[default]
    Starting,
    /// Processing.
    Running,
    /// Finished; the result can be fetched.
    Completed,
    /// Finished with an error.
    Failed,
    /// A label this client does not know. Treated as non-terminal.
    Unknown,
}

impl JobStatus {
    /// Whether polling should stop at this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "starting" | "pending" | "queued" | "created" => Self::Starting,
            "running" | "processing" | "in_progress" | "analyzing" => Self::Running,
            "completed" | "complete" | "done" | "success" | "succeeded" => Self::Completed,
            "failed" | "error" | "failure" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

/// An explicit `null` is an unknown state, not a decode error.
impl From<Option<String>> for JobStatus {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unknown, Self::from)
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

/// State of one step in the backend processing pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "Option<String>", into = "String")]
pub enum StepStatus {
    /// Not started.
    #[default]
    Pending,
    /// In progress.
    Running,
    /// Done.
    Completed,
    /// Failed.
    Failed,
}

impl StepStatus {
    /// Canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl From<String> for StepStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "running" | "processing" | "in_progress" | "active" => Self::Running,
            "completed" | "complete" | "done" => Self::Completed,
            "failed" | "error" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl From<Option<String>> for StepStatus {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Pending, Self::from)
    }
}

impl From<StepStatus> for String {
    fn from(value: StepStatus) -> Self {
        value.as_str().to_string()
    }
}

/// One processing step reported by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepView {
    /// Stable step identifier.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// English step name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Chinese step name when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_zh: Option<String>,
    /// Step state.
    #[serde(default)]
    pub status: StepStatus,
}

impl StepView {
    /// Name in the requested language, falling back to English.
    #[must_use]
    pub fn label(&self, language: Language) -> &str {
        match (language, self.name_zh.as_deref()) {
            (Language::Zh, Some(zh)) if !zh.trim().is_empty() => zh,
            _ if self.name.is_empty() => &self.id,
            _ => &self.name,
        }
    }
}

/// Response of `GET /analysis/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    /// Current job state.
    #[serde(default)]
    pub status: JobStatus,
    /// Overall progress, 0–100.
    #[serde(default, deserialize_with = "lenient_percent")]
    pub progress: f64,
    /// Identifier or label of the step in progress.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub current_step: Option<String>,
    /// Ordered step list.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub steps: Vec<StepView>,
    /// Failure detail when `status` is failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Free-form status message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    /// Backend-provided failure text, if any.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Summary row of `GET /reports`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Report identifier.
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Creation timestamp as sent by the backend.
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_string")]
    pub timestamp: String,
    /// Target category of the analysis.
    #[serde(default, alias = "targetCategory", deserialize_with = "lenient_string")]
    pub category: String,
    /// Job state at listing time.
    #[serde(default)]
    pub status: JobStatus,
    /// Whether a competitor dataset was analysed.
    #[serde(default, alias = "has_competitor_data")]
    pub has_competitor_data: bool,
}

/// `GET /reports` answers either a bare array or a wrapped one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReportListResponse {
    /// `[ {...}, ... ]`
    Bare(Vec<ReportSummary>),
    /// `{ "reports": [ ... ] }`
    Wrapped {
        /// Listed reports.
        reports: Vec<ReportSummary>,
    },
}

impl ReportListResponse {
    /// Flatten either shape into the summaries.
    #[must_use]
    pub fn into_vec(self) -> Vec<ReportSummary> {
        match self {
            Self::Bare(reports) | Self::Wrapped { reports } => reports,
        }
    }
}

/// Error body shapes the backend has used (`error`, `message`, FastAPI `detail`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// `{"error": "..."}`
    #[serde(default)]
    pub error: Option<Value>,
    /// `{"message": "..."}`
    #[serde(default)]
    pub message: Option<Value>,
    /// `{"detail": "..."}` or a list of `{"msg": "..."}` entries.
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Extract a human-readable message from whichever field is populated.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        [self.error, self.message, self.detail]
            .into_iter()
            .flatten()
            .find_map(|value| describe_error_value(&value))
    }

    /// Parse an error body from raw bytes, returning the message if one exists.
    #[must_use]
    pub fn message_from_bytes(bytes: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(bytes)
            .ok()
            .and_then(Self::into_message)
            .or_else(|| {
                let text = String::from_utf8_lossy(bytes).trim().to_string();
                (!text.is_empty() && !text.starts_with('{') && !text.starts_with('<'))
                    .then_some(text)
            })
    }
}

fn describe_error_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .and_then(describe_error_value)
                        .or_else(|| describe_error_value(item))
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(map) => ["message", "msg", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(describe_error_value)),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()).unwrap_or(0.0).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uploaded_file_uses_backend_field_names() {
        let file: UploadedFile = serde_json::from_value(json!({
            "fileName": "1700000000_reviews.csv",
            "originalName": "reviews.csv",
            "fileType": "own",
            "size": 2048
        }))
        .expect("decode upload response");
        assert_eq!(file.stored_name, "1700000000_reviews.csv");
        assert_eq!(file.role, FileRole::Own);
        assert_eq!(file.size_bytes, 2048);
        assert_eq!(file.display_name(), "reviews.csv");
    }

    #[test]
    fn analyze_request_serialises_null_competitor() {
        let body = serde_json::to_value(AnalyzeRequest {
            own_brand_file: "a.csv".into(),
            competitor_file: None,
            target_category: "Wireless Headphones".into(),
            language: Language::Zh,
        })
        .expect("encode");
        assert_eq!(
            body,
            json!({
                "ownBrandFile": "a.csv",
                "competitorFile": null,
                "targetCategory": "Wireless Headphones",
                "language": "zh"
            })
        );
    }

    #[test]
    fn analyze_accepted_reads_any_id_spelling() {
        for body in [
            json!({"analysis_id": "job-1"}),
            json!({"analysisId": "job-1"}),
            json!({"id": "job-1", "status": "starting"}),
        ] {
            let accepted: AnalyzeAccepted = serde_json::from_value(body).expect("decode");
            assert_eq!(accepted.analysis_id, "job-1");
        }
        let numeric: AnalyzeAccepted =
            serde_json::from_value(json!({"analysis_id": 42})).expect("numeric id");
        assert_eq!(numeric.analysis_id, "42");
        assert!(serde_json::from_value::<AnalyzeAccepted>(json!({"status": "ok"})).is_err());
    }

    #[test]
    fn status_response_tolerates_legacy_shapes() {
        let status: StatusResponse = serde_json::from_value(json!({
            "status": "processing",
            "progress": "40%",
            "current_step": 2,
            "steps": [
                {"id": "parse", "name": "Parse reviews", "name_zh": "解析评论", "status": "completed"},
                {"id": 2, "name": "Cluster", "status": "in_progress"},
                {"id": "report", "name": "Report"}
            ]
        }))
        .expect("decode status");
        assert_eq!(status.status, JobStatus::Running);
        assert!((status.progress - 40.0).abs() < f64::EPSILON);
        assert_eq!(status.current_step.as_deref(), Some("2"));
        assert_eq!(status.steps[1].status, StepStatus::Running);
        assert_eq!(status.steps[2].status, StepStatus::Pending);
        assert_eq!(status.steps[0].label(Language::Zh), "解析评论");
        assert_eq!(status.steps[1].label(Language::Zh), "Cluster");
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let status: StatusResponse =
            serde_json::from_value(json!({"status": "warming_up", "progress": 250}))
                .expect("decode");
        assert_eq!(status.status, JobStatus::Unknown);
        assert!(!status.status.is_terminal());
        assert!((status.progress - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_list_accepts_bare_and_wrapped() {
        let bare: ReportListResponse = serde_json::from_value(json!([
            {"id": "r1", "timestamp": "2024-05-01T10:00:00Z", "category": "Headphones", "status": "completed", "hasCompetitorData": true}
        ]))
        .expect("bare");
        let wrapped: ReportListResponse = serde_json::from_value(json!({
            "reports": [{"id": 7, "createdAt": "2024-05-02", "targetCategory": "Mugs"}]
        }))
        .expect("wrapped");
        let bare = bare.into_vec();
        let wrapped = wrapped.into_vec();
        assert!(bare[0].has_competitor_data);
        assert_eq!(wrapped[0].id, "7");
        assert_eq!(wrapped[0].category, "Mugs");
        assert_eq!(wrapped[0].status, JobStatus::Starting);
    }

    #[test]
    fn error_body_prefers_populated_fields() {
        assert_eq!(
            ErrorBody::message_from_bytes(br#"{"error": "Unsupported file format"}"#).as_deref(),
            Some("Unsupported file format")
        );
        assert_eq!(
            ErrorBody::message_from_bytes(
                br#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#
            )
            .as_deref(),
            Some("field required")
        );
        assert_eq!(
            ErrorBody::message_from_bytes(b"storage offline").as_deref(),
            Some("storage offline")
        );
        assert_eq!(ErrorBody::message_from_bytes(b"<html></html>"), None);
    }

    #[test]
    fn language_tags_map_to_supported_languages() {
        assert_eq!(Language::from_tag("zh-CN"), Some(Language::Zh));
        assert_eq!(Language::from_tag("en_US"), Some(Language::En));
        assert_eq!(Language::from_tag("fr"), None);
        assert_eq!(Language::En.toggled(), Language::Zh);
    }

    #[test]
    fn paths_embed_identifiers() {
        assert_eq!(paths::status("abc"), "/analysis/abc/status");
        assert_eq!(paths::result("abc"), "/analysis/abc/result");
        assert_eq!(paths::report("r1"), "/report/r1");
        assert_eq!(paths::delete_report("r1"), "/reports/r1");
    }

    #[test]
    fn path_ids_stay_one_segment() {
        assert_eq!(paths::status("a/b?c#d"), "/analysis/a%2Fb%3Fc%23d/status");
        assert_eq!(paths::report("q 1"), "/report/q%201");
        assert_eq!(paths::delete_report("../x"), "/reports/..%2Fx");
    }

    #[test]
    fn null_status_and_steps_decode_while_running() {
        let running: StatusResponse = serde_json::from_value(json!({
            "status": "running",
            "progress": 40,
            "current_step": null,
            "steps": null
        }))
        .expect("null steps decode");
        assert_eq!(running.status, JobStatus::Running);
        assert!(running.steps.is_empty());
        assert_eq!(running.current_step, None);

        let blank: StatusResponse = serde_json::from_value(json!({
            "status": null,
            "steps": [{"id": "parse", "name": "Parse", "status": null}]
        }))
        .expect("null status decodes");
        assert_eq!(blank.status, JobStatus::Unknown);
        assert!(!blank.status.is_terminal());
        assert_eq!(blank.steps[0].status, StepStatus::Pending);
    }
}
