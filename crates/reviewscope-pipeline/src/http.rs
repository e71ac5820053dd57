//! Native HTTP transport over `reqwest`.

use crate::api::{AnalysisApi, FileSource, ResultRef};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use reviewscope_api_models::{
    AnalyzeAccepted, AnalyzeRequest, FileRole, ReportListResponse, ReportSummary, StatusResponse,
    UploadedFile, paths,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpApi`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// API root, e.g. `http://127.0.0.1:8000/api`. Endpoint paths are appended.
    pub base_url: Url,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpConfig {
    /// Settings without auth and with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A file on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
    size: u64,
}

impl LocalFile {
    /// Stat `path`.
    ///
    /// # Errors
    ///
    /// Returns the filesystem error when the file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path)?.len();
        Ok(Self { path, size })
    }

    /// Location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for LocalFile {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn mime(&self) -> Option<String> {
        mime_guess::from_path(&self.path)
            .first()
            .map(|mime| mime.essence_str().to_string())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// [`AnalysisApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails when the token is not a valid header value or the TLS backend
    /// cannot be initialised.
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::Network("API token contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Network(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for an endpoint path. The base path is kept, unlike
    /// [`Url::join`].
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .bytes()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");
        let response = self.send(self.client.get(url)).await?;
        Self::decode(response).await
    }
}

#[async_trait(?Send)]
impl AnalysisApi for HttpApi {
    type File = LocalFile;

    async fn upload(&self, file: &LocalFile, role: FileRole) -> Result<UploadedFile, ApiError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|err| ApiError::Network(format!("failed to read {}: {err}", file.path().display())))?;
        let mut part = Part::bytes(bytes).file_name(file.name());
        if let Some(mime) = file.mime() {
            part = part
                .mime_str(&mime)
                .map_err(|err| ApiError::Network(err.to_string()))?;
        }
        let form = Form::new()
            .part("file", part)
            .text("fileType", role.as_str());
        let url = self.endpoint(paths::UPLOAD);
        debug!(url = %url, role = role.as_str(), size = file.size(), "POST upload");
        let response = self.send(self.client.post(url).multipart(form)).await?;
        Self::decode(response).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeAccepted, ApiError> {
        let url = self.endpoint(paths::ANALYZE);
        debug!(url = %url, category = %request.target_category, "POST analyze");
        let response = self.send(self.client.post(url).json(request)).await?;
        Self::decode(response).await
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, ApiError> {
        self.get_json(&paths::status(job_id)).await
    }

    async fn result(&self, source: &ResultRef) -> Result<Value, ApiError> {
        let path = match source {
            ResultRef::Job(id) => paths::result(id),
            ResultRef::Latest => paths::LATEST_RESULT.to_string(),
            ResultRef::Report(id) => paths::report(id),
        };
        self.get_json(&path).await
    }

    async fn list_reports(&self) -> Result<Vec<ReportSummary>, ApiError> {
        self.get_json::<ReportListResponse>(paths::REPORTS)
            .await
            .map(ReportListResponse::into_vec)
    }

    async fn delete_report(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&paths::delete_report(id));
        debug!(url = %url, "DELETE");
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::timer::TokioTimer;
    use crate::upload::{RetryPolicy, Uploader};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use reviewscope_api_models::{JobStatus, Language};
    use serde_json::json;
    use std::io::Write;

    fn api_for(server: &MockServer, token: Option<&str>) -> HttpApi {
        let base = format!("{}/api/", server.base_url()).parse().expect("url");
        let mut config = HttpConfig::new(base);
        config.token = token.map(ToString::to_string);
        HttpApi::new(config).expect("client")
    }

    fn csv_file(dir: &tempfile::TempDir) -> LocalFile {
        let path = dir.path().join("reviews.csv");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "rating,review\n5,great sound").expect("write");
        LocalFile::open(path).expect("open")
    }

    #[test]
    fn local_files_report_name_mime_and_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = csv_file(&dir);
        assert_eq!(file.name(), "reviews.csv");
        assert_eq!(file.mime().as_deref(), Some("text/csv"));
        assert!(file.size() > 0);
        assert!(LocalFile::open(dir.path().join("missing.csv")).is_err());
    }

    #[tokio::test]
    async fn endpoints_keep_the_base_path_and_send_the_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/analysis/job-1/status")
                .header("authorization", "Bearer secret");
            then.status(200).json_body(json!({
                "status": "running",
                "progress": "40",
                "current_step": "sentiment"
            }));
        });

        let api = api_for(&server, Some("secret"));
        let status = api.status("job-1").await.expect("status");
        mock.assert();
        assert_eq!(status.status, JobStatus::Running);
        assert!((status.progress - 40.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn upload_posts_multipart_with_the_role() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/upload")
                .body_includes("name=\"fileType\"")
                .body_includes("competitor")
                .body_includes("filename=\"reviews.csv\"");
            then.status(200).json_body(json!({
                "fileName": "abc_reviews.csv",
                "originalName": "reviews.csv",
                "fileType": "competitor",
                "size": 27
            }));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let api = api_for(&server, None);
        let uploaded = api
            .upload(&csv_file(&dir), FileRole::Competitor)
            .await
            .expect("uploaded");
        mock.assert();
        assert_eq!(uploaded.stored_name, "abc_reviews.csv");
        assert_eq!(uploaded.role, FileRole::Competitor);
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_categorised() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(503).json_body(json!({"error": "bucket offline"}));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let api = api_for(&server, None);
        let outcome = Uploader::new(&api, &TokioTimer)
            .with_retry(RetryPolicy {
                max_retries: 2,
                base_delay: Duration::from_millis(5),
            })
            .upload(&csv_file(&dir), FileRole::Own, |_| {})
            .await;
        mock.assert_calls(3);
        match outcome {
            Err(UploadError::StorageUnavailable { message }) => {
                assert_eq!(message, "bucket offline");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_sends_camel_case_and_reads_the_job_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/analyze").json_body(json!({
                "ownBrandFile": "own.csv",
                "competitorFile": null,
                "targetCategory": "Headphones",
                "language": "zh"
            }));
            then.status(200).json_body(json!({"analysis_id": "job-7"}));
        });

        let api = api_for(&server, None);
        let accepted = api
            .analyze(&AnalyzeRequest {
                own_brand_file: "own.csv".into(),
                competitor_file: None,
                target_category: "Headphones".into(),
                language: Language::Zh,
            })
            .await
            .expect("accepted");
        mock.assert();
        assert_eq!(accepted.analysis_id, "job-7");
    }

    #[tokio::test]
    async fn result_sources_map_to_their_endpoints() {
        let server = MockServer::start_async().await;
        let latest = server.mock(|when, then| {
            when.method(GET).path("/api/analysis/latest/result");
            then.status(200).json_body(json!({"suggestions": []}));
        });
        let report = server.mock(|when, then| {
            when.method(GET).path("/api/report/r-1");
            then.status(404).json_body(json!({"detail": "Report not found"}));
        });

        let api = api_for(&server, None);
        assert!(api.result(&ResultRef::Latest).await.is_ok());
        let missing = api.report("r-1").await;
        latest.assert();
        report.assert();
        assert_eq!(
            missing,
            Err(ApiError::Status {
                status: 404,
                message: "Report not found".into()
            })
        );
    }

    #[tokio::test]
    async fn reports_accept_both_list_shapes_and_delete() {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/reports");
            then.status(200).json_body(json!({"reports": [
                {"id": 3, "timestamp": "2024-05-01T10:00:00Z", "category": "Mugs", "status": "completed"}
            ]}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/reports/3");
            then.status(204);
        });

        let api = api_for(&server, None);
        let reports = api.list_reports().await.expect("listed");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "3");
        api.delete_report("3").await.expect("deleted");
        list.assert();
        delete.assert();
    }

    #[tokio::test]
    async fn malformed_bodies_are_decode_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/x/status");
            then.status(200).body("<html>gateway</html>");
        });
        let api = api_for(&server, None);
        assert!(matches!(api.status("x").await, Err(ApiError::Decode(_))));
    }
}
