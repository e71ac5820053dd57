//! HTTP client over `gloo-net`.

use async_trait::async_trait;
use gloo::console;
use gloo_net::http::{Request, Response};
use reviewscope_api_models::{
    AnalyzeAccepted, AnalyzeRequest, FileRole, ReportListResponse, ReportSummary, StatusResponse,
    UploadedFile, paths,
};
use reviewscope_pipeline::{AnalysisApi, ApiError, FileSource, ResultRef};
use serde::de::DeserializeOwned;
use serde_json::Value;
use web_sys::{File, FormData};

/// A file picked through an `<input type="file">`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PickedFile(pub File);

impl FileSource for PickedFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn mime(&self) -> Option<String> {
        let mime = self.0.type_();
        (!mime.is_empty()).then_some(mime)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn size(&self) -> u64 {
        self.0.size().max(0.0) as u64
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: Request) -> Request {
        match &self.token {
            Some(token) => request.header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.binary().await.unwrap_or_default();
        console::warn!("request failed", status);
        Err(ApiError::from_status(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Request::get(&self.url(path))).await?;
        Self::decode(response).await
    }
}

#[async_trait(?Send)]
impl AnalysisApi for ApiClient {
    type File = PickedFile;

    async fn upload(&self, file: &PickedFile, role: FileRole) -> Result<UploadedFile, ApiError> {
        let form = FormData::new().map_err(|err| ApiError::Network(format!("{err:?}")))?;
        form.append_with_blob_and_filename("file", &file.0, &file.0.name())
            .map_err(|err| ApiError::Network(format!("attach file: {err:?}")))?;
        form.append_with_str("fileType", role.as_str())
            .map_err(|err| ApiError::Network(format!("attach role: {err:?}")))?;
        let request = Request::post(&self.url(paths::UPLOAD)).body(form);
        Self::decode(self.send(request).await?).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeAccepted, ApiError> {
        let request = Request::post(&self.url(paths::ANALYZE))
            .json(request)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Self::decode(self.send(request).await?).await
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
        self.send(Request::delete(&self.url(&paths::delete_report(id))))
            .await
            .map(|_| ())
    }
}
