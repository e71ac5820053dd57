//! Scripted in-memory backend for pipeline tests.

use crate::api::{AnalysisApi, FileSource, ResultRef};
use crate::error::ApiError;
use async_trait::async_trait;
use reviewscope_api_models::{
    AnalyzeAccepted, AnalyzeRequest, FileRole, JobStatus, ReportSummary, StatusResponse,
    UploadedFile,
};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct FakeFile {
    name: String,
    mime: Option<String>,
    size: u64,
}

impl FakeFile {
    pub(crate) fn new(name: &str, mime: Option<&str>, size: u64) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.map(ToString::to_string),
            size,
        }
    }

    pub(crate) fn csv(name: &str) -> Self {
        Self::new(name, Some("text/csv"), 2_048)
    }
}

impl FileSource for FakeFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn mime(&self) -> Option<String> {
        self.mime.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

pub(crate) fn stored(name: &str, role: FileRole) -> UploadedFile {
    UploadedFile {
        stored_name: format!("stored-{name}"),
        original_name: name.to_string(),
        role,
        size_bytes: 2_048,
    }
}

pub(crate) fn status(status: JobStatus, progress: f64) -> StatusResponse {
    StatusResponse {
        status,
        progress,
        current_step: None,
        steps: Vec::new(),
        error: None,
        message: None,
    }
}

pub(crate) fn http(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: format!("status {status}"),
    }
}

/// Every call is logged as `"<op>:<arg>"` so tests can assert ordering and counts.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub(crate) calls: RefCell<Vec<String>>,
    pub(crate) uploads: RefCell<VecDeque<Result<UploadedFile, ApiError>>>,
    pub(crate) upload_delay: Cell<Duration>,
    pub(crate) analyses: RefCell<VecDeque<Result<AnalyzeAccepted, ApiError>>>,
    pub(crate) statuses: RefCell<VecDeque<Result<StatusResponse, ApiError>>>,
    pub(crate) results: RefCell<VecDeque<Result<Value, ApiError>>>,
    pub(crate) reports: RefCell<Vec<ReportSummary>>,
    pub(crate) last_request: RefCell<Option<AnalyzeRequest>>,
}

impl FakeApi {
    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn next<T>(queue: &RefCell<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("script exhausted".into())))
}

#[async_trait(?Send)]
impl AnalysisApi for FakeApi {
    type File = FakeFile;

    async fn upload(&self, file: &FakeFile, role: FileRole) -> Result<UploadedFile, ApiError> {
        self.log(format!("upload:{}:{}", role.as_str(), file.name));
        let delay = self.upload_delay.get();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        next(&self.uploads)
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeAccepted, ApiError> {
        self.log(format!("analyze:{}", request.target_category));
        *self.last_request.borrow_mut() = Some(request.clone());
        next(&self.analyses)
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, ApiError> {
        self.log(format!("status:{job_id}"));
        next(&self.statuses)
    }

    async fn result(&self, source: &ResultRef) -> Result<Value, ApiError> {
        self.log(format!("result:{source}"));
        next(&self.results)
    }

    async fn list_reports(&self) -> Result<Vec<ReportSummary>, ApiError> {
        self.log("list".to_string());
        Ok(self.reports.borrow().clone())
    }

    async fn delete_report(&self, id: &str) -> Result<(), ApiError> {
        self.log(format!("delete:{id}"));
        self.reports.borrow_mut().retain(|report| report.id != id);
        Ok(())
    }
}
