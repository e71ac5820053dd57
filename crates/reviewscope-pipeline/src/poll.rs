//! Status polling until a job reaches a terminal state.

use crate::api::{AnalysisApi, ResultRef};
use crate::error::PollError;
use crate::timer::Timer;
use reviewscope_api_models::{JobStatus, StatusResponse, StepView};
use reviewscope_report::{Report, normalize};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Poll loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status fetches after the first.
    pub interval: Duration,
    /// Transient failures tolerated in a row before giving up.
    pub max_consecutive_errors: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_consecutive_errors: 3,
        }
    }
}

/// Client-side view of a backend analysis job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisJob {
    /// Job identifier.
    pub id: String,
    /// Lifecycle state.
    pub status: JobStatus,
    /// Overall progress, 0 to 100.
    pub progress: f64,
    /// Step in progress.
    pub current_step: Option<String>,
    /// Ordered step list.
    pub steps: Vec<StepView>,
    /// Failure text once failed.
    pub error: Option<String>,
}

impl AnalysisJob {
    /// A freshly submitted job.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Starting,
            progress: 0.0,
            current_step: None,
            steps: Vec::new(),
            error: None,
        }
    }

    /// Fold a status response into the job. Completed jobs read as 100%.
    pub fn apply(&mut self, response: StatusResponse) {
        self.error = response.failure_message().map(ToString::to_string);
        self.status = response.status;
        self.progress = if response.status == JobStatus::Completed {
            100.0
        } else {
            response.progress.clamp(0.0, 100.0)
        };
        self.current_step = response.current_step;
        if !response.steps.is_empty() {
            self.steps = response.steps;
        }
    }

    /// Whether polling has stopped for this job.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A job that completed, with its raw and normalized result.
#[derive(Debug, Clone)]
pub struct CompletedJob {
    /// Final job state.
    pub job: AnalysisJob,
    /// Result JSON as returned by the backend.
    pub raw: Value,
    /// Normalized result.
    pub report: Report,
}

/// Poll `job_id` until completed or failed, reporting every update to `observe`.
///
/// The first fetch happens immediately; later fetches wait `config.interval`.
/// On `completed` the result is fetched exactly once. Transient failures are
/// tolerated up to `config.max_consecutive_errors` in a row; a 4xx is final.
///
/// Wrap the returned future with [`crate::task::cancellable`] to stop it.
///
/// # Errors
///
/// [`PollError::Failed`] when the job fails, [`PollError::Api`] when a fetch
/// fails terminally.
pub async fn poll_job<A, T>(
    api: &A,
    timer: &T,
    job_id: &str,
    config: PollConfig,
    mut observe: impl FnMut(&AnalysisJob),
) -> Result<CompletedJob, PollError>
where
    A: AnalysisApi + ?Sized,
    T: Timer + ?Sized,
{
    let mut job = AnalysisJob::new(job_id);
    let mut failures = 0_u32;
    loop {
        match api.status(job_id).await {
            Ok(response) => {
                failures = 0;
                let previous = job.status;
                job.apply(response);
                if previous == job.status {
                    debug!(job = job_id, progress = job.progress, "job progress");
                } else {
                    info!(job = job_id, status = job.status.as_str(), "job state changed");
                }
                observe(&job);
                match job.status {
                    JobStatus::Completed => {
                        let raw = api.result(&ResultRef::Job(job_id.to_string())).await?;
                        let report = normalize(&raw);
                        return Ok(CompletedJob { job, raw, report });
                    }
                    JobStatus::Failed => {
                        return Err(PollError::Failed {
                            message: job.error.clone(),
                        });
                    }
                    JobStatus::Starting | JobStatus::Running | JobStatus::Unknown => {}
                }
            }
            Err(error) if error.is_transient() && failures < config.max_consecutive_errors => {
                failures += 1;
                warn!(job = job_id, failures, error = %error, "status fetch failed, will retry");
            }
            Err(error) => return Err(error.into()),
        }
        timer.sleep(config.interval).await;
    }
}
