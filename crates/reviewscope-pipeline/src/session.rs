//! Explicit state of one analysis session, driven by reducer actions.

use crate::error::UserFacing;
use crate::poll::AnalysisJob;
use crate::store::{ResultStore, StoredResult};
use crate::validate::clamp_category_input;
use reviewscope_api_models::{FileRole, JobStatus, Language, UploadedFile};
use std::collections::BTreeSet;

/// Coarse stage of the session, used to enable and disable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing uploaded.
    #[default]
    Idle,
    /// At least one upload in flight.
    Uploading,
    /// Own-brand file present; ready to submit.
    Ready,
    /// `/analyze` request in flight.
    Submitting,
    /// Job accepted and being polled.
    Polling,
    /// Result loaded.
    Completed,
    /// Submission or job failed.
    Failed,
}

impl Phase {
    /// Whether a job is being submitted or polled.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Submitting | Self::Polling)
    }
}

/// Error banner: a translation key plus optional backend detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// `errors.*` translation key.
    pub key: &'static str,
    /// Backend-supplied detail.
    pub detail: Option<String>,
}

impl Banner {
    /// Banner for any user-facing error.
    #[must_use]
    pub fn from_error(error: &impl UserFacing) -> Self {
        Self {
            key: error.message_key(),
            detail: error.backend_message().map(ToString::to_string),
        }
    }
}

impl UserFacing for Banner {
    fn message_key(&self) -> &'static str {
        self.key
    }

    fn backend_message(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Reducer input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// An upload for `role` began.
    UploadStarted(FileRole),
    /// An upload finished; the file fills the slot for its role.
    FileUploaded(UploadedFile),
    /// An upload for `role` failed.
    UploadFailed(FileRole, Banner),
    /// The upload for `role` was aborted before it finished.
    UploadCancelled(FileRole),
    /// The slot for `role` was cleared.
    FileRemoved(FileRole),
    /// Raw category input changed.
    CategoryChanged(String),
    /// Report language changed.
    LanguageChanged(Language),
    /// The submit button was pressed and local checks passed.
    SubmitStarted,
    /// The backend accepted the job.
    Submitted(String),
    /// A status poll returned.
    JobUpdated(AnalysisJob),
    /// A result was fetched and normalized.
    ResultLoaded(StoredResult),
    /// Submission, polling or result loading failed.
    Failed(Banner),
    /// Back to a blank session, keeping the language.
    Reset,
}

/// Everything the upload, progress and report views read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisSession {
    /// Own-brand upload.
    pub own_file: Option<UploadedFile>,
    /// Competitor upload.
    pub competitor_file: Option<UploadedFile>,
    /// Roles with an upload in flight.
    pub uploading: BTreeSet<FileRole>,
    /// Category input, already clamped.
    pub category: String,
    /// Requested report language.
    pub language: Language,
    /// Current stage.
    pub phase: Phase,
    /// Job being polled or last polled.
    pub job: Option<AnalysisJob>,
    /// Result on screen.
    pub result: ResultStore,
    /// Banner to show.
    pub error: Option<Banner>,
}

impl AnalysisSession {
    /// Blank session in `language`.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Upload slot for `role`.
    #[must_use]
    pub const fn file(&self, role: FileRole) -> Option<&UploadedFile> {
        match role {
            FileRole::Own => self.own_file.as_ref(),
            FileRole::Competitor => self.competitor_file.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: FileRole) -> &mut Option<UploadedFile> {
        match role {
            FileRole::Own => &mut self.own_file,
            FileRole::Competitor => &mut self.competitor_file,
        }
    }

    /// Whether the submit button is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.phase.is_busy() && self.uploading.is_empty() && self.own_file.is_some()
    }

    /// Apply `action`.
    pub fn reduce(&mut self, action: SessionAction) {
        match action {
            SessionAction::UploadStarted(role) => {
                self.uploading.insert(role);
                self.error = None;
                self.settle();
            }
            SessionAction::FileUploaded(file) => {
                let role = file.role;
                self.uploading.remove(&role);
                *self.slot_mut(role) = Some(file);
                self.settle();
            }
            SessionAction::UploadFailed(role, banner) => {
                self.uploading.remove(&role);
                self.error = Some(banner);
                self.settle();
            }
            SessionAction::UploadCancelled(role) => {
                self.uploading.remove(&role);
                self.settle();
            }
            SessionAction::FileRemoved(role) => {
                *self.slot_mut(role) = None;
                self.settle();
            }
            SessionAction::CategoryChanged(raw) => {
                self.category = clamp_category_input(&raw);
            }
            SessionAction::LanguageChanged(language) => {
                self.language = language;
            }
            SessionAction::SubmitStarted => {
                if self.can_submit() {
                    self.error = None;
                    self.phase = Phase::Submitting;
                }
            }
            SessionAction::Submitted(job_id) => {
                self.job = Some(AnalysisJob::new(job_id));
                self.phase = Phase::Polling;
            }
            SessionAction::JobUpdated(job) => {
                if self.job.as_ref().is_some_and(|current| current.id == job.id) {
                    self.job = Some(job);
                }
            }
            SessionAction::ResultLoaded(result) => {
                if let Some(job) = self.job.as_mut() {
                    job.status = JobStatus::Completed;
                    job.progress = 100.0;
                }
                self.result.replace(result);
                self.error = None;
                self.phase = Phase::Completed;
            }
            SessionAction::Failed(banner) => {
                self.error = Some(banner);
                if self.phase.is_busy() {
                    self.phase = Phase::Failed;
                }
            }
            SessionAction::Reset => {
                *self = Self::new(self.language);
            }
        }
    }

    /// Recompute the phase after a file slot changed, unless a job is running.
    fn settle(&mut self) {
        if self.phase.is_busy() {
            return;
        }
        self.phase = if !self.uploading.is_empty() {
            Phase::Uploading
        } else if self.own_file.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        };
    }
}
