//! File upload with retry on server errors and a cosmetic progress ticker.

use crate::api::AnalysisApi;
use crate::error::{ApiError, UploadError};
use crate::timer::Timer;
use crate::validate::validate_file;
use futures_util::future::{Either, select};
use reviewscope_api_models::{FileRole, UploadedFile};
use std::pin::pin;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retry schedule for uploads that fail with a 5xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; later retries wait a multiple of it.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: retry `n` (1-based) waits `n * base_delay`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry.max(1))
    }
}

/// Simulated progress while an upload request is in flight.
///
/// The transport reports no real progress, so the ticker only signals
/// liveness. It never reaches 100 on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTicker {
    /// Delay between ticks.
    pub interval: Duration,
    /// Percentage added per tick.
    pub step: u8,
    /// Highest value the ticker reports.
    pub ceiling: u8,
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            step: 10,
            ceiling: 90,
        }
    }
}

impl ProgressTicker {
    /// Next displayed value after `current`.
    #[must_use]
    pub fn advance(&self, current: u8) -> u8 {
        current.saturating_add(self.step).min(self.ceiling)
    }
}

/// Uploads one file per call against an [`AnalysisApi`].
#[derive(Debug)]
pub struct Uploader<'a, A: ?Sized, T: ?Sized> {
    api: &'a A,
    timer: &'a T,
    retry: RetryPolicy,
    ticker: ProgressTicker,
}

impl<'a, A, T> Uploader<'a, A, T>
where
    A: AnalysisApi + ?Sized,
    T: Timer + ?Sized,
{
    /// Uploader with the default retry policy and ticker.
    pub fn new(api: &'a A, timer: &'a T) -> Self {
        Self {
            api,
            timer,
            retry: RetryPolicy::default(),
            ticker: ProgressTicker::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the progress ticker.
    #[must_use]
    pub const fn with_ticker(mut self, ticker: ProgressTicker) -> Self {
        self.ticker = ticker;
        self
    }

    /// Validate, then upload `file` for `role`, reporting progress to `on_progress`.
    ///
    /// Progress starts at 0, advances on every tick up to the ticker ceiling,
    /// and is reported as 100 once the backend accepts the file.
    ///
    /// # Errors
    ///
    /// [`UploadError::Rejected`] without any request when validation fails;
    /// otherwise the categorized backend failure after retries.
    pub async fn upload(
        &self,
        file: &A::File,
        role: FileRole,
        mut on_progress: impl FnMut(u8),
    ) -> Result<UploadedFile, UploadError> {
        validate_file(file)?;
        on_progress(0);

        let outcome = {
            let request = pin!(self.send_with_retry(file, role));
            let ticker = self.ticker;
            let timer = self.timer;
            let progress = &mut on_progress;
            let ticking = pin!(async move {
                let mut current = 0;
                while current < ticker.ceiling {
                    timer.sleep(ticker.interval).await;
                    current = ticker.advance(current);
                    progress(current);
                }
            });
            match select(request, ticking).await {
                Either::Left((result, _)) => result,
                Either::Right(((), request)) => request.await,
            }
        };

        match outcome {
            Ok(uploaded) => {
                on_progress(100);
                info!(role = role.as_str(), stored = %uploaded.stored_name, "file uploaded");
                Ok(uploaded)
            }
            Err(error) => {
                warn!(role = role.as_str(), error = %error, "upload failed");
                Err(UploadError::from_api(error))
            }
        }
    }

    async fn send_with_retry(&self, file: &A::File, role: FileRole) -> Result<UploadedFile, ApiError> {
        let mut retry = 0;
        loop {
            debug!(role = role.as_str(), attempt = retry + 1, "uploading file");
            match self.api.upload(file, role).await {
                Ok(uploaded) => return Ok(uploaded),
                Err(ApiError::Status { status, message })
                    if status >= 500 && retry < self.retry.max_retries =>
                {
                    retry += 1;
                    let delay = self.retry.delay_for(retry);
                    warn!(
                        status,
                        message = %message,
                        retry,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "upload hit a server error, retrying"
                    );
                    self.timer.sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
