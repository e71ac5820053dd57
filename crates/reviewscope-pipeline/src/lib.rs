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
//! Client-side analysis pipeline shared by the ReviewScope CLI and web UI.
//!
//! The pipeline validates picked files, uploads them with retry, submits an
//! analysis, polls the job to a terminal state and keeps the normalized result.
//! Everything is written against the [`AnalysisApi`] and [`Timer`] seams so
//! the same code runs on tokio and in the browser.

pub mod api;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod poll;
pub mod preferences;
pub mod reports;
pub mod session;
pub mod store;
pub mod submit;
pub mod task;
#[cfg(test)]
mod testing;
pub mod timer;
pub mod upload;
pub mod validate;

pub use api::{AnalysisApi, FileSource, ResultRef};
pub use error::{
    ApiError, CategoryRejection, FileRejection, PollError, SubmitError, UploadError, UserFacing,
};
#[cfg(feature = "http")]
pub use http::{HttpApi, HttpConfig, LocalFile};
pub use poll::{AnalysisJob, CompletedJob, PollConfig, poll_job};
pub use preferences::{PreferenceError, PreferenceStore, Preferences, ThemeMode};
#[cfg(not(target_arch = "wasm32"))]
pub use preferences::JsonFileStore;
pub use reports::{FavoriteSet, ReportFilter, arrange, delete_report, fetch_report, list_reports};
pub use session::{AnalysisSession, Banner, Phase, SessionAction};
pub use store::{ResultStore, StoredResult, fetch_result};
pub use submit::{build_request, submit_analysis};
pub use task::{TaskHandle, cancellable};
#[cfg(feature = "tokio")]
pub use timer::TokioTimer;
pub use timer::Timer;
pub use upload::{ProgressTicker, RetryPolicy, Uploader};
pub use validate::{
    MAX_CATEGORY_CHARS, MAX_FILE_BYTES, MIN_CATEGORY_CHARS, accept_attribute,
    clamp_category_input, validate_category, validate_file,
};
