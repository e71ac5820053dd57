//! Pure helpers behind the views.

use chrono::{DateTime, Utc};
use reviewscope_api_models::{JobStatus, StepStatus};
use reviewscope_report::{Page, PositionPoint, Report, available_pages};

/// Path appended to the page origin when no API URL was configured at build time.
pub const API_SUFFIX: &str = "/api";

/// Backend base URL: the build-time override when set, else `<origin>/api`.
#[must_use]
pub fn api_base_url(configured: Option<&str>, origin: &str) -> String {
    match configured.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => format!("{}{API_SUFFIX}", origin.trim_end_matches('/')),
    }
}

/// Inline style placing a positioning point inside the scatter box.
#[must_use]
pub fn scatter_style(point: &PositionPoint) -> String {
    format!(
        "position:absolute;left:{:.1}%;bottom:{:.1}%",
        point.x.clamp(0.0, 100.0),
        point.y.clamp(0.0, 100.0)
    )
}

/// Inline style for a progress bar fill.
#[must_use]
pub fn bar_style(percent: f64) -> String {
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("width:{percent:.0}%")
}

/// CSS modifier for a step row.
#[must_use]
pub const fn step_class(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "step-pending",
        StepStatus::Running => "step-running",
        StepStatus::Completed => "step-completed",
        StepStatus::Failed => "step-failed",
    }
}

/// Translation key for a step state.
#[must_use]
pub fn step_key(status: StepStatus) -> String {
    format!("progress.step.{}", status.as_str())
}

/// Translation key for a job state.
#[must_use]
pub fn status_key(status: JobStatus) -> String {
    format!("status.{}", status.as_str())
}

/// First page worth opening for `report`.
#[must_use]
pub fn landing_page(report: &Report) -> Page {
    available_pages(report)
        .into_iter()
        .find(|page| !page.is_empty(report))
        .unwrap_or(Page::Overview)
}

/// Requested page, or the overview when the report does not offer it.
#[must_use]
pub fn resolve_page(slug: &str, report: &Report) -> Page {
    Page::from_slug(slug)
        .filter(|page| page.is_available(report))
        .unwrap_or(Page::Overview)
}

/// Quotes shown in the modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteDialog {
    /// Heading: the persona, insight or need the quotes belong to.
    pub title: String,
    /// Verbatim review excerpts.
    pub quotes: Vec<String>,
}

impl QuoteDialog {
    /// Dialog for `quotes`, or `None` when there is nothing to show.
    #[must_use]
    pub fn new(title: impl Into<String>, quotes: &[String]) -> Option<Self> {
        let quotes: Vec<String> = quotes
            .iter()
            .map(|quote| quote.trim())
            .filter(|quote| !quote.is_empty())
            .map(ToString::to_string)
            .collect();
        if quotes.is_empty() {
            None
        } else {
            Some(Self {
                title: title.into(),
                quotes,
            })
        }
    }
}

/// Human-readable file size in KB or MB.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let bytes = bytes as f64;
    if bytes >= 1024.0 * 1024.0 {
        format!("{:.1} MB", bytes / (1024.0 * 1024.0))
    } else if bytes >= 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else {
        format!("{bytes:.0} B")
    }
}

/// Convert `Date.now()` milliseconds to a UTC timestamp.
#[must_use]
pub fn utc_from_millis(millis: f64) -> DateTime<Utc> {
    #[allow(clippy::cast_possible_truncation)]
    let millis = millis as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
