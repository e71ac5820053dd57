//! App-wide yewdux store.
//!
//! # Design
//! - One store for the analysis session, preferences, upload bars and history.
//! - Session changes go through [`AppStore::apply`] so the reducer in
//!   `reviewscope-pipeline` stays the single source of truth.

use reviewscope_api_models::{FileRole, Language, ReportSummary};
use reviewscope_pipeline::{
    AnalysisSession, Banner, Preferences, ReportFilter, SessionAction, ThemeMode, arrange,
};
use yewdux::store::Store;

/// Global application store.
#[derive(Clone, Debug, PartialEq, Default, Store)]
pub struct AppStore {
    /// Files, category, job and result of the current analysis.
    pub session: AnalysisSession,
    /// Language, theme and favorites, persisted to local storage.
    pub preferences: Preferences,
    /// Simulated upload bars.
    pub uploads: UploadProgress,
    /// Report history list.
    pub history: HistoryState,
}

/// Percentage shown on each upload slot while its upload runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UploadProgress {
    own: Option<u8>,
    competitor: Option<u8>,
}

impl UploadProgress {
    /// Progress for `role`, when an upload is running.
    #[must_use]
    pub const fn get(&self, role: FileRole) -> Option<u8> {
        match role {
            FileRole::Own => self.own,
            FileRole::Competitor => self.competitor,
        }
    }

    /// Record progress for `role`, capped at 100.
    pub fn set(&mut self, role: FileRole, percent: u8) {
        *self.slot(role) = Some(percent.min(100));
    }

    /// Hide the bar for `role`.
    pub fn clear(&mut self, role: FileRole) {
        *self.slot(role) = None;
    }

    fn slot(&mut self, role: FileRole) -> &mut Option<u8> {
        match role {
            FileRole::Own => &mut self.own,
            FileRole::Competitor => &mut self.competitor,
        }
    }
}

/// History view state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HistoryState {
    /// Reports as last listed by the backend.
    pub reports: Vec<ReportSummary>,
    /// Favorites and category filter.
    pub filter: ReportFilter,
    /// A listing request is in flight.
    pub loading: bool,
    /// Banner for the last failed listing or deletion.
    pub error: Option<Banner>,
}

impl AppStore {
    /// Adopt stored preferences at boot.
    pub fn hydrate(&mut self, preferences: Preferences) {
        self.session
            .reduce(SessionAction::LanguageChanged(preferences.language));
        self.preferences = preferences;
    }

    /// Switch interface and report language together.
    pub fn set_language(&mut self, language: Language) {
        self.preferences.language = language;
        self.session.reduce(SessionAction::LanguageChanged(language));
    }

    /// Change the theme selection.
    pub const fn set_theme(&mut self, theme: ThemeMode) {
        self.preferences.theme = theme;
    }

    /// Apply a session action and keep the upload bars in step with it.
    pub fn apply(&mut self, action: SessionAction) {
        match &action {
            SessionAction::UploadStarted(role) => self.uploads.set(*role, 0),
            SessionAction::FileUploaded(file) => self.uploads.clear(file.role),
            SessionAction::UploadFailed(role, _)
            | SessionAction::UploadCancelled(role)
            | SessionAction::FileRemoved(role) => {
                self.uploads.clear(*role);
            }
            SessionAction::Reset => self.uploads = UploadProgress::default(),
            _ => {}
        }
        self.session.reduce(action);
    }

    /// Star or unstar a report. Returns whether it is now starred.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        self.preferences.favorites.toggle(id)
    }

    /// Store a fresh listing and forget favorites whose report is gone.
    pub fn history_loaded(&mut self, reports: Vec<ReportSummary>) {
        self.preferences.favorites.retain_existing(&reports);
        self.history.reports = reports;
        self.history.loading = false;
        self.history.error = None;
    }

    /// Record a failed history request.
    pub fn history_failed(&mut self, banner: Banner) {
        self.history.loading = false;
        self.history.error = Some(banner);
    }

    /// Drop a deleted report from the list and from favorites.
    pub fn report_deleted(&mut self, id: &str) {
        self.history.reports.retain(|report| report.id != id);
        self.preferences.favorites.remove(id);
    }

    /// Listing after sorting and filtering.
    #[must_use]
    pub fn visible_reports(&self) -> Vec<ReportSummary> {
        arrange(
            self.history.reports.clone(),
            &self.history.filter,
            &self.preferences.favorites,
        )
    }
}
