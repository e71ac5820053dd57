//! Report history: listing, filtering, deletion and user-local favorites.

use crate::api::{AnalysisApi, ResultRef};
use crate::error::ApiError;
use crate::store::{StoredResult, fetch_result};
use reviewscope_api_models::ReportSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Report ids the user starred. Never sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<String>);

impl FavoriteSet {
    /// Star or unstar `id`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    /// Whether `id` is starred.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Unstar `id`.
    pub fn remove(&mut self, id: &str) {
        self.0.remove(id);
    }

    /// Drop favorites for reports that no longer exist.
    pub fn retain_existing(&mut self, reports: &[ReportSummary]) {
        self.0
            .retain(|id| reports.iter().any(|report| &report.id == id));
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is starred.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Starred ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// History list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Only starred reports.
    pub favorites_only: bool,
    /// Case-insensitive category substring.
    pub category: Option<String>,
}

impl ReportFilter {
    /// Whether `report` passes the filter.
    #[must_use]
    pub fn matches(&self, report: &ReportSummary, favorites: &FavoriteSet) -> bool {
        if self.favorites_only && !favorites.contains(&report.id) {
            return false;
        }
        match self.category.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => report
                .category
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

/// Newest first, then filtered. Timestamps are compared as strings, which
/// orders the backend's ISO-8601 values correctly.
#[must_use]
pub fn arrange(
    mut reports: Vec<ReportSummary>,
    filter: &ReportFilter,
    favorites: &FavoriteSet,
) -> Vec<ReportSummary> {
    reports.retain(|report| filter.matches(report, favorites));
    reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    reports
}

/// Fetch the history list newest first.
///
/// # Errors
///
/// Returns the transport error.
pub async fn list_reports<A: AnalysisApi + ?Sized>(
    api: &A,
    filter: &ReportFilter,
    favorites: &FavoriteSet,
) -> Result<Vec<ReportSummary>, ApiError> {
    let reports = api.list_reports().await?;
    Ok(arrange(reports, filter, favorites))
}

/// Fetch and normalize one historical report.
///
/// # Errors
///
/// Returns the transport error.
pub async fn fetch_report<A: AnalysisApi + ?Sized>(
    api: &A,
    id: &str,
) -> Result<StoredResult, ApiError> {
    fetch_result(api, ResultRef::Report(id.to_string())).await
}

/// Delete a report on the backend and unstar it locally.
///
/// # Errors
///
/// Returns the transport error; favorites are unchanged in that case.
pub async fn delete_report<A: AnalysisApi + ?Sized>(
    api: &A,
    id: &str,
    favorites: &mut FavoriteSet,
) -> Result<(), ApiError> {
    api.delete_report(id).await?;
    favorites.remove(id);
    info!(report = id, "report deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use reviewscope_api_models::JobStatus;

    fn summary(id: &str, timestamp: &str, category: &str) -> ReportSummary {
        ReportSummary {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
            category: category.to_string(),
            status: JobStatus::Completed,
            has_competitor_data: false,
        }
    }

    fn history() -> Vec<ReportSummary> {
        vec![
            summary("a", "2024-03-01T10:00:00Z", "Headphones"),
            summary("b", "2024-05-01T10:00:00Z", "Coffee makers"),
            summary("c", "2024-04-01T10:00:00Z", "Wireless headphones"),
        ]
    }

    #[test]
    fn toggle_flips_membership() {
        let mut favorites = FavoriteSet::default();
        assert!(favorites.toggle("a"));
        assert!(favorites.contains("a"));
        assert!(!favorites.toggle("a"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn arrange_sorts_newest_first_and_filters() {
        let favorites: FavoriteSet = ["a", "b"].into_iter().collect();
        let ids = |list: Vec<ReportSummary>| list.into_iter().map(|r| r.id).collect::<Vec<_>>();

        assert_eq!(
            ids(arrange(history(), &ReportFilter::default(), &favorites)),
            vec!["b", "c", "a"]
        );

        let filter = ReportFilter {
            favorites_only: false,
            category: Some("HEADPHONES".into()),
        };
        assert_eq!(ids(arrange(history(), &filter, &favorites)), vec!["c", "a"]);

        let filter = ReportFilter {
            favorites_only: true,
            category: Some("head".into()),
        };
        assert_eq!(ids(arrange(history(), &filter, &favorites)), vec!["a"]);
    }

    #[test]
    fn retain_existing_drops_stale_favorites() {
        let mut favorites: FavoriteSet = ["a", "gone"].into_iter().collect();
        favorites.retain_existing(&history());
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec!["a"]);
    }

    #[tokio::test]
    async fn delete_also_unstars() {
        let api = FakeApi::default();
        api.reports.borrow_mut().extend(history());
        let mut favorites: FavoriteSet = ["b"].into_iter().collect();

        delete_report(&api, "b", &mut favorites)
            .await
            .expect("deleted");
        assert!(!favorites.contains("b"));

        let remaining = list_reports(&api, &ReportFilter::default(), &favorites)
            .await
            .expect("listed");
        assert_eq!(remaining.len(), 2);
        assert_eq!(api.count("delete:b"), 1);
        assert_eq!(api.count("list"), 1);
    }
}
