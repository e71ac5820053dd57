//! Last-write-wins holder of the report currently on screen.

use crate::api::{AnalysisApi, ResultRef};
use crate::error::ApiError;
use reviewscope_report::{Report, normalize};
use serde_json::Value;
use tracing::debug;

/// A normalized result together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    /// Job, latest or historical report.
    pub source: ResultRef,
    /// Result JSON as returned by the backend.
    pub raw: Value,
    /// Normalized result.
    pub report: Report,
}

impl StoredResult {
    /// Normalize `raw` and remember its source.
    #[must_use]
    pub fn new(source: ResultRef, raw: Value) -> Self {
        let report = normalize(&raw);
        Self {
            source,
            raw,
            report,
        }
    }
}

/// Holds at most one result. Every write bumps the revision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    current: Option<StoredResult>,
    revision: u64,
}

impl ResultStore {
    /// Overwrite whatever is stored.
    pub fn replace(&mut self, result: StoredResult) {
        self.current = Some(result);
        self.revision += 1;
    }

    /// Drop the stored result.
    pub fn clear(&mut self) {
        self.current = None;
        self.revision += 1;
    }

    /// Stored result, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&StoredResult> {
        self.current.as_ref()
    }

    /// Stored report, if any.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.current.as_ref().map(|stored| &stored.report)
    }

    /// Number of writes so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Fetch `source`, normalize it and store it.
    ///
    /// # Errors
    ///
    /// Returns the transport error and leaves the store untouched.
    pub async fn load<A: AnalysisApi + ?Sized>(
        &mut self,
        api: &A,
        source: ResultRef,
    ) -> Result<&StoredResult, ApiError> {
        let fetched = fetch_result(api, source).await?;
        self.replace(fetched);
        self.current.as_ref().ok_or_else(|| ApiError::Decode("result store is empty".into()))
    }
}

/// Fetch and normalize a job result, the latest result or a historical report.
///
/// # Errors
///
/// Returns the transport error.
pub async fn fetch_result<A: AnalysisApi + ?Sized>(
    api: &A,
    source: ResultRef,
) -> Result<StoredResult, ApiError> {
    debug!(source = %source, "fetching result");
    let raw = api.result(&source).await?;
    Ok(StoredResult::new(source, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use serde_json::json;

    #[test]
    fn writes_replace_wholesale_and_bump_the_revision() {
        let mut store = ResultStore::default();
        store.replace(StoredResult::new(
            ResultRef::Job("a".into()),
            json!({"unmetNeeds": ["x"]}),
        ));
        store.replace(StoredResult::new(ResultRef::Latest, json!({"suggestions": ["y"]})));
        let report = store.report().expect("stored");
        assert!(report.own.unmet_needs.is_empty());
        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(store.revision(), 2);
        store.clear();
        assert!(store.current().is_none());
        assert_eq!(store.revision(), 3);
    }

    #[tokio::test]
    async fn failed_loads_leave_the_store_untouched() {
        let api = FakeApi::default();
        api.results.borrow_mut().push_back(Ok(json!({"suggestions": ["z"]})));
        let mut store = ResultStore::default();
        let loaded = store
            .load(&api, ResultRef::Report("r-1".into()))
            .await
            .map(|stored| stored.source.clone());
        assert_eq!(loaded, Ok(ResultRef::Report("r-1".into())));

        let failed = store.load(&api, ResultRef::Latest).await.map(|_| ());
        assert!(failed.is_err());
        assert_eq!(store.revision(), 1);
        assert_eq!(api.count("result:report r-1"), 1);
    }
}
