//! Analysis submission.

use crate::api::AnalysisApi;
use crate::error::SubmitError;
use crate::validate::validate_category;
use reviewscope_api_models::{AnalyzeRequest, Language, UploadedFile};
use tracing::info;

/// Build the `/analyze` body, rejecting locally what the backend would refuse.
///
/// # Errors
///
/// [`SubmitError::OwnFileMissing`] without an own-brand file and
/// [`SubmitError::Category`] for an out-of-bounds category.
pub fn build_request(
    own: Option<&UploadedFile>,
    competitor: Option<&UploadedFile>,
    category: &str,
    language: Language,
) -> Result<AnalyzeRequest, SubmitError> {
    let own = own.ok_or(SubmitError::OwnFileMissing)?;
    let target_category = validate_category(category)?;
    Ok(AnalyzeRequest {
        own_brand_file: own.stored_name.clone(),
        competitor_file: competitor.map(|file| file.stored_name.clone()),
        target_category,
        language,
    })
}

/// Submit an analysis and return the job id to poll.
///
/// # Errors
///
/// Local rejections from [`build_request`] (no request is made) or the
/// transport failure.
pub async fn submit_analysis<A: AnalysisApi + ?Sized>(
    api: &A,
    own: Option<&UploadedFile>,
    competitor: Option<&UploadedFile>,
    category: &str,
    language: Language,
) -> Result<String, SubmitError> {
    let request = build_request(own, competitor, category, language)?;
    let accepted = api.analyze(&request).await?;
    info!(
        job = %accepted.analysis_id,
        category = %request.target_category,
        competitor = request.competitor_file.is_some(),
        "analysis submitted"
    );
    Ok(accepted.analysis_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CategoryRejection;
    use crate::testing::{FakeApi, stored};
    use reviewscope_api_models::{AnalyzeAccepted, FileRole};

    #[tokio::test]
    async fn missing_own_file_is_rejected_locally() {
        let api = FakeApi::default();
        let outcome = submit_analysis(&api, None, None, "Headphones", Language::En).await;
        assert_eq!(outcome, Err(SubmitError::OwnFileMissing));
        assert!(api.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn short_category_is_rejected_locally() {
        let api = FakeApi::default();
        let own = stored("own.csv", FileRole::Own);
        let outcome = submit_analysis(&api, Some(&own), None, " x ", Language::En).await;
        assert!(matches!(
            outcome,
            Err(SubmitError::Category(CategoryRejection::TooShort { .. }))
        ));
        assert!(api.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn valid_submission_returns_the_job_id() {
        let api = FakeApi::default();
        api.analyses.borrow_mut().push_back(Ok(AnalyzeAccepted {
            analysis_id: "job-42".into(),
        }));
        let own = stored("own.csv", FileRole::Own);
        let outcome = submit_analysis(&api, Some(&own), None, "  Headphones ", Language::Zh).await;
        assert_eq!(outcome, Ok("job-42".to_string()));

        let request = api.last_request.borrow().clone().expect("request sent");
        assert_eq!(request.target_category, "Headphones");
        assert_eq!(request.competitor_file, None);
        assert_eq!(request.language, Language::Zh);
        assert_eq!(request.own_brand_file, "stored-own.csv");
    }
}
