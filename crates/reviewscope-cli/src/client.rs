//! Application context, error type and error mapping for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use reviewscope_api_models::Language;
use reviewscope_pipeline::{
    ApiError, HttpApi, HttpConfig, JsonFileStore, LocalFile, PollError, PreferenceStore,
    Preferences, SubmitError, UploadError, UserFacing,
};
use reviewscope_report::TranslationBundle;
use url::Url;

use crate::cli::{Cli, OutputFormat};

const STATE_DIR: &str = "reviewscope";
const STATE_FILE: &str = "state.json";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }

    /// Localized failure with the underlying error kept in the chain.
    fn localized<E>(error: E, bundle: &TranslationBundle) -> Self
    where
        E: UserFacing + std::error::Error + Send + Sync + 'static,
    {
        let headline = bundle.t(error.message_key());
        Self::Failure(anyhow::Error::new(error).context(headline))
    }

    /// Client errors the user can fix are validation errors; the rest fail.
    pub(crate) fn from_api(error: ApiError, bundle: &TranslationBundle) -> Self {
        match error.status_code() {
            Some(400 | 409 | 422) => Self::validation(error.localized(bundle)),
            _ => Self::localized(error, bundle),
        }
    }

    pub(crate) fn from_upload(error: UploadError, bundle: &TranslationBundle) -> Self {
        match error {
            UploadError::Rejected(_) | UploadError::UnsupportedFormat { .. } | UploadError::TooLarge { .. } => {
                Self::validation(error.localized(bundle))
            }
            UploadError::StorageUnavailable { .. } | UploadError::Generic { .. } => {
                Self::localized(error, bundle)
            }
        }
    }

    pub(crate) fn from_submit(error: SubmitError, bundle: &TranslationBundle) -> Self {
        match error {
            SubmitError::Api(api) => Self::from_api(api, bundle),
            SubmitError::OwnFileMissing | SubmitError::Category(_) | SubmitError::Busy => {
                Self::validation(error.localized(bundle))
            }
        }
    }

    pub(crate) fn from_poll(error: PollError, bundle: &TranslationBundle) -> Self {
        match error {
            PollError::Api(api) => Self::from_api(api, bundle),
            failed @ PollError::Failed { .. } => Self::failure(anyhow!(failed.localized(bundle))),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) api: HttpApi,
    pub(crate) store: JsonFileStore,
    /// Language from `--language`, when given.
    pub(crate) language_override: Option<Language>,
    pub(crate) language: Language,
    pub(crate) bundle: TranslationBundle,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let config = HttpConfig {
            base_url: cli.api_url.clone(),
            token: cli.token.clone(),
            timeout: Duration::from_secs(cli.timeout.max(1)),
        };
        let state_file = cli.state_file.clone().unwrap_or_else(default_state_file);
        Self::new(config, &state_file, cli.language, cli.output)
    }

    pub(crate) fn new(
        config: HttpConfig,
        state_file: &Path,
        language_override: Option<Language>,
        output: OutputFormat,
    ) -> CliResult<Self> {
        let api = HttpApi::new(config).map_err(|err| CliError::failure(anyhow!(err)))?;
        let store = JsonFileStore::new(state_file);
        let language = language_override.unwrap_or_else(|| store.load().language);
        Ok(Self {
            api,
            store,
            language_override,
            language,
            bundle: TranslationBundle::new(language),
            output,
        })
    }

    pub(crate) fn preferences(&self) -> Preferences {
        self.store.load()
    }

    pub(crate) fn save_preferences(&self, preferences: &Preferences) -> CliResult<()> {
        self.store.save(preferences).map_err(|err| {
            CliError::failure(anyhow::Error::new(err).context(format!(
                "failed to save preferences to {}",
                self.store.path().display()
            )))
        })
    }
}

/// Stat a local review file.
pub(crate) fn open_file(path: &Path) -> CliResult<LocalFile> {
    LocalFile::open(path)
        .map_err(|err| CliError::validation(format!("cannot read '{}': {err}", path.display())))
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// `<config dir>/reviewscope/state.json`, or the working directory when the
/// platform has no config directory.
pub(crate) fn default_state_file() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(".reviewscope-state.json"),
        |dir| dir.join(STATE_DIR).join(STATE_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewscope_pipeline::{CategoryRejection, FileRejection};

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://localhost:8000/api").is_ok());
        let err = parse_url("not a url").expect_err("invalid");
        assert!(err.contains("not a url"));
    }

    #[test]
    fn local_rejections_are_validation_errors() {
        let bundle = TranslationBundle::new(Language::En);
        let rejected = CliError::from_upload(
            UploadError::Rejected(FileRejection::Empty {
                name: "own.csv".into(),
            }),
            &bundle,
        );
        assert_eq!(rejected.exit_code(), 2);
        assert_eq!(rejected.display_message(), "The selected file is empty.");

        let short = CliError::from_submit(
            SubmitError::Category(CategoryRejection::TooShort { len: 1, min: 2 }),
            &bundle,
        );
        assert_eq!(short.exit_code(), 2);
    }

    #[test]
    fn server_failures_keep_the_cause_chain() {
        let bundle = TranslationBundle::new(Language::Zh);
        let failed = CliError::from_api(ApiError::Network("connection refused".into()), &bundle);
        assert_eq!(failed.exit_code(), 3);
        let message = failed.display_message();
        assert!(message.contains("connection refused"), "{message}");

        let bad_request = CliError::from_api(
            ApiError::Status {
                status: 422,
                message: "category required".into(),
            },
            &bundle,
        );
        assert_eq!(bad_request.exit_code(), 2);
        assert!(bad_request.display_message().contains("category required"));
    }

    #[test]
    fn failed_jobs_report_the_backend_message() {
        let bundle = TranslationBundle::new(Language::En);
        let failed = CliError::from_poll(
            PollError::Failed {
                message: Some("quota exceeded".into()),
            },
            &bundle,
        );
        assert_eq!(failed.exit_code(), 3);
        assert_eq!(
            failed.display_message(),
            "The analysis failed. (quota exceeded)"
        );
    }

    #[test]
    fn default_state_file_is_named_state_json() {
        let path = default_state_file();
        assert!(path.ends_with(STATE_FILE) || path.ends_with(".reviewscope-state.json"));
    }
}
