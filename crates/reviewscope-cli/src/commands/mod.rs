//! Command handlers grouped by concern.

pub(crate) mod analyze;
pub(crate) mod prefs;
pub(crate) mod reports;
pub(crate) mod results;

#[cfg(test)]
pub(crate) mod support {
    use httpmock::MockServer;
    use reviewscope_api_models::Language;
    use reviewscope_pipeline::HttpConfig;
    use tempfile::TempDir;

    use crate::cli::OutputFormat;
    use crate::client::AppContext;

    pub(crate) fn context_with(server: &MockServer, dir: &TempDir, output: OutputFormat) -> AppContext {
        let base = format!("{}/api", server.base_url())
            .parse()
            .expect("valid URL");
        AppContext::new(
            HttpConfig::new(base),
            &dir.path().join("state.json"),
            Some(Language::En),
            output,
        )
        .expect("context")
    }

    pub(crate) fn write_csv(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, "rating,review\n5,great sound\n2,battery died\n").expect("write csv");
        path
    }
}
