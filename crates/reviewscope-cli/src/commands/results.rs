use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use reviewscope_pipeline::{ResultRef, StoredResult, ThemeMode, fetch_result};
use reviewscope_report::{ExportOptions, Page, available_pages, export_file_name, export_html};

use crate::cli::{ExportArgs, OutputFormat, ResultArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{format_report, print_json};

pub(crate) async fn handle_result(ctx: &AppContext, args: ResultArgs) -> CliResult<()> {
    let source = result_source(&args.source, false)?;
    let stored = fetch_result(&ctx.api, source)
        .await
        .map_err(|err| CliError::from_api(err, &ctx.bundle))?;
    print_result(ctx, &stored, args.page, args.raw)
}

/// Shared by `result` and `reports show`.
pub(crate) fn print_result(
    ctx: &AppContext,
    stored: &StoredResult,
    page: Option<Page>,
    raw: bool,
) -> CliResult<()> {
    if raw {
        return print_json(&stored.raw);
    }
    let pages = page.map_or_else(|| available_pages(&stored.report), |page| vec![page]);
    match ctx.output {
        OutputFormat::Json => print_json(&stored.report),
        OutputFormat::Table => {
            println!("{}", format_report(&stored.report, &pages, &ctx.bundle));
            Ok(())
        }
    }
}

pub(crate) async fn handle_export(ctx: &AppContext, args: ExportArgs) -> CliResult<()> {
    let source = result_source(&args.source, args.report)?;
    let stored = fetch_result(&ctx.api, source)
        .await
        .map_err(|err| CliError::from_api(err, &ctx.bundle))?;

    let theme = args
        .theme
        .map_or_else(|| ctx.preferences().theme, ThemeMode::from);
    let mut options = ExportOptions::new(ctx.language, Utc::now());
    // A terminal has no colour-scheme signal, so "system" exports light.
    options.dark = theme.resolve(false);

    let html = export_html(&stored.report, &options);
    let target = export_target(args.out, &stored, &options);
    if let Some(parent) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))
            .map_err(CliError::failure)?;
    }
    std::fs::write(&target, html)
        .with_context(|| format!("failed to write {}", target.display()))
        .map_err(CliError::failure)?;
    println!("{}", target.display());
    Ok(())
}

fn result_source(raw: &str, historical: bool) -> CliResult<ResultRef> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation("a job id, report id or `latest` is required"));
    }
    Ok(if historical {
        ResultRef::Report(trimmed.to_string())
    } else {
        ResultRef::job_or_latest(trimmed)
    })
}

/// A directory target gets the generated download name inside it.
fn export_target(out: PathBuf, stored: &StoredResult, options: &ExportOptions) -> PathBuf {
    if out.is_dir() {
        out.join(export_file_name(
            &stored.report,
            options.generated_at.date_naive(),
        ))
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ThemeArg;
    use crate::commands::support::context_with;
    use httpmock::prelude::*;
    use serde_json::json;

    fn result_body() -> serde_json::Value {
        json!({
            "meta": {"category": "Wireless Headphones"},
            "ownBrandAnalysis": {"unmetNeeds": ["Longer battery"]},
            "suggestions": ["Bundle a carrying case"]
        })
    }

    #[tokio::test]
    async fn latest_result_is_fetched_from_the_latest_endpoint() {
        let server = MockServer::start_async().await;
        let latest = server.mock(|when, then| {
            when.method(GET).path("/api/analysis/latest/result");
            then.status(200).json_body(result_body());
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);

        handle_result(
            &ctx,
            ResultArgs {
                source: "LATEST".into(),
                page: Some(Page::UnmetNeeds),
                raw: false,
            },
        )
        .await
        .expect("result");
        latest.assert();
    }

    #[tokio::test]
    async fn blank_sources_are_rejected() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        let err = handle_result(
            &ctx,
            ResultArgs {
                source: "  ".into(),
                page: None,
                raw: true,
            },
        )
        .await
        .expect_err("blank");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn export_into_a_directory_uses_the_generated_name() {
        let server = MockServer::start_async().await;
        let report = server.mock(|when, then| {
            when.method(GET).path("/api/report/r-7");
            then.status(200).json_body(result_body());
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);

        handle_export(
            &ctx,
            ExportArgs {
                source: "r-7".into(),
                report: true,
                out: dir.path().to_path_buf(),
                theme: Some(ThemeArg::Dark),
            },
        )
        .await
        .expect("export");
        report.assert();

        let written: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
            .collect();
        assert_eq!(written.len(), 1);
        let name = written[0]
            .file_name()
            .and_then(|name| name.to_str())
            .expect("utf-8 name");
        assert!(name.starts_with("reviewscope-wireless-headphones-"), "{name}");
        let html = std::fs::read_to_string(&written[0]).expect("read export");
        assert!(html.contains("Longer battery"));
        assert!(html.contains("class=\"dark\""));
    }

    #[tokio::test]
    async fn export_to_a_file_path_creates_parents() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/job-3/result");
            then.status(200).json_body(result_body());
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        let out = dir.path().join("exports").join("report.html");

        handle_export(
            &ctx,
            ExportArgs {
                source: "job-3".into(),
                report: false,
                out: out.clone(),
                theme: None,
            },
        )
        .await
        .expect("export");
        let html = std::fs::read_to_string(out).expect("read export");
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
