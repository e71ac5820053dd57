use anyhow::anyhow;
use reviewscope_api_models::{FileRole, UploadedFile};
use reviewscope_pipeline::{
    AnalysisApi, AnalysisJob, CompletedJob, LocalFile, PollConfig, TokioTimer, Uploader,
    UserFacing, poll_job, submit_analysis, validate_category,
};
use reviewscope_report::{Report, available_pages};
use serde::Serialize;
use tracing::info;

use crate::cli::{AnalyzeArgs, OutputFormat, StatusArgs, UploadArgs};
use crate::client::{AppContext, CliError, CliResult, open_file};
use crate::output::{format_job, format_report, format_upload, print_json, progress_line};

#[derive(Serialize)]
struct AnalysisOutcome<'a> {
    job: &'a AnalysisJob,
    report: &'a Report,
}

pub(crate) async fn handle_upload(ctx: &AppContext, args: UploadArgs) -> CliResult<()> {
    let file = open_file(&args.path)?;
    let uploaded = upload_one(ctx, &file, args.role.into()).await?;
    match ctx.output {
        OutputFormat::Json => print_json(&uploaded),
        OutputFormat::Table => {
            println!("{}", format_upload(&uploaded));
            Ok(())
        }
    }
}

pub(crate) async fn handle_analyze(ctx: &AppContext, args: AnalyzeArgs) -> CliResult<()> {
    // Refuse a bad category before spending time on uploads.
    let category = validate_category(&args.category)
        .map_err(|err| CliError::validation(err.localized(&ctx.bundle)))?;
    let own_file = open_file(&args.own)?;
    let competitor_file = args.competitor.as_deref().map(open_file).transpose()?;

    let (own, competitor) = if let Some(rival) = &competitor_file {
        let (own, rival) = tokio::join!(
            upload_one(ctx, &own_file, FileRole::Own),
            upload_one(ctx, rival, FileRole::Competitor),
        );
        (own?, Some(rival?))
    } else {
        (upload_one(ctx, &own_file, FileRole::Own).await?, None)
    };

    let job_id = submit_analysis(
        &ctx.api,
        Some(&own),
        competitor.as_ref(),
        &category,
        ctx.language,
    )
    .await
    .map_err(|err| CliError::from_submit(err, &ctx.bundle))?;

    if args.no_wait {
        println!("{job_id}");
        return Ok(());
    }
    eprintln!("job {job_id} submitted");

    let completed = wait_for_job(ctx, &job_id).await?;
    match ctx.output {
        OutputFormat::Json => print_json(&AnalysisOutcome {
            job: &completed.job,
            report: &completed.report,
        }),
        OutputFormat::Table => {
            println!("job: {job_id}\n");
            let pages = available_pages(&completed.report);
            println!("{}", format_report(&completed.report, &pages, &ctx.bundle));
            Ok(())
        }
    }
}

pub(crate) async fn handle_status(ctx: &AppContext, args: StatusArgs) -> CliResult<()> {
    let job_id = args.job_id.trim();
    if job_id.is_empty() {
        return Err(CliError::validation("job id must not be empty"));
    }
    let response = ctx
        .api
        .status(job_id)
        .await
        .map_err(|err| CliError::from_api(err, &ctx.bundle))?;
    let mut job = AnalysisJob::new(job_id);
    job.apply(response);
    match ctx.output {
        OutputFormat::Json => print_json(&job),
        OutputFormat::Table => {
            println!("{}", format_job(&job, &ctx.bundle));
            Ok(())
        }
    }
}

async fn upload_one(ctx: &AppContext, file: &LocalFile, role: FileRole) -> CliResult<UploadedFile> {
    let uploaded = Uploader::new(&ctx.api, &TokioTimer)
        .upload(file, role, |_| {})
        .await
        .map_err(|err| CliError::from_upload(err, &ctx.bundle))?;
    eprintln!(
        "{}: {} -> {}",
        role.as_str(),
        uploaded.display_name(),
        uploaded.stored_name
    );
    Ok(uploaded)
}

/// Poll with one progress line per change. Ctrl-C stops polling; the job
/// keeps running on the backend.
async fn wait_for_job(ctx: &AppContext, job_id: &str) -> CliResult<CompletedJob> {
    let mut last_line = String::new();
    let poll = poll_job(&ctx.api, &TokioTimer, job_id, PollConfig::default(), |job| {
        let line = progress_line(job, &ctx.bundle);
        if line != last_line {
            eprintln!("{line}");
            last_line = line;
        }
    });
    tokio::select! {
        outcome = poll => outcome.map_err(|err| CliError::from_poll(err, &ctx.bundle)),
        _ = tokio::signal::ctrl_c() => {
            info!(job = job_id, "polling cancelled by user");
            Err(CliError::failure(anyhow!(
                "polling cancelled; check later with `reviewscope status {job_id}`"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RoleArg;
    use crate::commands::support::{context_with, write_csv};
    use httpmock::prelude::*;
    use serde_json::json;

    fn analyze_args(dir: &tempfile::TempDir, category: &str, no_wait: bool) -> AnalyzeArgs {
        AnalyzeArgs {
            own: write_csv(dir, "own.csv"),
            competitor: Some(write_csv(dir, "rival.csv")),
            category: category.to_string(),
            no_wait,
        }
    }

    #[tokio::test]
    async fn analyze_runs_the_whole_pipeline() {
        let server = MockServer::start_async().await;
        let upload = server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(200).json_body(json!({
                "fileName": "stored.csv",
                "originalName": "own.csv",
                "fileType": "own",
                "size": 40
            }));
        });
        let analyze = server.mock(|when, then| {
            when.method(POST)
                .path("/api/analyze")
                .json_body_includes(r#"{"targetCategory": "Wireless Headphones"}"#);
            then.status(200).json_body(json!({"analysisId": "job-9"}));
        });
        let status = server.mock(|when, then| {
            when.method(GET).path("/api/analysis/job-9/status");
            then.status(200).json_body(json!({"status": "completed", "progress": 100}));
        });
        let result = server.mock(|when, then| {
            when.method(GET).path("/api/analysis/job-9/result");
            then.status(200).json_body(json!({
                "ownBrandAnalysis": {"unmetNeeds": ["Longer battery"]},
                "suggestions": ["Bundle a carrying case"]
            }));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Json);
        handle_analyze(&ctx, analyze_args(&dir, "  Wireless Headphones ", false))
            .await
            .expect("analysis");

        upload.assert_calls(2);
        analyze.assert();
        status.assert();
        result.assert();
    }

    #[tokio::test]
    async fn invalid_category_fails_before_uploading() {
        let server = MockServer::start_async().await;
        let upload = server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(200);
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);

        let err = handle_analyze(&ctx, analyze_args(&dir, "x", false))
            .await
            .expect_err("short category");
        assert_eq!(err.exit_code(), 2);
        upload.assert_calls(0);
    }

    #[tokio::test]
    async fn no_wait_prints_the_job_without_polling() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(200).json_body(json!({"fileName": "s.csv", "fileType": "own"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/analyze");
            then.status(200).json_body(json!({"analysis_id": "job-10"}));
        });
        let status = server.mock(|when, then| {
            when.method(GET).path_includes("/status");
            then.status(200).json_body(json!({"status": "running"}));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        handle_analyze(&ctx, analyze_args(&dir, "Mugs", true))
            .await
            .expect("submitted");
        status.assert_calls(0);
    }

    #[tokio::test]
    async fn failed_jobs_exit_as_failures() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(200).json_body(json!({"fileName": "s.csv", "fileType": "own"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/analyze");
            then.status(200).json_body(json!({"analysis_id": "job-11"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/job-11/status");
            then.status(200)
                .json_body(json!({"status": "failed", "error": "no reviews found"}));
        });

        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        let mut args = analyze_args(&dir, "Mugs", false);
        args.competitor = None;
        let err = handle_analyze(&ctx, args).await.expect_err("job failed");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("no reviews found"));
    }

    #[tokio::test]
    async fn upload_rejects_unsupported_files_locally() {
        let server = MockServer::start_async().await;
        let upload = server.mock(|when, then| {
            when.method(POST).path("/api/upload");
            then.status(200);
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "%PDF").expect("write");
        let ctx = context_with(&server, &dir, OutputFormat::Table);

        let err = handle_upload(
            &ctx,
            UploadArgs {
                path,
                role: RoleArg::Own,
            },
        )
        .await
        .expect_err("rejected");
        assert_eq!(err.exit_code(), 2);
        upload.assert_calls(0);
    }

    #[tokio::test]
    async fn status_reports_backend_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/missing/status");
            then.status(404).json_body(json!({"detail": "Analysis not found"}));
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        let err = handle_status(
            &ctx,
            StatusArgs {
                job_id: "missing".into(),
            },
        )
        .await
        .expect_err("not found");
        assert_eq!(err.exit_code(), 3);
    }
}
