use reviewscope_pipeline::{ReportFilter, delete_report, fetch_report, list_reports};
use tracing::debug;

use crate::cli::{OutputFormat, ReportIdArgs, ReportShowArgs, ReportsListArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::results::print_result;
use crate::output::{format_report_list, print_json};

pub(crate) async fn handle_reports_list(ctx: &AppContext, args: ReportsListArgs) -> CliResult<()> {
    let filter = ReportFilter {
        favorites_only: args.favorites,
        category: args.category,
    };
    let mut preferences = ctx.preferences();
    let reports = list_reports(&ctx.api, &filter, &preferences.favorites)
        .await
        .map_err(|err| CliError::from_api(err, &ctx.bundle))?;

    // Only a complete listing proves a starred report is gone.
    if filter == ReportFilter::default() {
        let before = preferences.favorites.len();
        preferences.favorites.retain_existing(&reports);
        if preferences.favorites.len() != before {
            debug!(
                dropped = before - preferences.favorites.len(),
                "pruned favorites of deleted reports"
            );
            ctx.save_preferences(&preferences)?;
        }
    }

    match ctx.output {
        OutputFormat::Json => print_json(&reports),
        OutputFormat::Table => {
            println!(
                "{}",
                format_report_list(&reports, &preferences.favorites, &ctx.bundle)
            );
            Ok(())
        }
    }
}

pub(crate) async fn handle_reports_show(ctx: &AppContext, args: ReportShowArgs) -> CliResult<()> {
    let id = required_id(&args.id)?;
    let stored = fetch_report(&ctx.api, id)
        .await
        .map_err(|err| CliError::from_api(err, &ctx.bundle))?;
    print_result(ctx, &stored, args.page, false)
}

pub(crate) async fn handle_reports_remove(ctx: &AppContext, args: ReportIdArgs) -> CliResult<()> {
    let id = required_id(&args.id)?;
    let mut preferences = ctx.preferences();
    delete_report(&ctx.api, id, &mut preferences.favorites)
        .await
        .map_err(|err| CliError::from_api(err, &ctx.bundle))?;
    ctx.save_preferences(&preferences)?;
    println!("deleted {id}");
    Ok(())
}

pub(crate) fn handle_reports_favorite(ctx: &AppContext, args: &ReportIdArgs) -> CliResult<()> {
    let id = required_id(&args.id)?;
    let mut preferences = ctx.preferences();
    let starred = preferences.favorites.toggle(id);
    ctx.save_preferences(&preferences)?;
    println!("{} {id}", if starred { "starred" } else { "unstarred" });
    Ok(())
}

fn required_id(raw: &str) -> CliResult<&str> {
    let id = raw.trim();
    if id.is_empty() {
        Err(CliError::validation("report id must not be empty"))
    } else {
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::support::context_with;
    use httpmock::prelude::*;
    use reviewscope_pipeline::PreferenceStore;
    use serde_json::json;

    fn listing() -> serde_json::Value {
        json!({"reports": [
            {"id": "r-1", "timestamp": "2026-03-01T10:00:00", "category": "Mugs", "status": "completed"},
            {"id": "r-2", "timestamp": "2026-03-02T10:00:00", "category": "Headphones", "status": "completed", "has_competitor_data": true}
        ]})
    }

    fn id(value: &str) -> ReportIdArgs {
        ReportIdArgs {
            id: value.to_string(),
        }
    }

    #[test]
    fn favorites_toggle_and_persist() {
        let server = MockServer::start();
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);

        handle_reports_favorite(&ctx, &id("r-1")).expect("star");
        assert!(ctx.store.load().favorites.contains("r-1"));
        handle_reports_favorite(&ctx, &id("r-1")).expect("unstar");
        assert!(ctx.store.load().favorites.is_empty());
        assert_eq!(
            handle_reports_favorite(&ctx, &id(" "))
                .expect_err("blank")
                .exit_code(),
            2
        );
    }

    #[tokio::test]
    async fn full_listing_prunes_favorites_of_deleted_reports() {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/reports");
            then.status(200).json_body(listing());
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        handle_reports_favorite(&ctx, &id("r-2")).expect("star");
        handle_reports_favorite(&ctx, &id("gone")).expect("star");

        handle_reports_list(
            &ctx,
            ReportsListArgs {
                favorites: false,
                category: None,
            },
        )
        .await
        .expect("list");
        list.assert();
        let favorites = ctx.store.load().favorites;
        assert!(favorites.contains("r-2"));
        assert!(!favorites.contains("gone"));
    }

    #[tokio::test]
    async fn filtered_listing_leaves_favorites_alone() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/reports");
            then.status(200).json_body(json!([]));
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Json);
        handle_reports_favorite(&ctx, &id("elsewhere")).expect("star");

        handle_reports_list(
            &ctx,
            ReportsListArgs {
                favorites: true,
                category: Some("mug".into()),
            },
        )
        .await
        .expect("list");
        assert!(ctx.store.load().favorites.contains("elsewhere"));
    }

    #[tokio::test]
    async fn removing_a_report_unstars_it() {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/reports/r-1");
            then.status(204);
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        handle_reports_favorite(&ctx, &id("r-1")).expect("star");

        handle_reports_remove(&ctx, id("r-1")).await.expect("delete");
        delete.assert();
        assert!(ctx.store.load().favorites.is_empty());
    }

    #[tokio::test]
    async fn failed_removal_keeps_the_favorite() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/reports/r-1");
            then.status(500).json_body(json!({"message": "disk full"}));
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);
        handle_reports_favorite(&ctx, &id("r-1")).expect("star");

        let err = handle_reports_remove(&ctx, id("r-1"))
            .await
            .expect_err("server error");
        assert_eq!(err.exit_code(), 3);
        assert!(ctx.store.load().favorites.contains("r-1"));
    }

    #[tokio::test]
    async fn show_fetches_the_historical_report() {
        let server = MockServer::start_async().await;
        let report = server.mock(|when, then| {
            when.method(GET).path("/api/report/r-2");
            then.status(200)
                .json_body(json!({"suggestions": ["Offer a travel case"]}));
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context_with(&server, &dir, OutputFormat::Table);

        handle_reports_show(
            &ctx,
            ReportShowArgs {
                id: "r-2".into(),
                page: None,
            },
        )
        .await
        .expect("show");
        report.assert();
    }
}
