//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reviewscope_api_models::{FileRole, Language};
use reviewscope_pipeline::ThemeMode;
use reviewscope_report::Page;
use reviewscope_telemetry::{LogFormat, LoggingConfig, ansi_wanted, init_logging};
use tracing::{debug, warn};
use url::Url;

use crate::client::{AppContext, CliResult, parse_url};
use crate::commands::analyze::{handle_analyze, handle_status, handle_upload};
use crate::commands::prefs::{handle_prefs_set, handle_prefs_show};
use crate::commands::reports::{
    handle_reports_favorite, handle_reports_list, handle_reports_remove, handle_reports_show,
};
use crate::commands::results::{handle_export, handle_result};

pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parses CLI arguments, executes the requested command and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        filter: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, Into::into),
        ansi: ansi_wanted(),
        version: env!("CARGO_PKG_VERSION"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }

    let command = command_label(&cli.command);
    let result = match AppContext::from_cli(&cli) {
        Ok(ctx) => dispatch(cli.command, &ctx).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            debug!(command, "command finished");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            warn!(command, exit_code, "command failed");
            eprintln!("error: {message}");
            exit_code
        }
    }
}

pub(crate) async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Upload(args) => handle_upload(ctx, args).await,
        Command::Analyze(args) => handle_analyze(ctx, args).await,
        Command::Status(args) => handle_status(ctx, args).await,
        Command::Result(args) => handle_result(ctx, args).await,
        Command::Reports(reports) => match reports {
            ReportsCommand::Ls(args) => handle_reports_list(ctx, args).await,
            ReportsCommand::Show(args) => handle_reports_show(ctx, args).await,
            ReportsCommand::Rm(args) => handle_reports_remove(ctx, args).await,
            ReportsCommand::Fav(args) => handle_reports_favorite(ctx, &args),
        },
        Command::Export(args) => handle_export(ctx, args).await,
        Command::Prefs(prefs) => match prefs {
            PrefsCommand::Show => handle_prefs_show(ctx),
            PrefsCommand::Set(args) => handle_prefs_set(ctx, &args),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "reviewscope",
    version,
    about = "Upload customer reviews, run an analysis and read the report"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "REVIEWSCOPE_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "REVIEWSCOPE_API_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "REVIEWSCOPE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "REVIEWSCOPE_STATE_FILE")]
    pub(crate) state_file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_parser = parse_language,
        help = "Report language (en or zh); defaults to the saved preference"
    )]
    pub(crate) language: Option<Language>,
    #[arg(long, global = true, env = "REVIEWSCOPE_LOG", default_value = "info")]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "REVIEWSCOPE_LOG_FORMAT", value_enum)]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Upload one review file and print the stored reference.
    Upload(UploadArgs),
    /// Upload review files, submit an analysis and wait for the report.
    Analyze(AnalyzeArgs),
    /// Show the status of an analysis job.
    Status(StatusArgs),
    /// Show the result of a job, or of the latest analysis.
    Result(ResultArgs),
    /// Browse, delete and star stored reports.
    #[command(subcommand)]
    Reports(ReportsCommand),
    /// Write a result as a standalone HTML document.
    Export(ExportArgs),
    /// Show or change saved preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Subcommand)]
pub(crate) enum ReportsCommand {
    /// List stored reports, newest first.
    Ls(ReportsListArgs),
    /// Show one stored report.
    Show(ReportShowArgs),
    /// Delete a stored report.
    Rm(ReportIdArgs),
    /// Star or unstar a report.
    Fav(ReportIdArgs),
}

#[derive(Subcommand)]
pub(crate) enum PrefsCommand {
    /// Print the saved preferences.
    Show,
    /// Change the saved preferences.
    Set(PrefsSetArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct UploadArgs {
    /// CSV, XLS or XLSX file.
    pub(crate) path: PathBuf,
    #[arg(long, value_enum, default_value_t = RoleArg::Own)]
    pub(crate) role: RoleArg,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AnalyzeArgs {
    /// Own-brand review file.
    #[arg(long)]
    pub(crate) own: PathBuf,
    /// Optional competitor review file.
    #[arg(long)]
    pub(crate) competitor: Option<PathBuf>,
    /// Target product category (2 to 50 characters).
    #[arg(long)]
    pub(crate) category: String,
    /// Print the job id and return without polling.
    #[arg(long)]
    pub(crate) no_wait: bool,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct StatusArgs {
    pub(crate) job_id: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ResultArgs {
    /// Job id, or `latest`.
    pub(crate) source: String,
    #[arg(long, value_parser = parse_page)]
    pub(crate) page: Option<Page>,
    /// Print the backend JSON instead of the normalized report.
    #[arg(long)]
    pub(crate) raw: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ReportsListArgs {
    /// Only starred reports.
    #[arg(long)]
    pub(crate) favorites: bool,
    /// Case-insensitive category filter.
    #[arg(long)]
    pub(crate) category: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ReportShowArgs {
    pub(crate) id: String,
    #[arg(long, value_parser = parse_page)]
    pub(crate) page: Option<Page>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ReportIdArgs {
    pub(crate) id: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ExportArgs {
    /// Job id, `latest`, or a report id with `--report`.
    pub(crate) source: String,
    /// Treat the source as a stored report id.
    #[arg(long)]
    pub(crate) report: bool,
    /// Output file, or a directory to place a generated file name in.
    #[arg(long)]
    pub(crate) out: PathBuf,
    /// Theme of the exported page; defaults to the saved preference.
    #[arg(long, value_enum)]
    pub(crate) theme: Option<ThemeArg>,
}

/// The language is taken from the global `--language` flag.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PrefsSetArgs {
    #[arg(long, value_enum)]
    pub(crate) theme: Option<ThemeArg>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum RoleArg {
    Own,
    Competitor,
}

impl From<RoleArg> for FileRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Own => Self::Own,
            RoleArg::Competitor => Self::Competitor,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for ThemeMode {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::System => Self::System,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

fn parse_language(input: &str) -> Result<Language, String> {
    Language::from_tag(input).ok_or_else(|| format!("unsupported language '{input}' (use en or zh)"))
}

fn parse_page(input: &str) -> Result<Page, String> {
    Page::from_slug(input).ok_or_else(|| {
        let known: Vec<_> = Page::all().iter().map(|page| page.slug()).collect();
        format!("unknown page '{input}' (one of {})", known.join(", "))
    })
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Upload(_) => "upload",
        Command::Analyze(_) => "analyze",
        Command::Status(_) => "status",
        Command::Result(_) => "result",
        Command::Reports(ReportsCommand::Ls(_)) => "reports_ls",
        Command::Reports(ReportsCommand::Show(_)) => "reports_show",
        Command::Reports(ReportsCommand::Rm(_)) => "reports_rm",
        Command::Reports(ReportsCommand::Fav(_)) => "reports_fav",
        Command::Export(_) => "export",
        Command::Prefs(PrefsCommand::Show) => "prefs_show",
        Command::Prefs(PrefsCommand::Set(_)) => "prefs_set",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_parses_files_category_and_language() {
        let cli = Cli::try_parse_from([
            "reviewscope",
            "--language",
            "zh-CN",
            "analyze",
            "--own",
            "own.csv",
            "--competitor",
            "rival.xlsx",
            "--category",
            "Wireless Headphones",
            "--no-wait",
        ])
        .expect("parsed");
        assert_eq!(cli.language, Some(Language::Zh));
        assert_eq!(command_label(&cli.command), "analyze");
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.own, PathBuf::from("own.csv"));
                assert_eq!(args.competitor, Some(PathBuf::from("rival.xlsx")));
                assert_eq!(args.category, "Wireless Headphones");
                assert!(args.no_wait);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn page_and_language_values_are_validated() {
        let parsed = Cli::try_parse_from(["reviewscope", "result", "latest", "--page", "unmet_needs"])
            .expect("parsed");
        match parsed.command {
            Command::Result(args) => assert_eq!(args.page, Some(Page::UnmetNeeds)),
            _ => panic!("expected result"),
        }
        assert!(Cli::try_parse_from(["reviewscope", "result", "latest", "--page", "charts"]).is_err());
        assert!(Cli::try_parse_from(["reviewscope", "--language", "fr", "prefs", "show"]).is_err());
    }

    #[test]
    fn nested_commands_have_labels() {
        let cli = Cli::try_parse_from(["reviewscope", "reports", "fav", "r-1"]).expect("parsed");
        assert_eq!(command_label(&cli.command), "reports_fav");
        let cli = Cli::try_parse_from([
            "reviewscope",
            "prefs",
            "set",
            "--language",
            "zh",
            "--theme",
            "dark",
        ])
        .expect("parsed");
        assert_eq!(command_label(&cli.command), "prefs_set");
        assert_eq!(cli.language, Some(Language::Zh));
        assert_eq!(ThemeMode::from(ThemeArg::Dark), ThemeMode::Dark);
        assert_eq!(FileRole::from(RoleArg::Competitor), FileRole::Competitor);
    }
}
