use reviewscope_pipeline::ThemeMode;
use tracing::info;

use crate::cli::{OutputFormat, PrefsSetArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{format_preferences, print_json};

pub(crate) fn handle_prefs_show(ctx: &AppContext) -> CliResult<()> {
    let preferences = ctx.preferences();
    match ctx.output {
        OutputFormat::Json => print_json(&preferences),
        OutputFormat::Table => {
            println!("{}", format_preferences(&preferences, ctx.store.path()));
            Ok(())
        }
    }
}

/// Language comes from the global `--language` flag.
pub(crate) fn handle_prefs_set(ctx: &AppContext, args: &PrefsSetArgs) -> CliResult<()> {
    if ctx.language_override.is_none() && args.theme.is_none() {
        return Err(CliError::validation(
            "nothing to change; pass --language and/or --theme",
        ));
    }
    let mut preferences = ctx.preferences();
    if let Some(language) = ctx.language_override {
        preferences.language = language;
    }
    if let Some(theme) = args.theme {
        preferences.theme = ThemeMode::from(theme);
    }
    ctx.save_preferences(&preferences)?;
    info!(
        language = preferences.language.code(),
        theme = preferences.theme.as_str(),
        "preferences saved"
    );
    println!("{}", format_preferences(&preferences, ctx.store.path()));
    Ok(())
}
