//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::anyhow;
use reviewscope_api_models::{ReportSummary, StepView, UploadedFile};
use reviewscope_pipeline::{AnalysisJob, FavoriteSet, Preferences};
use reviewscope_report::render::percent;
use reviewscope_report::{
    BrandAnalysis, Insight, Level, Opportunity, Page, Report, TranslationBundle,
};
use serde::Serialize;

use crate::client::{CliError, CliResult};

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn format_upload(file: &UploadedFile) -> String {
    format!(
        "stored: {}\noriginal: {}\nrole: {}\nsize: {}",
        file.stored_name,
        file.display_name(),
        file.role.as_str(),
        format_bytes(file.size_bytes)
    )
}

pub(crate) fn format_job(job: &AnalysisJob, bundle: &TranslationBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "job: {}", job.id);
    let _ = writeln!(out, "status: {}", status_label(job, bundle));
    let _ = writeln!(out, "progress: {:.0}%", job.progress);
    if let Some(step) = current_step_label(job, bundle) {
        let _ = writeln!(out, "step: {step}");
    }
    if let Some(error) = &job.error {
        let _ = writeln!(out, "error: {error}");
    }
    if !job.steps.is_empty() {
        let _ = writeln!(out, "steps:");
        for step in &job.steps {
            let _ = writeln!(
                out,
                "  [{:<9}] {}",
                bundle.t(&format!("progress.step.{}", step.status.as_str())),
                bundle.step_label(step)
            );
        }
    }
    out.trim_end().to_string()
}

/// One live progress line for `analyze`.
pub(crate) fn progress_line(job: &AnalysisJob, bundle: &TranslationBundle) -> String {
    let mut line = format!("[{:>3.0}%] {}", job.progress, status_label(job, bundle));
    if let Some(step) = current_step_label(job, bundle) {
        let _ = write!(line, " · {step}");
    }
    line
}

fn status_label(job: &AnalysisJob, bundle: &TranslationBundle) -> String {
    bundle.t(&format!("status.{}", job.status.as_str()))
}

fn current_step_label(job: &AnalysisJob, bundle: &TranslationBundle) -> Option<String> {
    let current = job.current_step.as_deref()?;
    let label = job
        .steps
        .iter()
        .find(|step| step.id == current || step.name == current)
        .map_or(current, |step: &StepView| bundle.step_label(step));
    Some(label.to_string())
}

pub(crate) fn format_report_list(
    reports: &[ReportSummary],
    favorites: &FavoriteSet,
    bundle: &TranslationBundle,
) -> String {
    if reports.is_empty() {
        return bundle.t("empty.history");
    }
    let mut out = format!(
        "  {:<24} {:<20} {:<10} {:<4} CATEGORY\n",
        "ID", "CREATED", "STATUS", "COMP"
    );
    for report in reports {
        let _ = writeln!(
            out,
            "{} {:<24} {:<20} {:<10} {:<4} {}",
            if favorites.contains(&report.id) { '*' } else { ' ' },
            report.id,
            report.timestamp,
            report.status.as_str(),
            if report.has_competitor_data { "yes" } else { "-" },
            report.category
        );
    }
    out.trim_end().to_string()
}

pub(crate) fn format_preferences(preferences: &Preferences, path: &Path) -> String {
    let favorites: Vec<&str> = preferences.favorites.iter().collect();
    format!(
        "language: {}\ntheme: {}\nfavorites: {}\nstate file: {}",
        preferences.language.code(),
        preferences.theme.as_str(),
        if favorites.is_empty() {
            "-".to_string()
        } else {
            favorites.join(", ")
        },
        path.display()
    )
}

/// Plain-text rendering of `pages`, in order.
pub(crate) fn format_report(report: &Report, pages: &[Page], bundle: &TranslationBundle) -> String {
    let mut out = String::new();
    for page in pages {
        let title = bundle.t(page.title_key());
        let _ = writeln!(out, "== {title} ==");
        if page.is_empty(report) {
            let _ = writeln!(out, "{}", bundle.t("empty.section"));
        } else {
            match page {
                Page::Overview => overview(&mut out, report, bundle),
                Page::Insights => per_brand(&mut out, report, bundle, insights),
                Page::Feedback => per_brand(&mut out, report, bundle, feedback),
                Page::UnmetNeeds => per_brand(&mut out, report, bundle, unmet_needs),
                Page::Comparison => comparison(&mut out, report, bundle),
                Page::Opportunities => opportunities(&mut out, &report.opportunities, bundle),
            }
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn overview(out: &mut String, report: &Report, bundle: &TranslationBundle) {
    let meta = &report.meta;
    if let Some(category) = &meta.category {
        let _ = writeln!(out, "{}: {category}", bundle.t("report.category"));
    }
    if let Some(at) = &meta.generated_at {
        let _ = writeln!(out, "{}: {at}", bundle.t("report.generated_at"));
    }
    if let Some(count) = meta.review_count {
        let _ = writeln!(out, "{}: {count}", bundle.t("report.review_count"));
    }
    if let Some(rating) = meta.average_rating {
        let _ = writeln!(out, "{}: {rating:.1} / 5", bundle.t("report.average_rating"));
    }
    if let Some(summary) = &meta.summary {
        let _ = writeln!(out, "{}: {summary}", bundle.t("report.summary"));
    }
}

fn per_brand(
    out: &mut String,
    report: &Report,
    bundle: &TranslationBundle,
    section: fn(&mut String, &BrandAnalysis, &TranslationBundle),
) {
    let brands = std::iter::once(("report.own_brand", &report.own))
        .chain(report.competitor.iter().map(|brand| ("report.competitor", brand)));
    for (key, brand) in brands {
        let heading = brand
            .brand
            .clone()
            .unwrap_or_else(|| bundle.t(key));
        let _ = writeln!(out, "-- {heading} --");
        section(out, brand, bundle);
    }
}

fn insights(out: &mut String, brand: &BrandAnalysis, bundle: &TranslationBundle) {
    let section = &brand.personas;
    if let Some(summary) = &section.summary {
        let _ = writeln!(out, "{summary}");
    }
    if !section.personas.is_empty() {
        let _ = writeln!(out, "{}:", bundle.t("report.personas"));
        for persona in &section.personas {
            let _ = write!(out, "  - {}", persona.name);
            if let Some(share) = persona.share {
                let _ = write!(out, " ({})", percent(share));
            }
            out.push('\n');
            if let Some(description) = &persona.description {
                let _ = writeln!(out, "    {description}");
            }
            if !persona.traits.is_empty() {
                let _ = writeln!(out, "    {}: {}", bundle.t("report.traits"), persona.traits.join(", "));
            }
        }
    }
    insight_list(out, "report.scenarios", &section.scenarios, bundle);
    insight_list(out, "report.motivations", &section.motivations, bundle);
}

fn feedback(out: &mut String, brand: &BrandAnalysis, bundle: &TranslationBundle) {
    let section = &brand.feedback;
    if let Some(summary) = &section.summary {
        let _ = writeln!(out, "{summary}");
    }
    if !section.ratings.is_empty() {
        let _ = writeln!(out, "{}:", bundle.t("report.ratings"));
        for bucket in &section.ratings {
            let _ = write!(out, "  {:<12}", bucket.label);
            if let Some(count) = bucket.count {
                let _ = write!(out, " {count:>6}");
            }
            if let Some(share) = bucket.share {
                let _ = write!(out, " {:>6}", percent(share));
            }
            let _ = writeln!(
                out,
                "  {}",
                bundle.t(&format!("report.sentiment.{}", bucket.sentiment.key()))
            );
        }
    }
    insight_list(out, "report.positives", &section.positives, bundle);
    insight_list(out, "report.negatives", &section.negatives, bundle);
}

fn unmet_needs(out: &mut String, brand: &BrandAnalysis, bundle: &TranslationBundle) {
    for need in &brand.unmet_needs {
        let _ = write!(out, "  - {}", need.need);
        if need.severity != Level::Unspecified {
            let _ = write!(
                out,
                " [{}: {}]",
                bundle.t("report.severity"),
                level_label(need.severity, bundle)
            );
        }
        out.push('\n');
        if let Some(detail) = &need.detail {
            let _ = writeln!(out, "    {detail}");
        }
    }
}

fn comparison(out: &mut String, report: &Report, bundle: &TranslationBundle) {
    let comparison = &report.comparison;
    if let Some(summary) = &comparison.summary {
        let _ = writeln!(out, "{summary}");
    }
    insight_list(out, "report.own_strengths", &comparison.own_strengths, bundle);
    insight_list(out, "report.own_weaknesses", &comparison.own_weaknesses, bundle);
    insight_list(out, "report.competitor_strengths", &comparison.competitor_strengths, bundle);
    insight_list(out, "report.competitor_weaknesses", &comparison.competitor_weaknesses, bundle);
    if !comparison.dimensions.is_empty() {
        let _ = writeln!(
            out,
            "{}:\n  {:<20} {:>6} {:>6}",
            bundle.t("report.dimensions"),
            "",
            short(&bundle.t("report.own_brand")),
            short(&bundle.t("report.competitor"))
        );
        for score in &comparison.dimensions {
            let _ = writeln!(
                out,
                "  {:<20} {:>6} {:>6}",
                score.dimension,
                score.own.map_or_else(|| "-".to_string(), |v| format!("{v:.1}")),
                score.competitor.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
            );
        }
    }
    if !comparison.positioning.is_empty() {
        let _ = writeln!(out, "{}:", bundle.t("report.positioning"));
        for point in &comparison.positioning {
            let _ = writeln!(
                out,
                "  {}{} ({:.0}, {:.0})",
                if point.own { "* " } else { "  " },
                point.label,
                point.x,
                point.y
            );
        }
    }
}

fn opportunities(out: &mut String, items: &[Opportunity], bundle: &TranslationBundle) {
    for (index, item) in items.iter().enumerate() {
        let _ = write!(out, "{}. {}", index + 1, item.title);
        let levels: Vec<String> = [
            ("report.priority", item.priority),
            ("report.impact", item.impact),
            ("report.effort", item.effort),
        ]
        .into_iter()
        .filter(|(_, level)| *level != Level::Unspecified)
        .map(|(key, level)| format!("{}: {}", bundle.t(key), level_label(level, bundle)))
        .collect();
        if !levels.is_empty() {
            let _ = write!(out, " [{}]", levels.join(", "));
        }
        out.push('\n');
        if let Some(description) = &item.description {
            let _ = writeln!(out, "   {description}");
        }
        for action in &item.actions {
            let _ = writeln!(out, "   > {action}");
        }
    }
}

fn insight_list(out: &mut String, key: &str, items: &[Insight], bundle: &TranslationBundle) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", bundle.t(key));
    for item in items {
        let _ = write!(out, "  - {}", item.label);
        if let Some(share) = item.share {
            let _ = write!(out, " ({})", percent(share));
        } else if let Some(mentions) = item.mentions {
            let _ = write!(out, " (x{mentions})");
        }
        if let Some(detail) = &item.detail {
            let _ = write!(out, ": {detail}");
        }
        out.push('\n');
    }
}

fn level_label(level: Level, bundle: &TranslationBundle) -> String {
    bundle.t(&format!("report.level.{}", level.key()))
}

fn short(label: &str) -> String {
    label.chars().take(6).collect()
}

/// Format a byte count using binary units.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[0])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
