//! Standalone HTML export of a full report.

use crate::i18n::TranslationBundle;
use crate::pages::available_pages;
use crate::render::{escape, render_page};
use crate::schema::Report;
use chrono::{DateTime, NaiveDate, Utc};
use reviewscope_api_models::Language;
use std::fmt::Write as _;

const BASE_CSS: &str = r"
:root { --bg: #ffffff; --fg: #1f2937; --muted: #6b7280; --card: #f9fafb; --border: #e5e7eb; --accent: #4f46e5; }
html.dark { --bg: #111827; --fg: #f3f4f6; --muted: #9ca3af; --card: #1f2937; --border: #374151; --accent: #818cf8; }
body { margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); font-family: system-ui, -apple-system, 'PingFang SC', 'Microsoft YaHei', sans-serif; line-height: 1.5; }
header.export-header { border-bottom: 1px solid var(--border); margin-bottom: 1.5rem; }
.report-page { margin-bottom: 2.5rem; page-break-inside: avoid; }
.card-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
.card, .rating-bucket { background: var(--card); border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin-bottom: 0.75rem; }
.badge { display: inline-block; font-size: 0.75rem; padding: 0 0.5rem; border-radius: 999px; border: 1px solid var(--border); color: var(--muted); }
.level-high { color: #dc2626; } .level-medium { color: #d97706; } .level-low { color: #059669; }
.sentiment-positive { border-left: 4px solid #059669; } .sentiment-negative { border-left: 4px solid #dc2626; } .sentiment-neutral { border-left: 4px solid #d97706; }
.bar { height: 6px; background: var(--border); border-radius: 3px; } .bar-fill { height: 100%; background: var(--accent); border-radius: 3px; }
.scatter { border-left: 1px solid var(--border); border-bottom: 1px solid var(--border); }
.scatter-point { width: 10px; height: 10px; margin: -5px; border-radius: 50%; background: var(--muted); }
.scatter-point.own { background: var(--accent); }
.scatter-point span { position: absolute; left: 14px; top: -4px; font-size: 0.75rem; white-space: nowrap; }
.dimensions { border-collapse: collapse; } .dimensions td, .dimensions th { border: 1px solid var(--border); padding: 0.25rem 0.75rem; }
.empty-state { text-align: center; color: var(--muted); padding: 2rem; border: 1px dashed var(--border); border-radius: 8px; }
blockquote { margin: 0.25rem 0; padding-left: 0.75rem; border-left: 3px solid var(--border); color: var(--muted); }
";

/// Inputs for [`export_html`] beyond the report itself.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Language of headings and placeholders.
    pub language: Language,
    /// Render with the dark palette.
    pub dark: bool,
    /// Extra stylesheet text appended after the base rules.
    pub extra_css: String,
    /// Timestamp printed in the header.
    pub generated_at: DateTime<Utc>,
}

impl ExportOptions {
    /// Options with no extra CSS and the light palette.
    #[must_use]
    pub const fn new(language: Language, generated_at: DateTime<Utc>) -> Self {
        Self {
            language,
            dark: false,
            extra_css: String::new(),
            generated_at,
        }
    }
}

/// Render every offered page of `report` into one self-contained HTML document.
#[must_use]
pub fn export_html(report: &Report, options: &ExportOptions) -> String {
    let bundle = TranslationBundle::new(options.language);
    let title = report.meta.category.as_deref().map_or_else(
        || bundle.t("meta.title"),
        |category| format!("{} · {category}", bundle.t("meta.title")),
    );

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="{lang}" data-theme="{theme}" class="{theme}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{base}
{extra}</style>
</head>
<body>
<header class="export-header"><h1>{title}</h1><p class="timestamp">{generated_label}: {generated}</p></header>
<main>
"#,
        lang = options.language.code(),
        theme = if options.dark { "dark" } else { "light" },
        title = escape(&title),
        base = BASE_CSS,
        extra = sanitize_css(&options.extra_css),
        generated_label = escape(&bundle.t("report.generated_at")),
        generated = options.generated_at.format("%Y-%m-%d %H:%M UTC"),
    );
    for page in available_pages(report) {
        html.push_str(&render_page(page, report, &bundle));
        html.push('\n');
    }
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

/// Download name: `reviewscope-<category-slug>-<YYYY-MM-DD>.html`.
#[must_use]
pub fn export_file_name(report: &Report, date: NaiveDate) -> String {
    let slug = report
        .meta
        .category
        .as_deref()
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| "report".to_string());
    format!("reviewscope-{slug}-{}.html", date.format("%Y-%m-%d"))
}

fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Keep caller CSS from closing the embedding `<style>` element.
fn sanitize_css(css: &str) -> String {
    css.replace("</style", "<\\/style")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn at_noon() -> DateTime<Utc> {
        DateTime::from_timestamp(1_767_268_800, 0).expect("timestamp")
    }

    #[test]
    fn export_contains_every_offered_page_in_order() {
        let report = normalize(&json!({
            "targetCategory": "Desk Lamps",
            "unmetNeeds": ["Warmer light"],
            "opportunities": ["Add dimmer"]
        }));
        let html = export_html(&report, &ExportOptions::new(Language::En, at_noon()));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>ReviewScope · Desk Lamps</title>"));
        let unmet = html.find("page-unmet-needs").unwrap_or(usize::MAX);
        let opps = html.find("page-opportunities").unwrap_or(0);
        assert!(unmet < opps);
        assert!(!html.contains("page-comparison"));
        assert!(html.contains("Warmer light"));
    }

    #[test]
    fn export_applies_theme_and_extra_css() {
        let options = ExportOptions {
            dark: true,
            extra_css: ".x{color:red}</style><script>".to_string(),
            ..ExportOptions::new(Language::Zh, at_noon())
        };
        let html = export_html(&Report::default(), &options);
        assert!(html.contains(r#"data-theme="dark""#));
        assert!(html.contains(".x{color:red}<\\/style><script>"));
        assert!(html.contains("该部分暂无数据"));
    }

    #[test]
    fn file_name_slugs_category_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");
        let report = normalize(&json!({"category": "  Wireless Headphones / ANC "}));
        assert_eq!(
            export_file_name(&report, date),
            "reviewscope-wireless-headphones-anc-2026-03-09.html"
        );
        assert_eq!(
            export_file_name(&Report::default(), date),
            "reviewscope-report-2026-03-09.html"
        );
        let zh = normalize(&json!({"品类": "无线耳机"}));
        assert_eq!(export_file_name(&zh, date), "reviewscope-无线耳机-2026-03-09.html");
    }
}
