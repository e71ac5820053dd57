//! Static HTML markup for each report page.
//!
//! Every page renders independently from its own section of the [`Report`].
//! Empty sections render the localized placeholder block.

use crate::i18n::TranslationBundle;
use crate::pages::Page;
use crate::schema::{
    BrandAnalysis, Comparison, DimensionScore, Insight, Level, Opportunity, PositionPoint,
    RatingBucket, Report,
};
use std::fmt::Write as _;

/// Escape text for HTML element and attribute content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Format a 0 to 100 share for display.
#[must_use]
pub fn percent(share: f64) -> String {
    if (share - share.round()).abs() < 0.05 {
        format!("{share:.0}%")
    } else {
        format!("{share:.1}%")
    }
}

/// Render one page as a `<section>` element.
#[must_use]
pub fn render_page(page: Page, report: &Report, bundle: &TranslationBundle) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<section class="report-page" id="page-{slug}"><h2>{title}</h2>"#,
        slug = page.slug(),
        title = escape(&bundle.t(page.title_key())),
    );
    if page.is_empty(report) {
        out.push_str(&placeholder(bundle));
    } else {
        match page {
            Page::Overview => overview(&mut out, report, bundle),
            Page::Insights => per_brand(&mut out, report, bundle, insights),
            Page::Feedback => per_brand(&mut out, report, bundle, feedback),
            Page::UnmetNeeds => per_brand(&mut out, report, bundle, unmet_needs),
            Page::Comparison => comparison(&mut out, &report.comparison, bundle),
            Page::Opportunities => opportunities(&mut out, &report.opportunities, bundle),
        }
    }
    out.push_str("</section>");
    out
}

/// The empty-section placeholder block.
#[must_use]
pub fn placeholder(bundle: &TranslationBundle) -> String {
    format!(
        r#"<div class="empty-state"><p class="empty-title">{}</p><p class="empty-hint">{}</p></div>"#,
        escape(&bundle.t("empty.section")),
        escape(&bundle.t("empty.section_hint")),
    )
}

fn overview(out: &mut String, report: &Report, bundle: &TranslationBundle) {
    let meta = &report.meta;
    out.push_str(r#"<dl class="stats">"#);
    let mut stat = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = write!(
                out,
                "<div><dt>{}</dt><dd>{}</dd></div>",
                escape(&bundle.t(key)),
                escape(&value)
            );
        }
    };
    stat("report.category", meta.category.clone());
    stat("report.generated_at", meta.generated_at.clone());
    stat("report.review_count", meta.review_count.map(|n| n.to_string()));
    stat(
        "report.average_rating",
        meta.average_rating.map(|r| format!("{r:.1} / 5")),
    );
    out.push_str("</dl>");
    if let Some(summary) = &meta.summary {
        let _ = write!(
            out,
            r#"<h3>{}</h3><p class="summary">{}</p>"#,
            escape(&bundle.t("report.summary")),
            escape(summary)
        );
    }
}

fn per_brand(
    out: &mut String,
    report: &Report,
    bundle: &TranslationBundle,
    section: fn(&mut String, &BrandAnalysis, &TranslationBundle),
) {
    let Some(competitor) = report.competitor.as_ref() else {
        section(out, &report.own, bundle);
        return;
    };
    for (key, analysis) in [("report.own_brand", &report.own), ("report.competitor", competitor)] {
        let _ = write!(
            out,
            r#"<div class="brand-block"><h3>{}</h3>"#,
            escape(&bundle.t(key))
        );
        section(out, analysis, bundle);
        out.push_str("</div>");
    }
}

fn insights(out: &mut String, brand: &BrandAnalysis, bundle: &TranslationBundle) {
    let personas = &brand.personas;
    if personas.is_empty() {
        out.push_str(&placeholder(bundle));
        return;
    }
    if let Some(summary) = &personas.summary {
        let _ = write!(out, r#"<p class="summary">{}</p>"#, escape(summary));
    }
    if !personas.personas.is_empty() {
        let _ = write!(
            out,
            r#"<h4>{}</h4><div class="card-grid">"#,
            escape(&bundle.t("report.personas"))
        );
        for persona in &personas.personas {
            out.push_str(r#"<article class="card">"#);
            let _ = write!(out, "<h5>{}", escape(&persona.name));
            if let Some(share) = persona.share {
                let _ = write!(out, r#" <span class="badge">{}</span>"#, percent(share));
            }
            out.push_str("</h5>");
            if let Some(description) = &persona.description {
                let _ = write!(out, "<p>{}</p>", escape(description));
            }
            if !persona.traits.is_empty() {
                out.push_str(r#"<ul class="tags">"#);
                for tag in &persona.traits {
                    let _ = write!(out, "<li>{}</li>", escape(tag));
                }
                out.push_str("</ul>");
            }
            quotes(out, &persona.quotes, bundle);
            out.push_str("</article>");
        }
        out.push_str("</div>");
    }
    insight_list(out, "report.scenarios", &personas.scenarios, bundle);
    insight_list(out, "report.motivations", &personas.motivations, bundle);
}

fn feedback(out: &mut String, brand: &BrandAnalysis, bundle: &TranslationBundle) {
    let section = &brand.feedback;
    if section.is_empty() {
        out.push_str(&placeholder(bundle));
        return;
    }
    if let Some(summary) = &section.summary {
        let _ = write!(out, r#"<p class="summary">{}</p>"#, escape(summary));
    }
    if !section.ratings.is_empty() {
        let _ = write!(out, "<h4>{}</h4>", escape(&bundle.t("report.ratings")));
        for bucket in &section.ratings {
            rating_bucket(out, bucket, bundle);
        }
    }
    insight_list(out, "report.positives", &section.positives, bundle);
    insight_list(out, "report.negatives", &section.negatives, bundle);
}

fn rating_bucket(out: &mut String, bucket: &RatingBucket, bundle: &TranslationBundle) {
    let _ = write!(
        out,
        r#"<div class="rating-bucket sentiment-{}"><h5>{}"#,
        bucket.sentiment.key(),
        escape(&bucket.label)
    );
    if let Some(count) = bucket.count {
        let _ = write!(out, r#" <span class="badge">{count}</span>"#);
    }
    if let Some(share) = bucket.share {
        let _ = write!(out, r#" <span class="badge">{}</span>"#, percent(share));
    }
    let _ = write!(
        out,
        r#" <span class="badge">{}</span></h5>"#,
        escape(&bundle.t(&format!("report.sentiment.{}", bucket.sentiment.key())))
    );
    if let Some(share) = bucket.share {
        let _ = write!(
            out,
            r#"<div class="bar"><div class="bar-fill" style="width:{share:.1}%"></div></div>"#
        );
    }
    insight_items(out, &bucket.highlights, bundle);
    out.push_str("</div>");
}

fn unmet_needs(out: &mut String, brand: &BrandAnalysis, bundle: &TranslationBundle) {
    if brand.unmet_needs.is_empty() {
        out.push_str(&placeholder(bundle));
        return;
    }
    out.push_str(r#"<ol class="needs">"#);
    for need in &brand.unmet_needs {
        let _ = write!(out, "<li><strong>{}</strong>", escape(&need.need));
        if need.severity != Level::Unspecified {
            level_badge(out, "report.severity", need.severity, bundle);
        }
        if let Some(mentions) = need.mentions {
            let _ = write!(
                out,
                r#" <span class="badge">{}: {mentions}</span>"#,
                escape(&bundle.t("report.mentions"))
            );
        }
        if let Some(detail) = &need.detail {
            let _ = write!(out, "<p>{}</p>", escape(detail));
        }
        quotes(out, &need.quotes, bundle);
        out.push_str("</li>");
    }
    out.push_str("</ol>");
}

fn comparison(out: &mut String, section: &Comparison, bundle: &TranslationBundle) {
    if let Some(summary) = &section.summary {
        let _ = write!(out, r#"<p class="summary">{}</p>"#, escape(summary));
    }
    insight_list(out, "report.own_strengths", &section.own_strengths, bundle);
    insight_list(out, "report.own_weaknesses", &section.own_weaknesses, bundle);
    insight_list(out, "report.competitor_strengths", &section.competitor_strengths, bundle);
    insight_list(out, "report.competitor_weaknesses", &section.competitor_weaknesses, bundle);
    if !section.dimensions.is_empty() {
        dimensions(out, &section.dimensions, bundle);
    }
    if !section.positioning.is_empty() {
        scatter(out, &section.positioning, bundle);
    }
}

fn dimensions(out: &mut String, rows: &[DimensionScore], bundle: &TranslationBundle) {
    let _ = write!(
        out,
        r#"<h4>{}</h4><table class="dimensions"><thead><tr><th></th><th>{}</th><th>{}</th></tr></thead><tbody>"#,
        escape(&bundle.t("report.dimensions")),
        escape(&bundle.t("report.own_brand")),
        escape(&bundle.t("report.competitor")),
    );
    let cell = |score: Option<f64>| score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
    for row in rows {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.dimension),
            cell(row.own),
            cell(row.competitor)
        );
    }
    out.push_str("</tbody></table>");
}

/// Scatter plot built from absolutely positioned points inside a relative box.
fn scatter(out: &mut String, points: &[PositionPoint], bundle: &TranslationBundle) {
    let _ = write!(
        out,
        r#"<h4>{}</h4><div class="scatter" style="position:relative;height:320px">"#,
        escape(&bundle.t("report.positioning"))
    );
    for point in points {
        let _ = write!(
            out,
            r#"<div class="scatter-point{own}" style="position:absolute;left:{x:.1}%;bottom:{y:.1}%" title="{label}"><span>{label}</span></div>"#,
            own = if point.own { " own" } else { "" },
            x = point.x,
            y = point.y,
            label = escape(&point.label),
        );
    }
    out.push_str("</div>");
}

fn opportunities(out: &mut String, items: &[Opportunity], bundle: &TranslationBundle) {
    out.push_str(r#"<div class="card-grid">"#);
    for item in items {
        let _ = write!(
            out,
            r#"<article class="card opportunity priority-{}"><h5>{}</h5>"#,
            item.priority.key(),
            escape(&item.title)
        );
        for (key, value) in [
            ("report.priority", item.priority),
            ("report.impact", item.impact),
            ("report.effort", item.effort),
        ] {
            if value != Level::Unspecified {
                level_badge(out, key, value, bundle);
            }
        }
        if let Some(description) = &item.description {
            let _ = write!(out, "<p>{}</p>", escape(description));
        }
        string_list(out, "report.actions", &item.actions, bundle);
        string_list(out, "report.evidence", &item.evidence, bundle);
        out.push_str("</article>");
    }
    out.push_str("</div>");
}

fn level_badge(out: &mut String, key: &str, value: Level, bundle: &TranslationBundle) {
    let _ = write!(
        out,
        r#" <span class="badge level-{}">{}: {}</span>"#,
        value.key(),
        escape(&bundle.t(key)),
        escape(&bundle.t(&format!("report.level.{}", value.key())))
    );
}

fn insight_list(out: &mut String, key: &str, items: &[Insight], bundle: &TranslationBundle) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "<h4>{}</h4>", escape(&bundle.t(key)));
    insight_items(out, items, bundle);
}

fn insight_items(out: &mut String, items: &[Insight], bundle: &TranslationBundle) {
    if items.is_empty() {
        return;
    }
    out.push_str(r#"<ul class="insights">"#);
    for item in items {
        let _ = write!(out, "<li><strong>{}</strong>", escape(&item.label));
        if let Some(share) = item.share {
            let _ = write!(out, r#" <span class="badge">{}</span>"#, percent(share));
        }
        if let Some(mentions) = item.mentions {
            let _ = write!(
                out,
                r#" <span class="badge">{}: {mentions}</span>"#,
                escape(&bundle.t("report.mentions"))
            );
        }
        if let Some(detail) = &item.detail {
            let _ = write!(out, " <span>{}</span>", escape(detail));
        }
        quotes(out, &item.quotes, bundle);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn string_list(out: &mut String, key: &str, items: &[String], bundle: &TranslationBundle) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "<h6>{}</h6><ul>", escape(&bundle.t(key)));
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ul>");
}

fn quotes(out: &mut String, items: &[String], bundle: &TranslationBundle) {
    if items.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<details class="quotes"><summary>{}</summary>"#,
        escape(&bundle.t("report.quotes"))
    );
    for quote in items {
        let _ = write!(out, "<blockquote>{}</blockquote>", escape(quote));
    }
    out.push_str("</details>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use reviewscope_api_models::Language;
    use serde_json::json;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn empty_pages_render_placeholders() {
        let bundle = TranslationBundle::new(Language::En);
        let report = Report::default();
        for page in Page::all() {
            let html = render_page(page, &report, &bundle);
            assert!(html.contains("empty-state"), "{page:?} lacks placeholder");
        }
    }

    #[test]
    fn competitor_pages_render_both_brands() {
        let bundle = TranslationBundle::new(Language::Zh);
        let report = normalize(&json!({
            "本品分析": {"未满足的需求": ["更长续航"]},
            "竞品分析": {"未满足的需求": ["<降噪>"]}
        }));
        let html = render_page(Page::UnmetNeeds, &report, &bundle);
        assert!(html.contains("本品"));
        assert!(html.contains("竞品"));
        assert!(html.contains("&lt;降噪&gt;"));
    }

    #[test]
    fn scatter_points_are_absolutely_positioned() {
        let bundle = TranslationBundle::new(Language::En);
        let report = normalize(&json!({
            "comparison": {"positioning": [{"name": "Us", "x": 20, "y": 75, "own": true}]}
        }));
        let html = render_page(Page::Comparison, &report, &bundle);
        assert!(html.contains("left:20.0%;bottom:75.0%"));
        assert!(html.contains("scatter-point own"));
    }

    #[test]
    fn percent_drops_needless_decimals() {
        assert_eq!(percent(45.0), "45%");
        assert_eq!(percent(12.34), "12.3%");
    }
}
