//! Page bodies rendered as native nodes so quote buttons can open the modal.

use crate::components::scatter::Scatter;
use crate::core::logic::{QuoteDialog, bar_style};
use reviewscope_report::render::percent;
use reviewscope_report::{
    BrandAnalysis, Comparison, DimensionScore, Insight, Level, Opportunity, Page, RatingBucket,
    Report, TranslationBundle,
};
use yew::prelude::*;

/// Render the body of `page`; the caller handles empty pages.
pub(super) fn page_body(
    page: Page,
    report: &Report,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    match page {
        Page::Overview => overview(report, bundle),
        Page::Insights => per_brand(report, bundle, on_quotes, insights),
        Page::Feedback => per_brand(report, bundle, on_quotes, feedback),
        Page::UnmetNeeds => per_brand(report, bundle, on_quotes, unmet_needs),
        Page::Comparison => comparison(&report.comparison, bundle, on_quotes),
        Page::Opportunities => opportunities(&report.opportunities, bundle),
    }
}

type BrandSection = fn(&BrandAnalysis, &TranslationBundle, &Callback<QuoteDialog>) -> Html;

fn overview(report: &Report, bundle: &TranslationBundle) -> Html {
    let meta = &report.meta;
    let stats = [
        ("report.category", meta.category.clone()),
        ("report.generated_at", meta.generated_at.clone()),
        ("report.review_count", meta.review_count.map(|n| n.to_string())),
        (
            "report.average_rating",
            meta.average_rating.map(|r| format!("{r:.1} / 5")),
        ),
    ];
    html! {
        <>
            <dl class="stats">
                { for stats.into_iter().filter_map(|(key, value)| value.map(|value| html! {
                    <div><dt>{bundle.t(key)}</dt><dd>{value}</dd></div>
                })) }
            </dl>
            {meta.summary.clone().map(|summary| html! {
                <>
                    <h3>{bundle.t("report.summary")}</h3>
                    <p class="summary">{summary}</p>
                </>
            }).unwrap_or_default()}
        </>
    }
}

fn per_brand(
    report: &Report,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
    section: BrandSection,
) -> Html {
    let Some(competitor) = report.competitor.as_ref() else {
        return section(&report.own, bundle, on_quotes);
    };
    html! {
        <div class="brand-columns">
            { for [("report.own_brand", &report.own), ("report.competitor", competitor)]
                .into_iter()
                .map(|(key, analysis)| html! {
                    <div class="brand-block">
                        <h3>{bundle.t(key)}</h3>
                        {section(analysis, bundle, on_quotes)}
                    </div>
                }) }
        </div>
    }
}

fn insights(
    brand: &BrandAnalysis,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    let section = &brand.personas;
    if section.is_empty() {
        return placeholder(bundle);
    }
    html! {
        <>
            {summary(section.summary.as_deref())}
            {if section.personas.is_empty() {
                html! {}
            } else {
                html! {
                    <>
                        <h4>{bundle.t("report.personas")}</h4>
                        <div class="card-grid">
                            { for section.personas.iter().map(|persona| html! {
                                <article class="card">
                                    <h5>
                                        {persona.name.clone()}
                                        {share_badge(persona.share)}
                                    </h5>
                                    {persona.description.clone().map(|text| html! { <p>{text}</p> }).unwrap_or_default()}
                                    {if persona.traits.is_empty() {
                                        html! {}
                                    } else {
                                        html! {
                                            <ul class="tags" aria-label={bundle.t("report.traits")}>
                                                { for persona.traits.iter().map(|tag| html! { <li>{tag.clone()}</li> }) }
                                            </ul>
                                        }
                                    }}
                                    {quotes_button(&persona.name, &persona.quotes, bundle, on_quotes)}
                                </article>
                            }) }
                        </div>
                    </>
                }
            }}
            {insight_list("report.scenarios", &section.scenarios, bundle, on_quotes)}
            {insight_list("report.motivations", &section.motivations, bundle, on_quotes)}
        </>
    }
}

fn feedback(
    brand: &BrandAnalysis,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    let section = &brand.feedback;
    if section.is_empty() {
        return placeholder(bundle);
    }
    html! {
        <>
            {summary(section.summary.as_deref())}
            {if section.ratings.is_empty() {
                html! {}
            } else {
                html! {
                    <>
                        <h4>{bundle.t("report.ratings")}</h4>
                        { for section.ratings.iter().map(|bucket| rating_bucket(bucket, bundle, on_quotes)) }
                    </>
                }
            }}
            {insight_list("report.positives", &section.positives, bundle, on_quotes)}
            {insight_list("report.negatives", &section.negatives, bundle, on_quotes)}
        </>
    }
}

fn rating_bucket(
    bucket: &RatingBucket,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    let sentiment = bucket.sentiment.key();
    html! {
        <div class={classes!("rating-bucket", format!("sentiment-{sentiment}"))}>
            <h5>
                {bucket.label.clone()}
                {bucket.count.map(|count| html! { <span class="badge">{count.to_string()}</span> }).unwrap_or_default()}
                {share_badge(bucket.share)}
                <span class="badge">{bundle.t(&format!("report.sentiment.{sentiment}"))}</span>
            </h5>
            {bucket.share.map(|share| html! {
                <div class="bar"><div class="bar-fill" style={bar_style(share)}></div></div>
            }).unwrap_or_default()}
            {insight_items(&bucket.highlights, bundle, on_quotes)}
        </div>
    }
}

fn unmet_needs(
    brand: &BrandAnalysis,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    if brand.unmet_needs.is_empty() {
        return placeholder(bundle);
    }
    html! {
        <ol class="needs">
            { for brand.unmet_needs.iter().map(|need| html! {
                <li>
                    <strong>{need.need.clone()}</strong>
                    {level_badge("report.severity", need.severity, bundle)}
                    {mentions_badge(need.mentions, bundle)}
                    {need.detail.clone().map(|text| html! { <p>{text}</p> }).unwrap_or_default()}
                    {quotes_button(&need.need, &need.quotes, bundle, on_quotes)}
                </li>
            }) }
        </ol>
    }
}

fn comparison(
    section: &Comparison,
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    html! {
        <>
            {summary(section.summary.as_deref())}
            <div class="brand-columns">
                <div>
                    {insight_list("report.own_strengths", &section.own_strengths, bundle, on_quotes)}
                    {insight_list("report.own_weaknesses", &section.own_weaknesses, bundle, on_quotes)}
                </div>
                <div>
                    {insight_list("report.competitor_strengths", &section.competitor_strengths, bundle, on_quotes)}
                    {insight_list("report.competitor_weaknesses", &section.competitor_weaknesses, bundle, on_quotes)}
                </div>
            </div>
            {dimensions(&section.dimensions, bundle)}
            {if section.positioning.is_empty() {
                html! {}
            } else {
                html! {
                    <>
                        <h4>{bundle.t("report.positioning")}</h4>
                        <Scatter points={section.positioning.clone()} />
                    </>
                }
            }}
        </>
    }
}

fn dimensions(rows: &[DimensionScore], bundle: &TranslationBundle) -> Html {
    if rows.is_empty() {
        return html! {};
    }
    let cell = |score: Option<f64>| score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
    html! {
        <>
            <h4>{bundle.t("report.dimensions")}</h4>
            <table class="dimensions">
                <thead>
                    <tr>
                        <th></th>
                        <th>{bundle.t("report.own_brand")}</th>
                        <th>{bundle.t("report.competitor")}</th>
                    </tr>
                </thead>
                <tbody>
                    { for rows.iter().map(|row| html! {
                        <tr>
                            <td>{row.dimension.clone()}</td>
                            <td>{cell(row.own)}</td>
                            <td>{cell(row.competitor)}</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </>
    }
}

fn opportunities(items: &[Opportunity], bundle: &TranslationBundle) -> Html {
    html! {
        <div class="card-grid">
            { for items.iter().map(|item| html! {
                <article class={classes!("card", "opportunity", format!("priority-{}", item.priority.key()))}>
                    <h5>{item.title.clone()}</h5>
                    {level_badge("report.priority", item.priority, bundle)}
                    {level_badge("report.impact", item.impact, bundle)}
                    {level_badge("report.effort", item.effort, bundle)}
                    {item.description.clone().map(|text| html! { <p>{text}</p> }).unwrap_or_default()}
                    {string_list("report.actions", &item.actions, bundle)}
                    {string_list("report.evidence", &item.evidence, bundle)}
                </article>
            }) }
        </div>
    }
}

fn insight_list(
    key: &str,
    items: &[Insight],
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    if items.is_empty() {
        return html! {};
    }
    html! {
        <>
            <h4>{bundle.t(key)}</h4>
            {insight_items(items, bundle, on_quotes)}
        </>
    }
}

fn insight_items(
    items: &[Insight],
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    if items.is_empty() {
        return html! {};
    }
    html! {
        <ul class="insights">
            { for items.iter().map(|item| html! {
                <li>
                    <strong>{item.label.clone()}</strong>
                    {share_badge(item.share)}
                    {mentions_badge(item.mentions, bundle)}
                    {item.detail.clone().map(|text| html! { <span>{" "}{text}</span> }).unwrap_or_default()}
                    {quotes_button(&item.label, &item.quotes, bundle, on_quotes)}
                </li>
            }) }
        </ul>
    }
}

fn string_list(key: &str, items: &[String], bundle: &TranslationBundle) -> Html {
    if items.is_empty() {
        return html! {};
    }
    html! {
        <>
            <h6>{bundle.t(key)}</h6>
            <ul>{ for items.iter().map(|item| html! { <li>{item.clone()}</li> }) }</ul>
        </>
    }
}

fn summary(text: Option<&str>) -> Html {
    text.map(|text| html! { <p class="summary">{text.to_string()}</p> })
        .unwrap_or_default()
}

fn share_badge(share: Option<f64>) -> Html {
    share
        .map(|share| html! { <span class="badge">{percent(share)}</span> })
        .unwrap_or_default()
}

fn mentions_badge(mentions: Option<u64>, bundle: &TranslationBundle) -> Html {
    mentions
        .map(|count| html! {
            <span class="badge">{format!("{}: {count}", bundle.t("report.mentions"))}</span>
        })
        .unwrap_or_default()
}

fn level_badge(key: &str, level: Level, bundle: &TranslationBundle) -> Html {
    if level == Level::Unspecified {
        return html! {};
    }
    html! {
        <span class={classes!("badge", format!("level-{}", level.key()))}>
            {format!("{}: {}", bundle.t(key), bundle.t(&format!("report.level.{}", level.key())))}
        </span>
    }
}

fn quotes_button(
    title: &str,
    quotes: &[String],
    bundle: &TranslationBundle,
    on_quotes: &Callback<QuoteDialog>,
) -> Html {
    let Some(dialog) = QuoteDialog::new(title, quotes) else {
        return html! {};
    };
    let count = dialog.quotes.len();
    let on_quotes = on_quotes.clone();
    html! {
        <button class="link quotes-button" onclick={Callback::from(move |_| on_quotes.emit(dialog.clone()))}>
            {format!("{} ({count})", bundle.t("report.view_quotes"))}
        </button>
    }
}

fn placeholder(bundle: &TranslationBundle) -> Html {
    html! {
        <div class="empty-state">
            <p class="empty-title">{bundle.t("empty.section")}</p>
            <p class="empty-hint">{bundle.t("empty.section_hint")}</p>
        </div>
    }
}
