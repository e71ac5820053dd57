//! Ordered registry of report pages.

use crate::schema::Report;
use serde::{Deserialize, Serialize};

/// One page of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Header facts and the executive summary.
    Overview,
    /// Consumer personas, scenarios and motivations.
    Insights,
    /// Feedback grouped by rating.
    Feedback,
    /// Needs the product does not meet.
    UnmetNeeds,
    /// Own brand against the competitor.
    Comparison,
    /// Improvement suggestions.
    Opportunities,
}

impl Page {
    /// Every page in navigation order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Overview,
            Self::Insights,
            Self::Feedback,
            Self::UnmetNeeds,
            Self::Comparison,
            Self::Opportunities,
        ]
    }

    /// URL and CLI slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Insights => "insights",
            Self::Feedback => "feedback",
            Self::UnmetNeeds => "unmet-needs",
            Self::Comparison => "comparison",
            Self::Opportunities => "opportunities",
        }
    }

    /// Parse a slug; underscores are accepted in place of dashes.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        let wanted = slug.trim().to_ascii_lowercase().replace('_', "-");
        Self::all().into_iter().find(|page| page.slug() == wanted)
    }

    /// Translation key of the navigation label.
    #[must_use]
    pub const fn nav_key(self) -> &'static str {
        match self {
            Self::Overview => "nav.overview",
            Self::Insights => "nav.insights",
            Self::Feedback => "nav.feedback",
            Self::UnmetNeeds => "nav.unmet_needs",
            Self::Comparison => "nav.comparison",
            Self::Opportunities => "nav.opportunities",
        }
    }

    /// Translation key of the page heading.
    #[must_use]
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::Overview => "pages.overview",
            Self::Insights => "pages.insights",
            Self::Feedback => "pages.feedback",
            Self::UnmetNeeds => "pages.unmet_needs",
            Self::Comparison => "pages.comparison",
            Self::Opportunities => "pages.opportunities",
        }
    }

    /// Whether the page's section of `report` has nothing to show.
    #[must_use]
    pub fn is_empty(self, report: &Report) -> bool {
        match self {
            Self::Overview => report.meta.is_empty(),
            Self::Insights => {
                report.own.personas.is_empty()
                    && report
                        .competitor
                        .as_ref()
                        .is_none_or(|c| c.personas.is_empty())
            }
            Self::Feedback => {
                report.own.feedback.is_empty()
                    && report
                        .competitor
                        .as_ref()
                        .is_none_or(|c| c.feedback.is_empty())
            }
            Self::UnmetNeeds => {
                report.own.unmet_needs.is_empty()
                    && report
                        .competitor
                        .as_ref()
                        .is_none_or(|c| c.unmet_needs.is_empty())
            }
            Self::Comparison => report.comparison.is_empty(),
            Self::Opportunities => report.opportunities.is_empty(),
        }
    }

    /// Whether the page is offered for `report` at all.
    ///
    /// Comparison only appears when competitor data exists; every other page is
    /// always offered and renders a placeholder when empty.
    #[must_use]
    pub fn is_available(self, report: &Report) -> bool {
        match self {
            Self::Comparison => report.has_competitor(),
            _ => true,
        }
    }
}

/// Pages offered for `report`, in navigation order.
#[must_use]
pub fn available_pages(report: &Report) -> Vec<Page> {
    Page::all()
        .into_iter()
        .filter(|page| page.is_available(report))
        .collect()
}
