//! Typed view of a finished analysis.
//!
//! Every collection defaults to empty and every scalar that the backend may
//! omit is an `Option`, so a partially populated result still renders.

use reviewscope_api_models::Language;
use serde::Serialize;

/// Which key vocabulary the raw result used.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaGeneration {
    /// Chinese section keys (`本品分析`, `竞品对比分析`, ...).
    Localized,
    /// English camelCase or snake_case keys.
    Legacy,
    /// Both vocabularies appear at the top level.
    Mixed,
    /// Nothing recognisable was present.
    #[default]
    Empty,
}

/// Fully normalized analysis report.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Report {
    /// Header facts about the run.
    pub meta: ReportMeta,
    /// Analysis of the user's own brand.
    pub own: BrandAnalysis,
    /// Analysis of the competitor dataset, when one was uploaded.
    pub competitor: Option<BrandAnalysis>,
    /// Head-to-head comparison.
    pub comparison: Comparison,
    /// Ranked improvement suggestions.
    pub opportunities: Vec<Opportunity>,
}

impl Report {
    /// Whether a competitor section or comparison data is present.
    #[must_use]
    pub fn has_competitor(&self) -> bool {
        self.competitor.as_ref().is_some_and(|c| !c.is_empty()) || !self.comparison.is_empty()
    }

    /// True when no section carries any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meta.is_empty()
            && self.own.is_empty()
            && !self.has_competitor()
            && self.opportunities.is_empty()
    }
}

/// Header facts about the run.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ReportMeta {
    /// Report or analysis identifier.
    pub id: Option<String>,
    /// Target product category.
    pub category: Option<String>,
    /// Backend timestamp, kept verbatim.
    pub generated_at: Option<String>,
    /// Language the backend wrote the prose in.
    pub language: Option<Language>,
    /// Key vocabulary detected while normalizing.
    pub generation: SchemaGeneration,
    /// Number of reviews analysed.
    pub review_count: Option<u64>,
    /// Mean star rating (1 to 5).
    pub average_rating: Option<f64>,
    /// Executive summary.
    pub summary: Option<String>,
}

impl ReportMeta {
    /// True when none of the displayable header facts are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.generated_at.is_none()
            && self.review_count.is_none()
            && self.average_rating.is_none()
            && self.summary.is_none()
    }
}

/// Per-brand analysis block.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct BrandAnalysis {
    /// Brand or product name, when reported.
    pub brand: Option<String>,
    /// Consumer personas and context.
    pub personas: PersonaSection,
    /// Feedback grouped by star rating.
    pub feedback: FeedbackSection,
    /// Needs the product does not meet.
    pub unmet_needs: Vec<UnmetNeed>,
}

impl BrandAnalysis {
    /// True when every sub-section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty() && self.feedback.is_empty() && self.unmet_needs.is_empty()
    }
}

/// Consumer persona analysis.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct PersonaSection {
    /// Overall persona summary.
    pub summary: Option<String>,
    /// Distinct personas.
    pub personas: Vec<Persona>,
    /// Usage scenarios.
    pub scenarios: Vec<Insight>,
    /// Purchase motivations.
    pub motivations: Vec<Insight>,
}

impl PersonaSection {
    /// True when nothing would render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.personas.is_empty()
            && self.scenarios.is_empty()
            && self.motivations.is_empty()
    }
}

/// One consumer persona.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Persona {
    /// Persona name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Share of reviewers, 0 to 100.
    pub share: Option<f64>,
    /// Short trait tags.
    pub traits: Vec<String>,
    /// Representative review quotes.
    pub quotes: Vec<String>,
}

/// Generic labelled finding used by several sections.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Insight {
    /// Finding label.
    pub label: String,
    /// Explanation.
    pub detail: Option<String>,
    /// Share of reviewers, 0 to 100.
    pub share: Option<f64>,
    /// Mention count.
    pub mentions: Option<u64>,
    /// Representative review quotes.
    pub quotes: Vec<String>,
}

/// Feedback grouped by rating.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct FeedbackSection {
    /// Overall feedback summary.
    pub summary: Option<String>,
    /// Buckets ordered from highest to lowest rating.
    pub ratings: Vec<RatingBucket>,
    /// Liked aspects.
    pub positives: Vec<Insight>,
    /// Disliked aspects.
    pub negatives: Vec<Insight>,
}

impl FeedbackSection {
    /// True when nothing would render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.ratings.is_empty()
            && self.positives.is_empty()
            && self.negatives.is_empty()
    }
}

/// Reviews sharing a star rating (or rating band).
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct RatingBucket {
    /// Star rating, 1 to 5, when derivable from the label.
    pub stars: Option<u8>,
    /// Bucket label as reported.
    pub label: String,
    /// Reviews in the bucket.
    pub count: Option<u64>,
    /// Share of all reviews, 0 to 100.
    pub share: Option<f64>,
    /// Tone of the bucket.
    pub sentiment: Sentiment,
    /// Recurring themes in the bucket.
    pub highlights: Vec<Insight>,
}

/// Tone of a rating bucket.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Four stars and up.
    Positive,
    /// Three stars or unknown.
    #[default]
    Neutral,
    /// Two stars and below.
    Negative,
}

impl Sentiment {
    /// Sentiment implied by a star rating.
    #[must_use]
    pub const fn from_stars(stars: u8) -> Self {
        match stars {
            4.. => Self::Positive,
            3 => Self::Neutral,
            _ => Self::Negative,
        }
    }

    /// Translation key suffix.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Qualitative level used for severity, priority, impact and effort.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Not reported.
    #[default]
    Unspecified,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl Level {
    /// Translation key suffix.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A need customers voiced that the product does not meet.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct UnmetNeed {
    /// The need.
    pub need: String,
    /// Explanation.
    pub detail: Option<String>,
    /// How strongly it was voiced.
    pub severity: Level,
    /// Mention count.
    pub mentions: Option<u64>,
    /// Representative review quotes.
    pub quotes: Vec<String>,
}

/// Head-to-head comparison between own brand and competitor.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Comparison {
    /// Overall comparison summary.
    pub summary: Option<String>,
    /// Where the own brand wins.
    pub own_strengths: Vec<Insight>,
    /// Where the own brand loses.
    pub own_weaknesses: Vec<Insight>,
    /// Where the competitor wins.
    pub competitor_strengths: Vec<Insight>,
    /// Where the competitor loses.
    pub competitor_weaknesses: Vec<Insight>,
    /// Scored dimensions, both sides on a 0 to 10 scale.
    pub dimensions: Vec<DimensionScore>,
    /// Scatter plot points, both axes on a 0 to 100 scale.
    pub positioning: Vec<PositionPoint>,
}

impl Comparison {
    /// True when nothing would render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.own_strengths.is_empty()
            && self.own_weaknesses.is_empty()
            && self.competitor_strengths.is_empty()
            && self.competitor_weaknesses.is_empty()
            && self.dimensions.is_empty()
            && self.positioning.is_empty()
    }
}

/// Score of both brands on one dimension.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DimensionScore {
    /// Dimension name.
    pub dimension: String,
    /// Own-brand score.
    pub own: Option<f64>,
    /// Competitor score.
    pub competitor: Option<f64>,
}

/// One point on the positioning scatter plot.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct PositionPoint {
    /// Point label.
    pub label: String,
    /// Horizontal position, 0 to 100.
    pub x: f64,
    /// Vertical position, 0 to 100.
    pub y: f64,
    /// Whether the point is the own brand.
    pub own: bool,
}

/// Improvement suggestion.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Opportunity {
    /// Short title.
    pub title: String,
    /// Explanation.
    pub description: Option<String>,
    /// Suggested priority.
    pub priority: Level,
    /// Expected impact.
    pub impact: Level,
    /// Expected implementation effort.
    pub effort: Level,
    /// Supporting evidence from reviews.
    pub evidence: Vec<String>,
    /// Concrete next steps.
    pub actions: Vec<String>,
}
