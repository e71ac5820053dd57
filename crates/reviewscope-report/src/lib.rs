#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]
#![allow(clippy::module_name_repetitions)]
//! Analysis report model for ReviewScope.
//!
//! The backend returns loosely shaped JSON whose keys are either English or
//! Chinese depending on the schema generation that produced it. This crate
//! folds every known shape into one typed [`Report`], exposes the ordered page
//! registry the front ends render from, and produces standalone HTML exports.

mod lookup;

pub mod export;
pub mod i18n;
pub mod normalize;
pub mod pages;
pub mod render;
pub mod schema;

pub use export::{ExportOptions, export_file_name, export_html};
pub use pages::available_pages;
pub use i18n::TranslationBundle;
pub use normalize::{detect_generation, normalize};
pub use pages::Page;
pub use schema::{
    BrandAnalysis, Comparison, DimensionScore, FeedbackSection, Insight, Level, Opportunity,
    Persona, PersonaSection, PositionPoint, RatingBucket, Report, ReportMeta, SchemaGeneration,
    Sentiment, UnmetNeed,
};
