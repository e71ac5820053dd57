//! Routing definitions for the ReviewScope UI.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Upload,
    #[at("/progress")]
    Progress,
    /// `page` is a [`reviewscope_report::Page`] slug.
    #[at("/report/:page")]
    Report { page: String },
    #[at("/history")]
    History,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    pub(crate) fn report(page: reviewscope_report::Page) -> Self {
        Self::Report {
            page: page.slug().to_string(),
        }
    }
}
