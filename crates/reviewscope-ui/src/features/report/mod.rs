//! Report pages, the quote modal and HTML export.

mod sections;
mod view;

pub(crate) use view::ReportView;
