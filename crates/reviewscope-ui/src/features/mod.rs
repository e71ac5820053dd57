//! Page controllers.
//!
//! # Design
//! - API calls happen only in this layer, through the shared `ApiCtx`.
//! - Every state change goes through the yewdux `AppStore`.

pub(crate) mod history;
pub(crate) mod progress;
pub(crate) mod report;
pub(crate) mod upload;
