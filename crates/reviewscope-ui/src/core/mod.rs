//! Browser-independent state and view logic.

pub mod logic;
pub mod store;
pub mod theme;
