//! Browser transports: REST client, timers, storage and downloads.

pub(crate) mod api;
pub(crate) mod export;
pub(crate) mod storage;
pub(crate) mod timer;
