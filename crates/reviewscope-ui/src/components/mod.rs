pub(crate) mod banner;
pub(crate) mod empty_state;
pub(crate) mod file_slot;
pub(crate) mod modal;
pub(crate) mod scatter;
pub(crate) mod shell;
