//! Command handlers grouped by concern.

pub(crate) mod hints;
pub(crate) mod inspect;
