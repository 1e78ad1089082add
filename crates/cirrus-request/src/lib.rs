#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File representation request descriptor.
//!
//! Layout: `request.rs` (the configurable descriptor), `selection.rs` (best-match
//! policy), `header.rs` (wire header grammar), `prepare.rs` (path, query and header
//! resolution), `execute.rs` (single and cache-then-refresh submissions),
//! `error.rs` (configuration and fetch failures).

pub mod error;
pub mod execute;
pub mod header;
pub mod prepare;
pub mod request;
pub mod selection;

pub use error::{HintsHeaderError, RequestError, Result};
pub use execute::{CachedSubmission, Delivery, FetchDelivery, FetchOutcome, FetchPhase, Submission};
pub use header::{
    IF_NONE_MATCH_HEADER, REP_HINTS_HEADER, SHARED_LINK_HEADER, format_hints, format_if_none_match,
    format_shared_link, parse_hints_header,
};
pub use request::{FileRequest, SharedLink};
pub use selection::Selection;
