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

//! Transport-agnostic file request primitives.
//!
//! Layout: `representation.rs` (representation kinds and the typed kind set),
//! `model/` (file DTOs and the prepared wire request), `service/` (execution
//! and cache collaborator traits), `error.rs` (structured fetch failures).

pub mod error;
pub mod model;
pub mod representation;
pub mod service;

pub use error::{FetchError, FetchResult};
pub use model::{
    BackgroundTransfer, FileObject, ItemStatus, PreparedRequest, RepresentationEntry,
    RepresentationProperties,
};
pub use representation::{RepresentationKind, RepresentationSet};
pub use service::{FileCache, RequestExecutor};
