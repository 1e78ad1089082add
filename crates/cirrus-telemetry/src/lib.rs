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

//! Telemetry primitives shared across the Cirrus workspace.
//!
//! Layout: `init.rs` (subscriber installation and log format selection),
//! `context.rs` (task-local fetch context),
//! `error.rs` (telemetry failures).

pub mod context;
pub mod error;
pub mod init;

pub use context::{
    FetchContext, current_associate_id, current_fetch_context, with_fetch_context,
};
pub use error::{Result, TelemetryError};
pub use init::{LogFormat, LoggingConfig, build_sha, init_logging};
