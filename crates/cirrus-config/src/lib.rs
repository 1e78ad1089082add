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

//! File-backed client profile for representation requests.
//!
//! Layout: `model.rs` (typed profile, hint table and field sets), `defaults.rs`
//! (built-in token table and preference order), `validate.rs` (profile
//! validation), `loader.rs` (JSON document and environment loading).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{BASE_PATH_ENV, PROFILE_PATH_ENV, load_from_env, load_profile, load_with_lookup};
pub use model::{ClientProfile, FieldSets, RepresentationHints};
