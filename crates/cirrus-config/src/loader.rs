//! Profile loading from JSON documents and environment overrides.
//!
//! # Design
//! - Documents may be partial; absent sections fall back to the built-in tables.
//! - Every loaded profile is validated before it is handed out.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::{ConfigError, ConfigResult};
use crate::model::ClientProfile;

/// Environment variable naming a JSON profile document.
pub const PROFILE_PATH_ENV: &str = "CIRRUS_PROFILE";
/// Environment variable overriding the API path prefix.
pub const BASE_PATH_ENV: &str = "CIRRUS_API_BASE_PATH";

/// Read and validate a profile document.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read, [`ConfigError::Json`]
/// when it is not a valid profile document, and [`ConfigError::InvalidField`] when
/// validation fails.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_profile(path: impl AsRef<Path>) -> ConfigResult<ClientProfile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            operation: "profile.read",
            path: path.to_path_buf(),
            source,
        })?;
    let profile: ClientProfile =
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    profile.validate()?;
    info!(base_path = %profile.base_path, "client profile loaded");
    Ok(profile)
}

/// Build a profile from the process environment.
///
/// # Errors
///
/// Propagates failures from [`load_with_lookup`].
pub async fn load_from_env() -> ConfigResult<ClientProfile> {
    load_with_lookup(|key| std::env::var(key).ok()).await
}

/// Build a profile using `lookup` to resolve environment keys.
///
/// Starts from the document named by [`PROFILE_PATH_ENV`] (or the defaults when
/// unset) and applies [`BASE_PATH_ENV`] on top.
///
/// # Errors
///
/// Returns the loader or validation error for the resulting profile.
pub async fn load_with_lookup<F>(lookup: F) -> ConfigResult<ClientProfile>
where
    F: Fn(&str) -> Option<String>,
{
    let mut profile = match non_empty(lookup(PROFILE_PATH_ENV)) {
        Some(path) => load_profile(PathBuf::from(path)).await?,
        None => {
            debug!("no profile document configured; using defaults");
            ClientProfile::default()
        }
    };

    if let Some(base_path) = non_empty(lookup(BASE_PATH_ENV)) {
        debug!(base_path = %base_path, "base path overridden from environment");
        profile.base_path = base_path;
    }

    profile.validate()?;
    Ok(profile)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
