//! Validation for client profiles.

use std::collections::HashSet;

use cirrus_core::RepresentationKind;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ClientProfile, FieldSets, RepresentationHints};

/// Characters reserved by the representation hints header grammar.
const RESERVED_TOKEN_CHARS: [char; 3] = ['[', ']', ','];

impl ClientProfile {
    /// Check every section of the profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] describing the first violation found.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_base_path(&self.base_path)?;
        validate_hints(&self.hints)?;
        validate_fields(&self.fields)
    }
}

fn validate_base_path(base_path: &str) -> ConfigResult<()> {
    if !base_path.starts_with('/') {
        return Err(ConfigError::invalid(
            "profile",
            "base_path",
            Some(base_path.to_string()),
            "must start with '/'",
        ));
    }
    if base_path.len() > 1 && base_path.ends_with('/') {
        return Err(ConfigError::invalid(
            "profile",
            "base_path",
            Some(base_path.to_string()),
            "must not end with '/'",
        ));
    }
    Ok(())
}

fn validate_hints(hints: &RepresentationHints) -> ConfigResult<()> {
    let mut seen_tokens = HashSet::new();
    for kind in RepresentationKind::ALL {
        let Some(token) = hints.tokens.get(&kind) else {
            return Err(ConfigError::invalid(
                "hints",
                format!("tokens.{kind}"),
                None,
                "missing token",
            ));
        };
        if token.trim().is_empty() || token.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "hints",
                format!("tokens.{kind}"),
                Some(token.clone()),
                "must be a non-empty token without whitespace",
            ));
        }
        if token.contains(RESERVED_TOKEN_CHARS) {
            return Err(ConfigError::invalid(
                "hints",
                format!("tokens.{kind}"),
                Some(token.clone()),
                "must not contain '[', ']' or ','",
            ));
        }
        if !seen_tokens.insert(token.as_str()) {
            return Err(ConfigError::invalid(
                "hints",
                format!("tokens.{kind}"),
                Some(token.clone()),
                "token already assigned to another kind",
            ));
        }
    }

    let mut ranked = HashSet::new();
    for kind in &hints.preference {
        if !ranked.insert(*kind) {
            return Err(ConfigError::invalid(
                "hints",
                "preference",
                Some(kind.to_string()),
                "kind ranked more than once",
            ));
        }
    }
    if let Some(missing) = RepresentationKind::ALL
        .into_iter()
        .find(|kind| !ranked.contains(kind))
    {
        return Err(ConfigError::invalid(
            "hints",
            "preference",
            Some(missing.to_string()),
            "kind missing from preference order",
        ));
    }
    Ok(())
}

fn validate_fields(fields: &FieldSets) -> ConfigResult<()> {
    for (name, list) in [
        ("default_fields", &fields.default_fields),
        ("all_fields", &fields.all_fields),
    ] {
        if list.is_empty() {
            return Err(ConfigError::invalid("fields", name, None, "must not be empty"));
        }
        if let Some(bad) = list
            .iter()
            .find(|field| field.trim().is_empty() || field.contains(','))
        {
            return Err(ConfigError::invalid(
                "fields",
                name,
                Some(bad.clone()),
                "field names must be non-empty and comma free",
            ));
        }
    }
    Ok(())
}
