//! Typed client profile models.
//!
//! # Design
//! - Pure data carriers; loading lives in `loader.rs` and checks in `validate.rs`.
//! - Every section defaults to the built-in tables so partial documents stay valid.

use std::collections::BTreeMap;

use cirrus_core::{FileObject, RepresentationKind, RepresentationSet};
use serde::{Deserialize, Serialize};

use crate::defaults::{
    ALL_FIELDS, DEFAULT_BASE_PATH, DEFAULT_FIELDS, DEFAULT_PREFERENCE, DEFAULT_TOKENS,
};

/// Client-side settings shared by every file request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    /// API path prefix prepended to every endpoint (e.g. `/2.0`).
    pub base_path: String,
    /// Representation token table and matching order.
    pub hints: RepresentationHints,
    /// Field lists used for the `fields` query parameter.
    pub fields: FieldSets,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            hints: RepresentationHints::default(),
            fields: FieldSets::default(),
        }
    }
}

/// Protocol tokens for each representation kind plus the matching preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresentationHints {
    /// Wire token per kind.
    pub tokens: BTreeMap<RepresentationKind, String>,
    /// Kinds ordered from most to least preferred.
    pub preference: Vec<RepresentationKind>,
}

impl Default for RepresentationHints {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_TOKENS
                .into_iter()
                .map(|(kind, token)| (kind, token.to_string()))
                .collect(),
            preference: DEFAULT_PREFERENCE.to_vec(),
        }
    }
}

impl RepresentationHints {
    /// Wire token for `kind`; falls back to the kind label when the table has no entry.
    #[must_use]
    pub fn token(&self, kind: RepresentationKind) -> &str {
        self.tokens
            .get(&kind)
            .map_or_else(|| kind.as_str(), String::as_str)
    }

    /// Kinds ordered from most to least preferred.
    #[must_use]
    pub fn preference(&self) -> &[RepresentationKind] {
        &self.preference
    }

    /// Kind whose token equals `token`.
    #[must_use]
    pub fn kind_for_token(&self, token: &str) -> Option<RepresentationKind> {
        RepresentationKind::ALL
            .into_iter()
            .find(|kind| self.token(*kind) == token)
    }

    /// Kinds available on `file`, derived from the representation entries it carries.
    ///
    /// `Original` counts as available when a download reference is present and the
    /// catch-all kind whenever the file carries any representation at all.
    #[must_use]
    pub fn supported_by(&self, file: &FileObject) -> RepresentationSet {
        let mut supported: RepresentationSet = file
            .representations
            .iter()
            .filter_map(|entry| self.kind_for_token(&entry.hint()))
            .collect();
        if file.download_url.is_some() {
            supported.insert(RepresentationKind::Original);
        }
        if !file.representations.is_empty() {
            supported.insert(RepresentationKind::AllRepresentations);
        }
        supported
    }
}

/// Field lists for the `fields` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSets {
    /// Fields requested alongside representation data.
    pub default_fields: Vec<String>,
    /// Every available file attribute.
    pub all_fields: Vec<String>,
}

impl Default for FieldSets {
    fn default() -> Self {
        Self {
            default_fields: DEFAULT_FIELDS.iter().map(ToString::to_string).collect(),
            all_fields: ALL_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}
