//! Best-match selection across requested and supported representation kinds.
//!
//! # Design
//! - Without matching every requested kind is retrieved independently.
//! - With matching the first requested kind in preference order that the file
//!   supports wins. The catch-all kind matches any file that supports at least
//!   one kind.
//! - When the supported kinds are unknown the ordered candidates are handed to
//!   the server, which keeps the first one it can serve.

use cirrus_core::{RepresentationKind, RepresentationSet};

/// Representations to retrieve for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No representation data; the fetch returns base metadata only.
    Empty,
    /// Every listed kind, each requested independently.
    Each(Vec<RepresentationKind>),
    /// The single best kind supported by the file.
    Best(RepresentationKind),
    /// Ordered candidates; only the first supported one is returned.
    FirstSupported(Vec<RepresentationKind>),
}

impl Selection {
    /// Apply the selection policy.
    ///
    /// `supported` is the file's supported set when the caller knows it.
    /// `preference` orders kinds from most to least preferred.
    #[must_use]
    pub fn resolve(
        requested: RepresentationSet,
        match_supported: bool,
        supported: Option<RepresentationSet>,
        preference: &[RepresentationKind],
    ) -> Self {
        let ordered: Vec<RepresentationKind> = requested.iter_in(preference).collect();
        if ordered.is_empty() {
            return Self::Empty;
        }
        if !match_supported {
            return Self::Each(ordered);
        }
        let Some(supported) = supported else {
            return Self::FirstSupported(ordered);
        };
        let supported = if supported.is_empty() {
            supported
        } else {
            supported | RepresentationKind::AllRepresentations
        };
        ordered
            .into_iter()
            .find(|kind| supported.contains(*kind))
            .map_or(Self::Empty, Self::Best)
    }

    /// Every kind named by the selection.
    #[must_use]
    pub fn kinds(&self) -> RepresentationSet {
        match self {
            Self::Empty => RepresentationSet::empty(),
            Self::Best(kind) => RepresentationSet::from(*kind),
            Self::Each(kinds) | Self::FirstSupported(kinds) => kinds.iter().copied().collect(),
        }
    }

    /// Whether no representation data is requested.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
