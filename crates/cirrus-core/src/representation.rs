//! Representation kinds and the typed set used to select them.
//!
//! # Design
//! - Each kind owns a fixed bit so a [`RepresentationSet`] keeps O(1) membership and union.
//! - Bits outside the known kinds are retained verbatim for forward compatibility; they are
//!   never reported by iteration and never serialized.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Server-rendered alternate forms of a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationKind {
    /// Original content reference (`download_url`).
    Original,
    /// Every representation the caller is permitted to see.
    #[serde(rename = "all")]
    AllRepresentations,
    /// High definition video stream.
    #[serde(rename = "hd_video")]
    HighDefinitionVideo,
    /// Small thumbnail image.
    Thumbnail,
    /// Large thumbnail image.
    LargeThumbnail,
    /// PDF conversion.
    Pdf,
    /// Full size JPG rendition.
    Jpg,
    /// MP3 audio waveform.
    Mp3,
    /// MP4 video conversion.
    Mp4,
    /// DICOM imaging data.
    Dicom,
    /// Extracted plain text of a document.
    ExtractedText,
}

impl RepresentationKind {
    /// Every kind, in bit order.
    pub const ALL: [Self; 11] = [
        Self::Original,
        Self::AllRepresentations,
        Self::HighDefinitionVideo,
        Self::Thumbnail,
        Self::LargeThumbnail,
        Self::Pdf,
        Self::Jpg,
        Self::Mp3,
        Self::Mp4,
        Self::Dicom,
        Self::ExtractedText,
    ];

    /// Bit owned by this kind inside a [`RepresentationSet`].
    #[must_use]
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Stable snake-case label used in configuration documents and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::AllRepresentations => "all",
            Self::HighDefinitionVideo => "hd_video",
            Self::Thumbnail => "thumbnail",
            Self::LargeThumbnail => "large_thumbnail",
            Self::Pdf => "pdf",
            Self::Jpg => "jpg",
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::Dicom => "dicom",
            Self::ExtractedText => "extracted_text",
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RepresentationKind {
    type Err = UnknownRepresentationKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownRepresentationKind {
                value: value.to_string(),
            })
    }
}

/// Error returned when a label does not name a representation kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown representation kind")]
pub struct UnknownRepresentationKind {
    /// Label supplied by the caller.
    pub value: String,
}

const KNOWN_BITS: u32 = (1 << (RepresentationKind::ALL.len() as u32)) - 1;

/// Set of representation kinds backed by a bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RepresentationSet(u32);

impl RepresentationSet {
    /// Set with no kinds selected.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from raw bits, keeping bits that name no known kind.
    #[must_use]
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit mask, unknown bits included.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Bits that do not correspond to any known kind.
    #[must_use]
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !KNOWN_BITS
    }

    /// Whether no known kind is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & KNOWN_BITS == 0
    }

    /// Number of known kinds selected.
    #[must_use]
    pub const fn len(self) -> usize {
        (self.0 & KNOWN_BITS).count_ones() as usize
    }

    /// Whether `kind` is selected.
    #[must_use]
    pub const fn contains(self, kind: RepresentationKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Add `kind` to the set.
    pub const fn insert(&mut self, kind: RepresentationKind) {
        self.0 |= kind.bit();
    }

    /// Remove `kind` from the set.
    pub const fn remove(&mut self, kind: RepresentationKind) {
        self.0 &= !kind.bit();
    }

    /// Union of both sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Intersection of both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Known kinds in bit order.
    pub fn iter(self) -> impl Iterator<Item = RepresentationKind> {
        RepresentationKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    /// Known kinds following the supplied order; kinds missing from `order` are skipped.
    pub fn iter_in(
        self,
        order: &[RepresentationKind],
    ) -> impl Iterator<Item = RepresentationKind> + '_ {
        order.iter().copied().filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Debug for RepresentationSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = formatter.debug_set();
        list.entries(self.iter());
        if self.unknown_bits() != 0 {
            list.entry(&format_args!("{:#x}", self.unknown_bits()));
        }
        list.finish()
    }
}

impl From<RepresentationKind> for RepresentationSet {
    fn from(kind: RepresentationKind) -> Self {
        Self(kind.bit())
    }
}

impl<const N: usize> From<[RepresentationKind; N]> for RepresentationSet {
    fn from(kinds: [RepresentationKind; N]) -> Self {
        kinds.into_iter().collect()
    }
}

impl FromIterator<RepresentationKind> for RepresentationSet {
    fn from_iter<I: IntoIterator<Item = RepresentationKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.extend(iter);
        set
    }
}

impl Extend<RepresentationKind> for RepresentationSet {
    fn extend<I: IntoIterator<Item = RepresentationKind>>(&mut self, iter: I) {
        for kind in iter {
            self.insert(kind);
        }
    }
}

impl BitOr for RepresentationSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOr<RepresentationKind> for RepresentationSet {
    type Output = Self;

    fn bitor(self, rhs: RepresentationKind) -> Self::Output {
        self.union(rhs.into())
    }
}

impl BitOrAssign for RepresentationSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for RepresentationSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl Serialize for RepresentationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RepresentationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kinds = Vec::<RepresentationKind>::deserialize(deserializer)?;
        Ok(kinds.into_iter().collect())
    }
}
