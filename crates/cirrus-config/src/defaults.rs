//! Built-in representation hint table, preference order and field sets.
//!
//! # Design
//! - Tokens follow the `type[?dimensions=WxH]` grammar of the representation hints header.
//! - The preference order ranks fidelity over generality; the catch-all kind comes last.

use cirrus_core::RepresentationKind;

/// Default API path prefix.
pub const DEFAULT_BASE_PATH: &str = "/2.0";

/// Default token per representation kind.
pub const DEFAULT_TOKENS: [(RepresentationKind, &str); 11] = [
    (RepresentationKind::Original, "original"),
    (RepresentationKind::AllRepresentations, "all"),
    (RepresentationKind::HighDefinitionVideo, "dash"),
    (RepresentationKind::Thumbnail, "jpg?dimensions=320x320"),
    (RepresentationKind::LargeThumbnail, "jpg?dimensions=1024x1024"),
    (RepresentationKind::Pdf, "pdf"),
    (RepresentationKind::Jpg, "jpg?dimensions=2048x2048"),
    (RepresentationKind::Mp3, "mp3"),
    (RepresentationKind::Mp4, "mp4"),
    (RepresentationKind::Dicom, "dicom_zip"),
    (RepresentationKind::ExtractedText, "extracted_text"),
];

/// Default matching preference, most specific first.
pub const DEFAULT_PREFERENCE: [RepresentationKind; 11] = [
    RepresentationKind::Original,
    RepresentationKind::HighDefinitionVideo,
    RepresentationKind::Pdf,
    RepresentationKind::Jpg,
    RepresentationKind::LargeThumbnail,
    RepresentationKind::Thumbnail,
    RepresentationKind::Mp4,
    RepresentationKind::Mp3,
    RepresentationKind::Dicom,
    RepresentationKind::ExtractedText,
    RepresentationKind::AllRepresentations,
];

/// Fields requested when representation data is selected without asking for every field.
pub const DEFAULT_FIELDS: [&str; 9] = [
    "type",
    "id",
    "etag",
    "name",
    "size",
    "extension",
    "item_status",
    "modified_at",
    "parent",
];

/// Every file attribute the API can return.
pub const ALL_FIELDS: [&str; 33] = [
    "type",
    "id",
    "sequence_id",
    "etag",
    "sha1",
    "name",
    "description",
    "size",
    "path_collection",
    "created_at",
    "modified_at",
    "trashed_at",
    "purged_at",
    "content_created_at",
    "content_modified_at",
    "created_by",
    "modified_by",
    "owned_by",
    "shared_link",
    "parent",
    "item_status",
    "version_number",
    "comment_count",
    "permissions",
    "tags",
    "lock",
    "extension",
    "is_package",
    "expiring_embed_link",
    "watermark_info",
    "has_collaborations",
    "representations",
    "download_url",
];
