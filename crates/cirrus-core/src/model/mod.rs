//! File DTOs and the prepared request handed to the execution framework.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status reported for a stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Item is live.
    #[default]
    Active,
    /// Item sits in the trash namespace.
    Trashed,
    /// Item was purged and only metadata remains.
    Deleted,
}

/// File metadata returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileObject {
    /// Server identifier of the file.
    pub id: String,
    /// Entity tag of the current file version.
    #[serde(default)]
    pub etag: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// File extension without the leading dot.
    #[serde(default)]
    pub extension: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Live, trashed or deleted.
    #[serde(default)]
    pub item_status: ItemStatus,
    /// Last content modification time.
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    /// Reference to the original content when it was requested.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Representation entries present in the response.
    #[serde(default)]
    pub representations: Vec<RepresentationEntry>,
}

impl FileObject {
    /// Metadata-only file object with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            etag: None,
            name: None,
            extension: None,
            size: None,
            item_status: ItemStatus::Active,
            modified_at: None,
            download_url: None,
            representations: Vec::new(),
        }
    }

    /// Whether the file currently lives in the trash namespace.
    #[must_use]
    pub fn is_trashed(&self) -> bool {
        self.item_status == ItemStatus::Trashed
    }
}

/// One representation entry of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationEntry {
    /// Representation type (`pdf`, `jpg`, ...).
    pub representation: String,
    /// Type specific properties.
    #[serde(default)]
    pub properties: RepresentationProperties,
    /// Generation state reported by the server (`success`, `pending`, ...).
    #[serde(default)]
    pub state: Option<String>,
    /// URL template for the rendered content.
    #[serde(default)]
    pub content_url: Option<String>,
}

impl RepresentationEntry {
    /// Entry of the given type without properties.
    #[must_use]
    pub fn new(representation: impl Into<String>) -> Self {
        Self {
            representation: representation.into(),
            properties: RepresentationProperties::default(),
            state: None,
            content_url: None,
        }
    }

    /// Attach a `dimensions` property.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.properties.dimensions = Some(dimensions.into());
        self
    }

    /// Hint token describing this entry, e.g. `jpg?dimensions=320x320`.
    #[must_use]
    pub fn hint(&self) -> String {
        match &self.properties.dimensions {
            Some(dimensions) => format!("{}?dimensions={dimensions}", self.representation),
            None => self.representation.clone(),
        }
    }
}

/// Properties attached to a representation entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepresentationProperties {
    /// Pixel dimensions for image renditions (`WxH`).
    #[serde(default)]
    pub dimensions: Option<String>,
}

/// Parameters for running a fetch as a resumable background transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundTransfer {
    /// Caller chosen correlation key for the transfer.
    pub associate_id: String,
    /// Directory the raw response payload is written to.
    pub directory: PathBuf,
}

/// Fully resolved wire request consumed by a [`crate::RequestExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedRequest {
    /// Target file identifier.
    pub file_id: String,
    /// Request path relative to the API host.
    pub path: String,
    /// Query parameters in emission order.
    pub query: Vec<(String, String)>,
    /// Headers in emission order; absent headers are omitted rather than empty.
    pub headers: Vec<(String, String)>,
    /// Background transfer parameters; `None` runs in the foreground.
    pub background: Option<BackgroundTransfer>,
}

impl PreparedRequest {
    /// HTTP method used by every file metadata fetch.
    pub const METHOD: &'static str = "GET";

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Look up a query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
