//! The file request descriptor and its configuration surface.
//!
//! # Design
//! - Configured by one caller, then consumed by value on submission.
//! - Representation options accumulate across calls until explicitly cleared.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cirrus_config::ClientProfile;
use cirrus_core::RepresentationSet;

use crate::header::format_hints;
use crate::selection::Selection;

/// Shared link credentials used to access a file the caller does not own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    /// Shared link URL.
    pub url: String,
    /// Password protecting the link, when set.
    pub password: Option<String>,
}

/// Request for one file's metadata and, optionally, its representations.
#[derive(Debug, Clone)]
pub struct FileRequest {
    pub(crate) file_id: String,
    pub(crate) is_trashed: bool,
    pub(crate) representation_options: RepresentationSet,
    pub(crate) match_supported_representation: bool,
    pub(crate) request_all_file_fields: bool,
    pub(crate) not_matching_etags: Vec<String>,
    pub(crate) associate_id: Option<String>,
    pub(crate) request_directory_path: Option<PathBuf>,
    pub(crate) shared_link: Option<SharedLink>,
    pub(crate) supported_representations: Option<RepresentationSet>,
    pub(crate) profile: Arc<ClientProfile>,
}

impl FileRequest {
    /// Request for a live (not trashed) file using the default profile.
    #[must_use]
    pub fn new(file_id: impl Into<String>) -> Self {
        Self::with_trashed(file_id, false)
    }

    /// Request scoped to the trash namespace when `is_trashed` is set.
    #[must_use]
    pub fn with_trashed(file_id: impl Into<String>, is_trashed: bool) -> Self {
        Self {
            file_id: file_id.into(),
            is_trashed,
            representation_options: RepresentationSet::empty(),
            match_supported_representation: false,
            request_all_file_fields: false,
            not_matching_etags: Vec::new(),
            associate_id: None,
            request_directory_path: None,
            shared_link: None,
            supported_representations: None,
            profile: Arc::new(ClientProfile::default()),
        }
    }

    /// Replace the client profile used for tokens, preference order and fields.
    #[must_use]
    pub fn with_profile(mut self, profile: Arc<ClientProfile>) -> Self {
        self.profile = profile;
        self
    }

    /// Add representation kinds to the current selection.
    ///
    /// Calls accumulate; bits that name no known kind are kept but never sent.
    pub fn add_representation_options(
        &mut self,
        options: impl Into<RepresentationSet>,
    ) -> &mut Self {
        self.representation_options |= options.into();
        self
    }

    /// Drop every selected representation kind.
    pub fn clear_representation_options(&mut self) -> &mut Self {
        self.representation_options = RepresentationSet::empty();
        self
    }

    /// Narrow the selection to the single best kind the file supports.
    pub fn set_match_supported_representation(&mut self, enabled: bool) -> &mut Self {
        self.match_supported_representation = enabled;
        self
    }

    /// Request every file attribute rather than the default subset.
    pub fn set_request_all_file_fields(&mut self, enabled: bool) -> &mut Self {
        self.request_all_file_fields = enabled;
        self
    }

    /// Etags the caller already holds; an empty list fetches unconditionally.
    pub fn set_not_matching_etags<I, S>(&mut self, etags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_matching_etags = etags.into_iter().map(Into::into).collect();
        self
    }

    /// Correlation key for running the fetch as a background transfer.
    pub fn set_associate_id(&mut self, associate_id: impl Into<String>) -> &mut Self {
        self.associate_id = Some(associate_id.into());
        self
    }

    /// Directory the background transfer writes its payload to.
    pub fn set_request_directory_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.request_directory_path = Some(path.into());
        self
    }

    /// Access the file through a shared link.
    pub fn set_shared_link(
        &mut self,
        url: impl Into<String>,
        password: Option<String>,
    ) -> &mut Self {
        self.shared_link = Some(SharedLink {
            url: url.into(),
            password,
        });
        self
    }

    /// Kinds the file is known to support, typically taken from an earlier response.
    pub fn set_supported_representations(&mut self, supported: RepresentationSet) -> &mut Self {
        self.supported_representations = Some(supported);
        self
    }

    /// Target file identifier.
    #[must_use]
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Whether the lookup is scoped to the trash namespace.
    #[must_use]
    pub const fn is_trashed(&self) -> bool {
        self.is_trashed
    }

    /// Selected representation kinds, unknown bits included.
    #[must_use]
    pub const fn representation_options(&self) -> RepresentationSet {
        self.representation_options
    }

    /// Whether best-match selection is enabled.
    #[must_use]
    pub const fn match_supported_representation(&self) -> bool {
        self.match_supported_representation
    }

    /// Whether every file attribute is requested.
    #[must_use]
    pub const fn request_all_file_fields(&self) -> bool {
        self.request_all_file_fields
    }

    /// Excluded etags in the order supplied.
    #[must_use]
    pub fn not_matching_etags(&self) -> &[String] {
        &self.not_matching_etags
    }

    /// Background transfer correlation key.
    #[must_use]
    pub fn associate_id(&self) -> Option<&str> {
        self.associate_id.as_deref()
    }

    /// Background transfer payload directory.
    #[must_use]
    pub fn request_directory_path(&self) -> Option<&Path> {
        self.request_directory_path.as_deref()
    }

    /// Shared link credentials.
    #[must_use]
    pub const fn shared_link(&self) -> Option<&SharedLink> {
        self.shared_link.as_ref()
    }

    /// Kinds the file is known to support.
    #[must_use]
    pub const fn supported_representations(&self) -> Option<RepresentationSet> {
        self.supported_representations
    }

    /// Active client profile.
    #[must_use]
    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    /// Representations the request will ask for under the current configuration.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection::resolve(
            self.representation_options,
            self.match_supported_representation,
            self.supported_representations,
            self.profile.hints.preference(),
        )
    }

    /// Representation hints header value; empty when the header is omitted.
    #[must_use]
    pub fn format_representation_header(&self) -> String {
        format_hints(&self.selection(), &self.profile.hints)
    }
}
