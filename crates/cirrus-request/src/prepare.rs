//! Resolution of a configured request into the wire request handed to the executor.

use cirrus_config::ClientProfile;
use cirrus_core::{BackgroundTransfer, PreparedRequest, RepresentationKind};

use crate::error::{RequestError, Result};
use crate::header::{
    IF_NONE_MATCH_HEADER, REP_HINTS_HEADER, SHARED_LINK_HEADER, format_hints, format_if_none_match,
    format_shared_link,
};
use crate::request::FileRequest;
use crate::selection::Selection;

/// Query parameter naming the returned file attributes.
const FIELDS_PARAM: &str = "fields";
/// Field carrying representation entries.
const REPRESENTATIONS_FIELD: &str = "representations";
/// Field carrying the original content reference.
const DOWNLOAD_URL_FIELD: &str = "download_url";

impl FileRequest {
    /// Validate the configuration and resolve the wire request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::EmptyFileId`] for a blank identifier,
    /// [`RequestError::IncompleteBackgroundTransfer`] when only one of the
    /// associate identifier and the payload directory is set, and
    /// [`RequestError::InvalidProfile`] when the attached profile does not validate.
    pub fn prepare(&self) -> Result<PreparedRequest> {
        if self.file_id.trim().is_empty() {
            return Err(RequestError::EmptyFileId);
        }
        self.profile.validate()?;
        let background = self.background_transfer()?;
        let selection = self.selection();

        let mut headers = Vec::new();
        let hints = format_hints(&selection, &self.profile.hints);
        if !hints.is_empty() {
            headers.push((REP_HINTS_HEADER.to_string(), hints));
        }
        if let Some(etags) = format_if_none_match(&self.not_matching_etags) {
            headers.push((IF_NONE_MATCH_HEADER.to_string(), etags));
        }
        if let Some(link) = &self.shared_link {
            headers.push((SHARED_LINK_HEADER.to_string(), format_shared_link(link)));
        }

        let query = fields_for(&selection, self.request_all_file_fields, &self.profile)
            .map(|fields| vec![(FIELDS_PARAM.to_string(), fields)])
            .unwrap_or_default();

        Ok(PreparedRequest {
            file_id: self.file_id.clone(),
            path: endpoint_path(&self.profile.base_path, &self.file_id, self.is_trashed),
            query,
            headers,
            background,
        })
    }

    fn background_transfer(&self) -> Result<Option<BackgroundTransfer>> {
        let associate_id = self
            .associate_id
            .as_deref()
            .filter(|value| !value.trim().is_empty());
        let directory = self
            .request_directory_path
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty());
        match (associate_id, directory) {
            (None, None) => Ok(None),
            (Some(associate_id), Some(directory)) => Ok(Some(BackgroundTransfer {
                associate_id: associate_id.to_string(),
                directory: directory.clone(),
            })),
            (Some(_), None) => Err(RequestError::IncompleteBackgroundTransfer {
                missing: "request_directory_path",
            }),
            (None, Some(_)) => Err(RequestError::IncompleteBackgroundTransfer {
                missing: "associate_id",
            }),
        }
    }
}

fn endpoint_path(base_path: &str, file_id: &str, is_trashed: bool) -> String {
    let base = base_path.trim_end_matches('/');
    if is_trashed {
        format!("{base}/files/{file_id}/trash")
    } else {
        format!("{base}/files/{file_id}")
    }
}

fn fields_for(
    selection: &Selection,
    request_all_file_fields: bool,
    profile: &ClientProfile,
) -> Option<String> {
    if request_all_file_fields {
        return Some(profile.fields.all_fields.join(","));
    }
    let selected = selection.kinds();
    if selected.is_empty() {
        return None;
    }
    let mut extras = vec![REPRESENTATIONS_FIELD];
    if selected.contains(RepresentationKind::Original) {
        extras.push(DOWNLOAD_URL_FIELD);
    }
    let mut fields = profile.fields.default_fields.clone();
    for extra in extras {
        if !fields.iter().any(|field| field == extra) {
            fields.push(extra.to_string());
        }
    }
    Some(fields.join(","))
}
