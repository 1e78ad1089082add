//! Prepared request inspection.

use std::sync::Arc;

use cirrus_config::ClientProfile;
use cirrus_core::{PreparedRequest, RepresentationSet};
use cirrus_request::FileRequest;
use tracing::debug;

use crate::cli::{InspectArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::{InspectView, render_inspect};

pub(crate) fn handle_inspect(
    profile: &ClientProfile,
    args: InspectArgs,
    format: OutputFormat,
) -> CliResult<String> {
    let request = build_request(profile, args);
    let prepared = request.prepare()?;
    debug!(path = %prepared.path, headers = prepared.headers.len(), "request prepared");
    let view = InspectView {
        method: PreparedRequest::METHOD,
        selection: request.selection().kinds(),
        request: prepared,
    };
    render_inspect(&view, format)
}

fn build_request(profile: &ClientProfile, args: InspectArgs) -> FileRequest {
    let mut request = FileRequest::with_trashed(args.file_id, args.trashed)
        .with_profile(Arc::new(profile.clone()));
    request
        .add_representation_options(args.representations.into_iter().collect::<RepresentationSet>())
        .set_match_supported_representation(args.match_supported)
        .set_request_all_file_fields(args.all_fields)
        .set_not_matching_etags(args.etags);
    if !args.supported.is_empty() {
        request.set_supported_representations(args.supported.into_iter().collect());
    }
    if let Some(associate_id) = args.associate_id {
        request.set_associate_id(associate_id);
    }
    if let Some(directory) = args.directory {
        request.set_request_directory_path(directory);
    }
    if let Some(url) = args.shared_link {
        request.set_shared_link(url, args.shared_link_password);
    }
    request
}
