//! Output renderers for CLI commands.

use cirrus_config::RepresentationHints;
use cirrus_core::{PreparedRequest, RepresentationKind, RepresentationSet};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::{CliResult, json_failure};

/// Prepared request plus the representation kinds it asks for.
#[derive(Debug, Serialize)]
pub(crate) struct InspectView {
    pub(crate) method: &'static str,
    pub(crate) selection: RepresentationSet,
    #[serde(flatten)]
    pub(crate) request: PreparedRequest,
}

#[derive(Serialize)]
struct HintRow<'a> {
    rank: usize,
    kind: RepresentationKind,
    token: &'a str,
}

pub(crate) fn render_inspect(view: &InspectView, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(view),
        OutputFormat::Table => {
            let request = &view.request;
            let mut lines = vec![format!("{} {}", view.method, request.path)];
            lines.push(format!("selection: {}", kind_list(view.selection)));
            if request.query.is_empty() {
                lines.push("query: <none>".to_string());
            } else {
                lines.push("query:".to_string());
                lines.extend(
                    request
                        .query
                        .iter()
                        .map(|(name, value)| format!("  {name}={value}")),
                );
            }
            if request.headers.is_empty() {
                lines.push("headers: <none>".to_string());
            } else {
                lines.push("headers:".to_string());
                lines.extend(
                    request
                        .headers
                        .iter()
                        .map(|(name, value)| format!("  {name}: {value}")),
                );
            }
            lines.push(match &request.background {
                Some(transfer) => format!(
                    "background: {} -> {}",
                    transfer.associate_id,
                    transfer.directory.display()
                ),
                None => "background: <foreground>".to_string(),
            });
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_hint_table(
    hints: &RepresentationHints,
    format: OutputFormat,
) -> CliResult<String> {
    let rows: Vec<HintRow<'_>> = hints
        .preference()
        .iter()
        .enumerate()
        .map(|(index, kind)| HintRow {
            rank: index + 1,
            kind: *kind,
            token: hints.token(*kind),
        })
        .collect();
    match format {
        OutputFormat::Json => to_json(&rows),
        OutputFormat::Table => {
            let mut lines = vec![format!("{:>4} {:<16} TOKEN", "RANK", "KIND")];
            lines.extend(
                rows.iter()
                    .map(|row| format!("{:>4} {:<16} {}", row.rank, row.kind.as_str(), row.token)),
            );
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_kinds(kinds: RepresentationSet, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&kinds),
        OutputFormat::Table => Ok(kind_list(kinds)),
    }
}

fn kind_list(kinds: RepresentationSet) -> String {
    if kinds.is_empty() {
        return "<none>".to_string();
    }
    kinds
        .iter()
        .map(RepresentationKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| json_failure(&err))
}
