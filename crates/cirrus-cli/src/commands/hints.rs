//! Representation hint table and header decoding.

use cirrus_config::ClientProfile;
use cirrus_request::parse_hints_header;

use crate::cli::{HintsArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::{render_hint_table, render_kinds};

pub(crate) fn handle_hints(
    profile: &ClientProfile,
    args: &HintsArgs,
    format: OutputFormat,
) -> CliResult<String> {
    match &args.parse {
        Some(header) => {
            let kinds = parse_hints_header(header, &profile.hints)?;
            render_kinds(kinds, format)
        }
        None => render_hint_table(&profile.hints, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn header_is_decoded_with_the_profile_table() -> CliResult<()> {
        let args = HintsArgs {
            parse: Some("[pdf][jpg?dimensions=320x320]".to_string()),
        };
        let text = handle_hints(&ClientProfile::default(), &args, OutputFormat::Table)?;
        assert_eq!(text, "thumbnail, pdf");
        Ok(())
    }

    #[test]
    fn malformed_header_is_a_validation_error() {
        let args = HintsArgs {
            parse: Some("pdf".to_string()),
        };
        let err = handle_hints(&ClientProfile::default(), &args, OutputFormat::Table);
        assert!(matches!(err, Err(CliError::Validation(_))));
    }

    #[test]
    fn table_is_rendered_without_a_header() -> CliResult<()> {
        let text = handle_hints(
            &ClientProfile::default(),
            &HintsArgs::default(),
            OutputFormat::Table,
        )?;
        assert!(text.starts_with("RANK"));
        Ok(())
    }
}
