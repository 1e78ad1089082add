//! Wire header grammar for file requests.
//!
//! # Design
//! - `X-Rep-Hints` is a concatenation of bracket groups. Each group lists one
//!   hint token, or several comma separated tokens of which the server keeps
//!   the first it supports.
//! - Output is a pure function of the selection and the token table.

use cirrus_config::RepresentationHints;
use cirrus_core::RepresentationSet;

use crate::error::HintsHeaderError;
use crate::request::SharedLink;
use crate::selection::Selection;

/// Representation hints header name.
pub const REP_HINTS_HEADER: &str = "X-Rep-Hints";
/// Conditional fetch header name.
pub const IF_NONE_MATCH_HEADER: &str = "If-None-Match";
/// Shared link access header name.
pub const SHARED_LINK_HEADER: &str = "BoxApi";

/// Render the representation hints header value; empty when nothing is selected.
#[must_use]
pub fn format_hints(selection: &Selection, hints: &RepresentationHints) -> String {
    match selection {
        Selection::Empty => String::new(),
        Selection::Best(kind) => format!("[{}]", hints.token(*kind)),
        Selection::Each(kinds) => {
            let mut value = String::new();
            for kind in kinds {
                value.push('[');
                value.push_str(hints.token(*kind));
                value.push(']');
            }
            value
        }
        Selection::FirstSupported(kinds) => {
            let tokens: Vec<&str> = kinds.iter().map(|kind| hints.token(*kind)).collect();
            format!("[{}]", tokens.join(","))
        }
    }
}

/// Recover the kinds named by a representation hints header value.
///
/// Whitespace between groups and around tokens is ignored.
///
/// # Errors
///
/// Returns [`HintsHeaderError::Malformed`] for text outside a group, nested or
/// unterminated groups and empty entries, and [`HintsHeaderError::UnknownToken`]
/// for tokens missing from the table.
pub fn parse_hints_header(
    value: &str,
    hints: &RepresentationHints,
) -> Result<RepresentationSet, HintsHeaderError> {
    let mut kinds = RepresentationSet::empty();
    let mut group_start = None;
    for (position, ch) in value.char_indices() {
        match (ch, group_start) {
            ('[', None) => group_start = Some(position + 1),
            (']', Some(start)) => {
                parse_group(&value[start..position], start, hints, &mut kinds)?;
                group_start = None;
            }
            ('[', Some(_)) | (']', None) => {
                return Err(HintsHeaderError::Malformed { position });
            }
            (other, None) if !other.is_whitespace() => {
                return Err(HintsHeaderError::Malformed { position });
            }
            _ => {}
        }
    }
    if group_start.is_some() {
        return Err(HintsHeaderError::Malformed {
            position: value.len(),
        });
    }
    Ok(kinds)
}

fn parse_group(
    group: &str,
    offset: usize,
    hints: &RepresentationHints,
    kinds: &mut RepresentationSet,
) -> Result<(), HintsHeaderError> {
    for token in group.split(',').map(str::trim) {
        if token.is_empty() {
            return Err(HintsHeaderError::Malformed { position: offset });
        }
        let kind = hints
            .kind_for_token(token)
            .ok_or_else(|| HintsHeaderError::UnknownToken {
                token: token.to_string(),
            })?;
        kinds.insert(kind);
    }
    Ok(())
}

/// Render the `If-None-Match` value for the excluded etags, in order.
///
/// Bare etags are quoted; quoted, weak (`W/`) and wildcard values pass through.
/// Returns `None` when no non-blank etag remains.
#[must_use]
pub fn format_if_none_match(etags: &[String]) -> Option<String> {
    let values: Vec<String> = etags
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|etag| !etag.is_empty())
        .map(quote_etag)
        .collect();
    (!values.is_empty()).then(|| values.join(", "))
}

fn quote_etag(etag: &str) -> String {
    if etag == "*" || etag.starts_with('"') || etag.starts_with("W/") {
        etag.to_string()
    } else {
        format!("\"{etag}\"")
    }
}

/// Render the shared link access header value.
#[must_use]
pub fn format_shared_link(link: &SharedLink) -> String {
    match &link.password {
        Some(password) => format!(
            "shared_link={}&shared_link_password={password}",
            link.url
        ),
        None => format!("shared_link={}", link.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_core::RepresentationKind::{Jpg, Original, Pdf, Thumbnail};

    #[test]
    fn empty_selection_renders_empty_value() {
        let hints = RepresentationHints::default();
        assert_eq!(format_hints(&Selection::Empty, &hints), "");
        assert_eq!(parse_hints_header("", &hints), Ok(RepresentationSet::empty()));
    }

    #[test]
    fn each_kind_gets_its_own_group() {
        let hints = RepresentationHints::default();
        let value = format_hints(&Selection::Each(vec![Original, Pdf, Jpg]), &hints);
        assert_eq!(value, "[original][pdf][jpg?dimensions=2048x2048]");
        assert_eq!(
            parse_hints_header(&value, &hints),
            Ok(RepresentationSet::from([Original, Pdf, Jpg]))
        );
    }

    #[test]
    fn alternatives_share_one_group() {
        let hints = RepresentationHints::default();
        let value = format_hints(&Selection::FirstSupported(vec![Pdf, Thumbnail]), &hints);
        assert_eq!(value, "[pdf,jpg?dimensions=320x320]");
        assert_eq!(
            parse_hints_header(&value, &hints),
            Ok(RepresentationSet::from([Pdf, Thumbnail]))
        );
        assert_eq!(format_hints(&Selection::Best(Jpg), &hints), "[jpg?dimensions=2048x2048]");
    }

    #[test]
    fn parser_tolerates_whitespace() {
        let hints = RepresentationHints::default();
        assert_eq!(
            parse_hints_header(" [pdf] [ mp4 , mp3 ] ", &hints),
            Ok(RepresentationSet::from([
                Pdf,
                cirrus_core::RepresentationKind::Mp4,
                cirrus_core::RepresentationKind::Mp3,
            ]))
        );
    }

    #[test]
    fn parser_rejects_malformed_values() {
        let hints = RepresentationHints::default();
        assert_eq!(
            parse_hints_header("pdf", &hints),
            Err(HintsHeaderError::Malformed { position: 0 })
        );
        assert_eq!(
            parse_hints_header("[pdf", &hints),
            Err(HintsHeaderError::Malformed { position: 4 })
        );
        assert_eq!(
            parse_hints_header("[pdf]]", &hints),
            Err(HintsHeaderError::Malformed { position: 5 })
        );
        assert_eq!(
            parse_hints_header("[[pdf]]", &hints),
            Err(HintsHeaderError::Malformed { position: 1 })
        );
        assert_eq!(
            parse_hints_header("[pdf,]", &hints),
            Err(HintsHeaderError::Malformed { position: 1 })
        );
        assert_eq!(
            parse_hints_header("[webp]", &hints),
            Err(HintsHeaderError::UnknownToken {
                token: "webp".to_string()
            })
        );
    }

    #[test]
    fn etags_are_joined_in_order_with_quoting() {
        let etags = vec![
            "1".to_string(),
            "\"2\"".to_string(),
            "W/\"3\"".to_string(),
            "  ".to_string(),
            "*".to_string(),
        ];
        assert_eq!(
            format_if_none_match(&etags).as_deref(),
            Some("\"1\", \"2\", W/\"3\", *")
        );
        assert_eq!(format_if_none_match(&[]), None);
        assert_eq!(format_if_none_match(&[" ".to_string()]), None);
    }

    #[test]
    fn shared_link_includes_password_when_present() {
        let mut link = SharedLink {
            url: "https://app.example.com/s/abc".to_string(),
            password: None,
        };
        assert_eq!(
            format_shared_link(&link),
            "shared_link=https://app.example.com/s/abc"
        );
        link.password = Some("hunter2".to_string());
        assert_eq!(
            format_shared_link(&link),
            "shared_link=https://app.example.com/s/abc&shared_link_password=hunter2"
        );
    }
}
