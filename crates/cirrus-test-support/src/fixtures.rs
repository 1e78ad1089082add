//! File object fixtures.

use chrono::{TimeZone, Utc};
use cirrus_core::{FileObject, RepresentationEntry};

/// Metadata-only file with a stable etag, name and modification time.
#[must_use]
pub fn sample_file(id: &str) -> FileObject {
    let mut file = FileObject::new(id);
    file.etag = Some("1".to_string());
    file.name = Some(format!("{id}.pdf"));
    file.extension = Some("pdf".to_string());
    file.size = Some(2_048);
    file.modified_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
    file
}

/// [`sample_file`] carrying one representation entry per `hint` (`type[?dimensions=WxH]`).
#[must_use]
pub fn file_with_representations(id: &str, hints: &[&str]) -> FileObject {
    let mut file = sample_file(id);
    file.representations = hints
        .iter()
        .map(|hint| match hint.split_once("?dimensions=") {
            Some((kind, dimensions)) => RepresentationEntry::new(kind).with_dimensions(dimensions),
            None => RepresentationEntry::new(*hint),
        })
        .collect();
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_file_is_active_metadata() {
        let file = sample_file("42");
        assert_eq!(file.id, "42");
        assert!(!file.is_trashed());
        assert!(file.representations.is_empty());
        assert!(file.modified_at.is_some());
    }

    #[test]
    fn representation_hints_round_trip_through_entries() {
        let file = file_with_representations("7", &["pdf", "jpg?dimensions=320x320"]);
        let hints: Vec<String> = file
            .representations
            .iter()
            .map(RepresentationEntry::hint)
            .collect();
        assert_eq!(hints, vec!["pdf", "jpg?dimensions=320x320"]);
    }
}
