//! Local checks on picked files and the category input.

use crate::api::FileSource;
use crate::error::{CategoryRejection, FileRejection};

/// Largest accepted file, in bytes (10 MiB).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
/// Shortest accepted category, in characters.
pub const MIN_CATEGORY_CHARS: usize = 2;
/// Longest accepted category, in characters.
pub const MAX_CATEGORY_CHARS: usize = 50;

/// Extensions accepted for review datasets.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];
/// MIME types accepted for review datasets.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = [
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Value for an `<input type="file" accept=...>` attribute.
#[must_use]
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .chain(ACCEPTED_MIME_TYPES.iter().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join(",")
}

/// Check format, then emptiness, then size.
///
/// The format passes when either the extension or the MIME type is known.
///
/// # Errors
///
/// Returns the first [`FileRejection`] that applies.
pub fn validate_file<F: FileSource + ?Sized>(file: &F) -> Result<(), FileRejection> {
    let name = file.name();
    if !has_accepted_extension(&name) && !has_accepted_mime(file.mime().as_deref()) {
        return Err(FileRejection::UnsupportedFormat { name });
    }
    let size = file.size();
    if size == 0 {
        return Err(FileRejection::Empty { name });
    }
    if size > MAX_FILE_BYTES {
        return Err(FileRejection::TooLarge {
            name,
            size,
            limit: MAX_FILE_BYTES,
        });
    }
    Ok(())
}

fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
    })
}

fn has_accepted_mime(mime: Option<&str>) -> bool {
    mime.map(|raw| raw.split(';').next().unwrap_or_default().trim())
        .is_some_and(|essence| {
            ACCEPTED_MIME_TYPES
                .iter()
                .any(|accepted| essence.eq_ignore_ascii_case(accepted))
        })
}

/// Keep at most [`MAX_CATEGORY_CHARS`] characters of raw input.
#[must_use]
pub fn clamp_category_input(raw: &str) -> String {
    raw.chars().take(MAX_CATEGORY_CHARS).collect()
}

/// Trim and bounds-check a category.
///
/// # Errors
///
/// Returns [`CategoryRejection`] when the trimmed value is out of bounds.
pub fn validate_category(raw: &str) -> Result<String, CategoryRejection> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < MIN_CATEGORY_CHARS {
        return Err(CategoryRejection::TooShort {
            len,
            min: MIN_CATEGORY_CHARS,
        });
    }
    if len > MAX_CATEGORY_CHARS {
        return Err(CategoryRejection::TooLong {
            len,
            max: MAX_CATEGORY_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFile;

    #[test]
    fn accepts_by_extension_or_mime() {
        assert_eq!(validate_file(&FakeFile::new("reviews.CSV", None, 10)), Ok(()));
        assert_eq!(validate_file(&FakeFile::new("reviews.xlsx", None, 10)), Ok(()));
        assert_eq!(
            validate_file(&FakeFile::new("export", Some("text/csv; charset=utf-8"), 10)),
            Ok(())
        );
        assert_eq!(
            validate_file(&FakeFile::new(
                "data.bin",
                Some("application/vnd.ms-excel"),
                10
            )),
            Ok(())
        );
    }

    #[test]
    fn rejects_unknown_formats_first() {
        let rejection = validate_file(&FakeFile::new("notes.pdf", Some("application/pdf"), 0));
        assert!(matches!(rejection, Err(FileRejection::UnsupportedFormat { .. })));
        assert!(matches!(
            validate_file(&FakeFile::new(".csv", None, 10)),
            Err(FileRejection::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn size_bounds_are_inclusive_at_ten_mebibytes() {
        assert!(matches!(
            validate_file(&FakeFile::new("a.csv", None, 0)),
            Err(FileRejection::Empty { .. })
        ));
        assert_eq!(validate_file(&FakeFile::new("a.csv", None, MAX_FILE_BYTES)), Ok(()));
        assert_eq!(
            validate_file(&FakeFile::new("a.csv", None, MAX_FILE_BYTES + 1)),
            Err(FileRejection::TooLarge {
                name: "a.csv".into(),
                size: MAX_FILE_BYTES + 1,
                limit: MAX_FILE_BYTES,
            })
        );
    }

    #[test]
    fn category_is_trimmed_and_bounded() {
        assert_eq!(validate_category("  Headphones "), Ok("Headphones".to_string()));
        assert_eq!(validate_category("耳机"), Ok("耳机".to_string()));
        assert!(matches!(
            validate_category(" a "),
            Err(CategoryRejection::TooShort { len: 1, .. })
        ));
        let long = "x".repeat(51);
        assert!(matches!(
            validate_category(&long),
            Err(CategoryRejection::TooLong { len: 51, .. })
        ));
        assert!(validate_category(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn clamp_counts_characters_not_bytes() {
        let input = "耳".repeat(60);
        assert_eq!(clamp_category_input(&input).chars().count(), 50);
        assert_eq!(clamp_category_input("short"), "short");
    }

    #[test]
    fn accept_attribute_lists_extensions_and_mimes() {
        let accept = accept_attribute();
        assert!(accept.starts_with(".csv,.xls,.xlsx,text/csv"));
    }
}
