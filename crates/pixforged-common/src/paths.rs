//! Filename utilities for uploaded files.
//!
//! Uploaded filenames are client-supplied strings, not filesystem paths, so
//! these helpers work on `&str` rather than [`std::path::Path`]. A name like
//! `.png` must still report the extension `png`, which `Path::extension`
//! would not.

use crate::types::TargetFormat;

/// Source extensions accepted when no allow-list is configured.
const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Get the default list of accepted source extensions.
///
/// # Examples
///
/// ```
/// use pixforged_common::paths::default_allowed_extensions;
///
/// assert!(default_allowed_extensions().contains(&"jpeg"));
/// assert!(!default_allowed_extensions().contains(&"gif"));
/// ```
#[must_use]
pub fn default_allowed_extensions() -> &'static [&'static str] {
    DEFAULT_ALLOWED_EXTENSIONS
}

/// Strip any directory prefix a client sent along with the filename.
///
/// Both `/` and `\` are treated as separators since browsers on either
/// platform may send them.
pub fn client_file_name(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name)
}

/// Text after the final `.` of the filename, if there is a dot at all.
///
/// # Examples
///
/// ```
/// use pixforged_common::paths::extension;
///
/// assert_eq!(extension("photo.JPG"), Some("JPG"));
/// assert_eq!(extension(".png"), Some("png"));
/// assert_eq!(extension("README"), None);
/// ```
pub fn extension(name: &str) -> Option<&str> {
    client_file_name(name)
        .rsplit_once('.')
        .map(|(_, ext)| ext)
}

/// Check whether a filename carries one of the allowed extensions.
///
/// Comparison is case-insensitive; allow-list entries are expected in
/// lowercase.
pub fn has_allowed_extension<S: AsRef<str>>(name: &str, allowed: &[S]) -> bool {
    extension(name)
        .map(|ext| {
            let ext = ext.to_lowercase();
            allowed.iter().any(|a| a.as_ref() == ext)
        })
        .unwrap_or(false)
}

/// Filename without its final extension.
///
/// Dots that only lead the name do not start an extension, so `.png` is
/// returned unchanged while `my.holiday.jpg` becomes `my.holiday`.
pub fn file_stem(name: &str) -> &str {
    let name = client_file_name(name);
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[..dot],
        _ => name,
    }
}

/// Name of the converted file for an uploaded filename.
///
/// # Examples
///
/// ```
/// use pixforged_common::paths::output_filename;
/// use pixforged_common::TargetFormat;
///
/// assert_eq!(output_filename("photo.JPG", TargetFormat::WebP), "photo.webp");
/// assert_eq!(output_filename("a.b.c.png", TargetFormat::WebP), "a.b.c.webp");
/// ```
pub fn output_filename(name: &str, format: TargetFormat) -> String {
    format!("{}.{}", file_stem(name), format.extension())
}
