//! What may be served from the site root, and how.

use std::path::{Path, PathBuf};

/// Extensions the server hands out; everything else is 403.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "avif", "svg", "ico", "css", "js", "map", "html", "htm",
    "txt", "md", "woff", "woff2", "ttf", "eot",
];

/// Fingerprint-free assets still change rarely enough for a year of caching.
const LONG_CACHE_EXTENSIONS: &[&str] = &["css", "js", "jpg", "jpeg", "png", "gif", "webp", "avif"];

pub const LONG_CACHE: &str = "public, max-age=31536000";
pub const SHORT_CACHE: &str = "public, max-age=86400";

/// Reduces one path segment to `[A-Za-z0-9_.-]`. Returns `None` when
/// nothing usable is left, which covers `.` and `..`.
pub fn secure_segment(segment: &str) -> Option<String> {
    let ascii: String = segment.chars().filter(char::is_ascii).collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Sanitises every segment of a request path. A single rejected segment
/// rejects the whole path.
pub fn sanitize_path(requested: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for segment in requested.split('/').filter(|s| !s.is_empty()) {
        path.push(secure_segment(segment)?);
    }
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_allowed(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn cache_control_for(path: &Path) -> &'static str {
    match extension(path) {
        Some(ext) if LONG_CACHE_EXTENSIONS.contains(&ext.as_str()) => LONG_CACHE,
        _ => SHORT_CACHE,
    }
}

pub fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}
