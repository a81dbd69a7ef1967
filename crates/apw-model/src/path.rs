//! Separator-agnostic helpers for descriptor path strings.
//!
//! Descriptors are written by Windows tooling, so a stored path may use
//! either `\` or `/` regardless of the host running this code.

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Final component of a descriptor path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(SEPARATORS).next().unwrap_or(path)
}

/// Extension of the final component including the leading dot, or `""`.
pub fn extension_of(path: &str) -> &str {
    let name = file_name_of(path);
    match name.rfind('.') {
        Some(index) => &name[index..],
        None => "",
    }
}

/// Replaces the extension of `path` with `ext` (given without a dot).
///
/// A path without an extension gains one.
pub fn replace_extension(path: &str, ext: &str) -> String {
    let current = extension_of(path);
    let stem = &path[..path.len() - current.len()];
    format!("{stem}.{ext}")
}
