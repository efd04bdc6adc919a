//! Path composition helpers.
//!
//! Paths arrive as caller-supplied text and are composed by string
//! concatenation, so the rules here work on `&str` rather than `Path`.
//! The inserted separator is always `/`; both `/` and `\` are recognized
//! as separators on Windows.

use std::path::{is_separator, PathBuf};

/// Separator inserted when composing paths.
pub const SEPARATOR: char = '/';

fn ends_with_separator(s: &str) -> bool {
    s.chars().next_back().is_some_and(is_separator)
}

fn starts_with_separator(s: &str) -> bool {
    s.chars().next().is_some_and(is_separator)
}

/// Append `name` to `base`, adding a separator only if `base` lacks a trailing one.
pub fn join_with_trailing_separator(base: &str, name: &str) -> PathBuf {
    let mut joined = String::with_capacity(base.len() + name.len() + 1);
    joined.push_str(base);
    if !ends_with_separator(base) {
        joined.push(SEPARATOR);
    }
    joined.push_str(name);
    PathBuf::from(joined)
}

/// Compose a target directory from a base path and a directory name.
///
/// A separator is inserted only when neither side already provides one at
/// the seam, so `("/out/", "b")`, `("/out", "/b")` and `("/out", "b")` all
/// land on `/out/b`.
pub fn compose_target_dir(base: &str, dir_name: &str) -> PathBuf {
    let mut joined = String::with_capacity(base.len() + dir_name.len() + 1);
    joined.push_str(base);
    if !ends_with_separator(base) && !starts_with_separator(dir_name) {
        joined.push(SEPARATOR);
    }
    joined.push_str(dir_name);
    PathBuf::from(joined)
}

/// The last component of a path string, if it names a file.
///
/// Returns `None` for an empty string, a trailing separator, or a final
/// `.` / `..` component.
pub fn final_component(path: &str) -> Option<&str> {
    let last = path.rsplit(is_separator).next()?;
    match last {
        "" | "." | ".." => None,
        name => Some(name),
    }
}
