//! Word and domain list files
//!
//! Several inputs are plain text lists: banned domains, banned suffixes,
//! boring words, stopwords, about-heuristics, preview queries. A missing or
//! empty file is treated as an empty list, never as an error.

use std::path::Path;

/// Reads a separator-delimited list file
///
/// Returns an empty vector when the file is missing or unreadable. A
/// trailing separator does not produce a trailing empty entry.
pub fn read_list(path: &Path, sep: &str) -> Vec<String> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) if !data.is_empty() => data,
        _ => return Vec::new(),
    };

    data.trim_end_matches(sep)
        .split(sep)
        .map(|entry| entry.to_string())
        .collect()
}

/// Reads a newline-separated list file
pub fn read_lines(path: &Path) -> Vec<String> {
    read_list(path, "\n")
}
