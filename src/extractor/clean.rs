/// Normalizes scraped text before it enters the extraction stream
///
/// Trims the input, collapses every run of Unicode whitespace to a single
/// space and removes embedded pipes. Pipes must go because the stopword
/// list on the ingest side is pipe-separated.
///
/// # Examples
///
/// ```
/// use lieu::extractor::clean_text;
///
/// assert_eq!(clean_text("  a\n  b\tc  "), "a b c");
/// assert_eq!(clean_text("one | two"), "one two");
/// ```
pub fn clean_text(s: &str) -> String {
    s.replace('|', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks whether a phrase is disqualified by the heuristics list
///
/// A phrase is boring when it contains any heuristic entry,
/// case-insensitively. Empty entries never match.
pub fn is_boring_phrase(heuristics: &[String], phrase: &str) -> bool {
    let lowered = phrase.to_lowercase();
    heuristics
        .iter()
        .filter(|entry| !entry.is_empty())
        .any(|entry| lowered.contains(&entry.to_lowercase()))
}
