use url::Url;

/// Scrubs a scraped href into its canonical form
///
/// # Normalization Steps
///
/// 1. Cut at the first `#` (anchors)
/// 2. Cut at the first `?` (queries)
/// 3. Trim surrounding whitespace
/// 4. Strip a trailing `/`
///
/// Case is preserved: paths on the indexed sites are case-sensitive.
///
/// # Examples
///
/// ```
/// use lieu::url::scrub_link;
///
/// assert_eq!(scrub_link("https://a.example/page/#top"), "https://a.example/page");
/// assert_eq!(scrub_link("https://a.example/p?q=1"), "https://a.example/p");
/// ```
pub fn scrub_link(target: &str) -> String {
    let target = match target.split_once('#') {
        Some((before, _)) => before,
        None => target,
    };
    let target = match target.split_once('?') {
        Some((before, _)) => before,
        None => target,
    };
    target.trim().trim_end_matches('/').to_string()
}

/// Resolves a scrubbed link against the URL of the page it appeared on
///
/// Relative hrefs are joined onto the base; absolute hrefs pass through
/// parsing unchanged. Returns None for unparseable links.
pub fn resolve_link(link: &str, base: &Url) -> Option<Url> {
    base.join(link).ok()
}

/// Checks whether a link ends in one of the banned suffixes
///
/// The comparison lowercases the link, so `.JPG` matches a banned `.jpg`.
pub fn has_banned_suffix(suffixes: &[String], link: &str) -> bool {
    let lowered = link.to_lowercase();
    suffixes.iter().any(|suffix| lowered.ends_with(suffix.as_str()))
}
