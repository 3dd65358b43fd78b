//! Query parsing
//!
//! Searches accept a tiny operator language inside the query string:
//! `site:<host>` and `-site:<host>` restrict or exclude domains,
//! `lang:<code>` restricts by language prefix. Everything else is the text
//! query. Parsing happens before any SQL is built; user input only ever
//! reaches the store as bound parameters.

use crate::ingest::singularize;
use percent_encoding::percent_decode_str;

/// Queries longer than this render the landing page instead of searching
pub const MAX_QUERY_LENGTH: usize = 8192;

/// Queries with more whitespace-separated fields than this are not parsed
pub const MAX_QUERY_FIELDS: usize = 100;

/// Parsed query: residual terms plus operator filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub terms: Vec<String>,
    pub site_in: Vec<String>,
    pub site_not_in: Vec<String>,
    pub langs: Vec<String>,
}

impl SearchQuery {
    /// Parses a raw query string
    ///
    /// Operator fields are only interpreted when the query has at most
    /// [`MAX_QUERY_FIELDS`] fields; beyond that everything stays a term and
    /// the oversize check fails the query open to the landing page. When
    /// `with_lang` is false (paragraph search) `lang:` fields remain
    /// ordinary terms.
    pub fn parse(raw: &str, with_lang: bool) -> Self {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let mut query = SearchQuery::default();

        if fields.len() > MAX_QUERY_FIELDS {
            query.terms = fields.iter().map(|f| f.to_string()).collect();
            return query;
        }

        for field in fields {
            if let Some(host) = field.strip_prefix("site:") {
                query.site_in.push(host.to_string());
            } else if let Some(host) = field.strip_prefix("-site:") {
                query.site_not_in.push(host.to_string());
            } else if with_lang && field.starts_with("lang:") {
                query.langs.push(field["lang:".len()..].to_string());
            } else {
                query.terms.push(field.to_string());
            }
        }
        query
    }

    /// Adds the `?site=` request parameter as a positive domain filter
    ///
    /// The parameter may arrive with a protocol prefix or trailing slash;
    /// only the host is kept.
    pub fn add_site_param(&mut self, site: &str) {
        let host = site
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if !host.is_empty() {
            self.site_in.push(host.to_string());
        }
    }

    /// Residual terms singularized for inverted-index lookup
    pub fn inflected_terms(&self) -> Vec<String> {
        self.terms.iter().map(|term| singularize(term)).collect()
    }

    /// The residual text query, for full-text search
    pub fn phrase(&self) -> String {
        self.terms.join(" ")
    }
}

/// Whether a raw query should fall open to the landing page
///
/// True when there are no residual terms, too many fields, or the raw query
/// is unreasonably long. A cheap denial-of-service guard, nothing more.
pub fn fails_open(raw: &str, query: &SearchQuery) -> bool {
    query.terms.is_empty() || query.terms.len() > MAX_QUERY_FIELDS || raw.len() >= MAX_QUERY_LENGTH
}

/// Displays a result URL without its scheme, percent-decoded
///
/// `https://a.example/about%20me` shows as `a.example/about me`.
pub fn pretty_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url);
    percent_decode_str(stripped)
        .decode_utf8()
        .map(|decoded| decoded.to_string())
        .unwrap_or_else(|_| stripped.to_string())
}
