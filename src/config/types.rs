use serde::Deserialize;

/// Main configuration structure, loaded from `lieu.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    pub data: DataConfig,
    pub crawler: CrawlerConfig,
}

/// Instance identity and networking
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Name of the search engine instance
    pub name: String,

    /// Tagline shown on the landing page
    #[serde(default)]
    pub tagline: String,

    /// Placeholder text for the search box
    #[serde(default)]
    pub placeholder: String,

    /// URL of the webring index page (used by precrawl and /webring)
    pub url: String,

    /// CSS-like selector used by precrawl to find member links
    #[serde(rename = "webringSelector", default = "default_webring_selector")]
    pub webring_selector: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Optional proxy URL for all outgoing requests (empty = direct)
    #[serde(default)]
    pub proxy: String,
}

/// Colors for the emitted theme stylesheet (empty = default theme)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub foreground: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub links: String,
}

/// Data file locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Extraction stream file, as produced by the crawl command
    pub source: String,

    /// Location of the SQLite index
    pub database: String,

    /// Newline-separated phrases disqualifying paragraphs from `about`
    #[serde(default)]
    pub heuristics: String,

    /// Pipe-separated stopword list
    #[serde(default)]
    pub wordlist: String,
}

/// Crawler input lists
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed list: one webring member URL per line
    pub webring: String,

    /// Domains excluded from crawling and indexing
    #[serde(rename = "bannedDomains", default)]
    pub banned_domains: String,

    /// File suffixes that are never enqueued
    #[serde(rename = "bannedSuffixes", default)]
    pub banned_suffixes: String,

    /// Substrings suppressing link-event logging
    #[serde(rename = "boringWords", default)]
    pub boring_words: String,

    /// Domains suppressing link-event logging
    #[serde(rename = "boringDomains", default)]
    pub boring_domains: String,

    /// Ordered selector queries for paragraph previews
    #[serde(rename = "previewQueryList", default)]
    pub preview_query_list: String,
}

pub(crate) fn default_webring_selector() -> String {
    "li > a[href]:first-of-type".to_string()
}
