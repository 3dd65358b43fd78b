//! Allow/deny policy for outbound links
//!
//! Every href scraped from a fetched page runs through one decision
//! pipeline: banned suffixes drop the link outright, boring words and
//! domains suppress link-event logging, the webring allow-list decides the
//! event kind, and pathsite prefixes restrict what gets enqueued.

use crate::config::{read_lines, Config};
use crate::extractor::RecordKind;
use crate::url::{has_banned_suffix, host_of_url, resolve_link, scrub_link};
use std::path::Path;
use url::Url;

/// A seed list entry: the scrubbed URL plus its host
#[derive(Debug, Clone)]
pub struct Seed {
    pub url: String,
    pub host: String,
    /// Set when the seed carries a non-trivial path; crawling is then
    /// restricted to URLs under that prefix (shared-host communities)
    pub pathsite: bool,
}

/// The fate of one considered href
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDecision {
    /// Scrubbed absolute URL
    pub link: String,
    /// Link event to log, if any
    pub event: Option<RecordKind>,
    /// Whether the link should be enqueued for crawling
    pub enqueue: bool,
}

/// Crawl policy shared by all workers
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    seeds: Vec<Seed>,
    banned_domains: Vec<String>,
    banned_suffixes: Vec<String>,
    boring_words: Vec<String>,
    boring_domains: Vec<String>,
    /// Host of the webring index page; never a party to webring-link events
    index_host: String,
}

impl CrawlPolicy {
    pub fn new(
        seeds: Vec<Seed>,
        banned_domains: Vec<String>,
        banned_suffixes: Vec<String>,
        boring_words: Vec<String>,
        boring_domains: Vec<String>,
        index_host: String,
    ) -> Self {
        Self {
            seeds,
            banned_domains,
            banned_suffixes,
            boring_words,
            boring_domains,
            index_host,
        }
    }

    /// Loads the policy from the configured list files
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let seeds = load_seeds(Path::new(&config.crawler.webring));
        let index_host = crate::url::host_of(&config.general.url).unwrap_or_default();
        Ok(Self::new(
            seeds,
            read_lines(Path::new(&config.crawler.banned_domains)),
            read_lines(Path::new(&config.crawler.banned_suffixes)),
            read_lines(Path::new(&config.crawler.boring_words)),
            read_lines(Path::new(&config.crawler.boring_domains)),
            index_host,
        ))
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    /// Decides what happens to one href found on `page_url`
    ///
    /// Returns None when the link is dropped before classification (banned
    /// suffix or unparseable).
    pub fn consider(&self, href: &str, page_url: &Url) -> Option<LinkDecision> {
        let link = scrub_link(href);
        if has_banned_suffix(&self.banned_suffixes, &link) {
            return None;
        }

        let resolved = resolve_link(&link, page_url)?;
        let link = scrub_link(resolved.as_str());
        let outgoing = host_of_url(&resolved)?;
        let current = host_of_url(page_url)?;

        // boring words and domains are matched as substrings of the full
        // URL string, not the host; intentional, some boring things only
        // show in paths
        let boring = contains_any(&self.boring_words, &link) || contains_any(&self.boring_domains, &link);

        let in_ring = self.seeds.iter().any(|seed| seed.host == outgoing);
        let event = if boring {
            None
        } else if !in_ring {
            Some(RecordKind::NonWebringLink)
        } else if outgoing != current && outgoing != self.index_host && current != self.index_host {
            Some(RecordKind::WebringLink)
        } else {
            None
        };

        let enqueue = self.may_enqueue(&link, &outgoing, in_ring);
        Some(LinkDecision { link, event, enqueue })
    }

    fn may_enqueue(&self, link: &str, outgoing: &str, in_ring: bool) -> bool {
        if !in_ring || self.banned_domains.iter().any(|d| d == outgoing) {
            return false;
        }
        match self
            .seeds
            .iter()
            .find(|seed| seed.pathsite && seed.host == outgoing)
        {
            Some(pathsite) => link.starts_with(&pathsite.url),
            None => true,
        }
    }
}

fn contains_any(needles: &[String], haystack: &str) -> bool {
    needles
        .iter()
        .filter(|needle| !needle.is_empty())
        .any(|needle| haystack.contains(needle.as_str()))
}

/// Loads the webring seed list: one URL per line, https assumed when the
/// scheme is missing, unparseable lines skipped
pub fn load_seeds(path: &Path) -> Vec<Seed> {
    let mut seeds = Vec::new();
    for line in read_lines(path) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let candidate = if line.contains("://") {
            line.to_string()
        } else {
            format!("https://{}", line)
        };
        let url = match Url::parse(&candidate) {
            Ok(url) => url,
            Err(_) => continue,
        };
        let host = match host_of_url(&url) {
            Some(host) => host,
            None => continue,
        };
        let pathsite = !url.path().is_empty() && url.path() != "/";
        seeds.push(Seed {
            url: scrub_link(url.as_str()),
            host,
            pathsite,
        });
    }
    seeds
}
