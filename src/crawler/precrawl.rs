//! Precrawl: scrape the webring index page for member URLs

use crate::config::{read_lines, Config};
use crate::crawler::client::build_http_client;
use crate::crawler::selector::TinySelector;
use crate::url::{host_of, scrub_link};
use crate::{LieuError, Result};
use scraper::Html;
use std::collections::HashSet;
use std::path::Path;

/// Fetches the webring index page and extracts candidate member URLs
///
/// The page is scraped with the configured selector (default
/// `li > a[href]:first-of-type`), results are scrubbed, deduplicated and
/// filtered through the banned-domains list. A non-200 response is fatal:
/// a partial seed list is worse than none.
pub async fn precrawl(config: &Config) -> Result<Vec<String>> {
    let client = build_http_client(&config.general.proxy)?;
    let index_url = &config.general.url;

    let response = client
        .get(index_url)
        .send()
        .await
        .map_err(|source| LieuError::Http {
            url: index_url.clone(),
            source,
        })?;

    let status = response.status();
    if status.as_u16() != 200 {
        return Err(LieuError::PrecrawlStatus {
            url: index_url.clone(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    Ok(extract_members(
        &body,
        &config.general.webring_selector,
        &read_lines(Path::new(&config.crawler.banned_domains)),
    ))
}

/// Pure extraction half of precrawl, for testing without a server
pub fn extract_members(html: &str, selector: &str, banned_domains: &[String]) -> Vec<String> {
    let selector = match TinySelector::parse(selector) {
        Some(selector) => selector,
        None => {
            tracing::warn!("unusable webring selector {:?}", selector);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut members = Vec::new();

    for item in selector.select(&document) {
        let link = scrub_link(&item);
        if link.is_empty() || !seen.insert(link.clone()) {
            continue;
        }
        let host = match host_of(&link) {
            Ok(host) => host,
            Err(_) => continue,
        };
        if banned_domains.iter().any(|banned| banned == &host) {
            continue;
        }
        members.push(link);
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_SELECTOR: &str = "li > a[href]:first-of-type";

    #[test]
    fn test_first_anchor_per_item() {
        let html = r#"<ul><li><a href="https://x/">x</a><a href="https://y/">y</a></li></ul>"#;
        let members = extract_members(html, DEFAULT_SELECTOR, &[]);
        assert_eq!(members, vec!["https://x"]);
    }

    #[test]
    fn test_multiple_members() {
        let html = r#"
            <ul>
              <li><a href="https://one.example/">one</a></li>
              <li><a href="https://two.example/">two</a></li>
            </ul>"#;
        let members = extract_members(html, DEFAULT_SELECTOR, &[]);
        assert_eq!(members, vec!["https://one.example", "https://two.example"]);
    }

    #[test]
    fn test_duplicates_removed() {
        let html = r#"
            <ul>
              <li><a href="https://one.example/">one</a></li>
              <li><a href="https://one.example/">again</a></li>
            </ul>"#;
        let members = extract_members(html, DEFAULT_SELECTOR, &[]);
        assert_eq!(members, vec!["https://one.example"]);
    }

    #[test]
    fn test_banned_domains_filtered() {
        let html = r#"
            <ul>
              <li><a href="https://good.example/">good</a></li>
              <li><a href="https://spam.example/">spam</a></li>
            </ul>"#;
        let banned = vec!["spam.example".to_string()];
        let members = extract_members(html, DEFAULT_SELECTOR, &banned);
        assert_eq!(members, vec!["https://good.example"]);
    }

    #[test]
    fn test_unparseable_links_skipped() {
        let html = r##"<ul><li><a href="#just-an-anchor">x</a></li></ul>"##;
        let members = extract_members(html, DEFAULT_SELECTOR, &[]);
        assert!(members.is_empty());
    }
}
