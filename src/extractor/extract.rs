use crate::extractor::clean::{clean_text, is_boring_phrase};
use crate::extractor::{ExtractionRecord, RecordKind};
use scraper::{Html, Selector};
use url::Url;

/// Default selector queries probed in order for a preview paragraph
pub const DEFAULT_PREVIEW_QUERIES: &[&str] = &["main p", "article p", "section p", "p"];

/// How many matches per preview query are considered before moving on
const PREVIEW_MATCHES_PER_QUERY: usize = 4;

/// Extracts the full record sequence for one fetched page
///
/// The order of emission is deterministic for a given document: metadata
/// first, then title and headings, then the preview paragraph, then every
/// body paragraph. Link records are not produced here; the crawler derives
/// them from [`extract_hrefs`] through its allow/deny policy.
pub fn extract_page(
    html: &str,
    page_url: &Url,
    preview_queries: &[String],
    heuristics: &[String],
) -> Vec<ExtractionRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();
    let url = page_url.to_string();

    let push = |records: &mut Vec<ExtractionRecord>, kind: RecordKind, payload: String| {
        records.push(ExtractionRecord {
            kind,
            payload,
            url: url.clone(),
        });
    };

    for content in select_attr(&document, "meta[name=\"keywords\"]", "content") {
        push(&mut records, RecordKind::Keywords, clean_text(&content));
    }

    for content in select_attr(&document, "meta[name=\"description\"]", "content") {
        let desc = clean_text(&content);
        if !desc.is_empty() && desc.len() < 1500 {
            push(&mut records, RecordKind::Desc, desc);
        }
    }

    for content in select_attr(&document, "meta[property=\"og:description\"]", "content") {
        let desc = clean_text(&content);
        if !desc.is_empty() && desc.len() < 1500 {
            push(&mut records, RecordKind::OgDesc, desc);
        }
    }

    for lang in select_attr(&document, "html[lang]", "lang") {
        let lang = clean_text(&lang);
        if !lang.is_empty() && lang.len() < 100 {
            push(&mut records, RecordKind::Lang, lang);
        }
    }

    for title in select_texts(&document, "title") {
        push(&mut records, RecordKind::Title, title);
    }

    for (query, kind) in [
        ("h1", RecordKind::H1),
        ("h2", RecordKind::H2),
        ("h3", RecordKind::H3),
    ] {
        for heading in select_texts(&document, query) {
            if heading.len() < 500 {
                push(&mut records, kind, heading);
            }
        }
    }

    if let Some(preview) = pick_preview(&document, preview_queries, heuristics) {
        push(&mut records, RecordKind::Para, preview);
    }

    for paragraph in select_texts(&document, "p") {
        if !is_boring_phrase(heuristics, &paragraph) {
            push(&mut records, RecordKind::BigPara, paragraph);
        }
    }

    records
}

/// Picks the preview paragraph: the first match across the ordered query
/// list that is long enough, short enough and not boring
fn pick_preview(
    document: &Html,
    preview_queries: &[String],
    heuristics: &[String],
) -> Option<String> {
    let defaults: Vec<String> = DEFAULT_PREVIEW_QUERIES
        .iter()
        .map(|q| q.to_string())
        .collect();
    let queries: &[String] = if preview_queries.is_empty() {
        defaults.as_slice()
    } else {
        preview_queries
    };

    for query in queries {
        let selector = match Selector::parse(query) {
            Ok(selector) => selector,
            Err(_) => continue,
        };
        for element in document.select(&selector).take(PREVIEW_MATCHES_PER_QUERY) {
            let text = clean_text(&element.text().collect::<String>());
            if text.len() > 20 && text.len() < 1500 && !is_boring_phrase(heuristics, &text) {
                return Some(text);
            }
        }
    }
    None
}

/// Collects every raw href on the page, for the crawler's link policy
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }
    hrefs
}

fn select_attr(document: &Html, query: &str, attr: &str) -> Vec<String> {
    let mut values = Vec::new();
    if let Ok(selector) = Selector::parse(query) {
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                values.push(value.to_string());
            }
        }
    }
    values
}

fn select_texts(document: &Html, query: &str) -> Vec<String> {
    let mut texts = Vec::new();
    if let Ok(selector) = Selector::parse(query) {
        for element in document.select(&selector) {
            let text = clean_text(&element.text().collect::<String>());
            if !text.is_empty() {
                texts.push(text);
            }
        }
    }
    texts
}
