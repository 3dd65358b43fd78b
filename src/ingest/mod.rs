//! Ingest module
//!
//! Consumes the extraction stream produced by the crawler and populates the
//! index: page descriptors, scored term fragments, whole paragraphs and
//! outgoing links. The index file is recreated from scratch on every run.

mod inflect;
mod page;
mod tokenize;

pub use inflect::singularize;
pub use page::{AboutSource, PageDescriptor};
pub use tokenize::{extract_path_segments, filter_common_words, partition_sentence};

use crate::config::{read_lines, read_list, Config};
use crate::extractor::RecordKind;
use crate::storage::{IndexStorage, PageData, Paragraph, SearchFragment};
use crate::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Pages buffered before a batch is flushed to the store
const PAGE_BATCH_SIZE: usize = 100;

/// Term fragments per insert statement, bounding the SQL parameter count
const FRAGMENT_CHUNK_SIZE: usize = 3000;

/// Scores for term fragments by record kind
const SCORE_TITLE: i64 = 5;
const SCORE_HEADING: i64 = 15;
const SCORE_PATH_SEGMENT: i64 = 2;
const SCORE_DEFAULT: i64 = 1;

/// One parsed line of the extraction stream
#[derive(Debug, PartialEq, Eq)]
pub struct StreamLine<'a> {
    pub kind: &'a str,
    pub payload: &'a str,
    pub url: String,
}

/// Splits a stream line into kind, payload and URL
///
/// The first space separates the kind from the payload; the last space
/// separates the payload from the URL (the payload itself may contain
/// spaces). Lines without a space, or whose URL does not start with
/// `http`, yield None and are skipped by the caller.
pub fn parse_stream_line(line: &str) -> Option<StreamLine<'_>> {
    if line.is_empty() {
        return None;
    }
    let first_space = line.find(' ')?;
    let last_space = line.rfind(' ')?;

    let url = line[last_space..].trim().trim_end_matches('/').to_string();
    if !url.starts_with("http") {
        return None;
    }

    Some(StreamLine {
        kind: &line[..first_space],
        payload: line[first_space..last_space].trim(),
        url,
    })
}

/// Stream ingester: buffers per-URL descriptors and batches store writes
pub struct Ingester {
    storage: IndexStorage,
    stopwords: Vec<String>,
    heuristics: Vec<String>,

    pages: HashMap<String, PageDescriptor>,
    fragments: Vec<SearchFragment>,
    external_links: Vec<String>,
    paragraphs: Vec<Paragraph>,
    word_count: usize,
}

impl Ingester {
    pub fn new(storage: IndexStorage, stopwords: Vec<String>, heuristics: Vec<String>) -> Self {
        Self {
            storage,
            stopwords,
            heuristics,
            pages: HashMap::new(),
            fragments: Vec::new(),
            external_links: Vec::new(),
            paragraphs: Vec::new(),
            word_count: 0,
        }
    }

    /// Consumes one line of the extraction stream
    pub fn ingest_line(&mut self, line: &str) -> Result<()> {
        let parsed = match parse_stream_line(line) {
            Some(parsed) => parsed,
            None => return Ok(()),
        };
        let kind = match RecordKind::parse(parsed.kind) {
            Some(kind) => kind,
            None => return Ok(()),
        };

        // webring-link records are crawl-graph telemetry, not index input
        if kind == RecordKind::WebringLink {
            return Ok(());
        }

        let url = parsed.url;
        let raw = parsed.payload;
        let payload = raw.to_lowercase();

        let page = self
            .pages
            .entry(url.clone())
            .or_insert_with(|| PageDescriptor::new(&url));

        let mut score = SCORE_DEFAULT;
        let processed: Vec<String> = match kind {
            RecordKind::Title => {
                page.apply_title(raw);
                score = SCORE_TITLE;
                partition_sentence(&payload)
            }
            RecordKind::H1 => {
                page.apply_h1(raw);
                score = SCORE_HEADING;
                partition_sentence(&payload)
            }
            RecordKind::H2 | RecordKind::H3 => {
                score = SCORE_HEADING;
                partition_sentence(&payload)
            }
            RecordKind::Desc => {
                page.apply_desc(raw);
                partition_sentence(&payload)
            }
            RecordKind::OgDesc => {
                page.apply_og_desc(raw);
                partition_sentence(&payload)
            }
            RecordKind::Para => {
                page.apply_para(raw, &self.heuristics);
                partition_sentence(&payload)
            }
            RecordKind::Lang => {
                page.set_lang(raw);
                Vec::new()
            }
            RecordKind::Keywords => payload
                .replace(", ", ",")
                .split(',')
                .filter(|k| !k.is_empty())
                .map(|k| k.to_string())
                .collect(),
            RecordKind::NonWebringLink => {
                self.external_links.push(raw.to_string());
                Vec::new()
            }
            RecordKind::BigPara => {
                self.paragraphs.push(Paragraph {
                    text: raw.to_string(),
                    url: url.clone(),
                });
                Vec::new()
            }
            RecordKind::WebringLink => unreachable!("handled above"),
        };

        let filtered = filter_common_words(&processed, &self.stopwords);
        self.word_count += filtered.len();
        for word in filtered {
            self.fragments.push(SearchFragment {
                word,
                url: url.clone(),
                score,
            });
        }

        // path segments are emitted exactly once per url; the title record
        // is the hook because every page has one and it appears once
        if kind == RecordKind::Title {
            let segments = extract_path_segments(&url.to_lowercase());
            for word in filter_common_words(&segments, &self.stopwords) {
                self.fragments.push(SearchFragment {
                    word,
                    url: url.clone(),
                    score: SCORE_PATH_SEGMENT,
                });
            }
        }

        if self.pages.len() > PAGE_BATCH_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes the buffered batch to the store and resets the buffers
    pub fn flush(&mut self) -> Result<()> {
        let pages: Vec<PageData> = self
            .pages
            .values()
            .map(|page| PageData {
                url: page.url.clone(),
                title: page.title.clone(),
                about: page.about.clone(),
                lang: page.lang.clone(),
            })
            .collect();

        tracing::info!(
            "ingesting batch (pages: {}, words: {}, links: {})",
            pages.len(),
            self.fragments.len(),
            self.external_links.len()
        );

        self.storage.insert_domains(&pages)?;
        self.storage.insert_pages(&pages)?;
        for chunk in self.fragments.chunks(FRAGMENT_CHUNK_SIZE) {
            self.storage.insert_fragments(chunk)?;
        }
        self.storage.insert_external_links(&self.external_links)?;
        self.storage.insert_paragraphs(&self.paragraphs)?;

        self.pages.clear();
        self.fragments.clear();
        self.external_links.clear();
        self.paragraphs.clear();
        Ok(())
    }

    /// Total number of term fragments ingested so far
    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

/// Runs a complete ingest: deletes any existing index, replays the
/// extraction stream into a fresh one and returns the ingested word count
pub fn run_ingest(config: &Config) -> Result<usize> {
    let db_path = Path::new(&config.data.database);
    if db_path.exists() {
        std::fs::remove_file(db_path)?;
    }

    let storage = IndexStorage::create(db_path)?;
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    storage.record_crawl_date(&date)?;

    let stopwords = read_list(Path::new(&config.data.wordlist), "|");
    let heuristics = read_lines(Path::new(&config.data.heuristics));

    let source = File::open(&config.data.source)?;
    let reader = BufReader::new(source);

    let mut ingester = Ingester::new(storage, stopwords, heuristics);
    for line in reader.lines() {
        ingester.ingest_line(&line?)?;
    }
    ingester.flush()?;

    let count = ingester.word_count();
    println!("ingested {} words", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stream_line() {
        let parsed = parse_stream_line("title Hello World https://a.example/page").unwrap();
        assert_eq!(parsed.kind, "title");
        assert_eq!(parsed.payload, "Hello World");
        assert_eq!(parsed.url, "https://a.example/page");
    }

    #[test]
    fn test_parse_strips_trailing_slash() {
        let parsed = parse_stream_line("title Hi https://a.example/page/").unwrap();
        assert_eq!(parsed.url, "https://a.example/page");
    }

    #[test]
    fn test_parse_rejects_non_http_url() {
        assert!(parse_stream_line("title Hi gopher://a.example/").is_none());
    }

    #[test]
    fn test_parse_rejects_spaceless_line() {
        assert!(parse_stream_line("justoneword").is_none());
        assert!(parse_stream_line("").is_none());
    }

    #[test]
    fn test_parse_payloadless_line() {
        // a single space: kind and url, empty payload
        let parsed = parse_stream_line("lang https://a.example/p").unwrap();
        assert_eq!(parsed.kind, "lang");
        assert_eq!(parsed.payload, "");
    }

    fn test_ingester() -> Ingester {
        let storage = IndexStorage::new_in_memory().unwrap();
        Ingester::new(storage, vec!["the".to_string()], Vec::new())
    }

    #[test]
    fn test_title_produces_scored_fragments() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("title Esoteric Computing https://a.example/page")
            .unwrap();

        assert_eq!(ingester.fragments.len(), 3); // esoteric, computing + path segment "page"
        let title_words: Vec<_> = ingester
            .fragments
            .iter()
            .filter(|f| f.score == SCORE_TITLE)
            .collect();
        assert_eq!(title_words.len(), 2);
        assert!(title_words.iter().all(|f| f.word == "esoteric" || f.word == "computing"));
    }

    #[test]
    fn test_path_segments_once_per_url() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("title First https://a.example/blog/post")
            .unwrap();
        ingester
            .ingest_line("h2 Another Heading https://a.example/blog/post")
            .unwrap();

        let path_words: Vec<_> = ingester
            .fragments
            .iter()
            .filter(|f| f.score == SCORE_PATH_SEGMENT)
            .collect();
        assert_eq!(path_words.len(), 2); // blog, post — only from the title line
    }

    #[test]
    fn test_stopwords_filtered() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("h2 the esoteric web https://a.example/p")
            .unwrap();
        assert!(ingester.fragments.iter().all(|f| f.word != "the"));
    }

    #[test]
    fn test_keywords_split_on_comma() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("keywords plan9, smalltalk,forth https://a.example/p")
            .unwrap();
        let words: Vec<_> = ingester.fragments.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["plan9", "smalltalk", "forth"]);
        assert!(ingester.fragments.iter().all(|f| f.score == SCORE_DEFAULT));
    }

    #[test]
    fn test_about_precedence_para_beats_title() {
        let mut ingester = test_ingester();
        ingester.ingest_line("title Hello World https://a.example/p").unwrap();
        ingester
            .ingest_line("para This is the main paragraph, long enough to qualify for about. https://a.example/p")
            .unwrap();

        let page = ingester.pages.get("https://a.example/p").unwrap();
        assert_eq!(page.title, "Hello World");
        assert_eq!(
            page.about,
            "This is the main paragraph, long enough to qualify for about."
        );
        assert_eq!(page.about_source, AboutSource::Para);
    }

    #[test]
    fn test_non_webring_link_batched() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("non-webring-link https://x.example/cool https://a.example/p")
            .unwrap();
        assert_eq!(ingester.external_links, vec!["https://x.example/cool"]);
        assert!(ingester.fragments.is_empty());
    }

    #[test]
    fn test_big_para_batched() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("big-para A whole paragraph of text https://a.example/p")
            .unwrap();
        assert_eq!(ingester.paragraphs.len(), 1);
        assert_eq!(ingester.paragraphs[0].text, "A whole paragraph of text");
        assert_eq!(ingester.paragraphs[0].url, "https://a.example/p");
    }

    #[test]
    fn test_webring_link_skipped() {
        let mut ingester = test_ingester();
        ingester
            .ingest_line("webring-link https://b.example/ https://a.example/p")
            .unwrap();
        assert!(ingester.fragments.is_empty());
        assert!(ingester.external_links.is_empty());
        assert!(ingester.pages.is_empty());
    }

    #[test]
    fn test_flush_and_requery() {
        let mut ingester = test_ingester();
        ingester.ingest_line("title Esoteric Pages https://a.example/p").unwrap();
        ingester.flush().unwrap();

        assert_eq!(ingester.storage.page_count().unwrap(), 1);
        assert_eq!(ingester.storage.domain_count().unwrap(), 1);
        assert!(ingester.pages.is_empty());
        assert!(ingester.fragments.is_empty());

        let hits = ingester
            .storage
            .search_pages(&["esoteric".to_string()], true, &[], &[], &[])
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Esoteric Pages");
    }

    #[test]
    fn test_ingest_is_deterministic() {
        let lines = [
            "title Alpha Beta https://a.example/one",
            "h1 Gamma https://a.example/one",
            "title Delta https://b.example/two",
        ];

        let run = || {
            let mut ingester = test_ingester();
            for line in &lines {
                ingester.ingest_line(line).unwrap();
            }
            ingester.flush().unwrap();
            let mut words: Vec<(String, String, i64)> = Vec::new();
            let mut stmt = ingester
                .storage
                .conn
                .prepare("SELECT word, url, score FROM inv_index ORDER BY word, url, score")
                .unwrap();
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                .unwrap();
            for row in rows {
                words.push(row.unwrap());
            }
            words
        };

        assert_eq!(run(), run());
    }
}
