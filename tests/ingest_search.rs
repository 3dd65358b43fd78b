//! End-to-end tests for the ingest and query pipeline
//!
//! These tests write an extraction stream to disk, run a full ingest into a
//! fresh index and query the result the way the HTTP handlers do.

use lieu::config::{Config, CrawlerConfig, DataConfig, GeneralConfig, ThemeConfig};
use lieu::ingest::run_ingest;
use lieu::query::SearchQuery;
use lieu::storage::IndexStorage;
use std::path::Path;
use tempfile::TempDir;

fn test_config(dir: &TempDir, stream: &str) -> Config {
    let source = dir.path().join("source.txt");
    std::fs::write(&source, stream).unwrap();

    Config {
        general: GeneralConfig {
            name: "Test Ring".to_string(),
            tagline: String::new(),
            placeholder: String::new(),
            url: "https://ring.example/".to_string(),
            webring_selector: "li > a[href]:first-of-type".to_string(),
            port: 10001,
            proxy: String::new(),
        },
        theme: ThemeConfig::default(),
        data: DataConfig {
            source: source.to_string_lossy().to_string(),
            database: dir.path().join("index.db").to_string_lossy().to_string(),
            heuristics: dir.path().join("heuristics.txt").to_string_lossy().to_string(),
            wordlist: dir.path().join("wordlist.txt").to_string_lossy().to_string(),
        },
        crawler: CrawlerConfig {
            webring: dir.path().join("webring.txt").to_string_lossy().to_string(),
            banned_domains: String::new(),
            banned_suffixes: String::new(),
            boring_words: String::new(),
            boring_domains: String::new(),
            preview_query_list: String::new(),
        },
    }
}

fn ingest_and_open(stream: &str) -> (TempDir, IndexStorage) {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, stream);
    run_ingest(&config).unwrap();
    let storage = IndexStorage::open_read_only(Path::new(&config.data.database)).unwrap();
    (dir, storage)
}

#[test]
fn crawled_page_is_searchable_with_paragraph_about() {
    let stream = "\
title Hello World https://a.example/
para This is the main paragraph, long enough to qualify for about. https://a.example/
";
    let (_dir, storage) = ingest_and_open(stream);

    let hits = storage
        .search_pages(&["hello".to_string()], true, &[], &[], &[])
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://a.example");
    assert_eq!(hits[0].title, "Hello World");
    // the lead paragraph beats the title as the about text
    assert_eq!(
        hits[0].about,
        "This is the main paragraph, long enough to qualify for about."
    );
}

#[test]
fn site_operators_restrict_and_exclude() {
    let stream = "\
title Rust notes https://a.example/rust
title Rust diary https://b.example/rust
title Rust misc https://c.example/rust
";
    let (_dir, storage) = ingest_and_open(stream);

    let query = SearchQuery::parse("rust site:b.example -site:c.example", true);
    let hits = storage
        .search_pages(
            &query.inflected_terms(),
            true,
            &query.site_in,
            &query.site_not_in,
            &query.langs,
        )
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://b.example/rust");
}

#[test]
fn lang_operator_is_a_prefix_filter() {
    let stream = "\
title Foo one https://a.example/1
lang en-GB https://a.example/1
title Foo two https://b.example/2
lang fr https://b.example/2
";
    let (_dir, storage) = ingest_and_open(stream);

    let query = SearchQuery::parse("foo lang:en", true);
    let hits = storage
        .search_pages(
            &query.inflected_terms(),
            true,
            &query.site_in,
            &query.site_not_in,
            &query.langs,
        )
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "https://a.example/1");
}

#[test]
fn identical_paragraphs_dedup_to_one_hit() {
    let stream = "\
title One https://a.example/1
title Two https://b.example/2
big-para The very same forum thread paragraph appears twice. https://a.example/1
big-para The very same forum thread paragraph appears twice. https://b.example/2
";
    let (_dir, storage) = ingest_and_open(stream);

    let hits = storage.search_paragraphs("forum thread", &[], &[]).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn every_page_has_a_domain_row() {
    let stream = "\
title A https://a.example/x
title B https://b.example/y
big-para Just a paragraph of ordinary text here. https://c.example/z
";
    let (_dir, storage) = ingest_and_open(stream);

    assert_eq!(storage.page_count().unwrap(), 3);
    assert_eq!(storage.domain_count().unwrap(), 3);
}

#[test]
fn ingest_records_crawl_date() {
    let (_dir, storage) = ingest_and_open("title A https://a.example/x\n");
    let date = storage.last_crawl().unwrap().unwrap();
    // YYYY-MM-DD
    assert_eq!(date.len(), 10);
    assert_eq!(date.as_bytes()[4], b'-');
    assert_eq!(date.as_bytes()[7], b'-');
}

#[test]
fn ingest_twice_yields_identical_index() {
    let stream = "\
title Alpha Beta https://a.example/one
h2 Gamma Delta https://a.example/one
title Epsilon https://b.example/two
non-webring-link https://x.example/cool https://a.example/one
big-para A paragraph with sufficient length to index. https://a.example/one
";
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, stream);

    let dump = |db_path: &str| {
        let conn = rusqlite::Connection::open(db_path).unwrap();
        let mut rows = Vec::new();
        let mut stmt = conn
            .prepare("SELECT word, url, score FROM inv_index ORDER BY word, url, score")
            .unwrap();
        let mapped = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .unwrap();
        for row in mapped {
            rows.push(row.unwrap());
        }
        rows
    };

    run_ingest(&config).unwrap();
    let storage = IndexStorage::open_read_only(Path::new(&config.data.database)).unwrap();
    let first = (
        storage.page_count().unwrap(),
        storage.domain_count().unwrap(),
        dump(&config.data.database),
    );
    drop(storage);

    run_ingest(&config).unwrap();
    let storage = IndexStorage::open_read_only(Path::new(&config.data.database)).unwrap();
    let second = (
        storage.page_count().unwrap(),
        storage.domain_count().unwrap(),
        dump(&config.data.database),
    );

    assert_eq!(first, second);
}

#[test]
fn stopwords_never_reach_the_index() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, "title the esoteric web https://a.example/x\n");
    let wordlist = dir.path().join("wordlist.txt");
    std::fs::write(&wordlist, "the|and|with").unwrap();
    config.data.wordlist = wordlist.to_string_lossy().to_string();

    run_ingest(&config).unwrap();
    let storage = IndexStorage::open_read_only(Path::new(&config.data.database)).unwrap();

    let hits = storage
        .search_pages(&["the".to_string()], true, &[], &[], &[])
        .unwrap();
    assert!(hits.is_empty());

    let hits = storage
        .search_pages(&["esoteric".to_string()], true, &[], &[], &[])
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn outgoing_links_are_substring_searchable() {
    let stream = "\
title A https://a.example/x
non-webring-link https://videos.example/watch/123 https://a.example/x
non-webring-link https://blog.example/post https://a.example/x
";
    let (_dir, storage) = ingest_and_open(stream);

    let links = storage.search_links("videos").unwrap();
    assert_eq!(links.len(), 1);
    assert!(links[0].contains("videos.example"));
}
