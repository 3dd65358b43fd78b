//! Index schema
//!
//! Five logical tables plus crawl stats. `paragraphs` and `external_links`
//! are FTS5 virtual tables: porter stemming for paragraph search, trigram
//! tokenization so link search can match URL substrings.

/// SQL schema for the index
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS domains (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS stats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    last_crawl TEXT
);

CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT,
    about TEXT,
    lang TEXT,
    domain TEXT NOT NULL,
    FOREIGN KEY(domain) REFERENCES domains(domain)
);

CREATE TABLE IF NOT EXISTS inv_index (
    word TEXT NOT NULL,
    score INTEGER NOT NULL,
    url TEXT NOT NULL,
    FOREIGN KEY(url) REFERENCES pages(url)
);

CREATE VIRTUAL TABLE IF NOT EXISTS external_links USING fts5 (url, tokenize="trigram");

CREATE VIRTUAL TABLE IF NOT EXISTS paragraphs USING fts5 (text, url, tokenize="porter");
"#;

/// Initializes the index schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
