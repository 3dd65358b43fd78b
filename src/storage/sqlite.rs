//! SQLite-backed index storage

use crate::storage::schema::initialize_schema;
use crate::storage::{PageData, Paragraph, SearchFragment, StorageResult};
use crate::url::host_of;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

/// The SQLite index store
///
/// Ingest owns one writable connection exclusively; the HTTP server opens a
/// fresh read-only connection per request, so readers never contend.
pub struct IndexStorage {
    pub(crate) conn: Connection,
}

impl IndexStorage {
    /// Opens (creating if needed) a writable index at the given path
    pub fn create(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens an existing index read-only (query side)
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Creates an in-memory index (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Stats =====

    /// Records the date of the crawl an ingest run is based on
    pub fn record_crawl_date(&self, date: &str) -> StorageResult<()> {
        self.conn
            .execute("INSERT OR IGNORE INTO stats(last_crawl) VALUES (?1)", [date])?;
        Ok(())
    }

    /// Returns the most recently recorded crawl date
    pub fn last_crawl(&self) -> StorageResult<Option<String>> {
        let date = self
            .conn
            .query_row(
                "SELECT last_crawl FROM stats WHERE last_crawl IS NOT NULL ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(date)
    }

    // ===== Bulk inserts =====

    /// Inserts the domains derived from a batch of pages
    pub fn insert_domains(&self, pages: &[PageData]) -> StorageResult<()> {
        let mut args: Vec<Value> = Vec::with_capacity(pages.len());
        for page in pages {
            match host_of(&page.url) {
                Ok(host) => args.push(host.into()),
                Err(_) => {
                    tracing::warn!("skipping domain for unparseable url {}", page.url);
                }
            }
        }
        if args.is_empty() {
            return Ok(());
        }

        let values = vec!["(?)"; args.len()].join(",");
        let sql = format!("INSERT OR IGNORE INTO domains(domain) VALUES {}", values);
        self.conn.execute(&sql, params_from_iter(args))?;
        Ok(())
    }

    /// Inserts a batch of pages
    pub fn insert_pages(&self, pages: &[PageData]) -> StorageResult<()> {
        let mut rows = Vec::new();
        let mut args: Vec<Value> = Vec::with_capacity(pages.len() * 5);
        for page in pages {
            let host = match host_of(&page.url) {
                Ok(host) => host,
                Err(_) => {
                    tracing::warn!("skipping page with unparseable url {}", page.url);
                    continue;
                }
            };
            rows.push("(?, ?, ?, ?, ?)");
            args.push(page.url.clone().into());
            args.push(page.title.clone().into());
            args.push(page.lang.clone().into());
            args.push(page.about.clone().into());
            args.push(host.into());
        }
        if rows.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "INSERT OR IGNORE INTO pages(url, title, lang, about, domain) VALUES {}",
            rows.join(",")
        );
        self.conn.execute(&sql, params_from_iter(args))?;
        Ok(())
    }

    /// Inserts a batch of term fragments into the inverted index
    ///
    /// Callers are expected to sub-batch (the ingester uses 3000 rows) to
    /// bound the SQL parameter count.
    pub fn insert_fragments(&self, batch: &[SearchFragment]) -> StorageResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut args: Vec<Value> = Vec::with_capacity(batch.len() * 3);
        for fragment in batch {
            args.push(fragment.word.clone().into());
            args.push(fragment.url.trim_end_matches('/').to_string().into());
            args.push(fragment.score.into());
        }

        let values = vec!["(?, ?, ?)"; batch.len()].join(",");
        let sql = format!("INSERT OR IGNORE INTO inv_index(word, url, score) VALUES {}", values);
        self.conn.execute(&sql, params_from_iter(args))?;
        Ok(())
    }

    /// Inserts a batch of outgoing link URLs
    pub fn insert_external_links(&self, links: &[String]) -> StorageResult<()> {
        if links.is_empty() {
            return Ok(());
        }

        let values = vec!["(?)"; links.len()].join(",");
        let sql = format!("INSERT OR IGNORE INTO external_links(url) VALUES {}", values);
        let args: Vec<Value> = links.iter().map(|l| l.clone().into()).collect();
        self.conn.execute(&sql, params_from_iter(args))?;
        Ok(())
    }

    /// Inserts a batch of whole paragraphs for full-text search
    pub fn insert_paragraphs(&self, paragraphs: &[Paragraph]) -> StorageResult<()> {
        if paragraphs.is_empty() {
            return Ok(());
        }

        let mut args: Vec<Value> = Vec::with_capacity(paragraphs.len() * 2);
        for paragraph in paragraphs {
            args.push(paragraph.text.clone().into());
            args.push(paragraph.url.clone().into());
        }

        let values = vec!["(?, ?)"; paragraphs.len()].join(",");
        let sql = format!("INSERT OR IGNORE INTO paragraphs(text, url) VALUES {}", values);
        self.conn.execute(&sql, params_from_iter(args))?;
        Ok(())
    }

    // ===== Counts =====

    pub fn page_count(&self) -> StorageResult<u64> {
        self.count("pages")
    }

    pub fn domain_count(&self) -> StorageResult<u64> {
        self.count("domains")
    }

    pub fn term_count(&self) -> StorageResult<u64> {
        self.count("inv_index")
    }

    fn count(&self, table: &str) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Random picks =====

    /// Picks a random indexed domain
    pub fn random_domain(&self) -> StorageResult<Option<String>> {
        let domain = self
            .conn
            .query_row("SELECT domain FROM domains ORDER BY RANDOM() LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(domain)
    }

    /// Picks a random page: first a random domain, then a random page
    /// within it, so large sites don't dominate
    pub fn random_page(&self) -> StorageResult<Option<String>> {
        let domain = match self.random_domain()? {
            Some(domain) => domain,
            None => return Ok(None),
        };

        let url = self
            .conn
            .query_row(
                "SELECT url FROM pages WHERE domain = ?1 ORDER BY RANDOM() LIMIT 1",
                [domain],
                |row| row.get(0),
            )
            .optional()?;
        Ok(url)
    }

    /// Picks a random outgoing link
    pub fn random_external_link(&self) -> StorageResult<Option<String>> {
        let url = self
            .conn
            .query_row(
                "SELECT url FROM external_links ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str) -> PageData {
        PageData {
            url: url.to_string(),
            title: title.to_string(),
            about: format!("about {}", title),
            lang: "en".to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(IndexStorage::new_in_memory().is_ok());
    }

    #[test]
    fn test_insert_pages_creates_domains() {
        let storage = IndexStorage::new_in_memory().unwrap();
        let pages = vec![
            page("https://a.example/one", "One"),
            page("https://b.example/two", "Two"),
        ];
        storage.insert_domains(&pages).unwrap();
        storage.insert_pages(&pages).unwrap();

        assert_eq!(storage.page_count().unwrap(), 2);
        assert_eq!(storage.domain_count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_pages_ignored() {
        let storage = IndexStorage::new_in_memory().unwrap();
        let pages = vec![page("https://a.example/one", "One")];
        storage.insert_domains(&pages).unwrap();
        storage.insert_pages(&pages).unwrap();
        storage.insert_pages(&pages).unwrap();
        assert_eq!(storage.page_count().unwrap(), 1);
    }

    #[test]
    fn test_insert_fragments_strips_trailing_slash() {
        let storage = IndexStorage::new_in_memory().unwrap();
        let batch = vec![SearchFragment {
            word: "hello".to_string(),
            url: "https://a.example/page/".to_string(),
            score: 5,
        }];
        storage.insert_fragments(&batch).unwrap();

        let url: String = storage
            .conn
            .query_row("SELECT url FROM inv_index", [], |row| row.get(0))
            .unwrap();
        assert_eq!(url, "https://a.example/page");
    }

    #[test]
    fn test_crawl_date_round_trip() {
        let storage = IndexStorage::new_in_memory().unwrap();
        assert_eq!(storage.last_crawl().unwrap(), None);
        storage.record_crawl_date("2024-06-01").unwrap();
        assert_eq!(storage.last_crawl().unwrap(), Some("2024-06-01".to_string()));
    }

    #[test]
    fn test_random_page_empty_index() {
        let storage = IndexStorage::new_in_memory().unwrap();
        assert_eq!(storage.random_page().unwrap(), None);
    }

    #[test]
    fn test_random_page_two_step() {
        let storage = IndexStorage::new_in_memory().unwrap();
        let pages = vec![page("https://a.example/only", "Only")];
        storage.insert_domains(&pages).unwrap();
        storage.insert_pages(&pages).unwrap();
        assert_eq!(
            storage.random_page().unwrap(),
            Some("https://a.example/only".to_string())
        );
    }

    #[test]
    fn test_external_links_dedup() {
        let storage = IndexStorage::new_in_memory().unwrap();
        let links = vec!["https://x.example/a".to_string()];
        storage.insert_external_links(&links).unwrap();
        storage.insert_external_links(&links).unwrap();

        let count: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM external_links", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2); // fts5 table has no uniqueness; both rows land
        assert!(storage.random_external_link().unwrap().is_some());
    }
}
