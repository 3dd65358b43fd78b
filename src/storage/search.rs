//! Query side of the index
//!
//! Three search paths: scored keyword search over the inverted index,
//! full-text paragraph search with match highlighting, and trigram
//! substring search over outgoing links. All user input is bound as
//! parameters; the SQL text only ever grows by whole `word = ?` style
//! clauses.

use crate::extractor::clean_text;
use crate::storage::sqlite::IndexStorage;
use crate::storage::StorageResult;
use rusqlite::types::Value;
use rusqlite::params_from_iter;
use std::collections::HashSet;

/// One keyword search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub url: String,
    pub about: String,
    pub title: String,
}

/// One paragraph search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphResult {
    /// The matched paragraph, as stored
    pub text: String,
    /// The page's `about`, emptied when it would repeat the paragraph
    pub about: String,
    /// The matched paragraph with `<strong>` around matched tokens
    pub highlighted: String,
    pub url: String,
}

impl IndexStorage {
    /// Keyword search over the inverted index
    ///
    /// Matches any of the given words, restricted by the domain and
    /// language filters, grouped per page. `by_score` orders by the summed
    /// term scores; otherwise by plain occurrence count. At most 15 hits.
    pub fn search_pages(
        &self,
        words: &[String],
        by_score: bool,
        site_in: &[String],
        site_not_in: &[String],
        langs: &[String],
    ) -> StorageResult<Vec<PageResult>> {
        let mut args: Vec<Value> = Vec::new();

        let word_clause = or_clause(&mut args, words, "word = ?", |word| {
            Some(word.to_lowercase())
        });
        let domain_clause = or_clause(&mut args, site_in, "domain = ?", |d| Some(d.clone()));
        let nodomain_clause = and_clause(&mut args, site_not_in, "domain != ?");
        let lang_clause = or_clause(&mut args, langs, "lang LIKE ?", |code| {
            // reject anything that isn't a plain language code; this is
            // user input headed for a LIKE pattern
            if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                Some(format!("{}%", code))
            } else {
                None
            }
        });

        let order = if by_score { "SUM(score)" } else { "COUNT(*)" };
        let sql = format!(
            "SELECT p.url, p.about, p.title \
             FROM inv_index inv INNER JOIN pages p ON inv.url = p.url \
             WHERE ({}) AND ({}) AND ({}) AND ({}) \
             GROUP BY inv.url \
             ORDER BY {} DESC \
             LIMIT 15",
            word_clause, domain_clause, nodomain_clause, lang_clause, order
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args), |row| {
            Ok(PageResult {
                url: row.get(0)?,
                about: row.get(1)?,
                title: row.get(2)?,
            })
        })?;

        let mut pages = Vec::new();
        for row in rows {
            pages.push(row?);
        }
        Ok(pages)
    }

    /// Full-text search over whole paragraphs
    ///
    /// Ordered by FTS rank, at most 30 rows before deduplication. Results
    /// with an identical highlighted paragraph are collapsed to the first
    /// occurrence, and a page's `about` is dropped from the hit when it is
    /// just the matched paragraph again.
    pub fn search_paragraphs(
        &self,
        phrase: &str,
        site_in: &[String],
        site_not_in: &[String],
    ) -> StorageResult<Vec<ParagraphResult>> {
        if phrase.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut args: Vec<Value> = vec![phrase.to_string().into()];
        let domain_clause = or_clause(&mut args, site_in, "p.domain = ?", |d| Some(d.clone()));
        let nodomain_clause = and_clause(&mut args, site_not_in, "p.domain != ?");

        let sql = format!(
            "SELECT paragraphs.text, p.about, \
                    highlight(paragraphs, 0, '<strong>', '</strong>'), paragraphs.url \
             FROM paragraphs INNER JOIN pages p ON paragraphs.url = p.url \
             WHERE paragraphs.text MATCH ? \
             AND ({}) AND ({}) \
             ORDER BY rank LIMIT 30",
            domain_clause, nodomain_clause
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match stmt.query_map(params_from_iter(args), |row| {
            Ok(ParagraphResult {
                text: row.get(0)?,
                about: row.get(1)?,
                highlighted: row.get(2)?,
                url: row.get(3)?,
            })
        }) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::debug!("paragraph match rejected: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::new();
        for row in rows {
            let mut result = match row {
                Ok(result) => result,
                // a malformed MATCH expression surfaces while stepping;
                // treat it as "no results", not a store failure
                Err(e) => {
                    tracing::debug!("paragraph match rejected: {}", e);
                    return Ok(results);
                }
            };
            if !seen.insert(result.highlighted.clone()) {
                continue;
            }
            if result.text.to_lowercase() == clean_text(&result.about).to_lowercase() {
                result.about = String::new();
            }
            results.push(result);
        }
        Ok(results)
    }

    /// Substring search over outgoing links via the trigram index
    pub fn search_links(&self, phrase: &str) -> StorageResult<Vec<String>> {
        if phrase.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT url FROM external_links WHERE url MATCH ?1 \
             GROUP BY url ORDER BY RANDOM() LIMIT 30",
        )?;

        let rows = match stmt.query_map([phrase], |row| row.get::<_, String>(0)) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::debug!("link match rejected: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut links = Vec::new();
        for row in rows {
            match row {
                Ok(url) => links.push(url),
                Err(e) => {
                    tracing::debug!("link match rejected: {}", e);
                    return Ok(links);
                }
            }
        }
        Ok(links)
    }
}

/// Builds `cond OR cond OR …` pushing one bound value per clause; "1" when
/// no value survives the mapping
fn or_clause<F>(args: &mut Vec<Value>, values: &[String], cond: &str, map: F) -> String
where
    F: Fn(&String) -> Option<String>,
{
    let mut clauses = Vec::new();
    for value in values {
        if let Some(bound) = map(value) {
            clauses.push(cond);
            args.push(bound.into());
        }
    }
    if clauses.is_empty() {
        "1".to_string()
    } else {
        clauses.join(" OR ")
    }
}

/// Builds `cond AND cond AND …`; "1" when empty
fn and_clause(args: &mut Vec<Value>, values: &[String], cond: &str) -> String {
    if values.is_empty() {
        return "1".to_string();
    }
    for value in values {
        args.push(value.clone().into());
    }
    vec![cond; values.len()].join(" AND ")
}
