//! Extractor module
//!
//! Turns a fetched HTML document into a deterministic sequence of typed
//! extraction records. Each record is one line of the extraction stream the
//! crawler writes and the ingester consumes:
//!
//! ```text
//! <kind> <payload> <url>
//! ```
//!
//! The payload may contain spaces; the ingester splits on the first and the
//! last space of the line.

mod clean;
mod extract;

pub use clean::{clean_text, is_boring_phrase};
pub use extract::{extract_hrefs, extract_page, DEFAULT_PREVIEW_QUERIES};

use std::fmt;

/// The kind tag of an extraction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Title,
    H1,
    H2,
    H3,
    Desc,
    OgDesc,
    Para,
    BigPara,
    Lang,
    Keywords,
    NonWebringLink,
    WebringLink,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::Desc => "desc",
            Self::OgDesc => "og-desc",
            Self::Para => "para",
            Self::BigPara => "big-para",
            Self::Lang => "lang",
            Self::Keywords => "keywords",
            Self::NonWebringLink => "non-webring-link",
            Self::WebringLink => "webring-link",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "desc" => Some(Self::Desc),
            "og-desc" => Some(Self::OgDesc),
            "para" => Some(Self::Para),
            "big-para" => Some(Self::BigPara),
            "lang" => Some(Self::Lang),
            "keywords" => Some(Self::Keywords),
            "non-webring-link" => Some(Self::NonWebringLink),
            "webring-link" => Some(Self::WebringLink),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the extraction stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    pub kind: RecordKind,
    /// Cleaned text payload (or a link URL for the link kinds)
    pub payload: String,
    /// URL of the page the record was extracted from
    pub url: String,
}

impl fmt::Display for ExtractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.payload, self.url)
    }
}
