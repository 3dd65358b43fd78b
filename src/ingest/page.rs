//! Per-page descriptor accumulation
//!
//! While the extraction stream is consumed, each URL accumulates a mutable
//! [`PageDescriptor`]. The `about` summary is chosen by a precedence order
//! over the record kinds that can supply it; the order is encoded in
//! [`AboutSource`] rather than scattered branches.

use crate::extractor::is_boring_phrase;

/// Which record kind supplied the current `about` text
///
/// Ranked: nothing < title < h1 < desc < para < og-desc. The replacement
/// rules below are not a pure ranking (desc and para have extra length
/// conditions), but a higher-ranked source is never displaced by a strictly
/// lower-ranked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AboutSource {
    None,
    Title,
    H1,
    Desc,
    Para,
    OgDesc,
}

/// Accumulated descriptor for one page URL
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    pub url: String,
    pub title: String,
    pub about: String,
    pub lang: String,
    pub about_source: AboutSource,
}

impl PageDescriptor {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            about: String::new(),
            lang: String::new(),
            about_source: AboutSource::None,
        }
    }

    /// A title sets the page title and seeds an empty `about`
    pub fn apply_title(&mut self, raw: &str) {
        if self.about.is_empty() {
            self.about = raw.to_string();
            self.about_source = AboutSource::Title;
        }
        self.title = raw.to_string();
    }

    /// An h1 seeds an empty `about`
    pub fn apply_h1(&mut self, raw: &str) {
        if self.about.is_empty() {
            self.about = raw.to_string();
            self.about_source = AboutSource::H1;
        }
    }

    /// A short meta description beats a shorter, weaker `about`
    pub fn apply_desc(&mut self, raw: &str) {
        if self.about.len() < 30 && raw.len() < 100 && raw.len() > self.about.len() {
            self.about = raw.to_string();
            self.about_source = AboutSource::Desc;
        }
    }

    /// An og:description always wins
    pub fn apply_og_desc(&mut self, raw: &str) {
        self.about = raw.to_string();
        self.about_source = AboutSource::OgDesc;
    }

    /// A lead paragraph beats everything except a substantially longer
    /// og:description, provided it passes the heuristics filter
    pub fn apply_para(&mut self, raw: &str, heuristics: &[String]) {
        if self.about_source != AboutSource::OgDesc || 10 * raw.len() > 7 * self.about.len() {
            let phrase = raw.to_lowercase();
            if !is_boring_phrase(heuristics, &phrase) && phrase.len() > 20 {
                self.about = raw.to_string();
                self.about_source = AboutSource::Para;
            }
        }
    }

    pub fn set_lang(&mut self, raw: &str) {
        self.lang = raw.to_string();
    }
}
