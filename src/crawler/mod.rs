//! Crawler module
//!
//! A polite, parallel, queue-driven fetcher over a closed allow-list of
//! webring hosts. Fetched pages run through the extractor and every record
//! is written to a serialized line sink; the query side never sees the
//! crawler, only the stream it leaves behind.

mod client;
mod coordinator;
mod policy;
mod precrawl;
mod selector;
mod sink;

pub use client::{build_http_client, USER_AGENT};
pub use coordinator::{run_crawl, CrawlLimits};
pub use policy::{load_seeds, CrawlPolicy, LinkDecision, Seed};
pub use precrawl::{extract_members, precrawl};
pub use selector::TinySelector;
pub use sink::RecordSink;

use crate::config::Config;
use crate::{LieuError, Result};

/// Runs a full crawl, writing the extraction stream to stdout
pub async fn crawl(config: &Config) -> Result<()> {
    let (sink, writer) = RecordSink::stdout();
    run_crawl(config, sink).await?;
    writer
        .await
        .map_err(|e| LieuError::Io(std::io::Error::other(e)))??;
    Ok(())
}
