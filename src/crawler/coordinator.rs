//! Crawl coordination
//!
//! One coordinator task owns the frontier (queue, visited set, per-host
//! state) and fans fetches out to a bounded pool of workers. Workers fetch,
//! extract and emit records through the shared sink, then report discovered
//! links back over a channel. The crawl ends when the frontier drains and
//! no fetch is in flight.

use crate::config::{read_lines, Config};
use crate::crawler::client::build_http_client;
use crate::crawler::policy::CrawlPolicy;
use crate::crawler::sink::RecordSink;
use crate::extractor::{extract_hrefs, extract_page, ExtractionRecord};
use crate::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use url::Url;

/// Crawl resource limits
#[derive(Debug, Clone)]
pub struct CrawlLimits {
    /// Maximum crawl depth from a seed (seeds are depth 1)
    pub max_depth: usize,
    /// Worker pool size
    pub workers: usize,
    /// Concurrent fetches allowed per host
    pub host_parallelism: usize,
    /// Minimum delay between request dispatches to the same host
    pub host_delay: Duration,
    /// Upper bound on queued URLs
    pub max_queue: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_depth: 3,
            workers: 5,
            host_parallelism: 3,
            host_delay: Duration::from_millis(200),
            max_queue: 100_000,
        }
    }
}

/// Per-host dispatch state
#[derive(Debug, Default)]
struct HostState {
    last_request: Option<Instant>,
    in_flight: usize,
}

impl HostState {
    fn can_request(&self, limits: &CrawlLimits, now: Instant) -> bool {
        if self.in_flight >= limits.host_parallelism {
            return false;
        }
        match self.last_request {
            Some(last) => now.duration_since(last) >= limits.host_delay,
            None => true,
        }
    }

    fn record_dispatch(&mut self, now: Instant) {
        self.last_request = Some(now);
        self.in_flight += 1;
    }
}

/// A URL waiting to be fetched
#[derive(Debug, Clone)]
struct QueuedUrl {
    url: Url,
    depth: usize,
}

/// The crawl frontier: FIFO queue, visit-once set, per-host state
struct Frontier {
    queue: VecDeque<QueuedUrl>,
    visited: HashSet<String>,
    hosts: HashMap<String, HostState>,
    limits: CrawlLimits,
}

impl Frontier {
    fn new(limits: CrawlLimits) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            hosts: HashMap::new(),
            limits,
        }
    }

    /// Enqueues a link unless it is too deep, already seen, unparseable or
    /// the queue is full
    fn enqueue(&mut self, link: &str, depth: usize) {
        if depth > self.limits.max_depth {
            return;
        }
        if self.queue.len() >= self.limits.max_queue {
            tracing::warn!("queue full, dropping {}", link);
            return;
        }
        if self.visited.contains(link) {
            return;
        }
        let url = match Url::parse(link) {
            Ok(url) => url,
            Err(_) => return,
        };
        self.visited.insert(link.to_string());
        self.queue.push_back(QueuedUrl { url, depth });
    }

    /// Pops the first queued URL whose host is ready, marking the dispatch
    fn next_ready(&mut self, now: Instant) -> Option<QueuedUrl> {
        let position = self.queue.iter().position(|queued| {
            let host = queued.url.host_str().unwrap_or_default();
            self.hosts
                .get(host)
                .map(|state| state.can_request(&self.limits, now))
                .unwrap_or(true)
        })?;

        let queued = self.queue.remove(position)?;
        let host = queued.url.host_str().unwrap_or_default().to_string();
        self.hosts.entry(host).or_default().record_dispatch(now);
        Some(queued)
    }

    fn release(&mut self, host: &str) {
        if let Some(state) = self.hosts.get_mut(host) {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// What a worker reports back after a fetch
struct FetchOutcome {
    host: String,
    discovered: Vec<(String, usize)>,
}

/// Shared worker context
struct FetchContext {
    client: reqwest::Client,
    policy: CrawlPolicy,
    previews: Vec<String>,
    heuristics: Vec<String>,
    sink: RecordSink,
}

/// Runs the crawl against the given sink
pub async fn run_crawl(config: &Config, sink: RecordSink) -> Result<()> {
    let client = build_http_client(&config.general.proxy)?;
    let policy = CrawlPolicy::from_config(config)?;
    let limits = CrawlLimits::default();

    let mut frontier = Frontier::new(limits.clone());
    for seed in policy.seeds() {
        frontier.enqueue(&seed.url, 1);
    }
    tracing::info!("starting crawl with {} seed urls", frontier.queue.len());

    let ctx = Arc::new(FetchContext {
        client,
        policy,
        previews: read_lines(Path::new(&config.crawler.preview_query_list)),
        heuristics: read_lines(Path::new(&config.data.heuristics)),
        sink,
    });

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut in_flight = 0usize;

    loop {
        while let Ok(outcome) = done_rx.try_recv() {
            in_flight -= 1;
            complete(&mut frontier, outcome);
        }

        if in_flight < limits.workers {
            if let Some(queued) = frontier.next_ready(Instant::now()) {
                in_flight += 1;
                tokio::spawn(fetch_page(ctx.clone(), queued, done_tx.clone()));
                continue;
            }
        }

        if in_flight == 0 && frontier.is_empty() {
            break;
        }

        // nothing dispatchable right now: wait for a worker to finish or
        // for a host delay to elapse
        tokio::select! {
            outcome = done_rx.recv() => {
                if let Some(outcome) = outcome {
                    in_flight -= 1;
                    complete(&mut frontier, outcome);
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(20)) => {}
        }
    }

    tracing::info!("crawl finished, {} urls visited", frontier.visited.len());
    Ok(())
}

fn complete(frontier: &mut Frontier, outcome: FetchOutcome) {
    frontier.release(&outcome.host);
    for (link, depth) in outcome.discovered {
        frontier.enqueue(&link, depth);
    }
}

/// Fetches one page, emits its records, reports discovered links
///
/// Network errors skip the page; the crawl continues.
async fn fetch_page(
    ctx: Arc<FetchContext>,
    queued: QueuedUrl,
    done: mpsc::UnboundedSender<FetchOutcome>,
) {
    let host = queued.url.host_str().unwrap_or_default().to_string();
    let mut discovered = Vec::new();

    match ctx.client.get(queued.url.as_str()).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            if (200..400).contains(&status) {
                match response.text().await {
                    Ok(body) => {
                        for record in
                            extract_page(&body, &queued.url, &ctx.previews, &ctx.heuristics)
                        {
                            ctx.sink.emit(&record);
                        }
                        for href in extract_hrefs(&body) {
                            let decision = match ctx.policy.consider(&href, &queued.url) {
                                Some(decision) => decision,
                                None => continue,
                            };
                            if let Some(kind) = decision.event {
                                ctx.sink.emit(&ExtractionRecord {
                                    kind,
                                    payload: decision.link.clone(),
                                    url: queued.url.to_string(),
                                });
                            }
                            if decision.enqueue {
                                discovered.push((decision.link, queued.depth + 1));
                            }
                        }
                    }
                    Err(e) => tracing::debug!("failed to read {}: {}", queued.url, e),
                }
            } else {
                tracing::debug!("skipping {} (status {})", queued.url, status);
            }
        }
        Err(e) => tracing::debug!("failed to fetch {}: {}", queued.url, e),
    }

    let _ = done.send(FetchOutcome { host, discovered });
}
