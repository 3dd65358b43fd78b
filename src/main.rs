//! Lieu command-line interface

use clap::{Parser, Subcommand};
use lieu::config::{load_config, read_lines, write_example_config, Config};
use lieu::storage::IndexStorage;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Lieu: neighbourhood search engine for webrings
#[derive(Parser, Debug)]
#[command(name = "lieu")]
#[command(version = "1.0.0")]
#[command(about = "Neighbourhood search engine", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "lieu.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the webring index page for member URLs (stdout, one per line)
    Precrawl,
    /// Crawl every URL in the webring file (stdout: the extraction stream)
    Crawl,
    /// Ingest crawled data into a fresh index
    Ingest,
    /// Interactive search against the index
    Search,
    /// Print one random indexed page URL
    Random,
    /// Serve the search engine over HTTP
    Host,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if !cli.config.exists() {
        println!("lieu: can't find config, saving an example config in the working directory");
        write_example_config(&cli.config)?;
        println!("lieu: {} written to disk", cli.config.display());
        return Ok(());
    }
    let config = load_config(&cli.config)?;

    match cli.command {
        None => {
            println!("{}", HELP);
            Ok(())
        }
        Some(Command::Precrawl) => handle_precrawl(&config).await,
        Some(Command::Crawl) => handle_crawl(&config).await,
        Some(Command::Ingest) => handle_ingest(&config),
        Some(Command::Search) => handle_search(&config),
        Some(Command::Random) => handle_random(&config),
        Some(Command::Host) => handle_host(config).await,
    }
}

const HELP: &str = "Lieu: neighbourhood search engine

Commands
- precrawl  (scrapes config's general.url for a list of member links)
- crawl     (starts the crawler over the crawler.webring file, outputs to stdout)
- ingest    (ingests crawled data, generates the database)
- search    (interactive cli for searching the database)
- random    (prints one random page url)
- host      (hosts the search engine over http)

Example:
    lieu precrawl > data/webring.txt
    lieu crawl > data/source.txt
    lieu ingest
    lieu host

See the configuration file lieu.toml for more information.";

/// Logs go to stderr; crawl and precrawl own stdout for their data streams
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lieu=info,warn"),
            1 => EnvFilter::new("lieu=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn handle_precrawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.general.url == "https://example.com/" {
        println!("lieu: the url is not set (example.com)");
        return Ok(());
    }
    let members = lieu::crawler::precrawl(config).await?;
    let mut stdout = std::io::stdout().lock();
    for member in members {
        writeln!(stdout, "{}", member)?;
    }
    Ok(())
}

async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let webring = Path::new(&config.crawler.webring);
    if !webring.exists() {
        println!("lieu: webring file {:?} does not exist", config.crawler.webring);
        return Ok(());
    }
    if read_lines(webring).is_empty() {
        println!(
            "lieu: nothing to crawl; the webring file {:?} is empty",
            config.crawler.webring
        );
        return Ok(());
    }
    lieu::crawler::crawl(config).await?;
    Ok(())
}

fn handle_ingest(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = Path::new(&config.data.source);
    if !source.exists() {
        println!("lieu: data source {} does not exist", config.data.source);
        println!("lieu: try running `lieu crawl`");
        return Ok(());
    }
    if read_lines(source).is_empty() {
        println!("lieu: nothing to ingest; data source {:?} is empty", config.data.source);
        println!("lieu: try running `lieu crawl`");
        return Ok(());
    }
    println!("lieu: creating a new database & initiating ingestion");
    lieu::ingest::run_ingest(config)?;
    Ok(())
}

/// Opens the index for the read-only commands, or explains how to get one
fn open_index(config: &Config) -> Result<Option<IndexStorage>, Box<dyn std::error::Error>> {
    let db = Path::new(&config.data.database);
    if !db.exists() {
        println!("lieu: database {} does not exist", config.data.database);
        println!("lieu: try running `lieu ingest` if you have already crawled source data");
        return Ok(None);
    }
    Ok(Some(IndexStorage::open_read_only(db)?))
}

fn handle_search(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let storage = match open_index(config)? {
        Some(storage) => storage,
        None => return Ok(()),
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Ok(()); // eof
        }

        let words: Vec<String> = input
            .split_whitespace()
            .map(lieu::ingest::singularize)
            .collect();
        let hits = storage.search_pages(&words, true, &[], &[], &[])?;
        for hit in hits {
            println!("{}", hit.url);
            if !hit.about.is_empty() {
                println!("{}", hit.about);
            }
        }
    }
}

fn handle_random(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let storage = match open_index(config)? {
        Some(storage) => storage,
        None => return Ok(()),
    };
    if let Some(url) = storage.random_page()? {
        println!("{}", url);
    }
    Ok(())
}

async fn handle_host(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if !Path::new(&config.data.database).exists() {
        println!("lieu: database {} does not exist", config.data.database);
        println!("lieu: try running `lieu ingest` if you have already crawled source data");
        return Ok(());
    }
    lieu::server::run_server(config).await?;
    Ok(())
}
