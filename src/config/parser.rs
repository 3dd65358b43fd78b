use crate::config::types::Config;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use lieu::config::load_config;
///
/// let config = load_config(Path::new("lieu.toml")).unwrap();
/// println!("Serving on port {}", config.general.port);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Basic sanity checks on a parsed configuration
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.general.name.is_empty() {
        return Err(ConfigError::Validation(
            "general.name must not be empty".to_string(),
        ));
    }
    if config.general.port == 0 {
        return Err(ConfigError::Validation(
            "general.port must be non-zero".to_string(),
        ));
    }
    if config.data.source.is_empty() || config.data.database.is_empty() {
        return Err(ConfigError::Validation(
            "data.source and data.database must be set".to_string(),
        ));
    }
    if config.crawler.webring.is_empty() {
        return Err(ConfigError::Validation(
            "crawler.webring must be set".to_string(),
        ));
    }
    Ok(())
}

/// Example configuration written on first run when no config file exists
pub const EXAMPLE_CONFIG: &str = r#####"[general]
name = "Sweet Webring"
# used by the precrawl command and linked to in the /about route
url = "https://example.com/"
webringSelector = "li > a[href]:first-of-type"
port = 10001

[theme]
# colors specified in hex (or valid css names) which determine the look of the instance
foreground = "#ffffff"
background = "#000000"
links = "#ffffff"

[data]
# the source file should contain the crawl command's output
source = "data/crawled.txt"
# location & name of the sqlite database
database = "data/searchengine.db"
# contains words and phrases disqualifying scraped paragraphs from being presented in search results
heuristics = "data/heuristics.txt"
# aka stopwords, in the search engine biz: https://en.wikipedia.org/wiki/Stop_word
wordlist = "data/wordlist.txt"

[crawler]
# manually curated list of domains, or the output of the precrawl command
webring = "data/webring.txt"
# domains that are banned from being crawled but might originally be part of the webring
bannedDomains = "data/banned-domains.txt"
# file suffixes that are banned from being crawled
bannedSuffixes = "data/banned-suffixes.txt"
# phrases and words which won't be logged as links (e.g. if contained in a link)
boringWords = "data/boring-words.txt"
# domains that won't be output as outgoing links
boringDomains = "data/boring-domains.txt"
# queries to search for finding preview text
previewQueryList = "data/preview-query-list.txt"
"#####;

/// Writes the example configuration to the given path
pub fn write_example_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, EXAMPLE_CONFIG)?;
    Ok(())
}
