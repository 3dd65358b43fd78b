//! Configuration module
//!
//! Handles loading and validating the `lieu.toml` configuration file, plus
//! the plain-text list files the crawler and ingester read.

mod lists;
mod parser;
mod types;

pub use lists::{read_lines, read_list};
pub use parser::{load_config, write_example_config, EXAMPLE_CONFIG};
pub use types::{Config, CrawlerConfig, DataConfig, GeneralConfig, ThemeConfig};
