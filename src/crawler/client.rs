//! HTTP client construction

use crate::{LieuError, Result};
use reqwest::Client;
use std::time::Duration;

/// User agent presented to crawled sites
pub const USER_AGENT: &str = "Lieu";

/// Builds the crawler's HTTP client
///
/// A non-empty proxy URL routes every request through that proxy (http or
/// socks5); an unparseable proxy URL is a configuration error and fatal.
pub fn build_http_client(proxy: &str) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if !proxy.is_empty() {
        let proxy =
            reqwest::Proxy::all(proxy).map_err(|_| LieuError::InvalidProxy(proxy.to_string()))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plain_client() {
        assert!(build_http_client("").is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        assert!(build_http_client("http://localhost:8118").is_ok());
    }

    #[test]
    fn test_invalid_proxy_is_fatal() {
        let result = build_http_client("::not a proxy::");
        assert!(matches!(result, Err(LieuError::InvalidProxy(_))));
    }
}
