use crate::UrlError;
use url::Url;

/// Extracts the host component of a URL string
///
/// # Examples
///
/// ```
/// use lieu::url::host_of;
///
/// assert_eq!(host_of("https://blog.a.example/post").unwrap(), "blog.a.example");
/// ```
pub fn host_of(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    url.host_str()
        .map(|h| h.to_string())
        .ok_or_else(|| UrlError::MissingHost(url_str.to_string()))
}

/// Extracts the host component of an already-parsed URL
pub fn host_of_url(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_host() {
        assert_eq!(host_of("https://a.example/").unwrap(), "a.example");
    }

    #[test]
    fn test_subdomain_host() {
        assert_eq!(host_of("https://tilde.shared.example/~alice/").unwrap(), "tilde.shared.example");
    }

    #[test]
    fn test_host_ignores_port() {
        assert_eq!(host_of("https://a.example:8080/x").unwrap(), "a.example");
    }

    #[test]
    fn test_missing_host() {
        assert!(matches!(host_of("mailto:a@b.example"), Err(UrlError::MissingHost(_))));
    }

    #[test]
    fn test_unparseable() {
        assert!(matches!(host_of("not a url"), Err(UrlError::Parse(_))));
    }
}
