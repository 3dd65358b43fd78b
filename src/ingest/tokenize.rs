//! Sentence partitioning and token filtering

use crate::ingest::inflect::singularize;
use url::Url;

/// Splits a sentence into index-ready word candidates
///
/// Every character that is not a letter or digit becomes a space (this
/// covers punctuation, separators, control characters and symbols in one
/// rule), then the result is split on whitespace runs. `|` and `/` fall out
/// of the same rule.
pub fn partition_sentence(s: &str) -> Vec<String> {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(|word| word.to_string())
        .collect()
}

/// Drops stopwords and one-letter tokens, singularizing the survivors
pub fn filter_common_words(words: &[String], stopwords: &[String]) -> Vec<String> {
    words
        .iter()
        .filter(|word| word.len() > 1 && !stopwords.iter().any(|stop| stop == *word))
        .map(|word| singularize(word))
        .collect()
}

/// Extracts index terms from a page URL's path
///
/// The path is stripped of an `.html`/`.htm` suffix, split on `/`, `-` and
/// `_`, and lowercased. `https://a.example/blog/on-rust_2024.html` yields
/// `["blog", "on", "rust", "2024"]`.
pub fn extract_path_segments(page_url: &str) -> Vec<String> {
    let url = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };

    let path = url.path();
    if path.is_empty() {
        return Vec::new();
    }

    let path = path.strip_suffix(".html").unwrap_or(path);
    let path = path.strip_suffix(".htm").unwrap_or(path);

    path.chars()
        .map(|c| if c == '/' || c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_plain_words() {
        assert_eq!(partition_sentence("hello brave world"), vec!["hello", "brave", "world"]);
    }

    #[test]
    fn test_partition_strips_punctuation() {
        assert_eq!(
            partition_sentence("well, this is it! (right?)"),
            vec!["well", "this", "is", "it", "right"]
        );
    }

    #[test]
    fn test_partition_slashes_and_pipes() {
        assert_eq!(partition_sentence("either/or|both"), vec!["either", "or", "both"]);
    }

    #[test]
    fn test_partition_symbols() {
        assert_eq!(partition_sentence("a+b=c $100 ©2024"), vec!["a", "b", "c", "100", "2024"]);
    }

    #[test]
    fn test_partition_ascii_identity() {
        // partition of already-clean alphanumerics-with-spaces is the split itself
        let input = "abc def 123";
        assert_eq!(partition_sentence(input), input.split(' ').collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_drops_single_chars() {
        let words = vec!["a".to_string(), "ab".to_string()];
        assert_eq!(filter_common_words(&words, &[]), vec!["ab"]);
    }

    #[test]
    fn test_filter_drops_stopwords() {
        let words: Vec<String> = ["the", "quick", "brown", "fox"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let stopwords = vec!["the".to_string()];
        assert_eq!(filter_common_words(&words, &stopwords), vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_filter_singularizes() {
        let words = vec!["projects".to_string(), "cities".to_string()];
        assert_eq!(filter_common_words(&words, &[]), vec!["project", "city"]);
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(
            extract_path_segments("https://a.example/blog/on-rust_2024.html"),
            vec!["blog", "on", "rust", "2024"]
        );
    }

    #[test]
    fn test_path_segments_htm() {
        assert_eq!(
            extract_path_segments("https://a.example/notes/index.htm"),
            vec!["notes", "index"]
        );
    }

    #[test]
    fn test_path_segments_root() {
        assert!(extract_path_segments("https://a.example").is_empty());
        assert!(extract_path_segments("https://a.example/").is_empty());
    }

    #[test]
    fn test_path_segments_bad_url() {
        assert!(extract_path_segments("not a url").is_empty());
    }
}
