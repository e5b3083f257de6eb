//! Query-string extraction from the host page location.

use std::collections::HashMap;

/// Split the query string of `location` into a flat key/value map.
///
/// Values are kept exactly as they appear in the URL, without percent
/// decoding. Segments lacking `=` are skipped, a later duplicate key wins,
/// and anything after `#` is ignored.
pub fn query_parameters(location: &str) -> HashMap<String, String> {
    let Some((_, rest)) = location.split_once('?') else {
        return HashMap::new();
    };

    let query = rest.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_code() {
        let params = query_parameters("https://x/?a=1&code=XYZ");
        assert_eq!(params.get("code").map(String::as_str), Some("XYZ"));
        assert_eq!(params.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_no_query_is_empty() {
        assert!(query_parameters("https://x/").is_empty());
        assert!(query_parameters("https://x/?").is_empty());
    }

    #[test]
    fn test_values_are_not_decoded() {
        let params = query_parameters("https://x/?code=4%2F0Ab&scope=a+b");
        assert_eq!(params["code"], "4%2F0Ab");
        assert_eq!(params["scope"], "a+b");
    }

    #[test]
    fn test_fragment_and_bare_keys() {
        let params = query_parameters("https://x/?flag&code=abc#section");
        assert_eq!(params.len(), 1);
        assert_eq!(params["code"], "abc");
    }

    #[test]
    fn test_later_duplicate_wins() {
        let params = query_parameters("https://x/?code=old&code=new");
        assert_eq!(params["code"], "new");
    }
}
