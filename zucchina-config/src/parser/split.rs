//! Line splitting helpers

use indexmap::IndexMap;

/// Split `input` at the first `=`, trimming both sides.
///
/// Returns `None` when there is no `=` in the input.
pub fn split_kv(input: &str) -> Option<(&str, &str)> {
    input
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Split a comma-separated value into trimmed, non-empty tokens
pub fn split_commas(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Split a comma-separated value blob into positional tokens and `key=value` options.
///
/// A token of the form `key=value` with a non-empty key is an option; any
/// other token is positional. Positional order is preserved, options keep
/// their first-seen position.
pub fn split_fields(value: &str) -> (Vec<String>, IndexMap<String, String>) {
    let mut positional = Vec::new();
    let mut named = IndexMap::new();

    for token in split_commas(value) {
        match split_kv(token) {
            Some((key, value)) if !key.is_empty() => {
                named.insert(key.to_string(), value.to_string());
            }
            _ => positional.push(token.to_string()),
        }
    }

    (positional, named)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_kv() {
        assert_eq!(split_kv("loglevel = notify"), Some(("loglevel", "notify")));
        assert_eq!(split_kv("url=http://x/?a=b"), Some(("url", "http://x/?a=b")));
        assert_eq!(split_kv("  key=  "), Some(("key", "")));
        assert_eq!(split_kv("no separator"), None);
    }

    #[test]
    fn test_split_fields() {
        let (positional, named) = split_fields("Proxy1, Proxy2, url=http://x, interval=600");
        assert_eq!(positional, vec!["Proxy1", "Proxy2"]);
        assert_eq!(named.len(), 2);
        assert_eq!(named["url"], "http://x");
        assert_eq!(named["interval"], "600");
    }

    #[test]
    fn test_split_fields_whitespace_and_empty_tokens() {
        let (positional, named) = split_fields(" a ,b,, c ,  url = http://x ,");
        assert_eq!(positional, vec!["a", "b", "c"]);
        assert_eq!(named["url"], "http://x");
    }

    #[test]
    fn test_split_fields_empty_key_is_positional() {
        let (positional, named) = split_fields("a, =x, key=v");
        assert_eq!(positional, vec!["a", "=x"]);
        assert_eq!(named.len(), 1);
        assert_eq!(named["key"], "v");
    }

    #[test]
    fn test_split_fields_empty() {
        let (positional, named) = split_fields("");
        assert!(positional.is_empty());
        assert!(named.is_empty());
    }
}
