//! `token` query parameter handling

use crate::config::StorageKeys;
use url::{Url, form_urlencoded};

/// Non-empty `token` query parameter of `url`
pub fn find_token(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == StorageKeys::TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `url` with every `token` parameter removed, other parameters kept in order
pub fn without_token(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != StorageKeys::TOKEN_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cleaned = url.clone();
    if kept.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(kept);
    }
    cleaned
}

/// Whether `target`, resolved against `base`, already carries a `token` parameter
pub fn carries_token(target: &str, base: Option<&Url>) -> bool {
    Url::options()
        .base_url(base)
        .parse(target)
        .map(|url| url.query_pairs().any(|(key, _)| key == StorageKeys::TOKEN_PARAM))
        .unwrap_or(false)
}

/// Append `token=<token>` to `target`, ahead of any fragment
pub fn append_token(target: &str, token: &str) -> String {
    let (head, fragment) = match target.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (target, None),
    };
    let separator = if head.contains('?') { '&' } else { '?' };
    let encoded: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();

    let mut decorated = format!("{head}{separator}{}={encoded}", StorageKeys::TOKEN_PARAM);
    if let Some(fragment) = fragment {
        decorated.push('#');
        decorated.push_str(fragment);
    }
    decorated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_find_token() {
        assert_eq!(
            find_token(&url("http://localhost/dashboard?x=1&token=abc")).as_deref(),
            Some("abc")
        );
        assert_eq!(find_token(&url("http://localhost/dashboard?token=")), None);
        assert_eq!(find_token(&url("http://localhost/dashboard")), None);
    }

    #[test]
    fn test_without_token_preserves_other_params() {
        let cleaned = without_token(&url("http://localhost/dashboard?x=1&token=T&y=2#top"));
        assert_eq!(cleaned.as_str(), "http://localhost/dashboard?x=1&y=2#top");

        let cleaned = without_token(&url("http://localhost/dashboard?token=T"));
        assert_eq!(cleaned.as_str(), "http://localhost/dashboard");
    }

    #[test]
    fn test_carries_token_resolves_relative_targets() {
        let base = url("http://localhost:8081/dashboard");
        assert!(carries_token("/profile?token=abc", Some(&base)));
        assert!(!carries_token("/profile?tab=2", Some(&base)));
        assert!(!carries_token("/profile", None));
    }

    #[test]
    fn test_append_token_separators() {
        assert_eq!(append_token("/profile?tab=2", "a.b.c"), "/profile?tab=2&token=a.b.c");
        assert_eq!(append_token("/profile", "a.b.c"), "/profile?token=a.b.c");
        assert_eq!(
            append_token("/job-details?id=4#apply", "a.b.c"),
            "/job-details?id=4&token=a.b.c#apply"
        );
        assert_eq!(append_token("/profile", "a+b/c="), "/profile?token=a%2Bb%2Fc%3D");
    }
}
