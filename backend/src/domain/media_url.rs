//! Extraction of trusted media URLs from free-form capability output.
//!
//! The generation capability reports its result as prose. The only part the
//! pipeline acts on is the first `http(s)` URL whose host belongs to an
//! allow-listed storage domain; every other link is ignored.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

#[expect(
    clippy::expect_used,
    reason = "pattern is a compile-time constant covered by unit tests"
)]
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("URL pattern compiles"));

// Sentence punctuation that commonly trails a URL in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', ']', '>'];

/// Return the first URL in `content` whose host is trusted.
///
/// A host is trusted when it equals one of `allowed_hosts` or is a subdomain
/// of one. Comparison is case-insensitive.
///
/// # Examples
/// ```
/// use babygen::domain::extract_trusted_media_url;
///
/// let allowed = vec!["storage.googleapis.com".to_owned()];
/// let content = "See https://evil.test/x.png or (https://storage.googleapis.com/b/x.png).";
/// let url = extract_trusted_media_url(content, &allowed).expect("trusted url");
/// assert_eq!(url.as_str(), "https://storage.googleapis.com/b/x.png");
/// ```
pub fn extract_trusted_media_url(content: &str, allowed_hosts: &[String]) -> Option<Url> {
    URL_PATTERN
        .find_iter(content)
        .map(|candidate| candidate.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .filter_map(|candidate| Url::parse(candidate).ok())
        .find(|url| is_trusted_host(url, allowed_hosts))
}

/// Whether `url`'s host equals or sits beneath an allow-listed domain.
pub fn is_trusted_host(url: &Url, allowed_hosts: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    allowed_hosts.iter().any(|allowed| {
        let allowed = allowed.trim().trim_end_matches('.').to_ascii_lowercase();
        if allowed.is_empty() {
            return false;
        }
        host == allowed
            || host
                .strip_suffix(allowed.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn allowed() -> Vec<String> {
        vec!["storage.googleapis.com".to_owned()]
    }

    #[rstest]
    #[case(
        "Here you go: https://storage.googleapis.com/bucket/baby.png",
        "https://storage.googleapis.com/bucket/baby.png"
    )]
    #[case(
        "Image (https://storage.googleapis.com/bucket/baby.png) generated.",
        "https://storage.googleapis.com/bucket/baby.png"
    )]
    #[case(
        "Done: http://storage.googleapis.com/b/x.jpg.",
        "http://storage.googleapis.com/b/x.jpg"
    )]
    #[case(
        "first https://cdn.example.com/a.png then https://storage.googleapis.com/b.png",
        "https://storage.googleapis.com/b.png"
    )]
    #[case(
        "regional https://eu.storage.googleapis.com/b.png",
        "https://eu.storage.googleapis.com/b.png"
    )]
    #[case(
        "upper https://STORAGE.googleapis.com/b.png",
        "https://storage.googleapis.com/b.png"
    )]
    fn extracts_first_trusted_url(
        allowed: Vec<String>,
        #[case] content: &str,
        #[case] expected: &str,
    ) {
        let url = extract_trusted_media_url(content, &allowed).expect("trusted url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("no links at all")]
    #[case("https://cdn.example.com/a.png")]
    #[case("https://storage.googleapis.com.evil.test/a.png")]
    #[case("https://evilstorage.googleapis.com/a.png")]
    #[case("ftp://storage.googleapis.com/a.png")]
    #[case("storage.googleapis.com/a.png without scheme")]
    fn ignores_untrusted_content(allowed: Vec<String>, #[case] content: &str) {
        assert_eq!(extract_trusted_media_url(content, &allowed), None);
    }

    #[rstest]
    fn empty_allow_list_trusts_nothing() {
        let content = "https://storage.googleapis.com/a.png";
        assert_eq!(extract_trusted_media_url(content, &[]), None);
        assert_eq!(extract_trusted_media_url(content, &[String::new()]), None);
    }

    #[rstest]
    fn allow_list_entries_are_normalised() {
        let allowed = vec![" Storage.GoogleAPIs.com. ".to_owned()];
        let url = Url::parse("https://storage.googleapis.com/a.png").expect("valid url");
        assert!(is_trusted_host(&url, &allowed));
    }
}
