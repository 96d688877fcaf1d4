//! Content-addressed short identifier derivation.

use sha2::{Digest, Sha256};

/// Length of a short identifier in hex characters.
pub const SHORT_ID_LEN: usize = 32;

/// Derives the short identifier for a URL.
///
/// SHA-256 over the raw URL bytes, truncated to 128 bits and rendered as
/// lowercase hex. The same URL always yields the same identifier, so
/// re-submitting a URL is idempotent at the identifier level.
pub fn short_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..SHORT_ID_LEN / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_is_deterministic() {
        let a = short_id("http://example.com/a");
        let b = short_id("http://example.com/a");
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_id_width_and_alphabet() {
        let id = short_id("https://rust-lang.org");
        assert_eq!(id.len(), SHORT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_distinct_urls_get_distinct_ids() {
        assert_ne!(short_id("http://example.com/a"), short_id("http://example.com/b"));
        // URLs are opaque bytes: a trailing slash is a different URL
        assert_ne!(short_id("http://example.com"), short_id("http://example.com/"));
    }
}
