//! Filesystem-safe cache keys derived from resource identifiers.

/// Character substituted for anything that is not an ASCII letter or digit.
pub const SUBSTITUTE: char = '_';

/// Replaces every character that is not `[A-Za-z0-9]` with [`SUBSTITUTE`].
///
/// Total and deterministic: the empty string maps to the empty string and
/// every non-ASCII code point becomes a single `_`. Distinct inputs that only
/// differ in replaced characters collide; that is accepted.
#[must_use]
pub fn sanitize(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { SUBSTITUTE })
        .collect()
}

/// Key under which an image is stored in both cache tiers.
///
/// Always built through [`sanitize`], so it doubles as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a resource identifier (typically an absolute URL).
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        Self(sanitize(identifier))
    }

    /// Returns the sanitized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::from_identifier(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::from_identifier(&s)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", ""; "empty")]
    #[test_case("abcXYZ019", "abcXYZ019"; "already safe")]
    #[test_case("https://example.com/a.jpg", "https___example_com_a_jpg"; "url")]
    #[test_case("a b\tc\n", "a_b_c_"; "whitespace")]
    #[test_case("crème brûlée", "cr_me_br_l_e"; "non ascii letters")]
    #[test_case("🍕/🍣", "___"; "emoji count as one char each")]
    #[test_case("../../etc/passwd", "______etc_passwd"; "path traversal")]
    fn test_sanitize(input: &str, expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "",
            "plain",
            "https://d3jbb8n5wk0qxi.cloudfront.net/photos/b9ab0071/small.jpg",
            "~!@#$%^&*()_+{}|:\"<>?",
            "日本語のテキスト",
            "__already__underscored__",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_sanitize_output_alphabet() {
        let input: String = (0u32..0x3000).filter_map(char::from_u32).collect();
        let output = sanitize(&input);
        assert!(
            output
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == SUBSTITUTE)
        );
        assert_eq!(output.chars().count(), input.chars().count());
    }

    #[test]
    fn test_cache_key_from_identifier() {
        let key = CacheKey::from_identifier("https://example.com/image.png");
        assert_eq!(key.as_str(), "https___example_com_image_png");
        assert_eq!(key, CacheKey::from("https://example.com/image.png"));
    }

    #[test]
    fn test_known_collision_is_accepted() {
        assert_eq!(CacheKey::from("a/b"), CacheKey::from("a.b"));
    }
}
