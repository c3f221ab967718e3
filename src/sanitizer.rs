//! Classification and quoting of directive values.

use std::fmt;

use crate::keyword;

/// Prefixes identifying a hash-source, one per accepted digest algorithm.
pub const HASH_PREFIXES: &[&str] = &["sha256-", "sha384-", "sha512-"];

/// Category of a raw value token.
///
/// The category decides how the token is written on the wire: keywords and
/// hashes are single-quoted, everything else is passed through.
///
/// # Examples
///
/// ```
/// use csp_policy::sanitizer::{classify, ValueKind};
///
/// assert_eq!(classify("self"), ValueKind::Keyword);
/// assert_eq!(classify("sha384-abc"), ValueKind::Hash);
/// assert_eq!(classify("https://cdn.example.com"), ValueKind::Literal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A bare keyword such as `self` or `none`.
    Keyword,
    /// A hash-source such as `sha256-<base64>`.
    Hash,
    /// Hosts, schemes, pre-quoted nonces and anything else.
    Literal,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Keyword => write!(f, "keyword"),
            ValueKind::Hash => write!(f, "hash"),
            ValueKind::Literal => write!(f, "literal"),
        }
    }
}

/// Classifies a single raw token.
pub fn classify(value: &str) -> ValueKind {
    if keyword::is_keyword(value) {
        ValueKind::Keyword
    } else if is_hash(value) {
        ValueKind::Hash
    } else {
        ValueKind::Literal
    }
}

/// Returns `true` if `value` starts with one of the [`HASH_PREFIXES`].
pub fn is_hash(value: &str) -> bool {
    HASH_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

/// Converts a raw token into its wire form.
///
/// Keywords and hashes are wrapped in single quotes. Literals are returned
/// unchanged, which means a caller who already quoted a keyword
/// (`'self'`) gets it back as-is rather than double-quoted.
///
/// # Examples
///
/// ```
/// use csp_policy::sanitizer::sanitize;
///
/// assert_eq!(sanitize("self"), "'self'");
/// assert_eq!(sanitize("sha256-abc123"), "'sha256-abc123'");
/// assert_eq!(sanitize("https://example.com"), "https://example.com");
/// assert_eq!(sanitize("'nonce-xyz'"), "'nonce-xyz'");
/// ```
pub fn sanitize(value: &str) -> String {
    match classify(value) {
        ValueKind::Keyword | ValueKind::Hash => format!("'{value}'"),
        ValueKind::Literal => value.to_string(),
    }
}
