//! Scheme source tokens. These are plain literals and never quoted.

/// `data:`
pub const DATA: &str = "data:";
/// `http:`
pub const HTTP: &str = "http:";
/// `https:`
pub const HTTPS: &str = "https:";
/// `blob:`
pub const BLOB: &str = "blob:";
/// `ws:`
pub const WS: &str = "ws:";

/// Every scheme token.
pub const ALL: &[&str] = &[DATA, HTTP, HTTPS, BLOB, WS];

/// Returns `true` if `value` is one of the known scheme tokens.
pub fn is_scheme(value: &str) -> bool {
    ALL.contains(&value)
}
