//! CSP keyword tokens.
//!
//! Keywords are written unquoted when building a policy and are wrapped in
//! single quotes by the [sanitizer](crate::sanitizer) on output.

/// `'none'`: matches nothing. Must be the only value of its directive.
pub const NONE: &str = "none";
/// `'report-sample'`
pub const REPORT_SAMPLE: &str = "report-sample";
/// `'self'`
pub const SELF: &str = "self";
/// `'strict-dynamic'`
pub const STRICT_DYNAMIC: &str = "strict-dynamic";
/// `'unsafe-eval'`
pub const UNSAFE_EVAL: &str = "unsafe-eval";
/// `'unsafe-hashes'`
pub const UNSAFE_HASHES: &str = "unsafe-hashes";
/// `'unsafe-inline'`
pub const UNSAFE_INLINE: &str = "unsafe-inline";

/// Every keyword token.
pub const ALL: &[&str] = &[
    NONE,
    REPORT_SAMPLE,
    SELF,
    STRICT_DYNAMIC,
    UNSAFE_EVAL,
    UNSAFE_HASHES,
    UNSAFE_INLINE,
];

/// Returns `true` if `value` is a bare (unquoted) keyword.
pub fn is_keyword(value: &str) -> bool {
    ALL.contains(&value)
}
