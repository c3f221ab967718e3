//! Registry of recognized CSP directive names.
//!
//! Every directive a [`Policy`](crate::Policy) accepts must appear in [`ALL`].
//! The set is compiled in and never mutated, so lookups are safe from any
//! thread without synchronization.

/// `base-uri`
pub const BASE: &str = "base-uri";
/// `block-all-mixed-content` (takes no value)
pub const BLOCK_ALL_MIXED_CONTENT: &str = "block-all-mixed-content";
/// `child-src`
pub const CHILD: &str = "child-src";
/// `connect-src`
pub const CONNECT: &str = "connect-src";
/// `default-src`
pub const DEFAULT: &str = "default-src";
/// `font-src`
pub const FONT: &str = "font-src";
/// `form-action`
pub const FORM_ACTION: &str = "form-action";
/// `frame-ancestors`
pub const FRAME_ANCESTORS: &str = "frame-ancestors";
/// `frame-src`
pub const FRAME: &str = "frame-src";
/// `img-src`
pub const IMG: &str = "img-src";
/// `manifest-src`
pub const MANIFEST: &str = "manifest-src";
/// `media-src`
pub const MEDIA: &str = "media-src";
/// `navigate-to`
pub const NAVIGATE_TO: &str = "navigate-to";
/// `object-src`
pub const OBJECT: &str = "object-src";
/// `plugin-types`
pub const PLUGIN: &str = "plugin-types";
/// `prefetch-src`
pub const PREFETCH: &str = "prefetch-src";
/// `report-to`
pub const REPORT_TO: &str = "report-to";
/// `report-uri`
pub const REPORT: &str = "report-uri";
/// `require-sri-for`
pub const REQUIRE_SRI: &str = "require-sri-for";
/// `sandbox`
pub const SANDBOX: &str = "sandbox";
/// `script-src`
pub const SCRIPT: &str = "script-src";
/// `script-src-attr`
pub const SCRIPT_ATTR: &str = "script-src-attr";
/// `script-src-elem`
pub const SCRIPT_ELEM: &str = "script-src-elem";
/// `style-src`
pub const STYLE: &str = "style-src";
/// `style-src-attr`
pub const STYLE_ATTR: &str = "style-src-attr";
/// `style-src-elem`
pub const STYLE_ELEM: &str = "style-src-elem";
/// `upgrade-insecure-requests` (takes no value)
pub const UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";
/// `worker-src`
pub const WORKER: &str = "worker-src";

/// Every directive name accepted in a policy.
pub const ALL: &[&str] = &[
    BASE,
    BLOCK_ALL_MIXED_CONTENT,
    CHILD,
    CONNECT,
    DEFAULT,
    FONT,
    FORM_ACTION,
    FRAME_ANCESTORS,
    FRAME,
    IMG,
    MANIFEST,
    MEDIA,
    NAVIGATE_TO,
    OBJECT,
    PLUGIN,
    PREFETCH,
    REPORT_TO,
    REPORT,
    REQUIRE_SRI,
    SANDBOX,
    SCRIPT,
    SCRIPT_ATTR,
    SCRIPT_ELEM,
    STYLE,
    STYLE_ATTR,
    STYLE_ELEM,
    UPGRADE_INSECURE_REQUESTS,
    WORKER,
];

/// Returns `true` if `name` is a recognized directive.
///
/// Matching is exact: directive names are lowercase on the wire and this
/// registry does not normalize case.
///
/// # Examples
///
/// ```
/// use csp_policy::directive;
///
/// assert!(directive::is_valid(directive::BASE));
/// assert!(directive::is_valid("script-src"));
/// assert!(!directive::is_valid("invalid"));
/// ```
pub fn is_valid(name: &str) -> bool {
    ALL.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_directive_is_valid() {
        assert!(is_valid(BASE));
        assert!(is_valid("upgrade-insecure-requests"));
    }

    #[test]
    fn unknown_directive_is_invalid() {
        assert!(!is_valid("invalid"));
        assert!(!is_valid(""));
        assert!(!is_valid("SCRIPT-SRC"));
        assert!(!is_valid(" script-src"));
    }

    #[test]
    fn registry_has_no_duplicates() {
        let mut names: Vec<&str> = ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }
}
