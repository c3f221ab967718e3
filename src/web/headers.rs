//! Response header boundary.

/// The part of an HTTP response the header applier needs.
///
/// Framework integrations implement this for their response type. Header
/// names must be compared case-insensitively, as HTTP requires.
///
/// # Examples
///
/// ```
/// use csp_policy::web::ResponseHeaders;
///
/// #[derive(Default)]
/// struct Headers(Vec<(String, String)>);
///
/// impl ResponseHeaders for Headers {
///     fn has_header(&self, name: &str) -> bool {
///         self.0.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
///     }
///
///     fn set_header(&mut self, name: &str, value: String) {
///         self.0.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
///         self.0.push((name.to_string(), value));
///     }
/// }
///
/// let mut headers = Headers::default();
/// headers.set_header("Content-Security-Policy", "default-src 'self'".to_string());
/// assert!(headers.has_header("content-security-policy"));
/// ```
pub trait ResponseHeaders {
    /// Returns `true` if the response already carries `name`.
    fn has_header(&self, name: &str) -> bool;

    /// Sets `name` to `value`, replacing any existing value.
    fn set_header(&mut self, name: &str, value: String);
}
