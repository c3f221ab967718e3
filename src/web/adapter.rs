//! Framework-agnostic request and response adapters.

use std::collections::HashMap;

use super::ResponseHeaders;

/// Request data available to [`CspPolicy::should_be_applied`](crate::CspPolicy::should_be_applied).
///
/// This type holds simple, owned data so that no framework type leaks into
/// policy definitions. Framework glue builds one per request.
///
/// # Examples
///
/// ```
/// use csp_policy::web::Request;
///
/// let mut request = Request::new("req-12345");
/// request.set_path("/admin/users");
/// request.add_header("Accept".to_string(), "text/html".to_string());
///
/// assert_eq!(request.request_id(), "req-12345");
/// assert_eq!(request.path(), "/admin/users");
/// assert_eq!(request.header("accept"), Some("text/html"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    request_id: String,
    path: String,
    headers: HashMap<String, String>,
    nonce: Option<String>,
}

impl Request {
    /// Creates a request with the given ID, root path and no headers.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            path: "/".to_string(),
            headers: HashMap::new(),
            nonce: None,
        }
    }

    /// Sets the request path.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Adds a header. Names are stored lowercased.
    pub fn add_header(&mut self, name: String, value: String) {
        self.headers.insert(name.to_ascii_lowercase(), value);
    }

    /// Fixes the CSP nonce for this request.
    ///
    /// Set it when markup is rendered before the headers are written, so the
    /// page and the headers carry the same value.
    pub fn set_nonce(&mut self, nonce: impl Into<String>) {
        self.nonce = Some(nonce.into());
    }

    /// Returns the CSP nonce fixed for this request, if any.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A minimal owned response implementing [`ResponseHeaders`].
///
/// Header order is preserved and names keep the case they were set with.
#[derive(Debug, Clone, Default)]
pub struct Response {
    headers: Vec<(String, String)>,
}

impl Response {
    /// Creates a response without headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns how many times `name` is present.
    pub fn header_count(&self, name: &str) -> usize {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .count()
    }

    /// Iterates over all headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl ResponseHeaders for Response {
    fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    fn set_header(&mut self, name: &str, value: String) {
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }
}
