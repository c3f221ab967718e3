//! Configuration surface read by the factory and the header middleware.
//!
//! The crate never loads files itself. Host applications deserialize
//! [`CspConfig`] from wherever they keep settings, typically a `[csp]` table:
//!
//! ```toml
//! [csp]
//! enabled = true
//! policy = "basic"
//! report_only_policy = "strict"
//! report_uri = "https://report.example/csp"
//! ```

use serde::{Deserialize, Serialize};

/// CSP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CspConfig {
    /// Master switch consulted by [`CspPolicy::should_be_applied`](crate::CspPolicy::should_be_applied).
    pub enabled: bool,

    /// Name of the enforcing policy the middleware applies to every response.
    pub policy: Option<String>,

    /// Name of a policy applied in report-only mode alongside the enforcing one.
    pub report_only_policy: Option<String>,

    /// Appended as `report-uri` to every policy the factory creates.
    pub report_uri: Option<String>,
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: None,
            report_only_policy: None,
            report_uri: None,
        }
    }
}

impl CspConfig {
    /// Returns the report URI if one is configured and non-empty.
    pub fn report_uri(&self) -> Option<&str> {
        self.report_uri.as_deref().filter(|uri| !uri.is_empty())
    }
}
