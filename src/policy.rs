use std::fmt;
use std::sync::Arc;

use crate::config::CspConfig;
use crate::error::Error;
use crate::nonce::{NonceGenerator, RandomString};
use crate::sanitizer::sanitize;
use crate::value::Value;
use crate::web::{Request, ResponseHeaders};
use crate::{directive, keyword};

/// Header name used when the policy is enforced.
pub const ENFORCE_HEADER: &str = "Content-Security-Policy";

/// Header name used when the policy only reports violations.
pub const REPORT_ONLY_HEADER: &str = "Content-Security-Policy-Report-Only";

/// Whether browsers enforce the policy or only report violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Violations are blocked.
    #[default]
    Enforce,
    /// Violations are only reported.
    ReportOnly,
}

impl Mode {
    /// Returns the response header name for this mode.
    pub fn header_name(self) -> &'static str {
        match self {
            Mode::Enforce => ENFORCE_HEADER,
            Mode::ReportOnly => REPORT_ONLY_HEADER,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Enforce => write!(f, "enforce"),
            Mode::ReportOnly => write!(f, "report-only"),
        }
    }
}

/// A named policy definition.
///
/// Implementations populate a fresh [`Policy`] in [`configure`](Self::configure).
/// They are shared between requests behind an `Arc`, so any state they hold
/// must be immutable; per-request state lives in the `Policy` they receive.
///
/// # Examples
///
/// ```
/// use csp_policy::{directive, keyword, CspPolicy, Error, Policy};
///
/// struct SameOrigin;
///
/// impl CspPolicy for SameOrigin {
///     fn configure(&self, policy: &mut Policy) -> Result<(), Error> {
///         policy
///             .add_directive(directive::DEFAULT, keyword::SELF)?
///             .add_directive(directive::OBJECT, keyword::NONE)?;
///         Ok(())
///     }
/// }
///
/// let mut policy = Policy::from_definition(SameOrigin);
/// policy.configure().unwrap();
/// assert_eq!(policy.to_string(), "default-src 'self';object-src 'none'");
/// ```
pub trait CspPolicy: Send + Sync {
    /// Adds this definition's directives to `policy`.
    ///
    /// # Errors
    ///
    /// Propagates any [`Error`] raised by the builder calls.
    fn configure(&self, policy: &mut Policy) -> Result<(), Error>;

    /// Decides whether the policy is written to `response` at all.
    ///
    /// The default reads the global `enabled` switch.
    fn should_be_applied(
        &self,
        config: &CspConfig,
        _request: &Request,
        _response: &dyn ResponseHeaders,
    ) -> bool {
        config.enabled
    }
}

impl<F> CspPolicy for F
where
    F: Fn(&mut Policy) -> Result<(), Error> + Send + Sync,
{
    fn configure(&self, policy: &mut Policy) -> Result<(), Error> {
        self(policy)
    }
}

/// Mutable builder for a single Content-Security-Policy header.
///
/// A `Policy` is created per request, filled through its builder methods
/// (usually from a [`CspPolicy::configure`] implementation), serialized once
/// and dropped. Every builder method mutates in place and returns `&mut Self`
/// so calls chain; the fallible ones return `Result<&mut Self, Error>` and
/// chain with `?`.
///
/// Directive order and value order follow insertion order.
///
/// # Examples
///
/// ```
/// use csp_policy::{directive, keyword, scheme, Policy, Value};
///
/// let mut policy = Policy::new();
/// policy
///     .add_directive(directive::SCRIPT, [keyword::SELF, "https://cdn.example.com"])?
///     .add_directive(directive::IMG, vec![keyword::SELF, scheme::DATA])?
///     .add_directive(directive::UPGRADE_INSECURE_REQUESTS, Value::NoValue)?
///     .report_only();
///
/// assert_eq!(
///     policy.to_string(),
///     "script-src 'self' https://cdn.example.com;img-src 'self' data:;upgrade-insecure-requests"
/// );
/// assert_eq!(policy.header_name(), "Content-Security-Policy-Report-Only");
/// # Ok::<(), csp_policy::Error>(())
/// ```
pub struct Policy {
    directives: Vec<(String, Vec<String>)>,
    mode: Mode,
    nonce: Option<String>,
    nonce_generator: Arc<dyn NonceGenerator>,
    definition: Option<Arc<dyn CspPolicy>>,
    config: Arc<CspConfig>,
}

impl Policy {
    /// Creates an empty, enforcing policy with no definition attached.
    ///
    /// [`configure`](Self::configure) is a no-op on such a policy.
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            mode: Mode::Enforce,
            nonce: None,
            nonce_generator: Arc::new(RandomString),
            definition: None,
            config: Arc::new(CspConfig::default()),
        }
    }

    /// Creates an empty policy that [`configure`](Self::configure)s itself
    /// from `definition`.
    pub fn from_definition(definition: impl CspPolicy + 'static) -> Self {
        Self {
            definition: Some(Arc::new(definition)),
            ..Self::new()
        }
    }

    pub(crate) fn with_parts(
        definition: Arc<dyn CspPolicy>,
        nonce_generator: Arc<dyn NonceGenerator>,
        config: Arc<CspConfig>,
    ) -> Self {
        Self {
            directives: Vec::new(),
            mode: Mode::Enforce,
            nonce: None,
            nonce_generator,
            definition: Some(definition),
            config,
        }
    }

    /// Replaces the nonce generator.
    pub fn with_nonce_generator(mut self, generator: impl NonceGenerator + 'static) -> Self {
        self.nonce_generator = Arc::new(generator);
        self
    }

    /// Fixes the nonce instead of generating one on first use.
    ///
    /// Every policy written for the same response must be given the same
    /// nonce, otherwise inline content matches at most one of the headers.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Replaces the configuration consulted by [`should_be_applied`](Self::should_be_applied).
    pub fn with_config(mut self, config: CspConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Adds values to a directive.
    ///
    /// Values are split on spaces, sanitized (keywords and hashes quoted) and
    /// appended in order, skipping any already present. A lone `'none'` left
    /// by an earlier call is removed first. Passing exactly `none` instead
    /// replaces every value of the directive. [`Value::NoValue`] only makes
    /// the directive present, which renders it without parameters; on a
    /// directive that already has values it changes nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDirective`] if `name` is not a known directive.
    /// - [`Error::InvalidValueSet`] if `none` is combined with other values.
    ///
    /// The policy is left untouched on error.
    pub fn add_directive(
        &mut self,
        name: &str,
        values: impl Into<Value>,
    ) -> Result<&mut Self, Error> {
        if !directive::is_valid(name) {
            tracing::warn!(directive = %name, "rejected unknown CSP directive");
            return Err(Error::invalid_directive(name));
        }

        let values: Value = values.into();
        if values == Value::NoValue {
            self.entry(name);
            tracing::debug!(directive = %name, "added CSP directive without value");
            return Ok(self);
        }

        let tokens = values.tokens();
        let has_none = tokens.iter().any(|token| is_none(token));
        if has_none && tokens.len() > 1 {
            tracing::warn!(directive = %name, "rejected none combined with other values");
            return Err(Error::InvalidValueSet);
        }

        let none = sanitize(keyword::NONE);
        let entry = self.entry(name);

        if has_none {
            entry.clear();
            entry.push(none);
        } else {
            entry.retain(|value| *value != none);
            for token in tokens {
                let sanitized = sanitize(token);
                if !entry.contains(&sanitized) {
                    entry.push(sanitized);
                }
            }
        }

        tracing::debug!(directive = %name, values = entry.len(), "updated CSP directive");
        Ok(self)
    }

    /// Adds `'nonce-<token>'` to a directive.
    ///
    /// The token comes from [`nonce`](Self::nonce), so every directive of one
    /// policy shares the same nonce.
    ///
    /// # Errors
    ///
    /// Same as [`add_directive`](Self::add_directive).
    pub fn add_nonce_for_directive(&mut self, name: &str) -> Result<&mut Self, Error> {
        let source = format!("'nonce-{}'", self.nonce());
        self.add_directive(name, source)
    }

    /// Returns this policy's nonce, generating it on first use unless one was
    /// given with [`with_nonce`](Self::with_nonce).
    ///
    /// Markup rendered for the same response must carry this value in its
    /// `nonce` attributes.
    pub fn nonce(&mut self) -> &str {
        let generator = &self.nonce_generator;
        self.nonce.get_or_insert_with(|| generator.generate())
    }

    /// Sets `report-uri` to exactly `uri`, replacing any previous value.
    ///
    /// The URI is written as given, without sanitizing.
    pub fn report_to(&mut self, uri: impl Into<String>) -> &mut Self {
        let uri = uri.into();
        tracing::debug!(uri = %uri, "setting CSP report-uri");
        *self.entry(directive::REPORT) = vec![uri];
        self
    }

    /// Switches to report-only mode.
    pub fn report_only(&mut self) -> &mut Self {
        self.mode = Mode::ReportOnly;
        self
    }

    /// Switches to enforcing mode (the initial mode).
    pub fn enforce(&mut self) -> &mut Self {
        self.mode = Mode::Enforce;
        self
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` in report-only mode.
    pub fn is_report_only(&self) -> bool {
        self.mode == Mode::ReportOnly
    }

    /// Returns the header name matching the current mode.
    pub fn header_name(&self) -> &'static str {
        self.mode.header_name()
    }

    /// Runs the attached definition's [`CspPolicy::configure`].
    ///
    /// # Errors
    ///
    /// Propagates the definition's error.
    pub fn configure(&mut self) -> Result<(), Error> {
        match self.definition.clone() {
            Some(definition) => definition.configure(self),
            None => Ok(()),
        }
    }

    /// Asks the attached definition whether to emit the header.
    ///
    /// Without a definition this is the configured `enabled` switch.
    pub fn should_be_applied(&self, request: &Request, response: &dyn ResponseHeaders) -> bool {
        match &self.definition {
            Some(definition) => definition.should_be_applied(&self.config, request, response),
            None => self.config.enabled,
        }
    }

    /// Configures the policy and writes its header to `response`.
    ///
    /// The header is only written if `response` does not carry it yet, so a
    /// second call is a no-op for the same mode.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`configure`](Self::configure); the response is
    /// not touched in that case.
    pub fn apply_to<R>(&mut self, response: &mut R) -> Result<(), Error>
    where
        R: ResponseHeaders + ?Sized,
    {
        self.configure()?;

        let header = self.header_name();
        if response.has_header(header) {
            tracing::debug!(header, "CSP header already present, leaving it untouched");
            return Ok(());
        }

        let value = self.serialize();
        tracing::debug!(header, value = %value, "writing CSP header");
        response.set_header(header, value);
        Ok(())
    }

    /// Renders the header value.
    ///
    /// Each directive renders as its name followed by its space-separated
    /// values (or just its name when it has none); directives are joined with
    /// `;` and there is no trailing separator.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Returns the stored values of a directive, if present.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.directives
            .iter()
            .find(|(directive, _)| directive == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterates over directives and their values in insertion order.
    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives
            .iter()
            .map(|(directive, values)| (directive.as_str(), values.as_slice()))
    }

    /// Returns `true` if no directive has been added.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn entry(&mut self, name: &str) -> &mut Vec<String> {
        let index = match self.directives.iter().position(|(d, _)| d == name) {
            Some(index) => index,
            None => {
                self.directives.push((name.to_string(), Vec::new()));
                self.directives.len() - 1
            }
        };
        &mut self.directives[index].1
    }
}

fn is_none(token: &str) -> bool {
    token == keyword::NONE || token == "'none'"
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (directive, values)) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            f.write_str(directive)?;
            if !values.is_empty() {
                write!(f, " {}", values.join(" "))?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("directives", &self.directives)
            .field("mode", &self.mode)
            .field("has_nonce", &self.nonce.is_some())
            .field("has_definition", &self.definition.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::Response;

    fn fixed_nonce() -> String {
        "fixednonce".to_string()
    }

    #[test]
    fn new_policy_is_empty_and_enforcing() {
        let policy = Policy::new();
        assert!(policy.is_empty());
        assert_eq!(policy.mode(), Mode::Enforce);
        assert_eq!(policy.header_name(), ENFORCE_HEADER);
        assert_eq!(policy.serialize(), "");
    }

    #[test]
    fn unknown_directive_is_rejected_without_mutation() {
        let mut policy = Policy::new();
        let err = policy.add_directive("invalid", keyword::SELF).unwrap_err();

        assert_eq!(err, Error::invalid_directive("invalid"));
        assert!(policy.is_empty());
    }

    #[test]
    fn none_is_the_only_value() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::SCRIPT, "https://a.com")
            .unwrap()
            .add_directive(directive::SCRIPT, keyword::NONE)
            .unwrap();

        assert_eq!(policy.serialize(), "script-src 'none'");
    }

    #[test]
    fn later_value_clears_none() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::SCRIPT, keyword::NONE)
            .unwrap()
            .add_directive(directive::SCRIPT, keyword::SELF)
            .unwrap();

        assert_eq!(policy.serialize(), "script-src 'self'");
    }

    #[test]
    fn none_with_other_values_is_rejected() {
        let mut policy = Policy::new();
        policy.add_directive(directive::SCRIPT, keyword::SELF).unwrap();

        let err = policy
            .add_directive(directive::SCRIPT, [keyword::SELF, keyword::NONE])
            .unwrap_err();
        assert_eq!(err, Error::InvalidValueSet);

        let err = policy
            .add_directive(directive::SCRIPT, "none https://a.com")
            .unwrap_err();
        assert_eq!(err, Error::InvalidValueSet);

        assert_eq!(policy.serialize(), "script-src 'self'");
    }

    #[test]
    fn pre_quoted_none_is_treated_as_none() {
        let mut policy = Policy::new();
        policy.add_directive(directive::OBJECT, "'none'").unwrap();
        assert_eq!(policy.values(directive::OBJECT), Some(&["'none'".to_string()][..]));

        assert!(policy
            .add_directive(directive::OBJECT, "'none' 'self'")
            .is_err());
    }

    #[test]
    fn values_are_deduplicated() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::SCRIPT, "https://a.com")
            .unwrap()
            .add_directive(directive::SCRIPT, "https://a.com")
            .unwrap()
            .add_directive(directive::SCRIPT, ["self", "'self'"])
            .unwrap();

        assert_eq!(policy.serialize(), "script-src https://a.com 'self'");
    }

    #[test]
    fn space_joined_string_is_split() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::SCRIPT, "'unsafe-inline' 'unsafe-eval'")
            .unwrap();

        assert_eq!(
            policy.values(directive::SCRIPT),
            Some(&["'unsafe-inline'".to_string(), "'unsafe-eval'".to_string()][..])
        );
    }

    #[test]
    fn hashes_are_quoted_and_hosts_are_not() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::STYLE, ["sha256-abc123", "https://example.com"])
            .unwrap();

        assert_eq!(policy.serialize(), "style-src 'sha256-abc123' https://example.com");
    }

    #[test]
    fn no_value_renders_bare_directive() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::UPGRADE_INSECURE_REQUESTS, Value::NoValue)
            .unwrap()
            .add_directive(directive::DEFAULT, keyword::SELF)
            .unwrap();

        assert_eq!(policy.serialize(), "upgrade-insecure-requests;default-src 'self'");
    }

    #[test]
    fn no_value_skips_none_check() {
        let mut policy = Policy::new();
        policy.add_directive(directive::OBJECT, keyword::NONE).unwrap();
        policy.add_directive(directive::OBJECT, Value::NoValue).unwrap();

        assert_eq!(policy.serialize(), "object-src 'none'");
    }

    #[test]
    fn no_value_keeps_existing_values() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::SCRIPT, [keyword::SELF, "https://a.com"])
            .unwrap()
            .add_directive(directive::SCRIPT, Value::NoValue)
            .unwrap();

        assert_eq!(
            policy.values(directive::SCRIPT),
            Some(&["'self'".to_string(), "https://a.com".to_string()][..])
        );
        assert_eq!(policy.serialize(), "script-src 'self' https://a.com");
    }

    #[test]
    fn report_to_overrides_without_quoting() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::DEFAULT, keyword::SELF)
            .unwrap()
            .report_to("https://old.example/csp")
            .report_to("https://report.example/csp");

        assert_eq!(
            policy.serialize(),
            "default-src 'self';report-uri https://report.example/csp"
        );
    }

    #[test]
    fn directive_order_is_preserved_on_update() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::SCRIPT, keyword::SELF)
            .unwrap()
            .add_directive(directive::STYLE, keyword::SELF)
            .unwrap()
            .add_directive(directive::SCRIPT, "https://a.com")
            .unwrap();

        let names: Vec<&str> = policy.directives().map(|(d, _)| d).collect();
        assert_eq!(names, vec![directive::SCRIPT, directive::STYLE]);
    }

    #[test]
    fn mode_transitions() {
        let mut policy = Policy::new();
        policy.report_only();
        assert!(policy.is_report_only());
        assert_eq!(policy.header_name(), REPORT_ONLY_HEADER);

        policy.enforce();
        assert_eq!(policy.mode(), Mode::Enforce);
        assert_eq!(policy.header_name(), ENFORCE_HEADER);
    }

    #[test]
    fn nonce_is_formatted_and_shared() {
        let mut policy = Policy::new().with_nonce_generator(fixed_nonce);
        policy
            .add_nonce_for_directive(directive::SCRIPT)
            .unwrap()
            .add_nonce_for_directive(directive::STYLE)
            .unwrap();

        assert_eq!(
            policy.serialize(),
            "script-src 'nonce-fixednonce';style-src 'nonce-fixednonce'"
        );
        assert_eq!(policy.nonce(), "fixednonce");
    }

    #[test]
    fn given_nonce_is_used_instead_of_generator() {
        let mut policy = Policy::new()
            .with_nonce_generator(fixed_nonce)
            .with_nonce("shared");
        policy.add_nonce_for_directive(directive::SCRIPT).unwrap();

        assert_eq!(policy.serialize(), "script-src 'nonce-shared'");
        assert_eq!(policy.nonce(), "shared");
    }

    #[test]
    fn nonce_clears_lone_none() {
        let mut policy = Policy::new().with_nonce_generator(fixed_nonce);
        policy.add_directive(directive::SCRIPT, keyword::NONE).unwrap();
        policy.add_nonce_for_directive(directive::SCRIPT).unwrap();

        assert_eq!(policy.serialize(), "script-src 'nonce-fixednonce'");
    }

    #[test]
    fn nonce_for_unknown_directive_fails() {
        let mut policy = Policy::new();
        assert!(policy.add_nonce_for_directive("scripts").is_err());
    }

    #[test]
    fn apply_to_writes_header_once() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let calls = Arc::new(calls);
        let counter = Arc::clone(&calls);

        let mut policy = Policy::from_definition(move |policy: &mut Policy| -> Result<(), Error> {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            policy.add_directive(directive::DEFAULT, keyword::SELF)?;
            Ok(())
        });
        let mut response = Response::new();

        policy.apply_to(&mut response).unwrap();
        policy.apply_to(&mut response).unwrap();

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(response.header(ENFORCE_HEADER), Some("default-src 'self'"));
        assert_eq!(response.header_count(ENFORCE_HEADER), 1);
    }

    #[test]
    fn apply_to_respects_existing_header() {
        let mut response = Response::new();
        response.set_header(ENFORCE_HEADER, "default-src 'none'".to_string());

        let mut policy = Policy::new();
        policy.add_directive(directive::DEFAULT, keyword::SELF).unwrap();
        policy.apply_to(&mut response).unwrap();

        assert_eq!(response.header(ENFORCE_HEADER), Some("default-src 'none'"));
    }

    #[test]
    fn apply_to_uses_report_only_header() {
        let mut policy = Policy::new();
        policy
            .add_directive(directive::DEFAULT, keyword::SELF)
            .unwrap()
            .report_only();
        let mut response = Response::new();

        policy.apply_to(&mut response).unwrap();

        assert!(response.has_header(REPORT_ONLY_HEADER));
        assert!(!response.has_header(ENFORCE_HEADER));
    }

    #[test]
    fn apply_to_propagates_configure_errors() {
        let mut policy = Policy::from_definition(|policy: &mut Policy| -> Result<(), Error> {
            policy.add_directive("bogus", "x")?;
            Ok(())
        });
        let mut response = Response::new();

        let err = policy.apply_to(&mut response).unwrap_err();
        assert_eq!(err, Error::invalid_directive("bogus"));
        assert!(!response.has_header(ENFORCE_HEADER));
    }

    #[test]
    fn should_be_applied_follows_enabled_flag() {
        let request = Request::new("req-1");
        let response = Response::new();

        let enabled = Policy::new();
        assert!(enabled.should_be_applied(&request, &response));

        let disabled = Policy::new().with_config(CspConfig {
            enabled: false,
            ..CspConfig::default()
        });
        assert!(!disabled.should_be_applied(&request, &response));
    }

    #[test]
    fn debug_does_not_leak_nonce() {
        let mut policy = Policy::new().with_nonce_generator(fixed_nonce);
        let _ = policy.nonce();
        let debug = format!("{:?}", policy);
        assert!(!debug.contains("fixednonce"));
        assert!(debug.contains("has_nonce: true"));
    }
}
