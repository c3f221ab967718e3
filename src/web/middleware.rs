//! Response middleware writing CSP headers.
//!
//! ```text
//! Response produced by the handler
//!   ↓
//! Take the request's nonce, or draw one from the factory
//!   ↓
//! Select policy names (route override, or configured enforcing + report-only)
//!   ↓
//! PolicyFactory::create() for each name, all sharing the nonce
//!   ↓
//! Skip policies whose should_be_applied() is false
//!   ↓
//! Policy::apply_to(response)
//! ```
//!
//! One request gets one nonce. The enforcing and report-only headers written
//! for it carry the same value, and [`Applied::nonce`] hands it back so
//! markup can use it.

use crate::error::Error;
use crate::factory::PolicyFactory;
use crate::policy::Policy;

use super::{Request, ResponseHeaders};

/// Outcome of [`apply_policies`] for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    applied: usize,
    nonce: String,
}

impl Applied {
    /// Number of policies applied. A policy whose header was already present
    /// still counts; its header is left untouched.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// The nonce shared by every policy of this request.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}

/// Creates the policies that apply to one response, all using `nonce`.
///
/// With a `route_policy`, only that policy is created. Otherwise the
/// configured enforcing policy and report-only policy are created, each only
/// if its name is configured and non-empty; the second is switched to
/// report-only mode.
///
/// # Errors
///
/// Propagates [`PolicyFactory::create`] errors.
pub fn policies_for(
    factory: &PolicyFactory,
    route_policy: Option<&str>,
    nonce: &str,
) -> Result<Vec<Policy>, Error> {
    let create = |name: &str| -> Result<Policy, Error> {
        Ok(factory.create(name)?.with_nonce(nonce))
    };

    if let Some(name) = route_policy {
        return Ok(vec![create(name)?]);
    }

    let config = factory.config();
    let mut policies = Vec::with_capacity(2);

    if let Some(name) = non_empty(config.policy.as_deref()) {
        policies.push(create(name)?);
    }

    if let Some(name) = non_empty(config.report_only_policy.as_deref()) {
        let mut policy = create(name)?;
        policy.report_only();
        policies.push(policy);
    }

    Ok(policies)
}

/// Writes the CSP headers for `request` into `response`.
///
/// The nonce is the one fixed with [`Request::set_nonce`], or a fresh one
/// from [`PolicyFactory::generate_nonce`]. Either way every header written
/// here uses it, and it is returned in [`Applied`].
///
/// # Errors
///
/// Propagates factory and `configure` errors. Headers written by policies
/// processed before the failing one stay on the response.
///
/// # Examples
///
/// ```
/// use csp_policy::factory::{Container, PolicyFactory};
/// use csp_policy::presets::Basic;
/// use csp_policy::web::{apply_policies, Request, Response};
/// use csp_policy::CspConfig;
///
/// let mut container = Container::new();
/// container.bind_policy::<Basic>("basic");
/// let config = CspConfig {
///     policy: Some("basic".to_string()),
///     ..CspConfig::default()
/// };
/// let factory = PolicyFactory::new(container, config);
///
/// let request = Request::new("req-1");
/// let mut response = Response::new();
/// let outcome = apply_policies(&factory, &request, &mut response, None)?;
///
/// assert_eq!(outcome.applied(), 1);
/// let header = response.header("Content-Security-Policy").unwrap();
/// assert!(header.contains(&format!("'nonce-{}'", outcome.nonce())));
/// # Ok::<(), csp_policy::Error>(())
/// ```
pub fn apply_policies<R>(
    factory: &PolicyFactory,
    request: &Request,
    response: &mut R,
    route_policy: Option<&str>,
) -> Result<Applied, Error>
where
    R: ResponseHeaders,
{
    let nonce = match request.nonce() {
        Some(nonce) => nonce.to_string(),
        None => factory.generate_nonce(),
    };
    let mut applied = 0;

    for mut policy in policies_for(factory, route_policy, &nonce)? {
        if !policy.should_be_applied(request, &*response) {
            tracing::debug!(
                request_id = %request.request_id(),
                header = policy.header_name(),
                "CSP policy not applicable, skipping"
            );
            continue;
        }

        policy.apply_to(response)?;
        applied += 1;
    }

    tracing::debug!(request_id = %request.request_id(), applied, "CSP middleware finished");
    Ok(Applied { applied, nonce })
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|name| !name.is_empty())
}
