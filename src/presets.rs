//! Ready-made policy definitions.

use crate::error::Error;
use crate::policy::{CspPolicy, Policy};
use crate::{directive, keyword};

/// Same-origin policy suitable as a starting point for most applications.
///
/// Everything loads from `'self'`, plugins are disabled with
/// `object-src 'none'`, and scripts and styles additionally accept the
/// per-request nonce.
///
/// # Examples
///
/// ```
/// use csp_policy::presets::Basic;
/// use csp_policy::Policy;
///
/// let mut policy = Policy::from_definition(Basic).with_nonce_generator(|| "abc".to_string());
/// policy.configure()?;
///
/// assert_eq!(
///     policy.to_string(),
///     "base-uri 'self';connect-src 'self';default-src 'self';form-action 'self';\
///      img-src 'self';media-src 'self';object-src 'none';\
///      script-src 'self' 'nonce-abc';style-src 'self' 'nonce-abc'"
/// );
/// # Ok::<(), csp_policy::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Basic;

impl CspPolicy for Basic {
    fn configure(&self, policy: &mut Policy) -> Result<(), Error> {
        policy
            .add_directive(directive::BASE, keyword::SELF)?
            .add_directive(directive::CONNECT, keyword::SELF)?
            .add_directive(directive::DEFAULT, keyword::SELF)?
            .add_directive(directive::FORM_ACTION, keyword::SELF)?
            .add_directive(directive::IMG, keyword::SELF)?
            .add_directive(directive::MEDIA, keyword::SELF)?
            .add_directive(directive::OBJECT, keyword::NONE)?
            .add_directive(directive::SCRIPT, keyword::SELF)?
            .add_directive(directive::STYLE, keyword::SELF)?
            .add_nonce_for_directive(directive::SCRIPT)?
            .add_nonce_for_directive(directive::STYLE)?;
        Ok(())
    }
}
