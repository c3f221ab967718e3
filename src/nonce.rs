//! Nonce generation for `'nonce-<token>'` sources.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the tokens produced by [`RandomString`].
pub const NONCE_LENGTH: usize = 32;

/// Produces the random token embedded in a `'nonce-<token>'` source.
///
/// Implementations must be safe to share between request-handling threads.
/// Uniqueness is whatever the implementation provides; nothing in this crate
/// checks it.
///
/// Closures implement the trait, which keeps tests deterministic:
///
/// ```
/// use csp_policy::NonceGenerator;
///
/// let fixed = || "abc".to_string();
/// assert_eq!(fixed.generate(), "abc");
/// ```
pub trait NonceGenerator: Send + Sync {
    /// Returns a fresh, URL-safe token.
    fn generate(&self) -> String;
}

impl<F> NonceGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Default generator: [`NONCE_LENGTH`] alphanumeric characters drawn from the
/// thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomString;

impl NonceGenerator for RandomString {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_string_has_expected_shape() {
        let nonce = RandomString.generate();
        assert_eq!(nonce.len(), NONCE_LENGTH);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_string_varies_between_calls() {
        assert_ne!(RandomString.generate(), RandomString.generate());
    }

    #[test]
    fn closures_are_generators() {
        let generator = || "fixed-token".to_string();
        assert_eq!(NonceGenerator::generate(&generator), "fixed-token");
    }
}
