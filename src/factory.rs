//! Turning policy names into configured [`Policy`] instances.
//!
//! Resolution is delegated to a [`Resolver`], typically the application's
//! [`Container`]. The resolver may hand back any type; [`PolicyFactory`]
//! checks that the instance really is a [`CspPolicy`] before building a
//! [`Policy`] around it.

use std::any::{self, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::CspConfig;
use crate::error::Error;
use crate::nonce::{NonceGenerator, RandomString};
use crate::policy::{CspPolicy, Policy};

/// A type-erased object produced by a [`Resolver`].
pub struct Instance {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wraps a policy definition so the factory recognizes it.
    pub fn policy<P: CspPolicy + 'static>(policy: P) -> Self {
        let policy: Arc<dyn CspPolicy> = Arc::new(policy);
        Self {
            type_name: any::type_name::<P>(),
            value: Box::new(policy),
        }
    }

    /// Wraps an arbitrary object.
    ///
    /// The factory rejects such instances, even when `T` happens to implement
    /// [`CspPolicy`]; use [`Instance::policy`] for policies.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// Returns the runtime type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn into_policy(self) -> Result<Arc<dyn CspPolicy>, Error> {
        let type_name = self.type_name;
        self.value
            .downcast::<Arc<dyn CspPolicy>>()
            .map(|policy| *policy)
            .map_err(|_| Error::InvalidCspPolicy { type_name })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Resolves a name into a fresh instance.
pub trait Resolver: Send + Sync {
    /// Returns a new instance bound to `name`, or `None` if nothing is bound.
    fn resolve(&self, name: &str) -> Option<Instance>;
}

type Binding = Box<dyn Fn() -> Instance + Send + Sync>;

/// A name-keyed registry of instance constructors.
///
/// # Examples
///
/// ```
/// use csp_policy::factory::{Container, Resolver};
/// use csp_policy::presets::Basic;
///
/// let mut container = Container::new();
/// container.bind_policy::<Basic>("basic");
///
/// let instance = container.resolve("basic").expect("bound");
/// assert!(instance.type_name().ends_with("Basic"));
/// assert!(container.resolve("missing").is_none());
/// ```
#[derive(Default)]
pub struct Container {
    bindings: HashMap<String, Binding>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a policy type, constructed with `Default` on every resolve.
    pub fn bind_policy<P>(&mut self, name: impl Into<String>) -> &mut Self
    where
        P: CspPolicy + Default + 'static,
    {
        self.bind_with(name, || Instance::policy(P::default()))
    }

    /// Binds an arbitrary type, constructed with `Default` on every resolve.
    pub fn bind<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: Any + Send + Sync + Default,
    {
        self.bind_with(name, || Instance::new(T::default()))
    }

    /// Binds a constructor closure.
    pub fn bind_with<F>(&mut self, name: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn() -> Instance + Send + Sync + 'static,
    {
        self.bindings.insert(name.into(), Box::new(build));
        self
    }

    /// Returns `true` if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

impl Resolver for Container {
    fn resolve(&self, name: &str) -> Option<Instance> {
        self.bindings.get(name).map(|build| build())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Container").field("bindings", &names).finish()
    }
}

/// Creates per-request [`Policy`] instances from policy names.
///
/// The factory owns the configuration and the nonce generator and hands both
/// to every policy it creates.
///
/// # Examples
///
/// ```
/// use csp_policy::factory::{Container, PolicyFactory};
/// use csp_policy::presets::Basic;
/// use csp_policy::CspConfig;
///
/// let mut container = Container::new();
/// container.bind_policy::<Basic>("basic");
///
/// let config = CspConfig {
///     report_uri: Some("https://report.example/csp".to_string()),
///     ..CspConfig::default()
/// };
/// let factory = PolicyFactory::new(container, config);
///
/// let policy = factory.create("basic")?;
/// assert_eq!(policy.to_string(), "report-uri https://report.example/csp");
/// # Ok::<(), csp_policy::Error>(())
/// ```
pub struct PolicyFactory {
    resolver: Arc<dyn Resolver>,
    config: Arc<CspConfig>,
    nonce_generator: Arc<dyn NonceGenerator>,
}

impl PolicyFactory {
    /// Creates a factory using [`RandomString`] nonces.
    pub fn new(resolver: impl Resolver + 'static, config: CspConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            config: Arc::new(config),
            nonce_generator: Arc::new(RandomString),
        }
    }

    /// Replaces the nonce generator handed to created policies.
    pub fn with_nonce_generator(mut self, generator: impl NonceGenerator + 'static) -> Self {
        self.nonce_generator = Arc::new(generator);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CspConfig {
        &self.config
    }

    /// Draws a fresh nonce from the configured generator.
    ///
    /// Framework glue calls this once per request and hands the value to
    /// every policy of that request through [`Policy::with_nonce`].
    pub fn generate_nonce(&self) -> String {
        self.nonce_generator.generate()
    }

    /// Resolves `name` and wraps it in a fresh [`Policy`].
    ///
    /// If a non-empty report URI is configured, it is set with
    /// [`Policy::report_to`] before the policy is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvedPolicy`] if nothing is bound under `name`.
    /// - [`Error::InvalidCspPolicy`] if the bound object is not a policy.
    pub fn create(&self, name: &str) -> Result<Policy, Error> {
        let instance = self.resolver.resolve(name).ok_or_else(|| {
            tracing::warn!(policy = %name, "no CSP policy bound under this name");
            Error::UnresolvedPolicy {
                name: name.to_string(),
            }
        })?;

        let type_name = instance.type_name();
        let definition = instance.into_policy().inspect_err(|_| {
            tracing::warn!(policy = %name, type_name, "resolved object is not a CSP policy");
        })?;

        let mut policy = Policy::with_parts(
            definition,
            Arc::clone(&self.nonce_generator),
            Arc::clone(&self.config),
        );

        if let Some(uri) = self.config.report_uri() {
            policy.report_to(uri);
        }

        tracing::debug!(policy = %name, type_name, "created CSP policy");
        Ok(policy)
    }
}

impl fmt::Debug for PolicyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
