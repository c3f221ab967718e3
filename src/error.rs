use std::fmt;

/// Errors raised while building or resolving a policy.
///
/// Every variant signals a programming or configuration mistake. None of them
/// is retried and no fallback policy is substituted; construction simply stops
/// and the error propagates to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The directive name is not in the [directive registry](crate::directive).
    InvalidDirective {
        /// The rejected directive name
        directive: String,
    },
    /// The `none` keyword was combined with other values in one call.
    InvalidValueSet,
    /// The name resolved to something that is not a CSP policy.
    InvalidCspPolicy {
        /// Runtime type name of the resolved object
        type_name: &'static str,
    },
    /// Nothing is bound under the requested policy name.
    UnresolvedPolicy {
        /// The name that could not be resolved
        name: String,
    },
}

impl Error {
    pub(crate) fn invalid_directive(directive: impl Into<String>) -> Self {
        Error::InvalidDirective {
            directive: directive.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDirective { directive } => {
                write!(f, "The directive `{}` is not valid in a CSP header", directive)
            }
            Error::InvalidValueSet => write!(f, "The keyword none can only be used on its own"),
            Error::InvalidCspPolicy { type_name } => write!(
                f,
                "The CSP class `{}` is not valid. A valid policy implements CspPolicy",
                type_name
            ),
            Error::UnresolvedPolicy { name } => {
                write!(f, "No CSP policy is bound under the name `{}`", name)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directive_names_the_directive() {
        let err = Error::invalid_directive("scripts-src");
        assert_eq!(
            err,
            Error::InvalidDirective {
                directive: "scripts-src".to_string()
            }
        );
        assert!(err.to_string().contains("`scripts-src`"));
    }

    #[test]
    fn invalid_value_set_has_fixed_message() {
        assert_eq!(
            Error::InvalidValueSet.to_string(),
            "The keyword none can only be used on its own"
        );
    }

    #[test]
    fn invalid_policy_names_the_type() {
        let err = Error::InvalidCspPolicy {
            type_name: "my_app::Mailer",
        };
        assert!(err.to_string().contains("`my_app::Mailer`"));
    }

    #[test]
    fn errors_are_std_errors() {
        let err: Box<dyn std::error::Error> = Box::new(Error::UnresolvedPolicy {
            name: "missing".to_string(),
        });
        assert!(err.to_string().contains("`missing`"));
    }
}
