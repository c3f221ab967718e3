//! Values accepted by [`Policy::add_directive`](crate::Policy::add_directive).

/// Input to a directive-adding call.
///
/// Callers rarely build this directly; anything string-like or a collection
/// of strings converts into it:
///
/// ```
/// use csp_policy::Value;
///
/// assert_eq!(Value::from("'self' https:"), Value::Single("'self' https:".to_string()));
/// assert_eq!(
///     Value::from(["self", "https:"]),
///     Value::Multiple(vec!["self".to_string(), "https:".to_string()]),
/// );
/// ```
///
/// Every string may itself hold several space-separated tokens; they are
/// split before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// One string, possibly holding space-separated tokens.
    Single(String),
    /// Several strings, each possibly holding space-separated tokens.
    Multiple(Vec<String>),
    /// The directive takes no parameters (e.g. `upgrade-insecure-requests`).
    NoValue,
}

impl Value {
    /// Flattens the value into its non-empty tokens, in order.
    ///
    /// [`Value::NoValue`] yields no tokens.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Value::Single(value) => split(value).collect(),
            Value::Multiple(values) => values.iter().flat_map(|v| split(v)).collect(),
            Value::NoValue => Vec::new(),
        }
    }
}

fn split(value: &str) -> impl Iterator<Item = &str> {
    value.split(' ').filter(|token| !token.is_empty())
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Single(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Single(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Single(value.clone())
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Value::Multiple(values)
    }
}

impl From<Vec<&str>> for Value {
    fn from(values: Vec<&str>) -> Self {
        Value::Multiple(values.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Value {
    fn from(values: &[&str]) -> Self {
        Value::Multiple(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(values: [&str; N]) -> Self {
        Value::Multiple(values.iter().map(|v| v.to_string()).collect())
    }
}
