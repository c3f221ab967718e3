//! Content-Security-Policy header construction.
//!
//! This crate builds `Content-Security-Policy` response headers from
//! programmatic policy definitions:
//! - **Validation**: directive names are checked against a fixed registry
//! - **Sanitization**: keywords and hash-sources are quoted, other sources pass through
//! - **Merging**: values are deduplicated per directive and `'none'` stays exclusive
//! - **Modes**: a policy is either enforced or report-only
//!
//! # Core Types
//!
//! - [`Policy`]: Mutable builder for one header, serialized with `Display`
//! - [`CspPolicy`]: A named policy definition populating a `Policy`
//! - [`PolicyFactory`]: Resolves policy names into configured `Policy` instances
//! - [`web::ResponseHeaders`]: Contract the header is written through
//! - [`NonceGenerator`]: Source of `'nonce-…'` tokens
//!
//! # Examples
//!
//! ```
//! use csp_policy::{directive, keyword, scheme, Policy};
//! use csp_policy::web::Response;
//!
//! let mut policy = Policy::new();
//! policy
//!     .add_directive(directive::DEFAULT, keyword::SELF)?
//!     .add_directive(directive::IMG, [keyword::SELF, scheme::DATA])?
//!     .add_directive(directive::OBJECT, keyword::NONE)?
//!     .report_to("https://report.example/csp");
//!
//! let mut response = Response::new();
//! policy.apply_to(&mut response)?;
//!
//! assert_eq!(
//!     response.header("Content-Security-Policy"),
//!     Some("default-src 'self';img-src 'self' data:;object-src 'none';report-uri https://report.example/csp")
//! );
//! # Ok::<(), csp_policy::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod directive;
mod error;
pub mod factory;
pub mod keyword;
pub mod nonce;
mod policy;
pub mod presets;
pub mod sanitizer;
pub mod scheme;
mod value;
pub mod web;

pub use config::CspConfig;
pub use error::Error;
pub use factory::PolicyFactory;
pub use nonce::{NonceGenerator, RandomString};
pub use policy::{CspPolicy, Mode, Policy, ENFORCE_HEADER, REPORT_ONLY_HEADER};
pub use value::Value;
