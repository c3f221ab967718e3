//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and the policy
//! builder. It handles:
//! - The response contract the header applier writes through ([`ResponseHeaders`])
//! - Owned request/response adapters for glue code and tests
//! - The middleware selecting and applying configured policies
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Nothing here depends on a web framework.
//!    Framework-specific code implements [`ResponseHeaders`] for its response
//!    type and builds a [`Request`].
//!
//! 2. **Never Overwrite**: A CSP header already present on the response wins.
//!
//! 3. **Explicit Context**: No global state. Configuration and the nonce
//!    generator flow in through the [`PolicyFactory`](crate::factory::PolicyFactory).
//!
//! 4. **One Nonce Per Request**: Every header written for a request carries
//!    the same nonce, either fixed on the [`Request`] or drawn once per
//!    [`apply_policies`] call.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let mut request = Request::new(request_id);
//! request.set_nonce(factory.generate_nonce());
//! let mut response = handler(req, request.nonce()).await;
//!
//! apply_policies(&factory, &request, &mut FrameworkHeaders(&mut response), None)?;
//! ```

mod adapter;
mod headers;
mod middleware;

pub use adapter::{Request, Response};
pub use headers::ResponseHeaders;
pub use middleware::{apply_policies, policies_for, Applied};
