//! Middleware flow demonstration.
//!
//! This example shows how a web integration uses the crate:
//! 1. Load CSP settings from the application's configuration
//! 2. Bind named policies in a container
//! 3. Apply the configured policies to each response
//!
//! Run with: `cargo run --example middleware_flow`

use csp_policy::factory::{Container, PolicyFactory};
use csp_policy::presets::Basic;
use csp_policy::web::{apply_policies, Request, Response};
use csp_policy::{directive, keyword, CspConfig, CspPolicy, Error, Policy};

/// A stricter policy trialled in report-only mode before enforcing it.
#[derive(Default)]
struct Strict;

impl CspPolicy for Strict {
    fn configure(&self, policy: &mut Policy) -> Result<(), Error> {
        policy
            .add_directive(directive::DEFAULT, keyword::NONE)?
            .add_directive(directive::SCRIPT, keyword::STRICT_DYNAMIC)?
            .add_nonce_for_directive(directive::SCRIPT)?
            .add_directive(directive::BASE, keyword::NONE)?;
        Ok(())
    }
}

const SETTINGS: &str = r#"
enabled = true
policy = "basic"
report_only_policy = "strict"
report_uri = "https://report.example/csp"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config: CspConfig = toml::from_str(SETTINGS)?;

    let mut container = Container::new();
    container
        .bind_policy::<Basic>("basic")
        .bind_policy::<Strict>("strict");
    let factory = PolicyFactory::new(container, config);

    for (id, path) in [("req-1", "/"), ("req-2", "/checkout")] {
        let mut request = Request::new(id);
        request.set_path(path);
        let mut response = Response::new();

        let outcome = apply_policies(&factory, &request, &mut response, None)?;
        println!(
            "{} {} -> {} policies, nonce {}",
            id,
            path,
            outcome.applied(),
            outcome.nonce()
        );
        for (name, value) in response.headers() {
            println!("  {}: {}", name, value);
        }
    }

    Ok(())
}
