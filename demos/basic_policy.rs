//! Building a policy by hand.
//!
//! This example shows the builder on its own:
//! 1. Add directives with keywords, hosts, hashes and schemes
//! 2. Watch `'none'` and deduplication rules at work
//! 3. Serialize and write the header to a response
//!
//! Run with: `cargo run --example basic_policy`

use csp_policy::web::Response;
use csp_policy::{directive, keyword, scheme, Error, Policy, Value};

fn main() -> Result<(), Error> {
    let mut policy = Policy::new();

    policy
        .add_directive(directive::DEFAULT, keyword::SELF)?
        .add_directive(directive::SCRIPT, [keyword::SELF, "https://cdn.example.com"])?
        .add_directive(directive::SCRIPT, "https://cdn.example.com")? // ignored: already present
        .add_directive(directive::STYLE, "'self' sha256-Ry6v8nXUhMTfHyxWx0Jr6bWbJ9wJc0V2wTmcw9B9dWw=")?
        .add_directive(directive::IMG, vec![keyword::SELF, scheme::DATA, scheme::BLOB])?
        .add_directive(directive::OBJECT, keyword::NONE)?
        .add_directive(directive::UPGRADE_INSECURE_REQUESTS, Value::NoValue)?
        .add_nonce_for_directive(directive::SCRIPT)?
        .report_to("https://report.example/csp");

    println!("nonce for inline scripts: {}", policy.nonce());
    println!("{}: {}", policy.header_name(), policy);

    match policy.add_directive(directive::FRAME, [keyword::NONE, keyword::SELF]) {
        Ok(_) => println!("unexpected: none accepted alongside self"),
        Err(e) => println!("rejected: {}", e),
    }

    match policy.add_directive("scripts-src", keyword::SELF) {
        Ok(_) => println!("unexpected: typo accepted"),
        Err(e) => println!("rejected: {}", e),
    }

    policy.report_only();
    let mut response = Response::new();
    policy.apply_to(&mut response)?;

    for (name, value) in response.headers() {
        println!("{}: {}", name, value);
    }

    Ok(())
}
