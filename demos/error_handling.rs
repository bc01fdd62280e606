//! Error handling example: branch on error kinds and inspect failures.
//!
//! Points at an unreachable server and at the real API without credentials to
//! show network, authentication and not-found errors.
//!
//! Run with: `cargo run --example error_handling`

use kgiton::{Error, ErrorKind, Kgiton};
use std::time::Duration;

fn describe(err: &Error) {
    println!("  kind:    {} ({})", err.kind(), err.kind().code());
    println!("  status:  {}", err.status());
    println!("  message: {}", err.message());
    println!("  retried: {}", err.is_retryable());
    if let Some(details) = err.details() {
        println!("  details: {}", details);
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kgiton=info,error_handling=info".into()),
        )
        .init();

    println!("=== Network error ===");
    let offline = Kgiton::builder()
        .base_url("http://127.0.0.1:9")?
        .timeout(Duration::from_secs(2))
        .retry_attempts(2)
        .retry_delay(Duration::from_millis(200))
        .build()?;

    if let Err(e) = offline.user().profile().await {
        describe(&e);
    }
    println!();

    println!("=== Missing credentials ===");
    let sdk = Kgiton::builder().retry_attempts(1).build()?;

    match sdk.user().profile().await {
        Ok(profile) => println!("Unexpectedly logged in as {}", profile.name),
        Err(e) if e.kind() == ErrorKind::Authentication => {
            println!("Not logged in:");
            describe(&e);
        }
        Err(e) => describe(&e),
    }
    println!();

    println!("=== Unknown license ===");
    match sdk.license().validate("NO-SUCH-LICENSE").await {
        Ok(validation) => println!("Found {:?}", validation.status),
        Err(Error::NotFound { message }) => println!("Not found: {}", message),
        Err(e) => describe(&e),
    }

    // The convenience checks never fail; they answer `false` instead.
    let active = sdk.license().is_active("NO-SUCH-LICENSE").await;
    println!("is_active: {}", active);
    println!();

    println!("=== Ownership ===");
    match sdk
        .license()
        .validate_ownership("NO-SUCH-LICENSE", true)
        .await
    {
        Ok(ownership) => println!("Owner: {}", ownership.is_owner),
        Err(Error::Ownership(reason)) => println!("Rejected: {}", reason),
        Err(e) => describe(&e),
    }

    Ok(())
}
