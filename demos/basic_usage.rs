//! Basic example: check a license, use a token and top up when it runs dry.
//!
//! Reads `KGITON_API_KEY` and `KGITON_LICENSE_KEY` from the environment.
//! `KGITON_BASE_URL` overrides the default server.
//!
//! Run with: `cargo run --example basic_usage`

use kgiton::types::UseTokenRequest;
use kgiton::{Error, Kgiton, DEFAULT_BASE_URL};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kgiton=debug,basic_usage=info".into()),
        )
        .init();

    let api_key = std::env::var("KGITON_API_KEY").unwrap_or_default();
    let license_key = std::env::var("KGITON_LICENSE_KEY").unwrap_or_else(|_| "ABCDE-12345".into());
    let base_url = std::env::var("KGITON_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

    let sdk = Kgiton::builder()
        .base_url(base_url)?
        .api_key(api_key)
        .debug(true)
        .build()?;

    println!("=== License ===");
    let validation = sdk.validate_license(&license_key).await?;
    println!("Status: {:?}", validation.status);
    println!("Valid: {}", validation.is_license_valid());
    println!("Balance: {} tokens", validation.token_balance);
    println!();

    println!("=== Profile ===");
    let profile = sdk.user().profile().await?;
    println!("{} <{}>", profile.name, profile.email);
    for license in &profile.license_keys {
        println!("  {} {:?} {} tokens", license.key, license.status, license.token_balance);
    }
    println!();

    if sdk.license().has_sufficient_tokens(&license_key, 1).await {
        println!("=== Use Token ===");
        let used = sdk
            .use_token(
                &license_key,
                Some(UseTokenRequest::with_purpose("basic_usage example")),
            )
            .await?;
        println!("{} -> {} tokens", used.previous_balance, used.new_balance);
    } else {
        println!("=== Top Up ===");
        let topup = sdk.request_topup(&license_key, 100).await?;
        println!("Pay Rp {} at {:?}", topup.amount_to_pay, topup.payment_url);
    }

    Ok(())
}
