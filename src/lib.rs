//! # kgiton - A client for the KGiTON API
//!
//! Typed access to KGiTON's license, token, top-up and partner payment
//! endpoints. Every call goes through one gateway that authenticates it,
//! retries transient failures with exponential backoff and turns failures
//! into a single [`Error`] type.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kgiton::{types::LoginRequest, Kgiton};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kgiton::Error> {
//!     let sdk = Kgiton::builder()
//!         .base_url("https://api.kgiton.com")?
//!         .build()?;
//!
//!     // The returned access token is installed for every later call.
//!     let login = sdk
//!         .auth()
//!         .login(&LoginRequest::new("user@example.com", "secret"))
//!         .await?;
//!     println!("Logged in as {}", login.user.name);
//!
//!     let balance = sdk.user().token_balance().await?;
//!     println!("Total tokens: {}", balance.total_balance);
//!
//!     if let Some(key) = sdk.user().available_license_key(1).await? {
//!         let used = sdk.use_token(&key, None).await?;
//!         println!("{} now holds {} tokens", key, used.new_balance);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! A client carries at most one credential on the wire. An API key is sent as
//! `x-api-key` and wins over an access token, which is sent as
//! `Authorization: Bearer <token>`. Credentials can be changed at any time
//! with [`Kgiton::set_api_key`], [`Kgiton::set_access_token`] and
//! [`Kgiton::clear_auth`]; the next request picks them up.
//!
//! ## Error Handling
//!
//! ```no_run
//! use kgiton::{ErrorKind, Kgiton};
//!
//! # async fn example(sdk: Kgiton) {
//! match sdk.license().validate("ABCDE-12345").await {
//!     Ok(validation) => println!("balance: {}", validation.token_balance),
//!     Err(e) if e.kind() == ErrorKind::NotFound => eprintln!("no such license"),
//!     Err(e) => eprintln!("{} (status {}): {}", e.kind().code(), e.status(), e.message()),
//! }
//! # }
//! ```
//!
//! ## Retries
//!
//! Network failures, 429 and 5xx responses are retried. A call makes at most
//! `retry_attempts` tries and waits `retry_delay * 2^n` after the n-th failure:
//!
//! ```no_run
//! use kgiton::Kgiton;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), kgiton::Error> {
//! let sdk = Kgiton::builder()
//!     .api_key("kgiton_xxx")
//!     .retry_attempts(5)
//!     .retry_delay(Duration::from_millis(200))
//!     .max_retry_delay(Duration::from_secs(5))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
pub mod clock;
mod config;
pub mod credentials;
mod error;
pub mod metadata;
pub mod rate_limit;
mod response;
pub mod retry;
mod sdk;
pub mod types;

pub use client::{ClientBuilder, HttpClient};
pub use config::{
    Config, ConfigUpdate, DEFAULT_BASE_URL, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY,
    DEFAULT_TIMEOUT,
};
pub use error::{Error, ErrorKind, Result};
pub use response::{ApiResponse, Response};
pub use retry::RetryPolicy;
pub use sdk::{Kgiton, KgitonBuilder};
