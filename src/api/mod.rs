//! Resource façades over [`HttpClient`](crate::HttpClient).
//!
//! Each façade borrows the client and maps one operation to one gateway call
//! (or a short fixed sequence of them), returning the envelope's `data`.
//! They hold no state of their own; obtain them from
//! [`Kgiton`](crate::Kgiton) or build one directly around a client.

mod auth;
mod license;
mod payment;
mod topup;
mod user;

pub use auth::AuthApi;
pub use license::LicenseApi;
pub use payment::PaymentApi;
pub use topup::TopupApi;
pub use user::{UserApi, DEFAULT_USAGE_LIMIT, DEFAULT_USAGE_PAGE};
