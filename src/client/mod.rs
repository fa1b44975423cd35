//! HTTP client and service layer for the GoCardless API.
//!
//! This module provides the main entry point [`GoCardlessClient`] together
//! with the request machinery every service shares: per-call
//! [`RequestOptions`], the bounded [`retry`] executor and cursor pagination.
//!
//! # Example
//!
//! ```no_run
//! use gocardless_rs::{GoCardlessClient, Environment};
//! use gocardless_rs::models::ListCreditorBankAccountsParams;
//!
//! # async fn example() -> gocardless_rs::Result<()> {
//! let client = GoCardlessClient::new("access-token", Environment::Sandbox)?;
//!
//! let page = client
//!     .creditor_bank_accounts()
//!     .list(&ListCreditorBankAccountsParams::default(), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod envelope;
mod http;
mod idempotency;
mod options;
pub mod paginated;
mod retry;

pub use config::{ClientConfig, RetryConfig, RetryPolicy};
pub use envelope::Resource;
pub use http::{ClientBuilder, GoCardlessClient};
pub use idempotency::{IdempotencyKeyGenerator, UuidKeyGenerator};
pub use options::RequestOptions;
pub use paginated::{CursorPager, Cursors, ListMeta, ListPage, PaginatedStream};
pub use retry::retry;
pub(crate) use http::ClientInner;
