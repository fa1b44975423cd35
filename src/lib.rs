//! # gocardless-rs
//!
//! An async Rust client for the GoCardless Pro API.
//!
//! The crate currently covers creditor bank accounts: creating, listing,
//! fetching and disabling the accounts payouts are sent to.
//!
//! ## Features
//!
//! - **Typed resources**: Strongly-typed records, parameters and identifiers
//! - **Bounded retries**: Every call is retried a configurable number of times
//! - **Idempotent writes**: Create and action calls always carry an idempotency key
//! - **Cursor pagination**: Pull pages on demand or stream individual records
//! - **Async-first**: Built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gocardless_rs::{GoCardlessClient, Environment};
//! use gocardless_rs::models::{CreateCreditorBankAccountParams, ListCreditorBankAccountsParams};
//!
//! #[tokio::main]
//! async fn main() -> gocardless_rs::Result<()> {
//!     let client = GoCardlessClient::new("your-access-token", Environment::Sandbox)?;
//!
//!     // Create a bank account for a creditor
//!     let account = client
//!         .creditor_bank_accounts()
//!         .create(
//!             &CreateCreditorBankAccountParams::new("CR123")
//!                 .account_holder_name("Nude Wines")
//!                 .iban("GB60BARC20000055779911"),
//!             None,
//!         )
//!         .await?;
//!     println!("Created {}", account.id);
//!
//!     // Walk every page of enabled accounts
//!     let params = ListCreditorBankAccountsParams {
//!         enabled: Some(true),
//!         limit: Some(100),
//!         ..Default::default()
//!     };
//!     let mut pager = client.creditor_bank_accounts().all(params, None);
//!     while pager.has_more() {
//!         for account in pager.value().await?.iter() {
//!             println!("{}: {:?}", account.id, account.bank_name);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Per-call options
//!
//! ```rust,no_run
//! use gocardless_rs::{CreditorBankAccountId, RequestOptions};
//!
//! # async fn example(client: gocardless_rs::GoCardlessClient) -> gocardless_rs::Result<()> {
//! let options = RequestOptions::new()
//!     .with_retries(0)
//!     .with_idempotency_key("disable-BA123");
//!
//! match client
//!     .creditor_bank_accounts()
//!     .disable(&CreditorBankAccountId::new("BA123"), Some(options))
//!     .await
//! {
//!     Ok(account) => assert!(!account.enabled),
//!     Err(gocardless_rs::Error::Api(err)) if err.has_reason("disable_failed") => {
//!         println!("already disabled");
//!     }
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{ApiError, ApiErrorDetail, ApiErrorType, Error, Result};
pub use models::{ApiVersion, CreditorBankAccountId, CreditorId, Environment};
pub use client::{
    ClientBuilder, ClientConfig, GoCardlessClient, IdempotencyKeyGenerator, RequestOptions,
    RetryConfig, RetryPolicy,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use gocardless_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ApiError, Error, Result};
    pub use crate::models::{
        // Primitives
        ApiVersion, CreditorBankAccountId, CreditorId, Environment,
        // Creditor bank accounts
        AccountType, CreateCreditorBankAccountParams, CreatedAtFilter, CreditorBankAccount,
        CreditorBankAccountLinks, ListCreditorBankAccountsParams,
    };
    pub use crate::client::{
        ClientConfig, CursorPager, GoCardlessClient, ListPage, PaginatedStream, RequestOptions,
        RetryConfig, RetryPolicy,
    };
}
