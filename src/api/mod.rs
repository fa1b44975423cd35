//! API service modules for GoCardless endpoints.
//!
//! Each service provides methods for interacting with one resource type of
//! the GoCardless API.

mod creditor_bank_accounts;

pub use creditor_bank_accounts::{CreditorBankAccountList, CreditorBankAccountsService};
