//! Data models for the GoCardless API.
//!
//! - [`primitives`] - Core types like `CreditorBankAccountId`, `Environment`, etc.
//! - [`creditor_bank_account`] - Creditor bank account records and parameters

pub mod primitives;
pub mod creditor_bank_account;

// Re-export commonly used types
pub use primitives::*;
pub use creditor_bank_account::*;
