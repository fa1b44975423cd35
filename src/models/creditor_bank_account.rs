//! Creditor bank account models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::primitives::{CreditorBankAccountId, CreditorId};

/// A bank account that payouts are sent to.
///
/// Records are immutable once fetched; the only state change the API allows
/// is disabling the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditorBankAccount {
    /// Unique, server-assigned identifier
    pub id: CreditorBankAccountId,
    /// Name of the account holder as known by the bank
    #[serde(default)]
    pub account_holder_name: Option<String>,
    /// The last few digits of the account number
    #[serde(default)]
    pub account_number_ending: Option<String>,
    /// Account type, only present for US accounts
    #[serde(default)]
    pub account_type: Option<AccountType>,
    /// Name of the bank the account is held with
    #[serde(default)]
    pub bank_name: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(default)]
    pub country_code: Option<String>,
    /// When the account was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// ISO 4217 currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Whether payouts can be sent to this account
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    /// Related resources
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: CreditorBankAccountLinks,
    /// Free-form key/value pairs attached by the integrator
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
}

/// Links from a bank account to its owning resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditorBankAccountLinks {
    /// The creditor that owns this bank account
    #[serde(default, deserialize_with = "null_as_default")]
    pub creditor: CreditorId,
}

/// Decode an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bank account type. Required for USD-denominated accounts only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Savings account
    Savings,
    /// Checking account
    Checking,
    /// A type this client does not know about. Decode-only: serializing it
    /// fails rather than sending an unsupported value.
    #[serde(other, skip_serializing)]
    Unknown,
}

/// Parameters for creating a creditor bank account.
///
/// Provide either `iban` or local details (`account_number` plus
/// `bank_code`/`branch_code` and `country_code`).
///
/// # Example
///
/// ```
/// use gocardless_rs::models::CreateCreditorBankAccountParams;
///
/// let params = CreateCreditorBankAccountParams::new("CR123")
///     .account_holder_name("Nude Wines")
///     .iban("GB60BARC20000055779911")
///     .set_as_default_payout_account(true);
/// assert_eq!(params.links.creditor.as_str(), "CR123");
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCreditorBankAccountParams {
    /// Name of the account holder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    /// Bank account number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// Account type (USD accounts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    /// Bank code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    /// Branch code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// ISO 4217 currency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// International Bank Account Number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    /// Owning creditor
    pub links: CreditorBankAccountLinks,
    /// Free-form key/value pairs
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    /// Make this the creditor's default payout account for its currency
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub set_as_default_payout_account: bool,
}

impl CreateCreditorBankAccountParams {
    /// Start building parameters for a bank account owned by `creditor`.
    pub fn new(creditor: impl Into<CreditorId>) -> Self {
        Self {
            links: CreditorBankAccountLinks {
                creditor: creditor.into(),
            },
            ..Default::default()
        }
    }

    /// Set the account holder name.
    pub fn account_holder_name(mut self, name: impl Into<String>) -> Self {
        self.account_holder_name = Some(name.into());
        self
    }

    /// Set local account details.
    pub fn account_number(mut self, number: impl Into<String>) -> Self {
        self.account_number = Some(number.into());
        self
    }

    /// Set the account type.
    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Set the bank code.
    pub fn bank_code(mut self, code: impl Into<String>) -> Self {
        self.bank_code = Some(code.into());
        self
    }

    /// Set the branch code.
    pub fn branch_code(mut self, code: impl Into<String>) -> Self {
        self.branch_code = Some(code.into());
        self
    }

    /// Set the country code.
    pub fn country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    /// Set the currency.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the IBAN.
    pub fn iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }

    /// Attach a metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Make this account the default payout account.
    pub fn set_as_default_payout_account(mut self, value: bool) -> Self {
        self.set_as_default_payout_account = value;
        self
    }
}

/// Query parameters for listing creditor bank accounts.
///
/// Pagination cursors (`after`/`before`) are opaque values taken from a
/// previous page's `meta.cursors`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCreditorBankAccountsParams {
    /// Return records after this cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Return records before this cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Creation time range
    #[serde(flatten)]
    pub created_at: CreatedAtFilter,
    /// Only accounts owned by this creditor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor: Option<CreditorId>,
    /// Only enabled (or disabled) accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Page size (the API caps this at 500)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Creation timestamp range filter, encoded as `created_at[gt]=…` etc.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatedAtFilter {
    /// Strictly after
    #[serde(rename = "created_at[gt]", skip_serializing_if = "Option::is_none")]
    pub gt: Option<DateTime<Utc>>,
    /// At or after
    #[serde(rename = "created_at[gte]", skip_serializing_if = "Option::is_none")]
    pub gte: Option<DateTime<Utc>>,
    /// Strictly before
    #[serde(rename = "created_at[lt]", skip_serializing_if = "Option::is_none")]
    pub lt: Option<DateTime<Utc>>,
    /// At or before
    #[serde(rename = "created_at[lte]", skip_serializing_if = "Option::is_none")]
    pub lte: Option<DateTime<Utc>>,
}
