//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed creditor bank account identifier (e.g. `BA123`).
///
/// # Example
///
/// ```
/// use gocardless_rs::CreditorBankAccountId;
///
/// let id = CreditorBankAccountId::new("BA123");
/// println!("Bank account: {}", id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditorBankAccountId(String);

impl CreditorBankAccountId {
    /// Create a new bank account ID from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreditorBankAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CreditorBankAccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CreditorBankAccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CreditorBankAccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed creditor identifier (e.g. `CR123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditorId(String);

impl CreditorId {
    /// Create a new creditor ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the creditor ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CreditorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CreditorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CreditorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// API version in `YYYY-MM-DD` format, sent as the `GoCardless-Version` header.
///
/// # Example
///
/// ```
/// use gocardless_rs::ApiVersion;
///
/// let version = ApiVersion::new("2015-07-06").expect("valid version");
/// assert_eq!(version.as_str(), "2015-07-06");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// The version this client was written against.
    pub const DEFAULT: &'static str = "2015-07-06";

    /// Create a new API version, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is not a valid `YYYY-MM-DD` date.
    pub fn new(version: &str) -> crate::Result<Self> {
        NaiveDate::parse_from_str(version, "%Y-%m-%d").map_err(|_| {
            crate::Error::InvalidInput(format!(
                "Invalid API version format: {}. Expected YYYY-MM-DD",
                version
            ))
        })?;

        // `%Y` accepts short years, so pin the length as well
        if version.len() != 10 {
            return Err(crate::Error::InvalidInput(format!(
                "Invalid API version format: {}. Expected YYYY-MM-DD",
                version
            )));
        }

        Ok(ApiVersion(version.to_string()))
    }

    /// Get the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment configuration for the GoCardless API.
///
/// Determines which API endpoint to use - live or sandbox.
///
/// # Example
///
/// ```
/// use gocardless_rs::Environment;
///
/// let env = Environment::Sandbox;
/// println!("API URL: {}", env.api_base_url());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live environment - real money movements.
    #[default]
    Live,
    /// Sandbox environment for integration testing.
    Sandbox,
}

impl Environment {
    /// Get the base URL for REST API requests.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Live => "https://api.gocardless.com",
            Environment::Sandbox => "https://api-sandbox.gocardless.com",
        }
    }

    /// Returns `true` if this is the live environment.
    pub fn is_live(&self) -> bool {
        matches!(self, Environment::Live)
    }

    /// Returns `true` if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Live => write!(f, "live"),
            Environment::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "production" => Ok(Environment::Live),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(crate::Error::Config(format!(
                "Unknown environment: {}. Expected `live` or `sandbox`",
                other
            ))),
        }
    }
}
