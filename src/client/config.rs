//! Client configuration options.

use std::time::Duration;

use crate::ApiVersion;

/// Configuration for the GoCardless client.
///
/// Values here are process-wide for a client instance and are applied to
/// every request it sends.
///
/// # Example
///
/// ```
/// use gocardless_rs::{ClientConfig, RetryConfig};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0")
///     .with_retry(RetryConfig::no_retry());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout, per attempt
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Retry configuration
    pub retry: RetryConfig,
    /// API version sent as `GoCardless-Version`
    pub api_version: ApiVersion,
    /// Client library name sent as `GoCardless-Client-Library`
    pub client_library: String,
    /// Client library version sent as `GoCardless-Client-Version`
    pub client_version: String,
    /// Base URL override; takes precedence over the environment
    pub base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!(
                "gocardless-rs/{} (Rust)",
                env!("CARGO_PKG_VERSION")
            ),
            retry: RetryConfig::default(),
            api_version: ApiVersion::default(),
            client_library: "gocardless-rs".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            base_url: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Pin to a specific API version.
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Override the client identification headers.
    pub fn with_client_identity(
        mut self,
        library: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.client_library = library.into();
        self.client_version = version.into();
        self
    }

    /// Send requests to this base URL instead of the environment's.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Which failures the retry executor retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Retry on every error until attempts run out.
    #[default]
    Always,
    /// Retry only errors where [`Error::is_retryable`](crate::Error::is_retryable)
    /// holds: transport failures, 429, 5xx and missing results.
    TransientOnly,
}

/// Configuration for automatic retries.
///
/// By default every call is attempted up to four times (three retries) with
/// no delay between attempts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration; zero disables waiting
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Which errors are retried
    pub policy: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::from_secs(30),
            policy: RetryPolicy::Always,
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the initial backoff duration.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Set which errors are retried.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let backoff_millis = (self.initial_backoff.as_millis() as u64).saturating_mul(factor);
        let max_millis = self.max_backoff.as_millis() as u64;
        Duration::from_millis(backoff_millis.min(max_millis))
    }

    /// Check whether an error should be retried under this policy.
    pub fn should_retry(&self, error: &crate::Error) -> bool {
        match self.policy {
            RetryPolicy::Always => true,
            RetryPolicy::TransientOnly => error.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_version.as_str(), "2015-07-06");
        assert_eq!(config.client_library, "gocardless-rs");
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_default_retry_has_no_delay() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for_attempt(0), Duration::ZERO);
        assert_eq!(config.backoff_for_attempt(5), Duration::ZERO);
    }

    #[test]
    fn test_retry_backoff() {
        let config = RetryConfig::default().with_initial_backoff(Duration::from_millis(500));
        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_retry_backoff_max() {
        let config = RetryConfig::default()
            .with_initial_backoff(Duration::from_secs(10))
            .with_max_backoff(Duration::from_secs(30));

        // 10 * 2^3 = 80, but capped at 30
        assert_eq!(config.backoff_for_attempt(3), Duration::from_secs(30));
        assert_eq!(config.backoff_for_attempt(64), Duration::from_secs(30));
    }

    #[test]
    fn test_should_retry_by_policy() {
        let permanent = crate::Error::InvalidInput("bad".into());
        let transient = crate::Error::MissingResult { resource: "creditor_bank_accounts" };

        let always = RetryConfig::default();
        assert!(always.should_retry(&permanent));
        assert!(always.should_retry(&transient));

        let transient_only = RetryConfig::default().with_policy(RetryPolicy::TransientOnly);
        assert!(!transient_only.should_retry(&permanent));
        assert!(transient_only.should_retry(&transient));
    }
}
