//! Per-call request options.

use std::collections::BTreeMap;

/// Options applied to a single API call.
///
/// Built fresh for each call and discarded afterwards. Anything left unset
/// falls back to the client configuration.
///
/// # Example
///
/// ```
/// use gocardless_rs::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_retries(1)
///     .with_idempotency_key("create-ba-0001")
///     .with_header("X-Trace", "abc");
/// assert_eq!(options.idempotency_key(), Some("create-ba-0001"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    retries: Option<u32>,
    idempotency_key: Option<String>,
    headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the number of retries for this call.
    ///
    /// `0` disables retrying; the call is attempted exactly once.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Use this idempotency key instead of generating one.
    ///
    /// Only sent on mutating calls (create and actions).
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Add an extra header. Extra headers are applied last and replace any
    /// header of the same name set by the client.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Retry override, if any.
    pub fn retries(&self) -> Option<u32> {
        self.retries
    }

    /// Caller-supplied idempotency key, if any.
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Extra headers in name order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let options = RequestOptions::default();
        assert_eq!(options.retries(), None);
        assert_eq!(options.idempotency_key(), None);
        assert_eq!(options.headers().count(), 0);
    }

    #[test]
    fn test_header_replaced_by_name() {
        let options = RequestOptions::new()
            .with_header("X-Trace", "a")
            .with_header("X-Trace", "b");
        assert_eq!(options.headers().collect::<Vec<_>>(), vec![("X-Trace", "b")]);
    }
}
