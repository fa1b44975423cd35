//! Idempotency key generation for mutating requests.

use std::fmt;

/// Source of idempotency keys for create and action calls that were not
/// given an explicit key.
///
/// The default [`UuidKeyGenerator`] yields random v4 UUIDs. Supply your own
/// through [`ClientBuilder::key_generator`](crate::client::ClientBuilder::key_generator)
/// to derive keys from business identifiers instead.
pub trait IdempotencyKeyGenerator: Send + Sync + fmt::Debug {
    /// Produce a fresh key. Consecutive calls must not repeat.
    fn generate(&self) -> String;
}

/// Generates random v4 UUID keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl IdempotencyKeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_keys_are_unique() {
        let generator = UuidKeyGenerator;
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
