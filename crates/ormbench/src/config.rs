//! Run configuration.

use crate::error::{Error, Result};
use crate::executor::ItemId;

/// Default number of `fetch_one` calls in the single-item scenario.
pub const DEFAULT_ITERATIONS: usize = 500;

/// Default identity fetched by the single-item scenario.
pub const DEFAULT_ITEM_ID: ItemId = 1;

/// Run-level settings shared by every registered executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Connection string handed to every executor's `init`.
    pub connection_target: String,

    /// Number of `fetch_one` calls in the single-item scenario.
    pub iterations: usize,

    /// Identity fetched by the single-item scenario. The same for every
    /// executor so that all of them run the same query shape.
    pub item_id: ItemId,
}

impl HarnessConfig {
    /// Create a configuration for the given connection target.
    pub fn new(connection_target: impl Into<String>) -> Self {
        Self {
            connection_target: connection_target.into(),
            iterations: DEFAULT_ITERATIONS,
            item_id: DEFAULT_ITEM_ID,
        }
    }

    /// Set the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the fixed item identity.
    pub fn with_item_id(mut self, item_id: ItemId) -> Self {
        self.item_id = item_id;
        self
    }

    /// Check that the target is non-empty and the iteration count positive.
    pub fn validate(&self) -> Result<()> {
        if self.connection_target.trim().is_empty() {
            return Err(Error::Config("connection target is empty".to_string()));
        }
        if self.iterations == 0 {
            return Err(Error::Config(
                "iteration count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::new("bench.db");
        assert_eq!(config.connection_target, "bench.db");
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.item_id, DEFAULT_ITEM_ID);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new("postgres://localhost/bench")
            .with_iterations(20)
            .with_item_id(42);
        assert_eq!(config.iterations, 20);
        assert_eq!(config.item_id, 42);
    }

    #[test]
    fn test_rejects_empty_target() {
        let err = HarnessConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let err = HarnessConfig::new("bench.db")
            .with_iterations(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
