//! Timing records produced by a run.

use std::fmt;
use std::time::Duration;

/// The measurement protocols applied to every executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Unreported pass of the single-item scenario that pays lazy setup costs.
    WarmUp,
    /// `fetch_one` on a fixed id, repeated N times.
    SingleItem,
    /// One `fetch_all`.
    AllItems,
}

impl Scenario {
    /// Short machine-friendly label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::WarmUp => "warm_up",
            Scenario::SingleItem => "single_item",
            Scenario::AllItems => "all_items",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of timing one executor for one scenario.
///
/// A zero `exec_time` is a sentinel meaning the scenario failed or was
/// skipped for this executor; see [`BenchmarkResult::is_skipped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkResult {
    name: String,
    exec_time: Duration,
    first_item_exec_time: Duration,
    error: Option<String>,
}

impl BenchmarkResult {
    /// Record a completed measurement.
    pub fn measured(
        name: impl Into<String>,
        exec_time: Duration,
        first_item_exec_time: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            exec_time,
            first_item_exec_time,
            error: None,
        }
    }

    /// Record the zero-time sentinel for a scenario that did not complete.
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec_time: Duration::ZERO,
            first_item_exec_time: Duration::ZERO,
            error: Some(error.into()),
        }
    }

    /// Executor name captured when the result was recorded.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elapsed time of the whole scenario.
    pub fn exec_time(&self) -> Duration {
        self.exec_time
    }

    /// Elapsed time of the first iteration. Zero for the bulk scenario.
    pub fn first_item_exec_time(&self) -> Duration {
        self.first_item_exec_time
    }

    /// Why the scenario did not complete, if it did not.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True for the zero-time sentinel.
    pub fn is_skipped(&self) -> bool {
        self.exec_time.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_result() {
        let result = BenchmarkResult::measured(
            "rusqlite",
            Duration::from_millis(12),
            Duration::from_millis(3),
        );
        assert_eq!(result.name(), "rusqlite");
        assert_eq!(result.exec_time(), Duration::from_millis(12));
        assert_eq!(result.first_item_exec_time(), Duration::from_millis(3));
        assert!(result.error().is_none());
        assert!(!result.is_skipped());
    }

    #[test]
    fn test_failed_result_is_sentinel() {
        let result = BenchmarkResult::failed("sqlx", "no such table: Post");
        assert!(result.is_skipped());
        assert_eq!(result.exec_time(), Duration::ZERO);
        assert_eq!(result.first_item_exec_time(), Duration::ZERO);
        assert_eq!(result.error(), Some("no such table: Post"));
    }

    #[test]
    fn test_scenario_labels() {
        assert_eq!(Scenario::WarmUp.to_string(), "warm_up");
        assert_eq!(Scenario::SingleItem.as_str(), "single_item");
        assert_eq!(Scenario::AllItems.as_str(), "all_items");
    }
}
