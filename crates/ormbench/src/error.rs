//! Harness error types.

use thiserror::Error;

/// Errors raised while configuring or driving a benchmark run.
///
/// Only [`Error::Connection`] and [`Error::Config`] ever reach the caller of
/// [`Benchmarker::run`](crate::Benchmarker::run). Execution failures are
/// contained per executor and per scenario, teardown failures are logged.
#[derive(Debug, Error)]
pub enum Error {
    /// An executor could not reach the backing store during `init`.
    #[error("connection error: {0}")]
    Connection(String),

    /// A fetch call failed while a scenario was being timed.
    #[error("execution error: {0}")]
    Execution(String),

    /// Releasing an executor's session failed.
    #[error("teardown error: {0}")]
    Teardown(String),

    /// The run configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Config(_))
    }
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Connection("refused".into()).is_fatal());
        assert!(Error::Config("empty target".into()).is_fatal());
        assert!(!Error::Execution("no such table".into()).is_fatal());
        assert!(!Error::Teardown("busy".into()).is_fatal());
    }

    #[test]
    fn test_display() {
        let err = Error::Connection("unable to open database file".into());
        assert_eq!(err.to_string(), "connection error: unable to open database file");
    }
}
