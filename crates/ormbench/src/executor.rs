//! The contract every data-access strategy implements.
//!
//! The harness only ever talks to `dyn Executor`; concrete strategies live in
//! their own crates and are handed over through
//! [`Benchmarker::register`](crate::Benchmarker::register).

use crate::error::Result;

/// Identity of the item fetched by the single-item scenario.
pub type ItemId = i64;

/// A named, stateful data-access strategy.
///
/// Lifecycle: `init` once, any number of `fetch_one` / `fetch_all` calls,
/// then `teardown` once. Fetches must be plain reads, so calling them
/// repeatedly with the same arguments leaves the backing store unchanged.
///
/// All calls are blocking. A strategy built on async I/O must drive its own
/// runtime and only return once the operation has completed.
///
/// The harness never inspects [`Executor::Item`], but every strategy
/// registered with one [`Benchmarker`](crate::Benchmarker) must fetch the
/// same entity type, so that all of them answer the same query.
pub trait Executor {
    /// The entity returned by fetches. Opaque to the harness.
    type Item;

    /// Display name. Constant for the lifetime of the instance.
    fn name(&self) -> &str;

    /// Open whatever connection or session the strategy needs.
    ///
    /// A failure here should be reported as [`Error::Connection`](crate::Error::Connection);
    /// it aborts the whole run.
    fn init(&mut self, connection_target: &str) -> Result<()>;

    /// Fetch the item with the given identity, or `None` if it does not exist.
    fn fetch_one(&mut self, id: ItemId) -> Result<Option<Self::Item>>;

    /// Fetch and fully materialize every item in the backing collection.
    fn fetch_all(&mut self) -> Result<Vec<Self::Item>>;

    /// Release the session. Errors are logged by the harness and ignored.
    fn teardown(&mut self) -> Result<()>;
}

