//! ormbench - latency comparison of interchangeable data-access strategies.
//!
//! Strategies implement [`Executor`] and are registered with a
//! [`Benchmarker`], which times each of them, one after another, through
//! three scenarios:
//!
//! - **Warm-up** (optional): one unreported pass of the single-item scenario
//!   so that connection pools and statement caches are primed.
//! - **Single item**: `fetch_one` on a fixed id, repeated N times. The first
//!   call is also timed on its own.
//! - **All items**: one `fetch_all`, fully materialized.
//!
//! Each scenario yields its own [`BenchmarkResult`] collection, which
//! [`report::rank`] turns into ranked rows for display.

pub mod config;
pub mod error;
pub mod executor;
pub mod harness;
pub mod report;
pub mod result;

pub use config::{HarnessConfig, DEFAULT_ITEM_ID, DEFAULT_ITERATIONS};
pub use error::{Error, Result};
pub use executor::{Executor, ItemId};
pub use harness::{Benchmarker, RunResults};
pub use report::{rank, ReportOptions, ReportRow};
pub use result::{BenchmarkResult, Scenario};
