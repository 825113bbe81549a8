//! The benchmark harness.
//!
//! [`Benchmarker`] owns the registered executors and drives each of them,
//! one at a time, through the warm-up, single-item and all-items scenarios.
//! Nothing runs concurrently: strategies sharing one backing store would
//! otherwise contend for connections and locks and skew each other's numbers.

use std::any::Any;
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::executor::{Executor, ItemId};
use crate::result::{BenchmarkResult, Scenario};

/// The three result collections of a run, each in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResults {
    /// Warm-up pass. Empty unless the run asked for one.
    pub warm_up: Vec<BenchmarkResult>,
    /// `fetch_one` repeated `iterations` times.
    pub single_item: Vec<BenchmarkResult>,
    /// One `fetch_all`.
    pub all_items: Vec<BenchmarkResult>,
}

impl RunResults {
    /// The collection for a scenario.
    pub fn get(&self, scenario: Scenario) -> &[BenchmarkResult] {
        match scenario {
            Scenario::WarmUp => &self.warm_up,
            Scenario::SingleItem => &self.single_item,
            Scenario::AllItems => &self.all_items,
        }
    }

    /// True if no collection holds a result.
    pub fn is_empty(&self) -> bool {
        self.warm_up.is_empty() && self.single_item.is_empty() && self.all_items.is_empty()
    }

    fn collection_mut(&mut self, scenario: Scenario) -> &mut Vec<BenchmarkResult> {
        match scenario {
            Scenario::WarmUp => &mut self.warm_up,
            Scenario::SingleItem => &mut self.single_item,
            Scenario::AllItems => &mut self.all_items,
        }
    }

    fn clear(&mut self) {
        self.warm_up.clear();
        self.single_item.clear();
        self.all_items.clear();
    }
}

/// Times every registered executor against the same backing store.
pub struct Benchmarker<I> {
    config: HarnessConfig,
    executors: Vec<Box<dyn Executor<Item = I>>>,
    results: RunResults,
}

impl<I> Benchmarker<I> {
    /// Create a harness. Fails if the configuration is unusable.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            executors: Vec::new(),
            results: RunResults::default(),
        })
    }

    /// Add an executor. Names are not checked for uniqueness; a duplicate
    /// shows up as two rows with the same label.
    pub fn register(&mut self, executor: Box<dyn Executor<Item = I>>) {
        debug!(executor = %executor.name(), "registered executor");
        self.executors.push(executor);
    }

    /// Names of the registered executors, in registration order.
    pub fn executor_names(&self) -> Vec<&str> {
        self.executors.iter().map(|e| e.name()).collect()
    }

    /// The run configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Results of the last run.
    pub fn results(&self) -> &RunResults {
        &self.results
    }

    /// Hand the results of the last run over to the caller.
    pub fn into_results(self) -> RunResults {
        self.results
    }

    /// Run every scenario for every executor.
    ///
    /// Any executor failing `init` aborts the run with [`Error::Connection`]
    /// and leaves all collections empty. Failures while fetching only cost
    /// the failing executor that scenario: its result is recorded with a zero
    /// time. Every executor whose `init` succeeded is torn down before this
    /// returns.
    pub fn run(&mut self, include_warm_up: bool) -> Result<()> {
        self.results.clear();

        info!(
            executors = self.executors.len(),
            iterations = self.config.iterations,
            item_id = self.config.item_id,
            include_warm_up,
            "Starting benchmark run"
        );

        self.init_all()?;

        let mut results = RunResults::default();

        if include_warm_up {
            self.run_scenario(Scenario::WarmUp, &mut results);
        }
        self.run_scenario(Scenario::SingleItem, &mut results);
        self.run_scenario(Scenario::AllItems, &mut results);

        teardown_all(&mut self.executors);

        self.results = results;
        info!("Benchmark run finished");
        Ok(())
    }

    /// Initialize executors in order, tearing down the ones already
    /// initialized if any of them fails.
    fn init_all(&mut self) -> Result<()> {
        for index in 0..self.executors.len() {
            let executor = &mut self.executors[index];
            let target = &self.config.connection_target;

            if let Err(err) = guarded(|| executor.init(target)) {
                error!(executor = %executor.name(), error = %err, "init failed, aborting run");
                teardown_all(&mut self.executors[..index]);
                return Err(into_connection_error(err));
            }
        }
        Ok(())
    }

    fn run_scenario(&mut self, scenario: Scenario, results: &mut RunResults) {
        let iterations = self.config.iterations;
        let item_id = self.config.item_id;

        for executor in &mut self.executors {
            let result = match scenario {
                Scenario::WarmUp | Scenario::SingleItem => {
                    time_single_item(&mut **executor, scenario, item_id, iterations)
                }
                Scenario::AllItems => time_all_items(&mut **executor),
            };

            debug!(
                executor = %result.name(),
                scenario = %scenario,
                exec_time_us = result.exec_time().as_micros() as u64,
                first_item_us = result.first_item_exec_time().as_micros() as u64,
                "recorded result"
            );
            results.collection_mut(scenario).push(result);
        }
    }
}

/// Call `fetch_one(item_id)` `iterations` times under one timer.
fn time_single_item<E: Executor + ?Sized>(
    executor: &mut E,
    scenario: Scenario,
    item_id: ItemId,
    iterations: usize,
) -> BenchmarkResult {
    let name = executor.name().to_string();

    let outcome = guarded(|| {
        let start = Instant::now();
        let mut first_item = Duration::ZERO;
        for iteration in 0..iterations {
            black_box(executor.fetch_one(item_id)?);
            if iteration == 0 {
                first_item = start.elapsed();
            }
        }
        Ok((start.elapsed(), first_item))
    });

    match outcome {
        Ok((elapsed, first_item)) => {
            BenchmarkResult::measured(name, non_zero(elapsed), first_item)
        }
        Err(err) => record_failure(name, scenario, err),
    }
}

/// Call `fetch_all()` once under a timer.
fn time_all_items<E: Executor + ?Sized>(executor: &mut E) -> BenchmarkResult {
    let name = executor.name().to_string();

    let outcome = guarded(|| {
        let start = Instant::now();
        black_box(executor.fetch_all()?);
        Ok(start.elapsed())
    });

    match outcome {
        Ok(elapsed) => BenchmarkResult::measured(name, non_zero(elapsed), Duration::ZERO),
        Err(err) => record_failure(name, Scenario::AllItems, err),
    }
}

fn record_failure(name: String, scenario: Scenario, err: Error) -> BenchmarkResult {
    warn!(executor = %name, scenario = %scenario, error = %err, "scenario failed, recording zero time");
    BenchmarkResult::failed(name, err.to_string())
}

fn teardown_all<I>(executors: &mut [Box<dyn Executor<Item = I>>]) {
    for executor in executors {
        if let Err(err) = guarded(|| executor.teardown()) {
            warn!(executor = %executor.name(), error = %err, "teardown failed");
        }
    }
}

/// A completed measurement must never read as the zero-time sentinel, even
/// on a clock too coarse to see it.
fn non_zero(elapsed: Duration) -> Duration {
    elapsed.max(Duration::from_nanos(1))
}

fn into_connection_error(err: Error) -> Error {
    match err {
        Error::Execution(msg) | Error::Teardown(msg) => Error::Connection(msg),
        fatal => fatal,
    }
}

/// Run an executor call, turning a panic into an [`Error::Execution`].
fn guarded<T>(call: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(Error::Execution(format!(
            "executor panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
