//! Ranking of result collections for display.
//!
//! Everything here is a pure function of a borrowed collection; rendering
//! never reorders or mutates what the harness produced.

use serde::Serialize;

use crate::result::BenchmarkResult;

/// How a collection is turned into ranked rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Drop zero-time (failed or skipped) results.
    pub ignore_zero_times: bool,
    /// Include the first-iteration time column.
    pub show_first_run: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            ignore_zero_times: true,
            show_first_run: false,
        }
    }
}

impl ReportOptions {
    /// Set whether zero-time results are dropped.
    pub fn with_ignore_zero_times(mut self, ignore: bool) -> Self {
        self.ignore_zero_times = ignore;
        self
    }

    /// Set whether the first-iteration time is shown.
    pub fn with_first_run(mut self, show: bool) -> Self {
        self.show_first_run = show;
        self
    }
}

/// One ranked line of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// 1-based position after sorting.
    pub rank: usize,
    /// Executor name.
    pub name: String,
    /// Total scenario time in milliseconds.
    pub exec_time_ms: f64,
    /// First-iteration time in milliseconds, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_item_exec_time_ms: Option<f64>,
    /// Failure reason for zero-time rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Sort results by ascending `exec_time` and number them.
///
/// The sort is stable, so equal times keep registration order.
pub fn rank(results: &[BenchmarkResult], options: ReportOptions) -> Vec<ReportRow> {
    let mut ordered: Vec<&BenchmarkResult> = results
        .iter()
        .filter(|r| !(options.ignore_zero_times && r.is_skipped()))
        .collect();
    ordered.sort_by_key(|r| r.exec_time());

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, result)| ReportRow {
            rank: i + 1,
            name: result.name().to_string(),
            exec_time_ms: as_millis(result.exec_time()),
            first_item_exec_time_ms: options
                .show_first_run
                .then(|| as_millis(result.first_item_exec_time())),
            error: result.error().map(str::to_string),
        })
        .collect()
}

fn as_millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
