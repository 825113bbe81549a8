//! Turns harness results into report sections.

use ormbench::{rank, ReportOptions, RunResults, Scenario};

use crate::formatter::Section;

/// Build the report for a finished run.
///
/// The warm-up section appears only when a warm-up ran and always keeps its
/// zero-time rows, so a strategy that failed while warming up stays visible.
/// The measured sections drop zero-time rows unless `show_zero` is set.
pub fn build_sections(results: &RunResults, iterations: usize, show_zero: bool) -> Vec<Section> {
    let mut sections = Vec::with_capacity(3);

    if !results.warm_up.is_empty() {
        sections.push(section(
            results,
            Scenario::WarmUp,
            "Performance of warm-up".to_string(),
            ReportOptions::default().with_ignore_zero_times(false),
        ));
    }

    sections.push(section(
        results,
        Scenario::SingleItem,
        format!(
            "Performance of select and map a row over {} iterations",
            iterations
        ),
        ReportOptions::default()
            .with_ignore_zero_times(!show_zero)
            .with_first_run(true),
    ));

    sections.push(section(
        results,
        Scenario::AllItems,
        "Performance of mapping all rows in one iteration".to_string(),
        ReportOptions::default().with_ignore_zero_times(!show_zero),
    ));

    sections
}

fn section(results: &RunResults, scenario: Scenario, title: String, options: ReportOptions) -> Section {
    Section {
        scenario: scenario.as_str(),
        title,
        show_first_run: options.show_first_run,
        rows: rank(results.get(scenario), options),
    }
}
