//! Output formatters for benchmark reports.

use clap::ValueEnum;
use comfy_table::{Cell, Color, Table};
use serde::Serialize;

use ormbench::ReportRow;

/// Rows ranked at or above this position are highlighted in tables.
const HIGHLIGHT_TOP: usize = 3;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// One titled block of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Machine-readable scenario key.
    pub scenario: &'static str,
    /// Heading shown above the rows.
    pub title: String,
    /// Whether rows carry a first-iteration time.
    #[serde(skip)]
    pub show_first_run: bool,
    /// Ranked rows.
    pub rows: Vec<ReportRow>,
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format every section of a report.
    fn format_report(&self, sections: &[Section]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

fn millis(ms: f64) -> String {
    format!("{:.3}", ms)
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl TableFormatter {
    fn format_section(section: &Section) -> String {
        if section.rows.is_empty() {
            return format!("{}\n(no results)", section.title);
        }

        let show_errors = section.rows.iter().any(|row| row.error.is_some());

        let mut header = vec!["#", "Strategy", "Time (ms)"];
        if section.show_first_run {
            header.push("First run (ms)");
        }
        if show_errors {
            header.push("Error");
        }

        let mut table = Table::new();
        table.set_header(header);

        for row in &section.rows {
            let mut cells = vec![
                Cell::new(row.rank),
                Cell::new(&row.name),
                Cell::new(millis(row.exec_time_ms)),
            ];
            if section.show_first_run {
                cells.push(Cell::new(
                    row.first_item_exec_time_ms.map(millis).unwrap_or_default(),
                ));
            }
            if show_errors {
                cells.push(Cell::new(row.error.as_deref().unwrap_or("")));
            }

            if row.rank <= HIGHLIGHT_TOP && row.error.is_none() {
                cells = cells.into_iter().map(|cell| cell.fg(Color::Green)).collect();
            }
            table.add_row(cells);
        }

        format!("{}\n{}", section.title, table)
    }
}

impl Formatter for TableFormatter {
    fn format_report(&self, sections: &[Section]) -> String {
        sections
            .iter()
            .map(Self::format_section)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_report(&self, sections: &[Section]) -> String {
        serde_json::to_string_pretty(sections).unwrap_or_else(|_| "[]".to_string())
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_report(&self, sections: &[Section]) -> String {
        let mut lines = vec!["scenario,rank,name,exec_time_ms,first_item_exec_time_ms,error".to_string()];

        for section in sections {
            for row in &section.rows {
                lines.push(
                    [
                        section.scenario.to_string(),
                        row.rank.to_string(),
                        escape_csv(&row.name),
                        millis(row.exec_time_ms),
                        row.first_item_exec_time_ms.map(millis).unwrap_or_default(),
                        escape_csv(row.error.as_deref().unwrap_or("")),
                    ]
                    .join(","),
                );
            }
        }

        lines.join("\n")
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: usize, name: &str, ms: f64, first: Option<f64>) -> ReportRow {
        ReportRow {
            rank,
            name: name.to_string(),
            exec_time_ms: ms,
            first_item_exec_time_ms: first,
            error: None,
        }
    }

    fn sections() -> Vec<Section> {
        vec![
            Section {
                scenario: "single_item",
                title: "Single item".to_string(),
                show_first_run: true,
                rows: vec![
                    row(1, "rusqlite (cached statement)", 3.25, Some(0.5)),
                    row(2, "rusqlite (raw statement)", 12.0, Some(0.75)),
                ],
            },
            Section {
                scenario: "all_items",
                title: "All items".to_string(),
                show_first_run: false,
                rows: vec![row(1, "rusqlite (query_row)", 40.1234, None)],
            },
        ]
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_table_format() {
        let output = TableFormatter.format_report(&sections());
        assert!(output.contains("Single item"));
        assert!(output.contains("First run (ms)"));
        assert!(output.contains("rusqlite (cached statement)"));
        assert!(output.contains("3.250"));
        assert!(output.contains("40.123"));
        assert!(!output.contains("Error"));
    }

    #[test]
    fn test_table_empty_section() {
        let section = Section {
            scenario: "all_items",
            title: "All items".to_string(),
            show_first_run: false,
            rows: Vec::new(),
        };
        let output = TableFormatter.format_report(&[section]);
        assert!(output.contains("(no results)"));
    }

    #[test]
    fn test_table_shows_error_column() {
        let mut failed = row(2, "broken", 0.0, None);
        failed.error = Some("execution error: no such table: post".to_string());
        let section = Section {
            scenario: "warm_up",
            title: "Warm-up".to_string(),
            show_first_run: false,
            rows: vec![row(1, "ok", 1.0, None), failed],
        };
        let output = TableFormatter.format_report(&[section]);
        assert!(output.contains("Error"));
        assert!(output.contains("no such table"));
    }

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format_report(&sections());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["scenario"], "single_item");
        assert_eq!(parsed[0]["rows"][0]["rank"], 1);
        assert_eq!(parsed[0]["rows"][1]["first_item_exec_time_ms"], 0.75);
        assert!(parsed[1]["rows"][0].get("first_item_exec_time_ms").is_none());
        assert!(parsed[0].get("show_first_run").is_none());
    }

    #[test]
    fn test_csv_format() {
        let output = CsvFormatter.format_report(&sections());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "scenario,rank,name,exec_time_ms,first_item_exec_time_ms,error");
        assert_eq!(lines[1], "single_item,1,rusqlite (cached statement),3.250,0.500,");
        assert_eq!(lines[3], "all_items,1,rusqlite (query_row),40.123,,");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
