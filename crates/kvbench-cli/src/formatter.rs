//! Output formatters for suite results.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use kvbench::{BackendKind, SuiteReport};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format the outcomes of a suite run.
    fn format_suite(&self, suite: &SuiteReport) -> String;

    /// Format the list of backend families.
    fn format_backends(&self, kinds: &[BackendKind]) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_suite(&self, suite: &SuiteReport) -> String {
        if suite.is_empty() {
            return "No scenarios run".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("backend"),
            Cell::new("scenario"),
            Cell::new("iterations"),
            Cell::new("ns/op"),
            Cell::new("ops/sec"),
            Cell::new("status"),
        ]);

        for outcome in &suite.outcomes {
            let row = match &outcome.result {
                Ok(report) => vec![
                    Cell::new(outcome.backend.name()),
                    Cell::new(outcome.scenario.name()),
                    Cell::new(report.iterations),
                    Cell::new(format!("{:.1}", report.ns_per_op)),
                    Cell::new(format!("{:.0}", report.ops_per_sec)),
                    Cell::new("ok"),
                ],
                Err(e) => vec![
                    Cell::new(outcome.backend.name()),
                    Cell::new(outcome.scenario.name()),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("FAILED: {}", e)),
                ],
            };
            table.add_row(row);
        }

        let failed = suite.failures().count();
        format!("{}\n{} scenario(s), {} failed", table, suite.len(), failed)
    }

    fn format_backends(&self, kinds: &[BackendKind]) -> String {
        let mut table = Table::new();
        table.set_header(vec![Cell::new("backend"), Cell::new("variant")]);
        for kind in kinds {
            table.add_row(vec![
                Cell::new(kind.name()),
                Cell::new(format!("{:?}", kind.variant())),
            ]);
        }
        table.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_suite(&self, suite: &SuiteReport) -> String {
        let rows: Vec<serde_json::Value> = suite
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => serde_json::json!({
                    "status": "ok",
                    "backend": report.backend,
                    "scenario": report.scenario,
                    "iterations": report.iterations,
                    "elapsed_ns": report.elapsed_ns,
                    "ns_per_op": report.ns_per_op,
                    "ops_per_sec": report.ops_per_sec,
                }),
                Err(e) => serde_json::json!({
                    "status": "error",
                    "backend": outcome.backend,
                    "scenario": outcome.scenario,
                    "error": e.to_string(),
                }),
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_backends(&self, kinds: &[BackendKind]) -> String {
        let rows: Vec<serde_json::Value> = kinds
            .iter()
            .map(|kind| {
                serde_json::json!({
                    "backend": kind,
                    "variant": kind.variant(),
                })
            })
            .collect();
        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({
            "status": "error",
            "error": error,
        })
        .to_string()
    }
}
