//! Table formatting utilities for CLI list and stats commands
//!
//! Every record type describes its list columns once; this module renders
//! them in each output format.

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::io;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{format_money, truncate_str};
use crate::cli::OutputFormat;
use crate::core::{RecordId, Summary};

/// A list column: header and TSV width
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(header: &'static str, width: usize) -> Self {
        Self { header, width }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record id (cyan)
    Id(RecordId),
    /// Plain text, truncated to the column
    Text(String),
    /// Status label with color coding
    Status(String),
    /// Whole number, right aligned
    Number(u64),
    /// Dollar amount
    Money(f64),
    /// Percentage
    Percent(u32),
    Date(Option<NaiveDate>),
    /// Aircraft reference that no longer resolves
    Missing(String),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn status(s: impl ToString) -> Self {
        CellValue::Status(s.to_string())
    }

    pub fn opt_text(s: Option<&str>) -> Self {
        s.map_or(CellValue::Empty, CellValue::text)
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Status(s) => {
                let styled = match s.as_str() {
                    "Completed" | "Passed" | "Active" | "OK" => style(s.as_str()).green(),
                    "In Production" | "In Progress" | "Testing" => style(s.as_str()).cyan(),
                    "On Leave" | "Pending Review" => style(s.as_str()).yellow(),
                    "Delayed" | "Failed" | "Low" => style(s.as_str()).red().bold(),
                    "Inactive" => style(s.as_str()).red().dim(),
                    _ => style(s.as_str()).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", n, width = width.saturating_sub(1)) + " ",
            CellValue::Money(m) => {
                format!("{:>width$}", format_money(*m), width = width.saturating_sub(1)) + " "
            }
            CellValue::Percent(p) => {
                format!("{:>width$}", format!("{}%", p), width = width.saturating_sub(1)) + " "
            }
            CellValue::Date(d) => match d {
                Some(d) => format!("{:<width$}", d.format("%Y-%m-%d"), width = width),
                None => format!("{:<width$}", style("-").dim(), width = width),
            },
            CellValue::Missing(s) => format!("{:<width$}", style(s).red().dim(), width = width),
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    /// Plain value for CSV output (quoting is left to the writer)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Text(s) | CellValue::Status(s) | CellValue::Missing(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Money(m) => format!("{:.2}", m),
            CellValue::Percent(p) => p.to_string(),
            CellValue::Date(d) => d.map(|d| d.to_string()).unwrap_or_default(),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Money(m) => format_money(*m),
            CellValue::Percent(p) => format!("{}%", p),
            CellValue::Date(None) | CellValue::Empty => "-".to_string(),
            other => other.format_csv(),
        };
        raw.replace('|', "\\|")
    }
}

/// A rendered row: the record id plus one cell per column
pub type Row = (RecordId, Vec<CellValue>);

/// Print rows in a tabular format (tsv, csv, md or id)
///
/// `noun` is the singular record name used in the summary line.
pub fn print_rows(
    format: OutputFormat,
    columns: &[Column],
    rows: &[Row],
    noun: &str,
    show_summary: bool,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer
                .write_record(columns.iter().map(|c| c.header.to_lowercase()))
                .into_diagnostic()?;
            for (_, cells) in rows {
                writer
                    .write_record(cells.iter().map(CellValue::format_csv))
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
            println!("| {} |", headers.join(" | "));
            println!("|{}", "---|".repeat(columns.len()));
            for (_, cells) in rows {
                let values: Vec<String> = cells.iter().map(CellValue::format_md).collect();
                println!("| {} |", values.join(" | "));
            }
        }
        OutputFormat::Id => {
            for (id, _) in rows {
                println!("{}", id);
            }
        }
        _ => {
            let header: Vec<String> = columns
                .iter()
                .map(|c| format!("{:<width$}", style(c.header).bold(), width = c.width))
                .collect();
            println!("{}", header.join(" "));
            let total: usize = columns.iter().map(|c| c.width + 1).sum();
            println!("{}", "-".repeat(total.saturating_sub(1)));

            for (_, cells) in rows {
                let line: Vec<String> = cells
                    .iter()
                    .zip(columns)
                    .map(|(cell, col)| cell.format_tsv(col.width))
                    .collect();
                println!("{}", line.join(" ").trim_end());
            }

            if show_summary {
                println!();
                println!("{} {}(s) found.", style(rows.len()).cyan(), noun);
            }
        }
    }
    Ok(())
}

/// Print a section summary as a metric table followed by its lists
/// Metrics, then one `(list title, item)` pair per list item
fn summary_pairs(summary: &Summary) -> impl Iterator<Item = (&str, &str)> {
    let metrics = summary
        .metrics
        .iter()
        .map(|m| (m.label.as_str(), m.value.as_str()));
    let items = summary.lists.iter().flat_map(|list| {
        list.items
            .iter()
            .map(move |item| (list.title.as_str(), item.as_str()))
    });
    metrics.chain(items)
}

pub fn print_summary(summary: &Summary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(summary).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(summary).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(["metric", "value"]).into_diagnostic()?;
            for (label, value) in summary_pairs(summary) {
                writer.write_record([label, value]).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Tsv | OutputFormat::Id => {
            for (label, value) in summary_pairs(summary) {
                println!("{}\t{}", label, value);
            }
        }
        OutputFormat::Md | OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(["Metric", "Value"]);
            for metric in &summary.metrics {
                builder.push_record([metric.label.as_str(), metric.value.as_str()]);
            }
            let mut table = builder.build();
            if format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
                println!("{}", style(&summary.title).bold());
            }
            println!("{}", table);

            for list in &summary.lists {
                println!();
                println!("{}", style(&list.title).bold());
                if list.items.is_empty() {
                    println!("  {}", style("(none)").dim());
                }
                for item in &list.items {
                    println!("  • {}", item);
                }
            }
        }
    }
    Ok(())
}
