pub mod types;

pub use types::{Report, ReportStatus};

use crate::scan::ScanOutcome;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build a Report from a scan outcome.
pub fn build(outcome: ScanOutcome) -> Report {
    match outcome {
        ScanOutcome::NoMarkupFiles {
            repository,
            api_url,
            search,
        } => Report {
            repository,
            api_url,
            search,
            status: ReportStatus::NoMarkupFiles,
            markup_files: 0,
            findings: Vec::new(),
            skipped: Vec::new(),
        },
        ScanOutcome::Completed(summary) => {
            let status = if summary.findings.is_empty() {
                ReportStatus::NotFound
            } else {
                ReportStatus::Found
            };
            Report {
                repository: summary.repository,
                api_url: summary.api_url,
                search: summary.search,
                status,
                markup_files: summary.markup_files,
                findings: summary.findings,
                skipped: summary.skipped,
            }
        }
    }
}

/// Print the report to stdout, as colored text or as JSON, and write a
/// markdown copy when `output_path` is given.
#[instrument(skip(report), fields(repository = %report.repository, status = %report.status))]
pub fn output(report: &Report, output_path: Option<&Path>, json: bool) -> Result<(), ReportError> {
    if json {
        debug!("writing JSON report to stdout");
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        debug!("writing report to terminal");
        println!("{}", render_terminal(report));
    }

    if let Some(path) = output_path {
        debug!(path = %path.display(), "writing markdown report to file");
        std::fs::write(path, render_markdown(report))?;
    }
    Ok(())
}

/// One-line verdict shared by the terminal and markdown reports.
pub fn summary_line(report: &Report) -> String {
    match report.status {
        ReportStatus::NoMarkupFiles => "No markup files found in the root directory.".to_string(),
        ReportStatus::NotFound => format!(
            "No occurrences of '{}' found in markup files.",
            report.search
        ),
        ReportStatus::Found => format!(
            "{} occurrence(s) of '{}' found in markup files:",
            report.occurrences(),
            report.search
        ),
    }
}

/// Terminal layout:
///
/// Repository: acme/docs | Markup files: 2 | Search: 'TODO'
///
/// 1 occurrence(s) of 'TODO' found in markup files:
///
/// File: README.md, Line 3: TODO: fix
fn render_terminal(report: &Report) -> String {
    let mut out = String::from("\n");
    out.push_str(&format!(
        "Repository: {} | Markup files: {} | Search: '{}'\n\n",
        report.repository.bold(),
        report.markup_files,
        report.search
    ));
    out.push_str(&format!("{}\n", colorize_summary(report)));

    if !report.findings.is_empty() {
        out.push('\n');
        for finding in &report.findings {
            out.push_str(&format!("{}\n", finding));
        }
    }

    if !report.skipped.is_empty() {
        out.push('\n');
        out.push_str(&format!("{}\n", format!("Skipped {} file(s):", report.skipped.len()).yellow()));
        for skipped in &report.skipped {
            out.push_str(&format!("  • {}: {}\n", skipped.file_name, skipped.reason));
        }
    }
    out
}

fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Markup scan: {}\n\n", report.repository));
    md.push_str(&format!(
        "**Search:** `{}` | **Markup files:** {} | **Status:** {}\n\n",
        report.search, report.markup_files, report.status
    ));
    md.push_str(&format!("{}\n\n", summary_line(report)));

    if !report.findings.is_empty() {
        md.push_str("| File | Line | Text |\n|------|------|------|\n");
        for finding in &report.findings {
            md.push_str(&format!(
                "| `{}` | {} | {} |\n",
                finding.file_name,
                finding.line_number,
                finding.line_text.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    if !report.skipped.is_empty() {
        md.push_str("## Skipped files\n\n");
        for skipped in &report.skipped {
            md.push_str(&format!("- `{}`: {}\n", skipped.file_name, skipped.reason));
        }
        md.push('\n');
    }
    md
}

fn colorize_summary(report: &Report) -> colored::ColoredString {
    let line = summary_line(report);
    match report.status {
        ReportStatus::Found => line.green().bold(),
        ReportStatus::NotFound => line.yellow().bold(),
        ReportStatus::NoMarkupFiles => line.dimmed(),
    }
}
