// src/reporting.rs
//! Console output for verification runs.

use crate::pipeline::Stage;
use crate::report::{status_mark, Report};
use crate::types::{CheckStatus, Verdict};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

/// Prints `[i/5] Running NAME check... ` without a newline.
pub fn print_stage_start(stage: Stage) {
    print!(
        "[{}/{}] Running {} check... ",
        stage.index(),
        Stage::COUNT,
        stage.label()
    );
    let _ = std::io::stdout().flush();
}

/// Completes the line begun by [`print_stage_start`].
pub fn print_stage_end(status: CheckStatus, details: &str) {
    let label = colored_status(status);
    if details.is_empty() {
        println!("{label}");
    } else {
        println!("{label} ({details})");
    }
}

fn colored_status(status: CheckStatus) -> colored::ColoredString {
    match status {
        CheckStatus::Pass => status.label().green().bold(),
        CheckStatus::Fail => status.label().red().bold(),
        CheckStatus::Skip => status.label().yellow().bold(),
    }
}

/// Prints the colored summary block and overall verdict.
pub fn print_summary(report: &Report) {
    println!();
    println!("{}", "SITEFORGE VERIFY RESULTS".cyan().bold());
    println!("{}", "========================================".dimmed());
    for (status, line) in report.summary_lines() {
        let text = match status {
            CheckStatus::Pass => line.normal(),
            CheckStatus::Fail => line.red(),
            CheckStatus::Skip => line.yellow(),
        };
        println!("  {} {text}", status_mark(status));
    }
    if !report.checks.assets.missing.is_empty() {
        println!();
        println!("{}", "Missing assets:".red().bold());
        for reference in &report.checks.assets.missing {
            println!("  {} {reference}", "-".red());
        }
    }
    println!();
    match report.overall {
        Verdict::Pass => println!("{} {}", "OVERALL:".bold(), "PASS".green().bold()),
        Verdict::Fail => println!("{} {}", "OVERALL:".bold(), "FAIL".red().bold()),
    }
}

/// Prints any serializable value as pretty JSON on stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}
