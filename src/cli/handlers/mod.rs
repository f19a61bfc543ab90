// src/cli/handlers/mod.rs
//! The verify command.

use super::Cli;
use crate::config::{ForgeToml, VerifyConfig};
use crate::exit::ForgeExit;
use crate::pipeline::{Pipeline, StageEvent};
use crate::reporting;
use crate::tools::Toolbox;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

#[must_use]
pub fn get_working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Loads configuration and merges the command-line overrides.
///
/// # Errors
/// Returns error if the config file is unreadable or a value is out of range.
pub fn load_config(cli: &Cli) -> Result<VerifyConfig> {
    let file = ForgeToml::load(cli.config.as_deref())?;
    VerifyConfig::resolve(file, cli.overrides(), &get_working_dir())
}

/// Runs every check against the configured site and reports the verdict.
///
/// # Errors
/// Returns error if the report cannot be printed as JSON.
pub fn handle_verify(cli: &Cli) -> Result<ForgeExit> {
    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            return Ok(ForgeExit::InvalidInput);
        }
    };
    let toolbox = Toolbox::system(&config);
    verify(&config, &toolbox, cli.json)
}

/// Runs the pipeline with the given tools, writes the report once and prints it.
///
/// # Errors
/// Returns error if the report cannot be printed as JSON.
pub fn verify(config: &VerifyConfig, toolbox: &Toolbox, json: bool) -> Result<ForgeExit> {
    if !json {
        println!("Verifying site in: {}", config.site_dir.display());
        println!();
    }

    let outcome = Pipeline::new(config, toolbox).run_with_progress(|event| {
        if json {
            return;
        }
        match event {
            StageEvent::Started(stage) => reporting::print_stage_start(stage),
            StageEvent::Finished {
                status, details, ..
            } => reporting::print_stage_end(status, details),
        }
    });
    tracing::debug!(termination = ?outcome.termination, "pipeline finished");

    let mut report = outcome.report;
    report.finalize();
    if let Err(e) = report.write_json(&config.report_path) {
        eprintln!("{} {e:#}", "Error writing report:".red());
    }

    if json {
        reporting::print_json(&report)?;
    } else {
        reporting::print_summary(&report);
    }
    Ok(ForgeExit::from(report.overall))
}
