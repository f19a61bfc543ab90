// src/report.rs
//! The run report: one result per check plus the overall verdict.

use crate::types::{
    AssetsResult, BuildResult, CheckStatus, LighthouseResult, ScreenshotsResult, Thresholds,
    Verdict, VisionResult,
};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Detail carried by checks the run never reached.
pub const NOT_RUN: &str = "not run";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportChecks {
    pub assets: AssetsResult,
    pub build: BuildResult,
    pub lighthouse: LighthouseResult,
    pub screenshots: ScreenshotsResult,
    pub vision: VisionResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// RFC 3339 UTC, stamped by [`Report::finalize`].
    #[serde(default)]
    pub timestamp: String,
    pub directory: PathBuf,
    pub overall: Verdict,
    pub checks: ReportChecks,
}

impl Report {
    /// A report for a run that has not started: every required check FAIL,
    /// vision SKIP, overall FAIL.
    #[must_use]
    pub fn pending(directory: &Path, vision_threshold: u32, thresholds: Thresholds) -> Self {
        Self {
            timestamp: String::new(),
            directory: directory.to_path_buf(),
            overall: Verdict::Fail,
            checks: ReportChecks {
                assets: AssetsResult::failed(NOT_RUN),
                build: BuildResult::failed(NOT_RUN),
                lighthouse: LighthouseResult {
                    status: CheckStatus::Fail,
                    performance: 0,
                    accessibility: 0,
                    seo: 0,
                    thresholds,
                    details: NOT_RUN.to_string(),
                },
                screenshots: ScreenshotsResult::with_status(CheckStatus::Fail, NOT_RUN),
                vision: VisionResult::skipped(vision_threshold, NOT_RUN),
            },
        }
    }

    pub fn set_assets(&mut self, result: AssetsResult) {
        self.checks.assets = result;
    }

    pub fn set_build(&mut self, result: BuildResult) {
        self.checks.build = result;
    }

    pub fn set_lighthouse(&mut self, result: LighthouseResult) {
        self.checks.lighthouse = result;
    }

    pub fn set_screenshots(&mut self, result: ScreenshotsResult) {
        self.checks.screenshots = result;
    }

    pub fn set_vision(&mut self, result: VisionResult) {
        self.checks.vision = result;
    }

    pub fn set_overall(&mut self, verdict: Verdict) {
        self.overall = verdict;
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.overall == Verdict::Pass
    }

    /// Stamps the completion time.
    pub fn finalize(&mut self) {
        self.timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    }

    /// # Errors
    /// Returns error if the report cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report as pretty JSON, creating parent directories.
    ///
    /// # Errors
    /// Returns error if serialization or any filesystem step fails.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// One `(status, text)` line per check, in pipeline order.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<(CheckStatus, String)> {
        let c = &self.checks;
        let assets = match c.assets.status {
            CheckStatus::Pass => format!(
                "ASSETS: {}/{} assets verified",
                c.assets.total, c.assets.total
            ),
            _ if c.assets.missing.is_empty() => format!("ASSETS: FAIL - {}", c.assets.details),
            _ => format!("ASSETS: FAIL - Missing {} assets", c.assets.missing.len()),
        };
        let build = match c.build.status {
            CheckStatus::Pass => format!("BUILD: {}", c.build.details),
            _ => format!("BUILD: FAIL - {}", c.build.details),
        };
        let lh = &c.lighthouse;
        let lighthouse = match lh.status {
            CheckStatus::Pass => format!(
                "LIGHTHOUSE: Perf {} | A11y {} | SEO {}",
                lh.performance, lh.accessibility, lh.seo
            ),
            CheckStatus::Skip => format!("LIGHTHOUSE: SKIP - {}", lh.details),
            CheckStatus::Fail => format!(
                "LIGHTHOUSE: Perf {} | A11y {} | SEO {} (thresholds not met)",
                lh.performance, lh.accessibility, lh.seo
            ),
        };
        let screenshots = match c.screenshots.status {
            CheckStatus::Pass => "SCREENSHOTS: Desktop + Mobile captured".to_string(),
            CheckStatus::Skip => format!("SCREENSHOTS: SKIP - {}", c.screenshots.details),
            CheckStatus::Fail => format!("SCREENSHOTS: FAIL - {}", c.screenshots.details),
        };
        let v = &c.vision;
        let vision = match v.status {
            CheckStatus::Pass => format!("VISION: Score {}/10 (threshold: {})", v.score, v.threshold),
            CheckStatus::Skip => format!("VISION: SKIP - {}", v.details),
            CheckStatus::Fail => format!(
                "VISION: Score {}/10 (threshold: {}) - {}",
                v.score, v.threshold, v.analysis
            ),
        };
        vec![
            (c.assets.status, assets),
            (c.build.status, build),
            (lh.status, lighthouse),
            (c.screenshots.status, screenshots),
            (v.status, vision),
        ]
    }

    /// Plain-text summary, one line per check, then the verdict.
    #[must_use]
    pub fn render_summary(&self) -> String {
        let mut out = String::from("siteforge verify results:\n");
        for (status, line) in self.summary_lines() {
            let _ = writeln!(out, "  {} {line}", status_mark(status));
        }
        let _ = write!(out, "\nOVERALL: {}", self.overall);
        out
    }
}

/// The marker printed before a summary line.
#[must_use]
pub fn status_mark(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "✅",
        CheckStatus::Fail => "❌",
        CheckStatus::Skip => "⚠️ ",
    }
}
