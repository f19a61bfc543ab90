// src/tools/lighthouse.rs
//! Lighthouse subprocess adapter.

use super::{AuditScores, SiteAuditor};
use crate::error::{ForgeError, ForgeResult};
use serde::Deserialize;
use std::fs;
use std::process::{Command, Stdio};

const TOOL: &str = "lighthouse";
const CHROME_FLAGS: &str = "--chrome-flags=--headless --no-sandbox --disable-gpu";
const CATEGORIES: &str = "--only-categories=performance,accessibility,seo";

/// Runs `lighthouse` (by default through `npx --no-install`).
#[derive(Debug, Clone)]
pub struct LighthouseCli {
    argv: Vec<String>,
}

impl LighthouseCli {
    #[must_use]
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    fn command(&self) -> ForgeResult<Command> {
        let (program, prefix) = self
            .argv
            .split_first()
            .ok_or_else(|| ForgeError::unavailable(TOOL, "no command configured"))?;
        let mut cmd = Command::new(program);
        cmd.args(prefix).stdin(Stdio::null());
        Ok(cmd)
    }
}

impl SiteAuditor for LighthouseCli {
    fn probe(&self) -> ForgeResult<()> {
        let output = self
            .command()?
            .arg("--version")
            .output()
            .map_err(|e| {
                ForgeError::unavailable(
                    TOOL,
                    format!("{e} (run: npm install -g lighthouse)"),
                )
            })?;
        if output.status.success() {
            tracing::debug!(
                version = %String::from_utf8_lossy(&output.stdout).trim(),
                "lighthouse available"
            );
            Ok(())
        } else {
            Err(ForgeError::unavailable(
                TOOL,
                "lighthouse not installed (run: npm install -g lighthouse)",
            ))
        }
    }

    fn audit(&self, url: &str) -> ForgeResult<AuditScores> {
        let out_file = tempfile::Builder::new()
            .prefix("lighthouse-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| ForgeError::execution(TOOL, format!("failed to create temp file: {e}")))?;
        let out_path = out_file.path().to_path_buf();

        let mut cmd = self.command()?;
        cmd.arg(url)
            .arg("--output=json")
            .arg(format!("--output-path={}", out_path.display()))
            .arg(CHROME_FLAGS)
            .arg("--quiet")
            .arg(CATEGORIES);
        tracing::info!(%url, "running lighthouse");

        let output = cmd
            .output()
            .map_err(|e| ForgeError::execution(TOOL, format!("failed to launch: {e}")))?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            if combined.contains("timeout") {
                return Err(ForgeError::execution(TOOL, "lighthouse timeout"));
            }
            return Err(ForgeError::execution(
                TOOL,
                format!("lighthouse error: {}, output: {}", output.status, combined.trim()),
            ));
        }

        let data = fs::read_to_string(&out_path).map_err(|e| {
            ForgeError::execution(TOOL, format!("failed to read lighthouse output: {e}"))
        })?;
        parse_scores(&data)
    }
}

#[derive(Debug, Deserialize)]
struct LighthouseJson {
    categories: Categories,
}

#[derive(Debug, Deserialize)]
struct Categories {
    #[serde(default)]
    performance: Category,
    #[serde(default)]
    accessibility: Category,
    #[serde(default)]
    seo: Category,
}

#[derive(Debug, Default, Deserialize)]
struct Category {
    // Lighthouse writes `null` when a category could not be scored.
    score: Option<f64>,
}

/// Reads the three category scores and scales them to 0-100.
///
/// # Errors
/// Returns `ToolExecution` if the document is not Lighthouse JSON.
pub fn parse_scores(json: &str) -> ForgeResult<AuditScores> {
    let parsed: LighthouseJson = serde_json::from_str(json).map_err(|e| {
        ForgeError::execution(TOOL, format!("failed to parse lighthouse JSON: {e}"))
    })?;
    Ok(AuditScores {
        performance: scale(parsed.categories.performance.score),
        accessibility: scale(parsed.categories.accessibility.score),
        seo: scale(parsed.categories.seo.score),
    })
}

/// Truncates a 0-1 fraction to an integer percentage.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn scale(fraction: Option<f64>) -> u32 {
    (fraction.unwrap_or(0.0) * 100.0).clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_and_truncates_scores() {
        let json = r#"{"categories":{
            "performance":{"score":0.987},
            "accessibility":{"score":1},
            "seo":{"score":0.9}
        }}"#;
        let scores = parse_scores(json).unwrap();
        assert_eq!(
            scores,
            AuditScores {
                performance: 98,
                accessibility: 100,
                seo: 90
            }
        );
    }

    #[test]
    fn null_or_absent_category_reads_as_zero() {
        let json = r#"{"categories":{"performance":{"score":null},"seo":{"score":0.5}}}"#;
        let scores = parse_scores(json).unwrap();
        assert_eq!(scores.performance, 0);
        assert_eq!(scores.accessibility, 0);
        assert_eq!(scores.seo, 50);
    }

    #[test]
    fn garbage_is_execution_error() {
        let err = parse_scores("not json").unwrap_err();
        assert!(matches!(err, ForgeError::ToolExecution { .. }));
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let cli = LighthouseCli::new(vec!["siteforge-no-such-lighthouse".into()]);
        assert!(cli.probe().unwrap_err().is_unavailable());
    }

    #[test]
    fn empty_command_is_unavailable() {
        let cli = LighthouseCli::new(Vec::new());
        assert!(cli.probe().unwrap_err().is_unavailable());
    }
}
