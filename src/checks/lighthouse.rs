// src/checks/lighthouse.rs
//! Performance, accessibility and SEO audit.

use crate::error::{ForgeError, ForgeResult};
use crate::serve::LocalServer;
use crate::tools::{AuditScores, SiteAuditor};
use crate::types::{CheckStatus, LighthouseResult, Thresholds};
use std::path::Path;
use std::time::Duration;

/// Audits the site served from `root`.
///
/// An auditor that cannot be launched yields SKIP. Any other failure, and
/// any score under its threshold, yields FAIL.
#[must_use]
pub fn check_lighthouse(
    root: &Path,
    thresholds: Thresholds,
    settle: Duration,
    auditor: &dyn SiteAuditor,
) -> LighthouseResult {
    let result = |status, scores: AuditScores, details: String| LighthouseResult {
        status,
        performance: scores.performance,
        accessibility: scores.accessibility,
        seo: scores.seo,
        thresholds,
        details,
    };

    if let Err(e) = auditor.probe() {
        tracing::warn!(error = %e, "skipping lighthouse");
        return result(CheckStatus::Skip, AuditScores::default(), e.to_string());
    }

    let scores = match audit_served(root, settle, auditor) {
        Ok(scores) => scores,
        Err(e) if e.is_unavailable() => {
            return result(CheckStatus::Skip, AuditScores::default(), e.to_string())
        }
        Err(e) => return result(CheckStatus::Fail, AuditScores::default(), e.to_string()),
    };

    let unmet = violations(scores, thresholds);
    if unmet.is_empty() {
        let details = format!(
            "Perf: {}, A11y: {}, SEO: {}",
            scores.performance, scores.accessibility, scores.seo
        );
        result(CheckStatus::Pass, scores, details)
    } else {
        let details = unmet
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        result(CheckStatus::Fail, scores, details)
    }
}

fn audit_served(
    root: &Path,
    settle: Duration,
    auditor: &dyn SiteAuditor,
) -> ForgeResult<AuditScores> {
    let server = LocalServer::start(root, settle)?;
    auditor.audit(&server.url())
}

/// Every score under its threshold, in performance, accessibility, seo order.
#[must_use]
pub fn violations(scores: AuditScores, thresholds: Thresholds) -> Vec<ForgeError> {
    [
        ("performance", scores.performance, thresholds.performance),
        ("accessibility", scores.accessibility, thresholds.accessibility),
        ("seo", scores.seo, thresholds.seo),
    ]
    .into_iter()
    .filter(|(_, actual, threshold)| actual < threshold)
    .map(|(metric, actual, threshold)| ForgeError::ThresholdViolation {
        metric,
        actual,
        threshold,
    })
    .collect()
}
