// src/checks/vision.rs
//! Visual regression comparison against a baseline.
//!
//! Every precondition or collaborator failure degrades to SKIP with the cause
//! recorded. Only a completed comparison scoring under the threshold fails.

use crate::tools::{ComparisonImages, ComparisonPaths, VisionJudge};
use crate::types::{CheckStatus, VisionResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static OVERALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"OVERALL:\s*(\d+)\s*/\s*10").unwrap_or_else(|_| panic!("Invalid Regex"))
});
static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(VISUAL_POLISH|BRAND_FIDELITY|CONTENT_COMPLETENESS|MOBILE_EXPERIENCE):\s*(\d+)\s*/\s*10",
    )
    .unwrap_or_else(|_| panic!("Invalid Regex"))
});
static ANALYSIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)ANALYSIS:\s*(.+)").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Inputs to one comparison.
#[derive(Debug, Clone, Copy)]
pub struct VisionInputs<'a> {
    /// Directory holding `desktop.png` and `mobile.png` of the original site.
    pub baseline: Option<&'a Path>,
    /// Directory the screenshots check wrote into.
    pub screenshots_dir: &'a Path,
    /// True only when this run's screenshots check passed.
    pub captured: bool,
    pub threshold: u32,
    /// Name of the environment variable the credential is read from.
    pub credential_env: &'a str,
}

#[must_use]
pub fn check_vision(
    inputs: &VisionInputs<'_>,
    credential: Option<&str>,
    judge: &dyn VisionJudge,
) -> VisionResult {
    let threshold = inputs.threshold;
    let Some(baseline) = inputs.baseline else {
        return VisionResult::skipped(threshold, "no baseline provided");
    };
    let Some(api_key) = credential else {
        return VisionResult::skipped(threshold, format!("{} not set", inputs.credential_env));
    };
    if !inputs.captured {
        return VisionResult::skipped(threshold, "new screenshots not captured in this run");
    }

    let paths = ComparisonPaths {
        baseline_desktop: baseline.join("desktop.png"),
        baseline_mobile: baseline.join("mobile.png"),
        new_desktop: inputs.screenshots_dir.join("desktop.png"),
        new_mobile: inputs.screenshots_dir.join("mobile.png"),
    };
    let images = match encode_all(&paths, baseline) {
        Ok(images) => images,
        Err(reason) => return VisionResult::skipped(threshold, reason),
    };

    let response = match judge.compare(api_key, &images) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "vision comparison unavailable");
            return VisionResult::skipped(threshold, format!("vision API call failed: {e}"));
        }
    };

    let score = parse_overall(&response);
    let status = if score < threshold {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    VisionResult {
        status,
        score,
        threshold,
        categories: parse_categories(&response),
        analysis: parse_analysis(&response),
        details: format!("Score {score}/10 (threshold: {threshold})"),
    }
}

fn encode_all(paths: &ComparisonPaths, baseline: &Path) -> Result<ComparisonImages, String> {
    for (path, missing) in [
        (&paths.baseline_desktop, format!("baseline desktop.png not found in {}", baseline.display())),
        (&paths.baseline_mobile, format!("baseline mobile.png not found in {}", baseline.display())),
        (&paths.new_desktop, "new desktop.png not found (run screenshots check first)".to_string()),
        (&paths.new_mobile, "new mobile.png not found (run screenshots check first)".to_string()),
    ] {
        if !path.is_file() {
            return Err(missing);
        }
    }
    Ok(ComparisonImages {
        baseline_desktop: encode(&paths.baseline_desktop, "baseline desktop")?,
        baseline_mobile: encode(&paths.baseline_mobile, "baseline mobile")?,
        new_desktop: encode(&paths.new_desktop, "desktop screenshot")?,
        new_mobile: encode(&paths.new_mobile, "mobile screenshot")?,
    })
}

fn encode(path: &Path, label: &str) -> Result<String, String> {
    fs::read(path)
        .map(|bytes| STANDARD.encode(bytes))
        .map_err(|e| format!("failed to encode {label}: {e}"))
}

/// Highest score the judge is asked for.
pub const MAX_SCORE: u32 = 10;

/// Reads `OVERALL: X/10`; anything unparseable or above 10 scores 0.
#[must_use]
pub fn parse_overall(response: &str) -> u32 {
    OVERALL_RE
        .captures(response)
        .and_then(|c| c.get(1))
        .and_then(|m| in_range(m.as_str()))
        .unwrap_or(0)
}

fn in_range(digits: &str) -> Option<u32> {
    digits.parse().ok().filter(|&n| n <= MAX_SCORE)
}

/// Per-category `NAME: X/10` scores, keyed by lowercased name.
#[must_use]
pub fn parse_categories(response: &str) -> BTreeMap<String, u32> {
    CATEGORY_RE
        .captures_iter(response)
        .filter_map(|c| {
            let name = c.get(1)?.as_str().to_ascii_lowercase();
            let score = in_range(c.get(2)?.as_str())?;
            Some((name, score))
        })
        .collect()
}

/// The free-text feedback after `ANALYSIS:`, or the whole response.
fn parse_analysis(response: &str) -> String {
    ANALYSIS_RE
        .captures(response)
        .and_then(|c| c.get(1))
        .map_or(response, |m| m.as_str())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "VISUAL_POLISH: 8/10\nBRAND_FIDELITY: 7 / 10\n\
        CONTENT_COMPLETENESS: 9/10\nMOBILE_EXPERIENCE: 6/10\nOVERALL: 8/10\n\
        ANALYSIS: Cleaner hierarchy. Hero image is smaller on mobile.";

    #[test]
    fn overall_score_is_parsed() {
        assert_eq!(parse_overall(RESPONSE), 8);
        assert_eq!(parse_overall("OVERALL:10 /10"), 10);
    }

    #[test]
    fn unparseable_score_is_zero() {
        assert_eq!(parse_overall("I would rate it 9 out of 10"), 0);
        assert_eq!(parse_overall(""), 0);
        assert_eq!(parse_overall("OVERALL: 15/10"), 0);
        assert_eq!(parse_overall("OVERALL: 99999999999/10"), 0);
    }

    #[test]
    fn categories_are_collected() {
        let cats = parse_categories(RESPONSE);
        assert_eq!(cats.len(), 4);
        assert_eq!(cats["brand_fidelity"], 7);
        assert_eq!(cats["mobile_experience"], 6);
    }

    #[test]
    fn analysis_is_extracted() {
        assert_eq!(
            parse_analysis(RESPONSE),
            "Cleaner hierarchy. Hero image is smaller on mobile."
        );
        assert_eq!(parse_analysis("  just text "), "just text");
    }
}
