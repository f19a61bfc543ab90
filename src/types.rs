// src/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

impl CheckStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall run verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsResult {
    pub status: CheckStatus,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    pub details: String,
}

impl AssetsResult {
    #[must_use]
    pub fn failed(details: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            total: 0,
            missing: Vec::new(),
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub status: CheckStatus,
    pub pages: usize,
    pub details: String,
}

impl BuildResult {
    #[must_use]
    pub fn failed(details: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            pages: 0,
            details: details.into(),
        }
    }
}

/// Minimum audit scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub performance: u32,
    pub accessibility: u32,
    pub seo: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            performance: 90,
            accessibility: 90,
            seo: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LighthouseResult {
    pub status: CheckStatus,
    pub performance: u32,
    pub accessibility: u32,
    pub seo: u32,
    pub thresholds: Thresholds,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotsResult {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl ScreenshotsResult {
    #[must_use]
    pub fn with_status(status: CheckStatus, details: impl Into<String>) -> Self {
        Self {
            status,
            desktop: None,
            mobile: None,
            desktop_sha256: None,
            mobile_sha256: None,
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionResult {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub score: u32,
    pub threshold: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub analysis: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl VisionResult {
    #[must_use]
    pub fn skipped(threshold: u32, details: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Skip,
            score: 0,
            threshold,
            categories: BTreeMap::new(),
            analysis: String::new(),
            details: details.into(),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u32) -> bool {
    *value == 0
}
