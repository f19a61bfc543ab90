// src/tools/mod.rs
//! Narrow interfaces over the external collaborators.
//!
//! Each check talks to its tool through one of these traits, so the gating
//! logic can run against deterministic fakes.

pub mod chrome;
pub mod lighthouse;
pub mod openrouter;

use crate::error::ForgeResult;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use chrome::HeadlessChrome;
pub use lighthouse::LighthouseCli;
pub use openrouter::OpenRouterJudge;

/// Category scores on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditScores {
    pub performance: u32,
    pub accessibility: u32,
    pub seo: u32,
}

/// Runs a page audit against a URL.
pub trait SiteAuditor {
    /// Confirms the tool can be launched.
    ///
    /// # Errors
    /// Returns `ToolUnavailable` if it cannot.
    fn probe(&self) -> ForgeResult<()>;

    /// # Errors
    /// Returns `ToolExecution` if the audit fails or its output is unreadable.
    fn audit(&self, url: &str) -> ForgeResult<AuditScores>;
}

/// A browser viewport to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub user_agent: Option<&'static str>,
}

pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

pub const DESKTOP: Viewport = Viewport {
    name: "desktop",
    width: 1280,
    height: 900,
    user_agent: None,
};

pub const MOBILE: Viewport = Viewport {
    name: "mobile",
    width: 390,
    height: 844,
    user_agent: Some(MOBILE_USER_AGENT),
};

/// Captures a bitmap of a URL at a viewport.
pub trait ScreenshotCapturer {
    /// # Errors
    /// Returns `ToolUnavailable` if no browser can be launched.
    fn probe(&self) -> ForgeResult<()>;

    /// Writes a PNG of `url` to `dest`, giving up after `timeout`.
    ///
    /// # Errors
    /// Returns `ToolExecution` if the capture fails or times out.
    fn capture(&self, url: &str, viewport: &Viewport, dest: &Path, timeout: Duration)
        -> ForgeResult<()>;
}

/// Baseline and freshly captured bitmaps, base64-encoded.
#[derive(Debug, Clone)]
pub struct ComparisonImages {
    pub baseline_desktop: String,
    pub baseline_mobile: String,
    pub new_desktop: String,
    pub new_mobile: String,
}

/// Where the four comparison images live on disk.
#[derive(Debug, Clone)]
pub struct ComparisonPaths {
    pub baseline_desktop: PathBuf,
    pub baseline_mobile: PathBuf,
    pub new_desktop: PathBuf,
    pub new_mobile: PathBuf,
}

/// Compares baseline and new screenshots and returns the free-text verdict.
pub trait VisionJudge {
    /// # Errors
    /// Returns `ToolExecution` if the request fails or the response is empty.
    fn compare(&self, api_key: &str, images: &ComparisonImages) -> ForgeResult<String>;
}

/// The collaborators a verification run needs.
pub struct Toolbox {
    pub auditor: Box<dyn SiteAuditor>,
    pub capturer: Box<dyn ScreenshotCapturer>,
    pub judge: Box<dyn VisionJudge>,
}

impl Toolbox {
    /// Real subprocess and HTTP adapters configured from `config`.
    #[must_use]
    pub fn system(config: &crate::config::VerifyConfig) -> Self {
        Self {
            auditor: Box::new(LighthouseCli::new(config.tools.lighthouse.clone())),
            capturer: Box::new(HeadlessChrome::new(config.tools.chrome.clone())),
            judge: Box::new(OpenRouterJudge::new(
                config.vision.endpoint.clone(),
                config.vision.model.clone(),
                config.vision.timeout,
            )),
        }
    }
}
