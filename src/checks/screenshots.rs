// src/checks/screenshots.rs
//! Desktop and mobile screenshot capture.

use crate::error::{ForgeError, ForgeResult};
use crate::serve::LocalServer;
use crate::tools::{ScreenshotCapturer, Viewport, DESKTOP, MOBILE};
use crate::types::{CheckStatus, ScreenshotsResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Where and how long to capture.
#[derive(Debug, Clone)]
pub struct CaptureOptions<'a> {
    pub out_dir: &'a Path,
    pub settle: Duration,
    /// Budget shared by both captures.
    pub timeout: Duration,
}

/// Captures `desktop.png` and `mobile.png` of the site served from `root`.
///
/// A capturer that cannot be launched yields SKIP; any failure once it is
/// present yields FAIL.
#[must_use]
pub fn check_screenshots(
    root: &Path,
    options: &CaptureOptions<'_>,
    capturer: &dyn ScreenshotCapturer,
) -> ScreenshotsResult {
    if let Err(e) = capturer.probe() {
        tracing::warn!(error = %e, "skipping screenshots");
        return ScreenshotsResult::with_status(CheckStatus::Skip, e.to_string());
    }

    if let Err(e) = fs::create_dir_all(options.out_dir) {
        return ScreenshotsResult::with_status(
            CheckStatus::Fail,
            format!("Failed to create screenshots directory: {e}"),
        );
    }

    match capture_both(root, options, capturer) {
        Ok((desktop, mobile)) => {
            let desktop_sha256 = digest(&desktop);
            let mobile_sha256 = digest(&mobile);
            let details = format!(
                "Desktop: {}, Mobile: {}",
                desktop.display(),
                mobile.display()
            );
            ScreenshotsResult {
                status: CheckStatus::Pass,
                desktop: Some(desktop.display().to_string()),
                mobile: Some(mobile.display().to_string()),
                desktop_sha256,
                mobile_sha256,
                details,
            }
        }
        Err(e) if e.is_unavailable() => {
            ScreenshotsResult::with_status(CheckStatus::Skip, e.to_string())
        }
        Err(e) => ScreenshotsResult::with_status(CheckStatus::Fail, e.to_string()),
    }
}

fn capture_both(
    root: &Path,
    options: &CaptureOptions<'_>,
    capturer: &dyn ScreenshotCapturer,
) -> ForgeResult<(PathBuf, PathBuf)> {
    let server = LocalServer::start(root, options.settle)?;
    let url = server.url();
    let deadline = Instant::now() + options.timeout;

    let desktop = capture_one(capturer, &url, &DESKTOP, options.out_dir, deadline)?;
    let mobile = capture_one(capturer, &url, &MOBILE, options.out_dir, deadline)?;
    Ok((desktop, mobile))
}

fn capture_one(
    capturer: &dyn ScreenshotCapturer,
    url: &str,
    viewport: &Viewport,
    out_dir: &Path,
    deadline: Instant,
) -> ForgeResult<PathBuf> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(ForgeError::execution(
            "screenshots",
            format!("{} screenshot skipped: capture budget exhausted", viewport.name),
        ));
    }
    let dest = out_dir.join(format!("{}.png", viewport.name));
    // A bitmap from an earlier run must never stand in for this one.
    match fs::remove_file(&dest) {
        Ok(()) => tracing::debug!(path = %dest.display(), "removed previous screenshot"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ForgeError::filesystem(
                "failed to remove previous screenshot",
                &dest,
                e,
            ))
        }
    }
    capturer.capture(url, viewport, &dest, remaining)?;
    if !dest.is_file() {
        return Err(ForgeError::execution(
            "screenshots",
            format!("{} screenshot was not written to {}", viewport.name, dest.display()),
        ));
    }
    Ok(dest)
}

/// Hex SHA-256 of a file, or `None` if it cannot be read.
fn digest(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(format!("{:x}", hasher.finalize()))
}
