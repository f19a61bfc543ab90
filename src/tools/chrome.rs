// src/tools/chrome.rs
//! Headless Chrome/Chromium screenshot adapter.

use super::{ScreenshotCapturer, Viewport};
use crate::error::{ForgeError, ForgeResult};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

const TOOL: &str = "chrome";

/// Binaries tried in order when none is configured.
const CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Lets the page run scripts and settle before the bitmap is taken.
const VIRTUAL_TIME_BUDGET_MS: u32 = 1000;

#[derive(Debug, Default)]
pub struct HeadlessChrome {
    configured: Option<String>,
    resolved: OnceLock<Option<String>>,
}

impl HeadlessChrome {
    #[must_use]
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured,
            resolved: OnceLock::new(),
        }
    }

    fn binary(&self) -> Option<&str> {
        self.resolved
            .get_or_init(|| match &self.configured {
                Some(bin) => responds(bin).then(|| bin.clone()),
                None => CANDIDATES
                    .iter()
                    .find(|bin| responds(bin))
                    .map(|bin| (*bin).to_string()),
            })
            .as_deref()
    }
}

fn responds(bin: &str) -> bool {
    Command::new(bin)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

impl ScreenshotCapturer for HeadlessChrome {
    fn probe(&self) -> ForgeResult<()> {
        match self.binary() {
            Some(bin) => {
                tracing::debug!(%bin, "browser available");
                Ok(())
            }
            None => Err(ForgeError::unavailable(
                TOOL,
                match &self.configured {
                    Some(bin) => format!("{bin} did not respond to --version"),
                    None => format!("none of {} found on PATH", CANDIDATES.join(", ")),
                },
            )),
        }
    }

    fn capture(
        &self,
        url: &str,
        viewport: &Viewport,
        dest: &Path,
        timeout: Duration,
    ) -> ForgeResult<()> {
        let bin = self
            .binary()
            .ok_or_else(|| ForgeError::unavailable(TOOL, "no browser binary"))?;

        let mut cmd = Command::new(bin);
        cmd.arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={},{}", viewport.width, viewport.height))
            .arg(format!("--screenshot={}", dest.display()))
            .arg(format!("--virtual-time-budget={VIRTUAL_TIME_BUDGET_MS}"));
        if let Some(ua) = viewport.user_agent {
            cmd.arg(format!("--user-agent={ua}"));
        }
        cmd.arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        tracing::info!(viewport = viewport.name, %url, "capturing screenshot");
        let child = cmd.spawn().map_err(|e| {
            ForgeError::execution(TOOL, format!("{} screenshot failed: {e}", viewport.name))
        })?;
        wait_with_deadline(child, timeout, viewport.name)?;

        if dest.is_file() {
            Ok(())
        } else {
            Err(ForgeError::execution(
                TOOL,
                format!("{} screenshot was not written to {}", viewport.name, dest.display()),
            ))
        }
    }
}

fn wait_with_deadline(mut child: Child, timeout: Duration, name: &str) -> ForgeResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return Ok(()),
            Ok(Some(status)) => {
                return Err(ForgeError::execution(
                    TOOL,
                    format!("{name} screenshot failed: browser exited with {status}"),
                ))
            }
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ForgeError::execution(
                    TOOL,
                    format!("{name} screenshot timed out after {timeout:?}"),
                ));
            }
            Ok(None) => thread::sleep(Duration::from_millis(100)),
            Err(e) => {
                return Err(ForgeError::execution(
                    TOOL,
                    format!("{name} screenshot failed: {e}"),
                ))
            }
        }
    }
}
