use crate::types::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_vision")]
    pub vision: u32,
    #[serde(default = "default_audit")]
    pub performance: u32,
    #[serde(default = "default_audit")]
    pub accessibility: u32,
    #[serde(default = "default_audit")]
    pub seo: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            vision: default_vision(),
            performance: default_audit(),
            accessibility: default_audit(),
            seo: default_audit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report")]
    pub report: PathBuf,
    #[serde(default = "default_screenshots")]
    pub screenshots: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: default_report(),
            screenshots: default_screenshots(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_lighthouse")]
    pub lighthouse: CommandEntry,
    /// Browser binary; probed from well-known names when unset.
    #[serde(default)]
    pub chrome: Option<String>,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_secs: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            lighthouse: default_lighthouse(),
            chrome: None,
            settle_ms: default_settle_ms(),
            capture_timeout_secs: default_capture_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_vision_timeout")]
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_vision_timeout(),
        }
    }
}

const fn default_vision() -> u32 { 7 }
const fn default_audit() -> u32 { 90 }
const fn default_settle_ms() -> u64 { 500 }
const fn default_capture_timeout() -> u64 { 60 }
const fn default_vision_timeout() -> u64 { 120 }

fn default_report() -> PathBuf { PathBuf::from("forge-report.json") }
fn default_screenshots() -> PathBuf { PathBuf::from("screenshots") }
fn default_endpoint() -> String { "https://openrouter.ai/api/v1/chat/completions".to_string() }
fn default_model() -> String { "anthropic/claude-sonnet-4-20250514".to_string() }
fn default_api_key_env() -> String { "OPENROUTER_API_KEY".to_string() }

fn default_lighthouse() -> CommandEntry {
    CommandEntry::List(vec![
        "npx".into(),
        "--no-install".into(),
        "lighthouse".into(),
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandEntry {
    Single(String),
    List(Vec<String>),
}

impl CommandEntry {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(s) => s.split_whitespace().map(str::to_string).collect(),
            Self::List(l) => l,
        }
    }
}

/// Contents of `siteforge.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForgeToml {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tools: ToolConfig,
    #[serde(default)]
    pub vision: VisionConfig,
}

/// Values supplied on the command line; `None` defers to the file or default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub baseline: Option<PathBuf>,
    pub vision_threshold: Option<u32>,
    pub performance: Option<u32>,
    pub accessibility: Option<u32>,
    pub seo: Option<u32>,
    pub report: Option<PathBuf>,
    pub screenshots_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Audit command argv prefix; the URL and flags are appended.
    pub lighthouse: Vec<String>,
    pub chrome: Option<String>,
    pub settle: Duration,
    pub capture_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct VisionSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout: Duration,
}

/// Fully resolved settings for one verification run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub site_dir: PathBuf,
    pub baseline: Option<PathBuf>,
    pub vision_threshold: u32,
    pub thresholds: Thresholds,
    pub report_path: PathBuf,
    pub screenshots_dir: PathBuf,
    pub tools: ToolSettings,
    pub vision: VisionSettings,
}
