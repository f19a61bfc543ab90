// src/config/mod.rs
pub mod types;

pub use self::types::{
    CommandEntry, ForgeToml, OutputConfig, Overrides, ThresholdConfig, ToolConfig, ToolSettings,
    VerifyConfig, VisionConfig, VisionSettings,
};
use crate::types::Thresholds;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File read from the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "siteforge.toml";

/// Default site directory.
pub const DEFAULT_SITE_DIR: &str = "./dist";

impl ForgeToml {
    /// Loads `siteforge.toml`.
    ///
    /// An explicit `path` must exist; the implicit file in the working
    /// directory is optional.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parses TOML content, defaulting every missing key.
    ///
    /// # Errors
    /// Returns error if the content is not valid TOML for this schema.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl VerifyConfig {
    /// Merges command-line overrides over file settings.
    ///
    /// Relative site directories are made absolute against `cwd`.
    ///
    /// # Errors
    /// Returns error if a threshold is out of range.
    pub fn resolve(file: ForgeToml, overrides: Overrides, cwd: &Path) -> Result<Self> {
        let dir = overrides
            .dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_DIR));
        let site_dir = absolutize(cwd, &dir);

        let vision_threshold = overrides
            .vision_threshold
            .unwrap_or(file.thresholds.vision);
        let thresholds = Thresholds {
            performance: overrides.performance.unwrap_or(file.thresholds.performance),
            accessibility: overrides
                .accessibility
                .unwrap_or(file.thresholds.accessibility),
            seo: overrides.seo.unwrap_or(file.thresholds.seo),
        };

        let config = Self {
            site_dir,
            baseline: overrides.baseline,
            vision_threshold,
            thresholds,
            report_path: overrides.report.unwrap_or(file.output.report),
            screenshots_dir: overrides
                .screenshots_dir
                .unwrap_or(file.output.screenshots),
            tools: ToolSettings {
                lighthouse: file.tools.lighthouse.into_vec(),
                chrome: file.tools.chrome,
                settle: Duration::from_millis(file.tools.settle_ms),
                capture_timeout: Duration::from_secs(file.tools.capture_timeout_secs),
            },
            vision: VisionSettings {
                endpoint: file.vision.endpoint,
                model: file.vision.model,
                api_key_env: file.vision.api_key_env,
                timeout: Duration::from_secs(file.vision.timeout_secs),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates ranges that clap cannot see when values come from the file.
    ///
    /// # Errors
    /// Returns error describing the first out-of-range value.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.vision_threshold) {
            bail!(
                "vision threshold must be between 1 and 10 (got {})",
                self.vision_threshold
            );
        }
        for (name, value) in [
            ("performance", self.thresholds.performance),
            ("accessibility", self.thresholds.accessibility),
            ("seo", self.thresholds.seo),
        ] {
            if value > 100 {
                bail!("{name} threshold must be between 0 and 100 (got {value})");
            }
        }
        if self.tools.lighthouse.is_empty() {
            bail!("tools.lighthouse must name a command");
        }
        Ok(())
    }

    /// Reads the vision credential from the environment.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.vision.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

fn absolutize(cwd: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        let mut out = cwd.to_path_buf();
        for part in dir.components() {
            match part {
                std::path::Component::CurDir => {}
                other => out.push(other),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(file: ForgeToml, overrides: Overrides) -> Result<VerifyConfig> {
        VerifyConfig::resolve(file, overrides, Path::new("/work"))
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = resolve(ForgeToml::default(), Overrides::default()).unwrap();
        assert_eq!(c.site_dir, PathBuf::from("/work/dist"));
        assert_eq!(c.vision_threshold, 7);
        assert_eq!(c.thresholds, Thresholds::default());
        assert_eq!(c.report_path, PathBuf::from("forge-report.json"));
        assert_eq!(c.screenshots_dir, PathBuf::from("screenshots"));
        assert_eq!(c.tools.lighthouse, vec!["npx", "--no-install", "lighthouse"]);
        assert_eq!(c.tools.settle, Duration::from_millis(500));
        assert!(c.baseline.is_none());
    }

    #[test]
    fn flags_override_file_values() {
        let file = ForgeToml::parse("[thresholds]\nvision = 5\nperformance = 50\nseo = 70\n").unwrap();
        let overrides = Overrides {
            vision_threshold: Some(9),
            seo: Some(60),
            ..Overrides::default()
        };
        let c = resolve(file, overrides).unwrap();
        assert_eq!(c.vision_threshold, 9);
        assert_eq!(c.thresholds.performance, 50);
        assert_eq!(c.thresholds.accessibility, 90);
        assert_eq!(c.thresholds.seo, 60);
    }

    #[test]
    fn lighthouse_command_accepts_string_or_list() {
        let file = ForgeToml::parse("[tools]\nlighthouse = \"lighthouse\"\n").unwrap();
        assert_eq!(file.tools.lighthouse.into_vec(), vec!["lighthouse"]);
        let file = ForgeToml::parse("[tools]\nlighthouse = [\"node\", \"lh.js\"]\n").unwrap();
        assert_eq!(file.tools.lighthouse.into_vec(), vec!["node", "lh.js"]);
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let file = ForgeToml::parse("[thresholds]\nvision = 11\n").unwrap();
        assert!(resolve(file, Overrides::default()).is_err());
        let overrides = Overrides {
            accessibility: Some(101),
            ..Overrides::default()
        };
        assert!(resolve(ForgeToml::default(), overrides).is_err());
    }

    #[test]
    fn absolute_site_dir_is_kept() {
        let overrides = Overrides {
            dir: Some(PathBuf::from("/var/www/site")),
            ..Overrides::default()
        };
        let c = resolve(ForgeToml::default(), overrides).unwrap();
        assert_eq!(c.site_dir, PathBuf::from("/var/www/site"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let d = tempfile::tempdir().unwrap();
        let explicit = d.path().join("nope.toml");
        assert!(ForgeToml::load(Some(&explicit)).is_err());
    }
}
