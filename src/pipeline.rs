// src/pipeline.rs
//! Check orchestration.
//!
//! Stages run strictly in order. Each stage's gate decides whether its
//! status halts the run. The overall verdict is PASS only when the last
//! stage completes without a halt.

use crate::checks::screenshots::CaptureOptions;
use crate::checks::vision::VisionInputs;
use crate::checks;
use crate::config::VerifyConfig;
use crate::report::Report;
use crate::tools::Toolbox;
use crate::types::{CheckStatus, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Assets,
    Build,
    Lighthouse,
    Screenshots,
    Vision,
}

impl Stage {
    pub const COUNT: usize = 5;
    pub const ALL: [Stage; Self::COUNT] = [
        Self::Assets,
        Self::Build,
        Self::Lighthouse,
        Self::Screenshots,
        Self::Vision,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Assets => "ASSETS",
            Self::Build => "BUILD",
            Self::Lighthouse => "LIGHTHOUSE",
            Self::Screenshots => "SCREENSHOTS",
            Self::Vision => "VISION",
        }
    }

    /// 1-based position.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Assets => 1,
            Self::Build => 2,
            Self::Lighthouse => 3,
            Self::Screenshots => 4,
            Self::Vision => 5,
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Assets => Some(Self::Build),
            Self::Build => Some(Self::Lighthouse),
            Self::Lighthouse => Some(Self::Screenshots),
            Self::Screenshots => Some(Self::Vision),
            Self::Vision => None,
        }
    }

    #[must_use]
    pub fn gate(self) -> Gate {
        match self {
            Self::Assets | Self::Build => Gate::Hard,
            Self::Lighthouse => Gate::SoftRequired,
            Self::Screenshots => Gate::BestEffort,
            Self::Vision => Gate::Optional,
        }
    }
}

/// How a stage's status affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// FAIL halts; SKIP is never produced.
    Hard,
    /// SKIP continues; FAIL halts.
    SoftRequired,
    /// Never halts.
    BestEffort,
    /// SKIP continues; FAIL halts.
    Optional,
}

impl Gate {
    #[must_use]
    pub fn halts(self, status: CheckStatus) -> bool {
        match (self, status) {
            (Self::BestEffort, _) | (_, CheckStatus::Pass | CheckStatus::Skip) => false,
            (Self::Hard | Self::SoftRequired | Self::Optional, CheckStatus::Fail) => true,
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Done,
    Aborted(Stage),
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: Report,
    pub termination: Termination,
}

impl PipelineOutcome {
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.report.overall
    }
}

/// Progress notifications.
#[derive(Debug, Clone, Copy)]
pub enum StageEvent<'a> {
    Started(Stage),
    Finished {
        stage: Stage,
        status: CheckStatus,
        details: &'a str,
    },
}

pub struct Pipeline<'a> {
    config: &'a VerifyConfig,
    tools: &'a Toolbox,
    credential: Option<String>,
}

impl<'a> Pipeline<'a> {
    /// Reads the vision credential from the environment named in `config`.
    #[must_use]
    pub fn new(config: &'a VerifyConfig, tools: &'a Toolbox) -> Self {
        Self {
            config,
            tools,
            credential: config.api_key(),
        }
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    /// Runs every stage without progress output.
    #[must_use]
    pub fn run(&self) -> PipelineOutcome {
        self.run_with_progress(|_| {})
    }

    /// Runs stages in order until one halts or all complete.
    ///
    /// The returned report is not finalized.
    pub fn run_with_progress<F>(&self, mut on_event: F) -> PipelineOutcome
    where
        F: FnMut(StageEvent<'_>),
    {
        let config = self.config;
        let mut report = Report::pending(
            &config.site_dir,
            config.vision_threshold,
            config.thresholds,
        );

        let mut stage = Some(Stage::Assets);
        while let Some(current) = stage {
            on_event(StageEvent::Started(current));
            let (status, details) = self.run_stage(current, &mut report);
            tracing::info!(stage = current.label(), status = %status, "stage finished");
            on_event(StageEvent::Finished {
                stage: current,
                status,
                details: &details,
            });

            if current.gate().halts(status) {
                tracing::warn!(stage = current.label(), "verification aborted");
                report.set_overall(Verdict::Fail);
                return PipelineOutcome {
                    report,
                    termination: Termination::Aborted(current),
                };
            }
            stage = current.next();
        }

        report.set_overall(Verdict::Pass);
        PipelineOutcome {
            report,
            termination: Termination::Done,
        }
    }

    fn run_stage(&self, stage: Stage, report: &mut Report) -> (CheckStatus, String) {
        let config = self.config;
        let root = config.site_dir.as_path();
        match stage {
            Stage::Assets => {
                let result = checks::check_assets(root);
                let out = (result.status, result.details.clone());
                report.set_assets(result);
                out
            }
            Stage::Build => {
                let result = checks::check_build(root);
                let out = (result.status, result.details.clone());
                report.set_build(result);
                out
            }
            Stage::Lighthouse => {
                let result = checks::check_lighthouse(
                    root,
                    config.thresholds,
                    config.tools.settle,
                    self.tools.auditor.as_ref(),
                );
                let out = (result.status, result.details.clone());
                report.set_lighthouse(result);
                out
            }
            Stage::Screenshots => {
                let options = CaptureOptions {
                    out_dir: &config.screenshots_dir,
                    settle: config.tools.settle,
                    timeout: config.tools.capture_timeout,
                };
                let result =
                    checks::check_screenshots(root, &options, self.tools.capturer.as_ref());
                let out = (result.status, result.details.clone());
                report.set_screenshots(result);
                out
            }
            Stage::Vision => {
                let inputs = VisionInputs {
                    baseline: config.baseline.as_deref(),
                    screenshots_dir: &config.screenshots_dir,
                    captured: report.checks.screenshots.status == CheckStatus::Pass,
                    threshold: config.vision_threshold,
                    credential_env: &config.vision.api_key_env,
                };
                let result = checks::check_vision(
                    &inputs,
                    self.credential.as_deref(),
                    self.tools.judge.as_ref(),
                );
                let out = (result.status, result.details.clone());
                report.set_vision(result);
                out
            }
        }
    }
}
