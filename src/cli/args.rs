use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "siteforge",
    version,
    about = "Quality gate for a built static site"
)]
pub struct Cli {
    /// Site output directory to verify [default: ./dist]
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// Directory holding baseline desktop.png and mobile.png for the vision check
    #[arg(long, value_name = "DIR")]
    pub baseline: Option<PathBuf>,
    /// Minimum vision score, 1-10 [default: 7]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub threshold: Option<u32>,
    /// Minimum Lighthouse performance score [default: 90]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub lighthouse_perf: Option<u32>,
    /// Minimum Lighthouse accessibility score [default: 90]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub lighthouse_a11y: Option<u32>,
    /// Minimum Lighthouse SEO score [default: 90]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub lighthouse_seo: Option<u32>,
    /// Where to write the JSON report [default: forge-report.json]
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
    /// Where captured screenshots go [default: screenshots]
    #[arg(long, value_name = "DIR")]
    pub screenshots_dir: Option<PathBuf>,
    /// Config file [default: ./siteforge.toml if present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Print the report as JSON instead of progress and summary
    #[arg(long)]
    pub json: bool,
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Flag values that override `siteforge.toml`.
    #[must_use]
    pub fn overrides(&self) -> crate::config::Overrides {
        crate::config::Overrides {
            dir: self.dir.clone(),
            baseline: self.baseline.clone(),
            vision_threshold: self.threshold,
            performance: self.lighthouse_perf,
            accessibility: self.lighthouse_a11y,
            seo: self.lighthouse_seo,
            report: self.report.clone(),
            screenshots_dir: self.screenshots_dir.clone(),
        }
    }
}
