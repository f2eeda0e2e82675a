//! Command line definition and the `run` entry point.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use seo_health_check::config::AuditSettings;
use seo_health_check::domain::target::parse_target;
use seo_health_check::reporter::{render_json, render_text};
use seo_health_check::service::{ScoringModel, SeoAnalyzer, StaticFetcher};

/// Exit code when the score is below `--fail-under`.
const EXIT_BELOW_THRESHOLD: u8 = 2;

fn parse_max_links(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("max-links must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

fn parse_score(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(n) if n <= 100 => Ok(n),
        _ => Err(format!("'{}' is not a score between 0 and 100", s)),
    }
}

/// SEO health check for a single page
#[derive(Parser, Debug)]
#[command(name = "seo-health-check")]
#[command(
    version,
    about = "Check a web page for common on-page SEO problems and score it out of 100",
    after_help = "\
Examples:
  seo-health-check example.com                         Analyze a live page
  seo-health-check example.com --format json -o r.json JSON report to a file
  seo-health-check example.com --file page.html        Analyze a saved copy of the page
  seo-health-check example.com --fail-under 80         Exit code 2 below 80 (CI mode)"
)]
pub struct Cli {
    /// Page to analyze; https:// is assumed when no scheme is given
    pub url: String,

    /// Analyze this local HTML file instead of fetching the page
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// TOML settings file
    #[arg(long, short = 'c', env = "SEO_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Number of internal links to check
    #[arg(long, value_parser = parse_max_links)]
    pub max_links: Option<usize>,

    /// Skip the PageSpeed Insights call
    #[arg(long)]
    pub no_pagespeed: bool,

    /// Scoring model: severity or pipeline
    #[arg(long)]
    pub scoring: Option<ScoringModel>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Exit with code 2 when the score is below this value
    #[arg(long, value_parser = parse_score)]
    pub fail_under: Option<u8>,
}

impl Cli {
    /// Settings file and environment first, then flags on top.
    fn settings(&self) -> Result<AuditSettings> {
        let mut settings = AuditSettings::load(self.config.as_deref())?;
        if let Some(max_links) = self.max_links {
            settings.max_links_to_check = max_links;
        }
        if self.no_pagespeed {
            settings.skip_pagespeed = true;
        }
        if let Some(scoring) = self.scoring {
            settings.scoring = scoring;
        }
        Ok(settings)
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let url = parse_target(&cli.url).with_context(|| format!("Invalid URL '{}'", cli.url))?;
    let settings = cli.settings().context("Failed to load settings")?;

    let mut analyzer =
        SeoAnalyzer::from_settings(settings).context("Failed to set up HTTP clients")?;
    if let Some(path) = &cli.file {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read HTML file {}", path.display()))?;
        analyzer = analyzer.with_fetcher(Arc::new(StaticFetcher::new(html)));
    }

    let result = analyzer.analyze(&url).await;

    let report = match cli.format.as_str() {
        "json" => render_json(&result).context("Failed to serialize report")?,
        _ => render_text(&result),
    };
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{}", report),
    }

    if let Some(threshold) = cli.fail_under {
        if result.score < threshold {
            log::warn!("Score {} is below the threshold of {}", result.score, threshold);
            return Ok(ExitCode::from(EXIT_BELOW_THRESHOLD));
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["seo-health-check", "example.com"]).unwrap();
        assert_eq!(cli.url, "example.com");
        assert_eq!(cli.format, "text");
        assert_eq!(cli.log_level, "info");
        assert!(cli.scoring.is_none());
        assert!(!cli.no_pagespeed);
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "seo-health-check",
            "example.com",
            "--max-links",
            "2",
            "--no-pagespeed",
            "--scoring",
            "pipeline",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.max_links_to_check, 2);
        assert!(settings.skip_pagespeed);
        assert_eq!(settings.scoring, ScoringModel::Pipeline);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["seo-health-check", "x.com", "--max-links", "0"]).is_err());
        assert!(Cli::try_parse_from(["seo-health-check", "x.com", "--fail-under", "101"]).is_err());
        assert!(Cli::try_parse_from(["seo-health-check", "x.com", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["seo-health-check", "x.com", "--scoring", "flat"]).is_err());
    }
}
