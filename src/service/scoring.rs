//! Reducing a list of issues to a 0-100 health score.
//!
//! `score` is the canonical severity-weighted reducer. `pipeline_score` keeps
//! the flat per-source penalties the full page pipeline applies; it is only
//! used when explicitly selected through `ScoringModel::Pipeline`.

use serde::Deserialize;

use crate::domain::models::{Issue, IssueKind, IssueSource, Severity};

const MAX_SCORE: i64 = 100;

pub const CRITICAL_PENALTY: i64 = 15;
pub const WARNING_PENALTY: i64 = 8;
pub const INFO_PENALTY: i64 = 3;

const PAGESPEED_PENALTY: i64 = 10;
const BROKEN_LINKS_PENALTY: i64 = 12;
const LINK_CHECK_UNAVAILABLE_PENALTY: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringModel {
    /// critical -15, warning -8, info -3
    #[default]
    Severity,
    /// flat penalties for link and PageSpeed issues, -15/-8 for HTML issues with info charged as a warning
    Pipeline,
}

impl ScoringModel {
    pub fn apply(&self, issues: &[Issue]) -> u8 {
        match self {
            ScoringModel::Severity => score(issues),
            ScoringModel::Pipeline => pipeline_score(issues),
        }
    }
}

impl std::str::FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "severity" => Ok(Self::Severity),
            "pipeline" => Ok(Self::Pipeline),
            other => Err(format!("unknown scoring model '{}'", other)),
        }
    }
}

pub fn severity_penalty(severity: Severity) -> i64 {
    match severity {
        Severity::Critical => CRITICAL_PENALTY,
        Severity::Warning => WARNING_PENALTY,
        Severity::Info => INFO_PENALTY,
    }
}

/// Severity-weighted score, clamped at 0. Order of issues does not matter.
pub fn score(issues: &[Issue]) -> u8 {
    let penalty: i64 = issues.iter().map(|i| severity_penalty(i.severity)).sum();
    clamp(MAX_SCORE - penalty)
}

fn pipeline_penalty(issue: &Issue) -> i64 {
    match issue.kind.source() {
        // The page pipeline reports missing structured data as a warning.
        IssueSource::Html => match issue.severity {
            Severity::Critical => CRITICAL_PENALTY,
            Severity::Warning | Severity::Info => WARNING_PENALTY,
        },
        IssueSource::PageSpeed => PAGESPEED_PENALTY,
        IssueSource::Links => match issue.kind {
            IssueKind::LinkCheckUnavailable => LINK_CHECK_UNAVAILABLE_PENALTY,
            _ => BROKEN_LINKS_PENALTY,
        },
    }
}

/// Flat per-source penalties of the full page pipeline, clamped at 0.
pub fn pipeline_score(issues: &[Issue]) -> u8 {
    let penalty: i64 = issues.iter().map(pipeline_penalty).sum();
    clamp(MAX_SCORE - penalty)
}

fn clamp(raw: i64) -> u8 {
    log::trace!("[SCORE] raw score {}", raw);
    raw.clamp(0, MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::HtmlDocument;
    use crate::service::evaluator::evaluate;

    fn issues(kinds: &[IssueKind]) -> Vec<Issue> {
        kinds.iter().map(|k| Issue::new(*k, "")).collect()
    }

    #[test]
    fn test_empty_list_scores_100() {
        assert_eq!(score(&[]), 100);
        assert_eq!(pipeline_score(&[]), 100);
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(score(&issues(&[IssueKind::MissingTitle, IssueKind::MissingH1])), 70);
        assert_eq!(
            score(&issues(&[
                IssueKind::MissingCanonical,
                IssueKind::MissingViewport,
                IssueKind::MultipleH1,
            ])),
            76
        );
        assert_eq!(
            score(&issues(&[
                IssueKind::MissingTitle,
                IssueKind::MissingViewport,
                IssueKind::MissingStructuredData,
            ])),
            74
        );
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let many = issues(&[IssueKind::MissingTitle; 20]);
        assert_eq!(score(&many), 0);

        let huge = issues(&[IssueKind::MissingStructuredData; 500]);
        assert_eq!(score(&huge), 0);
    }

    #[test]
    fn test_score_is_order_independent() {
        let mut list = issues(&[
            IssueKind::MissingTitle,
            IssueKind::MissingStructuredData,
            IssueKind::ImagesMissingAlt,
        ]);
        let forward = score(&list);
        list.reverse();
        assert_eq!(score(&list), forward);
    }

    #[test]
    fn test_pipeline_score_uses_flat_source_penalties() {
        let list = issues(&[
            IssueKind::MissingH1,              // -15
            IssueKind::MissingCanonical,       // -8
            IssueKind::MissingStructuredData,  // -8 in the pipeline
            IssueKind::PerformanceSlow,        // -10
            IssueKind::PerformanceUnavailable, // -10
            IssueKind::BrokenInternalLinks,    // -12
        ]);
        assert_eq!(pipeline_score(&list), 37);

        let unavailable = issues(&[IssueKind::LinkCheckUnavailable]);
        assert_eq!(pipeline_score(&unavailable), 90);
    }

    #[test]
    fn test_page_without_structured_data_under_both_models() {
        let html = format!(
            r#"<html><head>
                <title>{}</title>
                <meta name="description" content="{}">
                <meta name="viewport" content="width=device-width, initial-scale=1">
                <link rel="canonical" href="https://example.com/">
            </head><body><h1>Main</h1></body></html>"#,
            "t".repeat(45),
            "d".repeat(140)
        );
        let url = url::Url::parse("https://example.com/").unwrap();
        let found = evaluate(&HtmlDocument::parse(&html), &url);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, IssueKind::MissingStructuredData);
        assert_eq!(score(&found), 97);
        assert_eq!(pipeline_score(&found), 92);
        assert_eq!(ScoringModel::Pipeline.apply(&found), 92);
    }

    #[test]
    fn test_scoring_model_parsing() {
        assert_eq!("pipeline".parse::<ScoringModel>().unwrap(), ScoringModel::Pipeline);
        assert_eq!("severity".parse::<ScoringModel>().unwrap(), ScoringModel::Severity);
        assert!("flat".parse::<ScoringModel>().is_err());
        assert_eq!(ScoringModel::default(), ScoringModel::Severity);
    }
}
