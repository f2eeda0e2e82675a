//! End-to-end analysis of a single URL.
//!
//! Fetch, evaluate the on-page rules, check a sample of internal links and
//! pull PageSpeed metrics, then score everything. Every collaborator failure
//! degrades into fallback content or an issue; `analyze` always returns a
//! complete `AnalysisResult`.

use std::sync::Arc;
use std::time::Instant;

use url::Url;

use crate::config::AuditSettings;
use crate::domain::models::{
    AnalysisResult, AnalysisStats, PageSize, PerformanceOutcome, SERVICE_UNAVAILABLE,
};
use crate::error::Result;
use crate::extractor::HtmlDocument;
use crate::service::evaluator::evaluate;
use crate::service::fetcher::{fallback_page, ContentFetcher, HttpFetcher};
use crate::service::link_checker::{check_links, internal_links, HttpLinkChecker, LinkChecker};
use crate::service::pagespeed::{
    unavailable_issue, DisabledPerformance, PageSpeedClient, PerformanceProvider,
};

pub struct SeoAnalyzer {
    settings: AuditSettings,
    fetcher: Arc<dyn ContentFetcher>,
    link_checker: Arc<dyn LinkChecker>,
    performance: Arc<dyn PerformanceProvider>,
}

impl SeoAnalyzer {
    pub fn new(
        settings: AuditSettings,
        fetcher: Arc<dyn ContentFetcher>,
        link_checker: Arc<dyn LinkChecker>,
        performance: Arc<dyn PerformanceProvider>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            link_checker,
            performance,
        }
    }

    /// Analyzer backed by the HTTP collaborators.
    pub fn from_settings(settings: AuditSettings) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&settings)?);
        let link_checker = Arc::new(HttpLinkChecker::new(&settings)?);
        let performance: Arc<dyn PerformanceProvider> = if settings.skip_pagespeed {
            Arc::new(DisabledPerformance)
        } else {
            Arc::new(PageSpeedClient::new(&settings)?)
        };
        Ok(Self::new(settings, fetcher, link_checker, performance))
    }

    /// Swap the retrieval strategy, e.g. for a local HTML file.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub async fn analyze(&self, url: &Url) -> AnalysisResult {
        log::info!(
            "[ANALYZE] Starting analysis: {} (fetcher: {}, performance: {})",
            url,
            self.fetcher.name(),
            self.performance.name()
        );
        let start = Instant::now();

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!("[ANALYZE] Could not fetch {}: {}. Using fallback content", url, e);
                fallback_page(url)
            }
        };
        log::debug!("[ANALYZE] Page status {}, {} bytes", page.status, page.html.len());

        // Parse HTML and extract everything BEFORE any awaits
        let (html_issues, links) = {
            let document = HtmlDocument::parse(&page.html);
            (evaluate(&document, url), internal_links(&document, url))
        };

        let (link_outcome, performance) = tokio::join!(
            check_links(
                self.link_checker.as_ref(),
                &links,
                self.settings.max_links_to_check
            ),
            self.performance.measure(url),
        );

        let mut issues = html_issues;
        issues.extend(link_outcome.into_issues());

        let (load_time, page_size_kb) = match performance {
            PerformanceOutcome::Available(report) => {
                issues.extend(report.issues);
                (report.load_time, PageSize::Kilobytes(report.page_size_kb))
            }
            PerformanceOutcome::Unavailable { reason } => {
                issues.push(unavailable_issue(&reason));
                (SERVICE_UNAVAILABLE.to_string(), PageSize::Unavailable)
            }
        };

        let score = self.settings.scoring.apply(&issues);
        log::info!(
            "[ANALYZE] Complete - score: {}, issues: {}, elapsed: {:.2}s",
            score,
            issues.len(),
            start.elapsed().as_secs_f64()
        );

        AnalysisResult {
            url: url.to_string(),
            score,
            stats: AnalysisStats {
                load_time,
                page_size_kb,
                issues_found: issues.len(),
            },
            issues,
            fallback_content: page.fallback,
            analyzed_at: chrono::Utc::now(),
        }
    }
}
