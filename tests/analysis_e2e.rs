//! End-to-end tests for the analysis pipeline.
//!
//! The network collaborators are replaced with in-process fakes so the whole
//! fetch, evaluate, link check, performance and scoring path runs offline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use seo_health_check::{
    config::AuditSettings,
    domain::models::{
        FetchedPage, Issue, IssueKind, LinkStatus, PageSize, PerformanceOutcome,
        PerformanceReport, Severity,
    },
    error::{AppError, Result},
    service::{
        ContentFetcher, LinkChecker, PerformanceProvider, ScoringModel, SeoAnalyzer,
        StaticFetcher,
    },
};

// ===== Fakes =====

struct FailingFetcher;

#[async_trait]
impl ContentFetcher for FailingFetcher {
    async fn fetch(&self, _url: &Url) -> Result<FetchedPage> {
        Err(AppError::network("connection reset"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Answers with a fixed status per URL; unknown URLs fail the check.
struct FakeLinks(HashMap<String, u16>);

impl FakeLinks {
    fn healthy() -> Self {
        Self(HashMap::new())
    }

    fn with(statuses: &[(&str, u16)]) -> Self {
        Self(statuses.iter().map(|(u, s)| (u.to_string(), *s)).collect())
    }
}

#[async_trait]
impl LinkChecker for FakeLinks {
    async fn check(&self, url: &Url) -> Result<LinkStatus> {
        match self.0.get(url.as_str()) {
            Some(&status) => Ok(LinkStatus {
                ok: (200..300).contains(&status),
                status,
                status_text: String::new(),
            }),
            None => Err(AppError::network("unreachable")),
        }
    }
}

struct FakePerformance(PerformanceOutcome);

impl FakePerformance {
    fn fast() -> Self {
        Self(PerformanceOutcome::Available(PerformanceReport {
            load_time: "0.9 s".to_string(),
            page_size_kb: 210,
            issues: Vec::new(),
        }))
    }

    fn down() -> Self {
        Self(PerformanceOutcome::unavailable("HTTP 503"))
    }
}

#[async_trait]
impl PerformanceProvider for FakePerformance {
    async fn measure(&self, _url: &Url) -> PerformanceOutcome {
        self.0.clone()
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn analyzer(
    html: &str,
    links: FakeLinks,
    performance: FakePerformance,
    settings: AuditSettings,
) -> SeoAnalyzer {
    SeoAnalyzer::new(
        settings,
        Arc::new(StaticFetcher::new(html)),
        Arc::new(links),
        Arc::new(performance),
    )
}

fn page_url() -> Url {
    Url::parse("https://example.com/").unwrap()
}

fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
    issues.iter().map(|i| i.kind).collect()
}

fn well_formed_page(body: &str) -> String {
    format!(
        r#"<html><head>
            <title>{title}</title>
            <meta name="description" content="{description}">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <link rel="canonical" href="https://example.com/">
            <script type="application/ld+json">{{"@type": "WebSite"}}</script>
        </head><body>{body}</body></html>"#,
        title = "t".repeat(45),
        description = "d".repeat(140),
        body = body,
    )
}

// ===== Scenarios =====

#[tokio::test]
async fn test_bare_page_with_short_title() {
    let analyzer = analyzer(
        "<html><head><title>Short</title></head><body><p>Hello</p></body></html>",
        FakeLinks::healthy(),
        FakePerformance::fast(),
        AuditSettings::default(),
    );

    let result = analyzer.analyze(&page_url()).await;

    assert_eq!(
        kinds(&result.issues),
        vec![
            IssueKind::TitleLengthOutOfRange,
            IssueKind::MissingMetaDescription,
            IssueKind::MissingH1,
            IssueKind::MissingCanonical,
            IssueKind::MissingViewport,
            IssueKind::MissingStructuredData,
        ]
    );
    assert!(result.issues[0].description.contains("5 characters"));
    // 2 critical, 3 warning, 1 info
    assert_eq!(result.score, 100 - 30 - 24 - 3);
    assert_eq!(result.stats.issues_found, 6);
    assert_eq!(result.stats.load_time, "0.9 s");
    assert_eq!(result.stats.page_size_kb, PageSize::Kilobytes(210));
    assert!(!result.fallback_content);
}

#[tokio::test]
async fn test_well_formed_page_scores_100() {
    let body = r#"<h1>Welcome</h1><img src="a.png" alt="A"><img src="b.png" alt="B">"#;
    let analyzer = analyzer(
        &well_formed_page(body),
        FakeLinks::healthy(),
        FakePerformance::fast(),
        AuditSettings::default(),
    );

    let result = analyzer.analyze(&page_url()).await;

    assert!(result.issues.is_empty(), "unexpected issues: {:?}", kinds(&result.issues));
    assert_eq!(result.score, 100);
}

#[tokio::test]
async fn test_images_missing_alt_are_counted() {
    let body = r#"<h1>Gallery</h1>
        <img src="1.png" alt="One">
        <img src="2.png">
        <img src="3.png" alt="">"#;
    let analyzer = analyzer(
        &well_formed_page(body),
        FakeLinks::healthy(),
        FakePerformance::fast(),
        AuditSettings::default(),
    );

    let result = analyzer.analyze(&page_url()).await;

    assert_eq!(kinds(&result.issues), vec![IssueKind::ImagesMissingAlt]);
    assert_eq!(
        result.issues[0].description,
        "2 images are missing alt text attributes."
    );
    assert_eq!(result.score, 92);
}

#[tokio::test]
async fn test_link_and_performance_issues_follow_html_issues() {
    let body = r#"<h1>One</h1><h1>Two</h1>
        <a href="/ok">Fine</a>
        <a href="/missing">Gone</a>
        <a href="https://elsewhere.org/x">External</a>"#;
    let analyzer = analyzer(
        &well_formed_page(body),
        FakeLinks::with(&[
            ("https://example.com/ok", 200),
            ("https://example.com/missing", 404),
        ]),
        FakePerformance::down(),
        AuditSettings::default(),
    );

    let result = analyzer.analyze(&page_url()).await;

    assert_eq!(
        kinds(&result.issues),
        vec![
            IssueKind::MultipleH1,
            IssueKind::BrokenInternalLinks,
            IssueKind::PerformanceUnavailable,
        ]
    );
    assert_eq!(
        result.issues[1].details.as_deref(),
        Some("https://example.com/missing")
    );
    assert_eq!(result.stats.load_time, "Service Unavailable");
    assert_eq!(result.stats.page_size_kb, PageSize::Unavailable);
    // warning 8, critical 15, warning 8
    assert_eq!(result.score, 69);
}

#[tokio::test]
async fn test_unreachable_link_checker_is_reported() {
    let body = r#"<h1>Home</h1><a href="/a">A</a><a href="/b">B</a>"#;
    let analyzer = analyzer(
        &well_formed_page(body),
        FakeLinks::healthy(),
        FakePerformance::fast(),
        AuditSettings::default(),
    );

    let result = analyzer.analyze(&page_url()).await;

    assert_eq!(kinds(&result.issues), vec![IssueKind::LinkCheckUnavailable]);
    assert_eq!(result.issues[0].severity, Severity::Warning);
}

#[tokio::test]
async fn test_pipeline_scoring_model() {
    let body = r#"<h1>Home</h1><a href="/gone">Gone</a>"#;
    let settings = AuditSettings {
        scoring: ScoringModel::Pipeline,
        ..AuditSettings::default()
    };
    let analyzer = analyzer(
        &well_formed_page(body),
        FakeLinks::with(&[("https://example.com/gone", 500)]),
        FakePerformance::down(),
        settings,
    );

    let result = analyzer.analyze(&page_url()).await;

    assert_eq!(
        kinds(&result.issues),
        vec![IssueKind::BrokenInternalLinks, IssueKind::PerformanceUnavailable]
    );
    assert_eq!(result.score, 100 - 12 - 10);
}

#[tokio::test]
async fn test_unreachable_page_uses_fallback_content() {
    let analyzer = analyzer("", FakeLinks::healthy(), FakePerformance::fast(), AuditSettings::default())
        .with_fetcher(Arc::new(FailingFetcher));

    let result = analyzer.analyze(&page_url()).await;

    assert!(result.fallback_content);
    assert_eq!(
        kinds(&result.issues),
        vec![
            IssueKind::MetaDescriptionLengthOutOfRange,
            IssueKind::ImagesMissingAlt,
            IssueKind::MissingCanonical,
            IssueKind::MissingStructuredData,
        ]
    );
    assert!(result.score < 100);
}

#[tokio::test]
async fn test_link_sample_respects_max_links() {
    let body = r#"<h1>Home</h1>
        <a href="/1">1</a><a href="/2">2</a><a href="/3">3</a>"#;
    let settings = AuditSettings {
        max_links_to_check: 2,
        ..AuditSettings::default()
    };
    // /3 is broken but falls outside the sample
    let analyzer = analyzer(
        &well_formed_page(body),
        FakeLinks::with(&[
            ("https://example.com/1", 200),
            ("https://example.com/2", 200),
            ("https://example.com/3", 404),
        ]),
        FakePerformance::fast(),
        settings,
    );

    let result = analyzer.analyze(&page_url()).await;

    assert!(result.issues.is_empty());
    assert_eq!(result.score, 100);
}
