//! Analysis entities: the issue taxonomy and the aggregate result.
//!
//! `Issue` can only be built from an `IssueKind`, so its severity, title and
//! guidance are always the ones fixed for that kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ====== Enums ======

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    MissingTitle,
    TitleLengthOutOfRange,
    MissingMetaDescription,
    MetaDescriptionLengthOutOfRange,
    MissingH1,
    MultipleH1,
    ImagesMissingAlt,
    MissingCanonical,
    MissingViewport,
    MissingStructuredData,
    BrokenInternalLinks,
    PerformanceSlow,
    #[serde(rename = "PerformanceLCPSlow")]
    PerformanceLcpSlow,
    PerformanceUnavailable,
    LinkCheckUnavailable,
}

/// Where an issue kind comes from. Only the pipeline scoring model cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSource {
    Html,
    Links,
    PageSpeed,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MissingTitle
            | IssueKind::MissingMetaDescription
            | IssueKind::MissingH1
            | IssueKind::BrokenInternalLinks
            | IssueKind::PerformanceSlow => Severity::Critical,
            IssueKind::TitleLengthOutOfRange
            | IssueKind::MetaDescriptionLengthOutOfRange
            | IssueKind::MultipleH1
            | IssueKind::ImagesMissingAlt
            | IssueKind::MissingCanonical
            | IssueKind::MissingViewport
            | IssueKind::PerformanceLcpSlow
            | IssueKind::PerformanceUnavailable
            | IssueKind::LinkCheckUnavailable => Severity::Warning,
            IssueKind::MissingStructuredData => Severity::Info,
        }
    }

    pub fn source(&self) -> IssueSource {
        match self {
            IssueKind::BrokenInternalLinks | IssueKind::LinkCheckUnavailable => IssueSource::Links,
            IssueKind::PerformanceSlow
            | IssueKind::PerformanceLcpSlow
            | IssueKind::PerformanceUnavailable => IssueSource::PageSpeed,
            _ => IssueSource::Html,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            IssueKind::MissingTitle => "Missing Title Tag",
            IssueKind::TitleLengthOutOfRange => "Title Tag Length Issue",
            IssueKind::MissingMetaDescription => "Missing Meta Description",
            IssueKind::MetaDescriptionLengthOutOfRange => "Meta Description Length Issue",
            IssueKind::MissingH1 => "Missing H1 Tag",
            IssueKind::MultipleH1 => "Multiple H1 Tags",
            IssueKind::ImagesMissingAlt => "Images Missing Alt Text",
            IssueKind::MissingCanonical => "Missing Canonical URL",
            IssueKind::MissingViewport => "Missing Viewport Meta Tag",
            IssueKind::MissingStructuredData => "Missing Structured Data",
            IssueKind::BrokenInternalLinks => "Broken Internal Links",
            IssueKind::PerformanceSlow => "Slow Page Load Speed",
            IssueKind::PerformanceLcpSlow => "Large Contentful Paint Issues",
            IssueKind::PerformanceUnavailable => "PageSpeed Analysis Unavailable",
            IssueKind::LinkCheckUnavailable => "Link Checking Service Unavailable",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            IssueKind::MissingTitle => {
                "Add a unique, descriptive title tag (30-60 characters) to improve SEO."
            }
            IssueKind::TitleLengthOutOfRange => {
                "Adjust title tag length to 30-60 characters for better search result display."
            }
            IssueKind::MissingMetaDescription => {
                "Add a unique meta description (120-160 characters) describing the page content."
            }
            IssueKind::MetaDescriptionLengthOutOfRange => {
                "Adjust meta description length to 120-160 characters for better search snippets."
            }
            IssueKind::MissingH1 => "Add exactly one H1 tag to define the main heading of the page.",
            IssueKind::MultipleH1 => "Use only one H1 tag per page and use H2-H6 for subheadings.",
            IssueKind::ImagesMissingAlt => {
                "Add descriptive alt text to all images for accessibility and SEO benefits."
            }
            IssueKind::MissingCanonical => {
                "Add a canonical link tag to prevent duplicate content issues."
            }
            IssueKind::MissingViewport => {
                "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"> for mobile optimization."
            }
            IssueKind::MissingStructuredData => {
                "Add JSON-LD structured data to help search engines understand your content better."
            }
            IssueKind::BrokenInternalLinks => {
                "Fix broken links by updating URLs or setting up proper redirects (301)."
            }
            IssueKind::PerformanceSlow => {
                "Optimize images, minify CSS/JS, enable compression, and use a CDN."
            }
            IssueKind::PerformanceLcpSlow => {
                "Optimize above-the-fold content loading and reduce render-blocking resources."
            }
            IssueKind::PerformanceUnavailable => {
                "Try again later when the service is available. SEO analysis continues with the other checks."
            }
            IssueKind::LinkCheckUnavailable => "Manual link verification recommended.",
        }
    }
}

// ====== Issue ======

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub title: &'static str,
    pub description: String,
    pub guidance: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            title: kind.title(),
            description: description.into(),
            guidance: kind.guidance(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ====== Aggregate result ======

/// Page weight as reported by the performance collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Kilobytes(u64),
    Unavailable,
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::Kilobytes(kb) => serializer.serialize_u64(*kb),
            PageSize::Unavailable => serializer.serialize_str(SERVICE_UNAVAILABLE),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Kilobytes(kb) => write!(f, "{} KB", kb),
            PageSize::Unavailable => f.write_str(SERVICE_UNAVAILABLE),
        }
    }
}

pub const SERVICE_UNAVAILABLE: &str = "Service Unavailable";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub load_time: String,
    #[serde(rename = "pageSizeKB")]
    pub page_size_kb: PageSize,
    pub issues_found: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub url: String,
    pub score: u8,
    pub issues: Vec<Issue>,
    pub stats: AnalysisStats,
    /// True when the page could not be retrieved and the fallback document was analyzed
    pub fallback_content: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn counts(&self) -> SeverityCounts {
        self.issues
            .iter()
            .fold(SeverityCounts::default(), |mut acc, issue| {
                match issue.severity {
                    Severity::Critical => acc.critical += 1,
                    Severity::Warning => acc.warning += 1,
                    Severity::Info => acc.info += 1,
                }
                acc
            })
    }
}

// ====== Collaborator contracts ======

/// Output of the retrieval collaborator.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub status: u16,
    pub fallback: bool,
}

/// Output of a single link check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
}

impl LinkStatus {
    pub fn is_broken(&self) -> bool {
        !self.ok && self.status >= 400
    }
}

/// Normalized performance data.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub load_time: String,
    pub page_size_kb: u64,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceOutcome {
    Available(PerformanceReport),
    Unavailable { reason: String },
}

impl PerformanceOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
