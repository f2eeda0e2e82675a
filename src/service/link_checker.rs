//! Broken-link detection for a small sample of a page's internal links.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use url::Url;

use crate::config::AuditSettings;
use crate::domain::models::{Issue, IssueKind, LinkStatus};
use crate::error::Result;
use crate::extractor::{DocumentQuery, ElementHandle, Query};
use crate::service::http::{create_client, ClientType};

/// How many broken URLs are listed in the issue details.
const BROKEN_LINKS_IN_DETAILS: usize = 3;

#[async_trait]
pub trait LinkChecker: Send + Sync {
    /// Status of a single link. `Err` means the check itself could not run.
    async fn check(&self, url: &Url) -> Result<LinkStatus>;
}

/// Checks links with HEAD requests.
pub struct HttpLinkChecker {
    client: Client,
}

impl HttpLinkChecker {
    pub fn new(settings: &AuditSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(ClientType::Standard, settings)?,
        })
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn check(&self, url: &Url) -> Result<LinkStatus> {
        let response = self.client.head(url.as_str()).send().await?;
        let status = response.status();
        log::trace!("[LINKS] HEAD {} -> {}", url, status);

        Ok(LinkStatus {
            ok: status.is_success(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        })
    }
}

/// Internal links of the page in document order.
///
/// A link is internal when its href is root-relative (`/path`) or when it is
/// absolute and points at the page's own host. Protocol-relative hrefs
/// (`//host/path`) are judged by their host like absolute ones.
pub fn internal_links<D: DocumentQuery>(document: &D, page_url: &Url) -> Vec<Url> {
    let page_host = page_url.host_str();

    document
        .find_all(Query::Anchor)
        .iter()
        .filter_map(|anchor| {
            let href = anchor.attribute("href")?.trim();
            if href.starts_with('/') && !href.starts_with("//") {
                return page_url.join(href).ok();
            }

            let absolute = if href.starts_with("//") {
                page_url.join(href).ok()?
            } else {
                Url::parse(href).ok()?
            };
            (absolute.host_str() == page_host).then_some(absolute)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCheckOutcome {
    Checked { checked: usize, broken: Vec<String> },
    Unavailable { reason: String },
}

impl LinkCheckOutcome {
    pub fn into_issues(self) -> Vec<Issue> {
        match self {
            LinkCheckOutcome::Checked { broken, .. } if broken.is_empty() => Vec::new(),
            LinkCheckOutcome::Checked { broken, .. } => {
                let details = broken
                    .iter()
                    .take(BROKEN_LINKS_IN_DETAILS)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![Issue::new(
                    IssueKind::BrokenInternalLinks,
                    format!(
                        "Found {} broken internal links that return errors.",
                        broken.len()
                    ),
                )
                .with_details(details)]
            }
            LinkCheckOutcome::Unavailable { reason } => vec![Issue::new(
                IssueKind::LinkCheckUnavailable,
                "Unable to verify link validity due to service unavailability.",
            )
            .with_details(reason)],
        }
    }
}

/// Check the first `limit` links concurrently.
///
/// When every sampled check fails the checker itself is considered
/// unavailable; individual failures are otherwise ignored.
pub async fn check_links(checker: &dyn LinkChecker, links: &[Url], limit: usize) -> LinkCheckOutcome {
    let sample = &links[..links.len().min(limit)];
    log::info!("[LINKS] Checking {} of {} internal links", sample.len(), links.len());

    let results = join_all(sample.iter().map(|link| checker.check(link))).await;

    let mut failures = 0;
    let mut broken = Vec::new();
    for (link, result) in sample.iter().zip(results) {
        match result {
            Ok(status) if status.is_broken() => {
                log::debug!("[LINKS] Broken: {} ({} {})", link, status.status, status.status_text);
                broken.push(link.to_string());
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("[LINKS] Check failed for {}: {}", link, e);
                failures += 1;
            }
        }
    }

    if !sample.is_empty() && failures == sample.len() {
        log::warn!("[LINKS] All {} link checks failed", failures);
        return LinkCheckOutcome::Unavailable {
            reason: "Link checking service is unavailable - unable to verify link validity"
                .to_string(),
        };
    }

    LinkCheckOutcome::Checked {
        checked: sample.len(),
        broken,
    }
}
