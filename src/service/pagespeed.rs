//! Performance metrics from Google PageSpeed Insights.
//!
//! The provider contract is infallible: every failure (missing key, network,
//! bad status, undecodable body, service-reported outage) becomes
//! `PerformanceOutcome::Unavailable` so the analysis can still finish.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

use crate::config::{AuditSettings, PageSpeedStrategy};
use crate::domain::models::{Issue, IssueKind, PerformanceOutcome, PerformanceReport};
use crate::error::{AppError, Result};
use crate::service::http::{create_client, ClientType};

/// Lighthouse scores below this are reported as issues.
const SLOW_SCORE_THRESHOLD: f64 = 0.5;

const SERVICE_NAME: &str = "pagespeed";

const AUDIT_SPEED_INDEX: &str = "speed-index";
const AUDIT_LCP: &str = "largest-contentful-paint";
const AUDIT_BYTE_WEIGHT: &str = "total-byte-weight";

#[async_trait]
pub trait PerformanceProvider: Send + Sync {
    async fn measure(&self, url: &Url) -> PerformanceOutcome;

    /// Human-readable name for this provider.
    fn name(&self) -> &'static str;
}

// ====== Wire types ======

/// The subset of a PageSpeed v5 response the analyzer reads.
#[derive(Debug, Default, Deserialize)]
pub struct LighthouseResponse {
    #[serde(rename = "lighthouseResult")]
    pub lighthouse_result: Option<LighthouseResult>,
    #[serde(rename = "_serviceStatus", default)]
    pub service_status: Option<String>,
    #[serde(rename = "_error", default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default)]
    pub audits: HashMap<String, LighthouseAudit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseAudit {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(rename = "displayValue", default)]
    pub display_value: Option<String>,
    #[serde(rename = "numericValue", default)]
    pub numeric_value: Option<f64>,
}

fn is_slow(audit: Option<&LighthouseAudit>) -> bool {
    audit
        .and_then(|a| a.score)
        .map(|score| score < SLOW_SCORE_THRESHOLD)
        .unwrap_or(false)
}

/// Turn a PageSpeed payload into load time, page weight and issues.
pub fn normalize_lighthouse(response: &LighthouseResponse) -> PerformanceOutcome {
    if response.service_status.as_deref() == Some("unavailable") {
        return PerformanceOutcome::unavailable(
            response
                .error
                .clone()
                .unwrap_or_else(|| "PageSpeed service reported itself unavailable".to_string()),
        );
    }

    let Some(result) = &response.lighthouse_result else {
        return PerformanceOutcome::unavailable("PageSpeed response has no lighthouseResult");
    };
    let audits = &result.audits;

    let load_time = audits
        .get(AUDIT_SPEED_INDEX)
        .and_then(|a| a.display_value.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let page_size_kb = audits
        .get(AUDIT_BYTE_WEIGHT)
        .and_then(|a| a.numeric_value)
        .filter(|bytes| bytes.is_finite() && *bytes > 0.0)
        .map(|bytes| (bytes / 1024.0).round() as u64)
        .unwrap_or(0);

    let mut issues = Vec::new();
    if is_slow(audits.get(AUDIT_SPEED_INDEX)) {
        issues.push(Issue::new(
            IssueKind::PerformanceSlow,
            format!(
                "Page loads in {}. This affects user experience and SEO rankings.",
                load_time
            ),
        ));
    }
    if is_slow(audits.get(AUDIT_LCP)) {
        issues.push(Issue::new(
            IssueKind::PerformanceLcpSlow,
            "Largest contentful paint is slower than recommended.",
        ));
    }

    PerformanceOutcome::Available(PerformanceReport {
        load_time,
        page_size_kb,
        issues,
    })
}

/// Issue recorded when no performance data could be obtained.
pub fn unavailable_issue(reason: &str) -> Issue {
    Issue::new(
        IssueKind::PerformanceUnavailable,
        "Unable to analyze page performance metrics due to service unavailability.",
    )
    .with_details(reason)
}

// ====== Providers ======

pub struct PageSpeedClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    strategy: PageSpeedStrategy,
}

impl PageSpeedClient {
    pub fn new(settings: &AuditSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(ClientType::Api, settings)?,
            endpoint: settings.pagespeed_endpoint.clone(),
            api_key: settings.pagespeed_api_key.clone(),
            strategy: settings.pagespeed_strategy,
        })
    }

    async fn request(&self, url: &Url, key: &str) -> Result<LighthouseResponse> {
        let request_url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("url", url.as_str()),
                ("key", key),
                ("strategy", self.strategy.as_str()),
            ],
        )
        .map_err(|e| AppError::service(SERVICE_NAME, format!("Invalid PageSpeed endpoint: {}", e)))?;

        let response = self.client.get(request_url).send().await.map_err(|e| {
            AppError::service(SERVICE_NAME, format!("PageSpeed API request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::service(
                SERVICE_NAME,
                format!("PageSpeed API request failed: {}", status),
            ));
        }

        response.json::<LighthouseResponse>().await.map_err(|e| {
            AppError::service(
                SERVICE_NAME,
                format!("PageSpeed API returned an unreadable body: {}", e),
            )
        })
    }
}

#[async_trait]
impl PerformanceProvider for PageSpeedClient {
    async fn measure(&self, url: &Url) -> PerformanceOutcome {
        let Some(key) = self.api_key.as_deref() else {
            log::warn!("[PAGESPEED] No API key configured, skipping performance analysis");
            return PerformanceOutcome::unavailable("PageSpeed API key not configured");
        };

        log::info!("[PAGESPEED] Requesting {} metrics for {}", self.strategy.as_str(), url);
        match self.request(url, key).await {
            Ok(response) => {
                let outcome = normalize_lighthouse(&response);
                if let PerformanceOutcome::Available(report) = &outcome {
                    log::info!(
                        "[PAGESPEED] Complete - load: {}, size: {} KB, issues: {}",
                        report.load_time,
                        report.page_size_kb,
                        report.issues.len()
                    );
                }
                outcome
            }
            Err(AppError::ServiceError { message, .. }) => {
                log::warn!("[PAGESPEED] {}", message);
                PerformanceOutcome::unavailable(message)
            }
            Err(e) => {
                log::warn!("[PAGESPEED] {}", e);
                PerformanceOutcome::unavailable(e.to_string())
            }
        }
    }

    fn name(&self) -> &'static str {
        "PageSpeed Insights"
    }
}

/// Provider used when performance analysis is switched off.
pub struct DisabledPerformance;

#[async_trait]
impl PerformanceProvider for DisabledPerformance {
    async fn measure(&self, _url: &Url) -> PerformanceOutcome {
        PerformanceOutcome::unavailable("Performance analysis disabled")
    }

    fn name(&self) -> &'static str {
        "Disabled"
    }
}
