//! Page retrieval.
//!
//! `ContentFetcher` is the seam between the analyzer and the network. The
//! analyzer substitutes `fallback_document` whenever a fetch fails, so a
//! score is always produced.

use async_trait::async_trait;
use reqwest::Client;
use url::{form_urlencoded, Url};

use crate::config::AuditSettings;
use crate::domain::models::FetchedPage;
use crate::error::{AppError, Result};
use crate::service::http::{create_client, ClientType};

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage>;

    /// Human-readable name for this fetcher.
    fn name(&self) -> &'static str;
}

/// Direct HTTP GET, optionally retried through a CORS-style proxy.
pub struct HttpFetcher {
    client: Client,
    cors_proxy_url: Option<String>,
}

impl HttpFetcher {
    pub fn new(settings: &AuditSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(ClientType::Standard, settings)?,
            cors_proxy_url: settings.cors_proxy_url.clone(),
        })
    }

    async fn get(&self, target: &str) -> Result<FetchedPage> {
        log::trace!("[FETCH] GET {}", target);
        let response = self.client.get(target).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("[FETCH] {} answered {}", target, status);
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await?;
        log::debug!("[FETCH] Received {} bytes from {}", html.len(), target);
        Ok(FetchedPage {
            html,
            status: status.as_u16(),
            fallback: false,
        })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        match self.get(url.as_str()).await {
            Err(AppError::NetworkError(direct_error)) => {
                let Some(proxy) = &self.cors_proxy_url else {
                    return Err(AppError::NetworkError(direct_error));
                };
                log::warn!("[FETCH] Direct fetch failed, trying proxy: {}", direct_error);
                let encoded: String = form_urlencoded::byte_serialize(url.as_str().as_bytes()).collect();
                self.get(&format!("{}{}", proxy, encoded)).await
            }
            other => other,
        }
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}

/// Serves the same HTML for every URL. Used for local files and demos.
pub struct StaticFetcher {
    html: String,
}

impl StaticFetcher {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, _url: &Url) -> Result<FetchedPage> {
        Ok(FetchedPage {
            html: self.html.clone(),
            status: 200,
            fallback: false,
        })
    }

    fn name(&self) -> &'static str {
        "Static"
    }
}

/// Placeholder page analyzed when the real one cannot be retrieved.
pub fn fallback_document(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown host");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Content Unavailable - {host}</title>
    <meta name="description" content="Content could not be retrieved from this URL for SEO analysis.">
</head>
<body>
    <h1>Content Unavailable</h1>
    <p>The content from {url} could not be retrieved for analysis.</p>
    <p>This may be due to network restrictions, CORS policies, or the site being unavailable.</p>
    <img src="placeholder.jpg" alt="Placeholder image">
    <img src="example.jpg">
</body>
</html>"#,
        host = host,
        url = url
    )
}

pub fn fallback_page(url: &Url) -> FetchedPage {
    FetchedPage {
        html: fallback_document(url),
        status: 200,
        fallback: true,
    }
}
