//! Audit settings.
//!
//! Settings come from built-in defaults, an optional TOML file and a couple of
//! environment variables, in that order:
//!
//! ```toml
//! # seo-check.toml
//! max_links_to_check = 5
//! request_timeout_secs = 30
//! user_agent = "SEO-Health-Check-Tool/1.0"
//! pagespeed_strategy = "mobile"
//! scoring = "pipeline"
//! ```
//!
//! `PAGESPEED_API_KEY` and `SEO_CHECK_USER_AGENT` override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::AppError;
use crate::service::scoring::ScoringModel;

pub const DEFAULT_USER_AGENT: &str = "SEO-Health-Check-Tool/1.0";
pub const DEFAULT_PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

pub const ENV_PAGESPEED_API_KEY: &str = "PAGESPEED_API_KEY";
pub const ENV_USER_AGENT: &str = "SEO_CHECK_USER_AGENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSpeedStrategy {
    #[default]
    Desktop,
    Mobile,
}

impl PageSpeedStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSpeedStrategy::Desktop => "desktop",
            PageSpeedStrategy::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditSettings {
    pub max_links_to_check: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub cors_proxy_url: Option<String>,
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub pagespeed_strategy: PageSpeedStrategy,
    pub skip_pagespeed: bool,
    pub scoring: ScoringModel,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            max_links_to_check: 5,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cors_proxy_url: None,
            pagespeed_api_key: None,
            pagespeed_endpoint: DEFAULT_PAGESPEED_ENDPOINT.to_string(),
            pagespeed_strategy: PageSpeedStrategy::default(),
            skip_pagespeed: false,
            scoring: ScoringModel::default(),
        }
    }
}

impl AuditSettings {
    /// Defaults, then the TOML file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_PAGESPEED_API_KEY).filter(|k| !k.trim().is_empty()) {
            log::debug!("PageSpeed API key taken from {}", ENV_PAGESPEED_API_KEY);
            self.pagespeed_api_key = Some(key.trim().to_string());
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|a| !a.trim().is_empty()) {
            self.user_agent = agent;
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_links_to_check == 0 {
            return Err(AppError::config("max_links_to_check must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("request_timeout_secs must be at least 1"));
        }
        Url::parse(&self.pagespeed_endpoint).map_err(|e| {
            AppError::config(format!("invalid pagespeed_endpoint '{}': {}", self.pagespeed_endpoint, e))
        })?;
        if let Some(proxy) = &self.cors_proxy_url {
            Url::parse(proxy)
                .map_err(|e| AppError::config(format!("invalid cors_proxy_url '{}': {}", proxy, e)))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
