//! Turning user input into an analyzable URL.

use url::Url;

use crate::error::{AppError, Result};

/// Prefix `https://` when the input carries no http(s) scheme.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Normalize and parse a target URL. The URL must have a host.
pub fn parse_target(input: &str) -> Result<Url> {
    let normalized = normalize_url(input);
    if normalized.is_empty() {
        return Err(AppError::InvalidUrl("Please enter a valid URL".to_string()));
    }

    let url = Url::parse(&normalized)?;
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(AppError::InvalidUrl(format!("{}: missing host", normalized)));
    }
    Ok(url)
}
