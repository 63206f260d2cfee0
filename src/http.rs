// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared HTTP plumbing for the NetBox and PowerDNS connectors.
//!
//! Every API call goes through [`api_request`], which wraps a single request
//! with timeout handling and exponential backoff retry.

use crate::config::HttpSettings;
use crate::constants::USER_AGENT;
use crate::retry::{http_backoff, is_retryable_http_status, is_retryable_transport_error};
use anyhow::{Context, Result};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

/// Failure of a single API call, after retries.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}: {message}")]
    Status {
        url: String,
        status: StatusCode,
        message: String,
    },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read or decoded.
    #[error("Invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl RequestError {
    /// HTTP status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the same request could succeed later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => is_retryable_http_status(*status),
            Self::Transport { source, .. } => is_retryable_transport_error(source),
            Self::Decode { .. } => false,
        }
    }
}

/// Build the HTTP client shared by both connectors.
///
/// # Errors
///
/// Returns an error if the CA bundle cannot be read or parsed, or the client
/// cannot be constructed.
pub fn build_client(settings: &HttpSettings, ca_bundle: Option<&Path>) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(settings.timeout_secs));

    if let Some(path) = ca_bundle {
        let pem = std::fs::read(path)
            .with_context(|| format!("Failed to read CA bundle {}", path.display()))?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem)
            .with_context(|| format!("Invalid PEM in CA bundle {}", path.display()))?;
        debug!(
            path = %path.display(),
            certificates = certs.len(),
            "Adding CA bundle to trusted roots"
        );
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    builder.build().context("Failed to build HTTP client")
}

/// Resolve `path` against an API base URL.
///
/// The base is treated as a directory, so `https://host/netbox` + `api/x/`
/// gives `https://host/netbox/api/x/`.
///
/// # Errors
///
/// Returns an error if the base URL or joined path is invalid.
pub fn join_url(base: &str, path: &str) -> Result<Url> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    let base = Url::parse(&base).with_context(|| format!("Invalid base URL '{base}'"))?;
    base.join(path)
        .with_context(|| format!("Invalid API path '{path}'"))
}

/// Execute an API request with automatic retry.
///
/// # Retry Behavior
/// - Retries on connect errors, timeouts and HTTP 429, 500, 502, 503, 504
/// - Fails immediately on other 4xx errors
/// - Gives up when the retry budget in `settings` is exhausted
///
/// # Arguments
/// * `client` - HTTP client
/// * `settings` - Retry settings
/// * `method` - HTTP method
/// * `url` - Full URL of the endpoint
/// * `auth` - Authentication header name and value
/// * `body` - Optional JSON body
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-retryable error.
pub async fn api_request<T: Serialize + std::fmt::Debug>(
    client: &HttpClient,
    settings: &HttpSettings,
    method: Method,
    url: &Url,
    auth: (&str, &str),
    body: Option<&T>,
) -> Result<String, RequestError> {
    let mut backoff = http_backoff(settings);
    let start_time = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match api_request_internal(client, method.clone(), url, auth, body).await {
            Ok(response) => {
                if attempt > 1 {
                    debug!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "HTTP API call succeeded after retries"
                    );
                }
                return Ok(response);
            }
            Err(e) => {
                if !e.is_retryable() {
                    debug!(
                        method = %method,
                        url = %url,
                        error = %e,
                        "Non-retryable HTTP API error, failing immediately"
                    );
                    return Err(e);
                }

                if let Some(duration) = backoff.next_backoff() {
                    warn!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        retry_after = ?duration,
                        error = %e,
                        "Retryable HTTP API error, will retry"
                    );
                    tokio::time::sleep(duration).await;
                } else {
                    error!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Retry budget exhausted, giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// Single request without retry.
async fn api_request_internal<T: Serialize + std::fmt::Debug>(
    client: &HttpClient,
    method: Method,
    url: &Url,
    auth: (&str, &str),
    body: Option<&T>,
) -> Result<String, RequestError> {
    debug!(method = %method, url = %url, body = ?body, "HTTP API request");

    let mut request = client
        .request(method.clone(), url.clone())
        .header(auth.0, auth.1)
        .header("Accept", "application/json");
    if let Some(body_data) = body {
        request = request.json(body_data);
    }

    let response = request
        .send()
        .await
        .map_err(|source| RequestError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(RequestError::Status {
            url: url.to_string(),
            status,
            message: error_text,
        });
    }

    let text = response.text().await.map_err(|e| RequestError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    debug!(
        method = %method,
        url = %url,
        status = %status,
        response_len = text.len(),
        "HTTP API request successful"
    );

    Ok(text)
}

/// GET `url` and decode the JSON body.
///
/// # Errors
///
/// Returns a [`RequestError`] if the request fails or the body is not valid JSON for `R`.
pub async fn get_json<R: DeserializeOwned>(
    client: &HttpClient,
    settings: &HttpSettings,
    url: &Url,
    auth: (&str, &str),
) -> Result<R, RequestError> {
    let text = api_request(client, settings, Method::GET, url, auth, None::<&()>).await?;
    serde_json::from_str(&text).map_err(|e| RequestError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
