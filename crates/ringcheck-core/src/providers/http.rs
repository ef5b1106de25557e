//! Shared HTTP plumbing for provider clients: client construction and status mapping.
//!
//! Provider clients never interpret status codes themselves.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::errors::{ProviderError, ProviderResult};

/// User agent for provider requests.
pub const USER_AGENT_VALUE: &str = concat!("ringcheck/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout_secs: u64) -> ProviderResult<reqwest::Client> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|e| ProviderError::Network {
            message: format!("failed to create HTTP client: {}", e),
        })
}

/// Normalize base URL (remove trailing slash).
pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Map a non-success response to a [`ProviderError`].
pub(crate) async fn check_status(
    resource: &str,
    response: reqwest::Response,
) -> ProviderResult<reqwest::Response> {
    let status = response.status();

    match status.as_u16() {
        200..=299 => Ok(response),

        401 | 403 => Err(ProviderError::Unauthorized {
            message: format!("{} rejected credentials (HTTP {})", resource, status.as_u16()),
        }),

        404 => Err(ProviderError::NotFound {
            resource: resource.to_string(),
        }),

        429 => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            Err(ProviderError::RateLimited { retry_after })
        }

        _ => {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Check status then decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resource: &str,
    response: reqwest::Response,
) -> ProviderResult<T> {
    let response = check_status(resource, response).await?;
    response
        .json()
        .await
        .map_err(|e| ProviderError::invalid_response(format!("failed to parse {}: {}", resource, e)))
}
