//! HTTP client abstraction for testability

use super::types::ProviderError;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// Every call carries its own timeout: tile servers are probed with short
/// HEAD requests and downloaded with longer GET requests through the same
/// pooled client.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `timeout` - Maximum time for the whole request
    ///
    /// # Returns
    ///
    /// The response body when the server answered 200, an error otherwise.
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an async HTTP HEAD request.
    ///
    /// # Returns
    ///
    /// The response status code, or an error if no response arrived.
    fn head(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<u16, ProviderError>> + Send;
}

/// Default User-Agent string for HTTP requests.
/// Some tile servers reject requests without a browser-like User-Agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient.
    ///
    /// Connections are pooled and kept alive since every tile of a
    /// panorama comes from the same host.
    pub fn new() -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create async HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

fn request_error(url: &str, e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(url.to_string())
    } else {
        ProviderError::HttpError(format!("Request failed: {}", e))
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                debug!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(request_error(url, e));
            }
        };

        if response.status() != StatusCode::OK {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(request_error(url, e))
            }
        }
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, ProviderError> {
        trace!(url = url, "HTTP HEAD request starting");

        match self.client.head(url).timeout(timeout).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                trace!(url = url, status = status, "HTTP HEAD response received");
                Ok(status)
            }
            Err(e) => {
                debug!(url = url, error = %e, "HTTP HEAD request failed");
                Err(request_error(url, e))
            }
        }
    }
}
