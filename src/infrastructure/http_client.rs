//! Session transport for the portal
//!
//! A cookie-owning HTTP client with rate limiting. All authenticated state
//! lives in the cookie jar: once the login handshake succeeds, every
//! request made through the same `SessionClient` carries the server-issued
//! cookies until the process ends. Nothing is persisted across runs.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::infrastructure::config::PortalConfig;
use crate::infrastructure::errors::{PortalError, PortalResult};

/// A fully read HTTP response: status, final URL after redirects, body.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: StatusCode,
    pub final_url: Url,
    pub body: String,
}

impl PageResponse {
    /// True when the final URL (post-redirect) contains `marker`,
    /// case-insensitively. Landing on a URL carrying the login marker is
    /// how both a rejected login and a lost session show up.
    pub fn final_url_contains(&self, marker: &str) -> bool {
        self.final_url
            .as_str()
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }
}

/// HTTP client owning the session cookie state for one authenticated flow.
#[derive(Debug)]
pub struct SessionClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl SessionClient {
    /// Create a new session client from portal configuration.
    pub fn new(config: &PortalConfig) -> PortalResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|_| {
                PortalError::InvalidConfig {
                    field: "user_agent".to_string(),
                    reason: "not a valid header value".to_string(),
                }
            })?,
        );

        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| PortalError::Fetch {
                url: config.base_url.clone(),
                status: None,
                source: Some(e),
            })?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second.max(1)).unwrap_or(NonZeroU32::MIN),
        );
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// GET a URL. Non-2xx status is a `Fetch` error carrying the status.
    pub async fn get(&self, url: &Url) -> PortalResult<PageResponse> {
        self.rate_limiter.until_ready().await;
        info!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        let page = Self::read_response(url, response).await?;
        if !page.status.is_success() {
            return Err(PortalError::Fetch {
                url: url.to_string(),
                status: Some(page.status.as_u16()),
                source: None,
            });
        }

        debug!("GET {} -> {} ({} bytes)", url, page.status, page.body.len());
        Ok(page)
    }

    /// POST form fields to a URL.
    ///
    /// The response is returned regardless of HTTP status: the portal
    /// signals login rejection through the final URL, not the status code,
    /// so status interpretation belongs to the caller.
    pub async fn post_form(
        &self,
        url: &Url,
        fields: &HashMap<String, String>,
    ) -> PortalResult<PageResponse> {
        self.rate_limiter.until_ready().await;
        info!("POST {} ({} fields)", url, fields.len());

        let response = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        let page = Self::read_response(url, response).await?;
        debug!(
            "POST {} -> {} at {}",
            url, page.status, page.final_url
        );
        Ok(page)
    }

    async fn read_response(url: &Url, response: Response) -> PortalResult<PageResponse> {
        let status = response.status();
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        Ok(PageResponse {
            status,
            final_url,
            body,
        })
    }

    fn transport_error(url: &Url, source: reqwest::Error) -> PortalError {
        if source.is_timeout() {
            PortalError::Timeout {
                url: url.to_string(),
            }
        } else {
            PortalError::Fetch {
                url: url.to_string(),
                status: source.status().map(|s| s.as_u16()),
                source: Some(source),
            }
        }
    }
}
