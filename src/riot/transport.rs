//! Raw HTTP transport and the gated, retrying requester on top of it.
//!
//! [`Requester::execute`] is the only place in the crate that issues
//! upstream calls. Each attempt is admitted by the shared [`RateGate`], and
//! each response feeds its headers back into the gate before anything else
//! looks at it.

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, warn};
use url::Url;

use crate::error::TrendsError;
use crate::rate_limit::{RateGate, RetryPolicy, retry_after};

/// One upstream request, described independently of the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Fully-qualified URL, including the query string.
    pub url: Url,
}

impl RequestSpec {
    /// Create a spec for a GET on `url`.
    pub fn get(url: Url) -> Self {
        Self { url }
    }

    /// Path component, used in errors and logs (never includes the query).
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// A response as seen by the retry loop.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: String,
}

impl UpstreamResponse {
    /// Decode the body as JSON.
    pub fn json<T>(&self) -> Result<T, TrendsError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body)
            .map_err(|e| TrendsError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// Something that can perform a single GET.
///
/// Implementations report non-success statuses as `Ok` responses; only
/// transport failures (connect, timeout, body read) are errors.
pub trait Transport: Send + Sync {
    /// Perform one GET.
    fn get(&self, url: &Url) -> impl Future<Output = Result<UpstreamResponse, TrendsError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<UpstreamResponse, TrendsError>> + Send {
        (**self).get(url)
    }
}

/// [`Transport`] backed by `reqwest` with tracing middleware.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: ClientWithMiddleware,
}

impl HttpTransport {
    /// Wrap a configured middleware client.
    pub fn new(http_client: ClientWithMiddleware) -> Self {
        Self { http_client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<UpstreamResponse, TrendsError> {
        let response = match self.http_client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(reqwest_middleware::Error::Reqwest(e)) if e.is_timeout() => {
                return Err(TrendsError::Timeout);
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Issues logical requests with gating and bounded retries.
///
/// Per attempt: `Requesting` → success, terminal failure, or `RetryWait`
/// followed by another `Requesting`. 404 and 401/403 are terminal; 429,
/// 5xx and transport failures retry until the policy's attempt ceiling.
#[derive(Debug)]
pub struct Requester<T> {
    transport: T,
    gate: Arc<RateGate>,
    policy: RetryPolicy,
}

impl<T: Transport> Requester<T> {
    /// Create a requester sharing `gate` with every other requester of the process.
    pub fn new(transport: T, gate: Arc<RateGate>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            gate,
            policy,
        }
    }

    /// The shared gate.
    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// The retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute one logical request.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<UpstreamResponse, TrendsError> {
        let mut attempts = 0u32;

        loop {
            self.gate.admit_one().await;
            attempts += 1;

            let (error, hint) = match self.transport.get(&spec.url).await {
                Ok(response) => {
                    self.gate.record_server_feedback(&response.headers).await;

                    if response.status.is_success() {
                        self.gate.apply_retry_after(&response.headers).await;
                        return Ok(response);
                    }

                    let hint = retry_after(&response.headers);
                    (
                        TrendsError::from_status(response.status, spec.path(), hint),
                        hint,
                    )
                }
                Err(error) => (error, None),
            };

            if !error.is_retryable() {
                return Err(error);
            }

            if !self.policy.allows_another(attempts) {
                warn!(path = spec.path(), attempts, error = %error, "retries exhausted");
                return Err(TrendsError::RetriesExhausted {
                    attempts,
                    last: Box::new(error),
                });
            }

            let delay = self.policy.delay_for(attempts - 1, hint);
            debug!(
                path = spec.path(),
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
