//! Riot REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use tracing::debug;
use url::Url;

use crate::auth::CredentialsProvider;
use crate::error::TrendsError;
use crate::rate_limit::{RateGate, RetryPolicy};
use crate::riot::endpoints::{self, RIOT_TOKEN_HEADER, RoutingRegion};
use crate::riot::traits::MatchSource;
use crate::riot::transport::{HttpTransport, RequestSpec, Requester, Transport};
use crate::riot::types::{ChampionMasteryDto, MatchDto, MatchIdQuery, TimelineDto};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The Riot REST API client.
///
/// Every call is admitted by a shared [`RateGate`] and retried on 429/5xx
/// according to its [`RetryPolicy`]. Clone the gate `Arc` into every client
/// that shares the same API key so they ration one quota together.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use riot_trends::auth::StaticCredentials;
/// use riot_trends::riot::{MatchSource, RiotClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RiotClient::builder()
///         .platform("euw1")
///         .credentials(Arc::new(StaticCredentials::new("RGAPI-...")))
///         .build()?;
///
///     let detail = client.match_detail("EUW1_6812345678").await?;
///     println!("{} players", detail.info.participants.len());
///     Ok(())
/// }
/// ```
pub struct RiotClient<T = HttpTransport> {
    requester: Requester<T>,
    regional_base: Url,
    platform_base: Url,
    platform: String,
}

impl RiotClient {
    /// Create a new client builder.
    pub fn builder() -> RiotClientBuilder {
        RiotClientBuilder::new()
    }
}

impl<T: Transport> RiotClient<T> {
    /// The platform shard this client targets, e.g. `euw1`.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The shared rate gate.
    pub fn gate(&self) -> &Arc<RateGate> {
        self.requester.gate()
    }

    /// Fetch one page of match ids.
    pub async fn match_ids_page(
        &self,
        puuid: &str,
        query: &MatchIdQuery,
        start: usize,
    ) -> Result<Vec<String>, TrendsError> {
        let mut url = join_segments(&self.regional_base, &endpoints::matches::MATCHES)?;
        append_segments(
            &mut url,
            &[endpoints::matches::BY_PUUID, puuid, endpoints::matches::IDS],
        )?;
        let query_string = serde_urlencoded::to_string(query.page(start))
            .map_err(|e| TrendsError::InvalidResponse(e.to_string()))?;
        url.set_query(Some(&query_string));

        self.get_json(url).await
    }

    /// Fetch match ids, paging until a short page or `query.max_ids`.
    pub async fn match_ids(
        &self,
        puuid: &str,
        query: &MatchIdQuery,
    ) -> Result<Vec<String>, TrendsError> {
        let page_size = query.effective_page_size();
        let mut all = Vec::new();
        let mut start = 0;

        loop {
            let page = self.match_ids_page(puuid, query, start).await?;
            let exhausted = page.len() < page_size;
            all.extend(page);

            if exhausted || all.len() >= query.max_ids {
                break;
            }
            start += page_size;
        }

        all.truncate(query.max_ids);
        debug!(ids = all.len(), "listed match ids");
        Ok(all)
    }

    /// Fetch a match's detail.
    pub async fn match_detail(&self, match_id: &str) -> Result<MatchDto, TrendsError> {
        let mut url = join_segments(&self.regional_base, &endpoints::matches::MATCHES)?;
        append_segments(&mut url, &[match_id])?;
        self.get_json(url).await
    }

    /// Fetch a match's timeline.
    pub async fn match_timeline(&self, match_id: &str) -> Result<TimelineDto, TrendsError> {
        let mut url = join_segments(&self.regional_base, &endpoints::matches::MATCHES)?;
        append_segments(&mut url, &[match_id, endpoints::matches::TIMELINE])?;
        self.get_json(url).await
    }

    /// Fetch champion masteries for a player (platform routing).
    pub async fn champion_masteries(
        &self,
        puuid: &str,
    ) -> Result<Vec<ChampionMasteryDto>, TrendsError> {
        let mut url = join_segments(&self.platform_base, &endpoints::mastery::BY_PUUID)?;
        append_segments(&mut url, &[puuid])?;
        self.get_json(url).await
    }

    async fn get_json<R>(&self, url: Url) -> Result<R, TrendsError>
    where
        R: serde::de::DeserializeOwned,
    {
        let response = self.requester.execute(&RequestSpec::get(url)).await?;
        response.json()
    }
}

impl<T> std::fmt::Debug for RiotClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiotClient")
            .field("platform", &self.platform)
            .field("regional_base", &self.regional_base.as_str())
            .field("platform_base", &self.platform_base.as_str())
            .finish()
    }
}

impl<T: Transport> MatchSource for RiotClient<T> {
    async fn match_ids(
        &self,
        puuid: &str,
        query: &MatchIdQuery,
    ) -> Result<Vec<String>, TrendsError> {
        RiotClient::match_ids(self, puuid, query).await
    }

    async fn match_detail(&self, match_id: &str) -> Result<MatchDto, TrendsError> {
        RiotClient::match_detail(self, match_id).await
    }

    async fn match_timeline(&self, match_id: &str) -> Result<TimelineDto, TrendsError> {
        RiotClient::match_timeline(self, match_id).await
    }

    async fn champion_masteries(
        &self,
        puuid: &str,
    ) -> Result<Vec<ChampionMasteryDto>, TrendsError> {
        RiotClient::champion_masteries(self, puuid).await
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, TrendsError> {
    let mut url = base.clone();
    append_segments(&mut url, segments)?;
    Ok(url)
}

/// Append percent-encoded path segments.
fn append_segments(url: &mut Url, segments: &[&str]) -> Result<(), TrendsError> {
    let as_text = url.to_string();
    url.path_segments_mut()
        .map_err(|_| TrendsError::Config(format!("base URL cannot carry a path: {as_text}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// Builder for [`RiotClient`].
pub struct RiotClientBuilder {
    platform: String,
    base_url: Option<String>,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
    gate: Option<Arc<RateGate>>,
    retry_policy: RetryPolicy,
}

impl RiotClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            platform: "na1".to_string(),
            base_url: None,
            credentials: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            gate: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Set the platform shard, e.g. `euw1`. Selects both routing hosts.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Override both hosts (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the credentials provider.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share an existing rate gate.
    pub fn rate_gate(mut self, gate: Arc<RateGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Set the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Build the client on top of `reqwest`.
    pub fn build(self) -> Result<RiotClient, TrendsError> {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("riot-trends/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("riot-trends"));
        headers.insert(USER_AGENT, header_value);

        if let Some(credentials) = &self.credentials {
            let mut token = HeaderValue::from_str(credentials.api_key().expose_secret())
                .map_err(|_| TrendsError::Config("API key is not a valid header value".into()))?;
            token.set_sensitive(true);
            headers.insert(HeaderName::from_static(RIOT_TOKEN_HEADER), token);
        }

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        self.build_with_transport(HttpTransport::new(client))
    }

    /// Build the client on top of a custom transport.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<RiotClient<T>, TrendsError> {
        let platform = self.platform.trim().to_ascii_lowercase();
        let region = RoutingRegion::for_platform(&platform).ok_or_else(|| {
            TrendsError::Config(format!("unsupported platform region: {platform}"))
        })?;

        let (regional_base, platform_base) = match &self.base_url {
            Some(base) => (Url::parse(base)?, Url::parse(base)?),
            None => (
                Url::parse(&region.base_url())?,
                Url::parse(&endpoints::platform_base_url(&platform))?,
            ),
        };

        let gate = self.gate.unwrap_or_else(|| Arc::new(RateGate::new()));
        debug!(%platform, %region, "riot client ready");

        Ok(RiotClient {
            requester: Requester::new(transport, gate, self.retry_policy),
            regional_base,
            platform_base,
            platform,
        })
    }
}

impl Default for RiotClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_platform_is_config_error() {
        let err = RiotClient::builder().platform("mars1").build().unwrap_err();
        assert!(matches!(err, TrendsError::Config(_)));
    }

    #[test]
    fn test_hosts_follow_platform() {
        let client = RiotClient::builder().platform("EUW1").build().unwrap();
        assert_eq!(client.platform(), "euw1");
        assert_eq!(
            client.regional_base.as_str(),
            "https://europe.api.riotgames.com/"
        );
        assert_eq!(
            client.platform_base.as_str(),
            "https://euw1.api.riotgames.com/"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let base = Url::parse("https://europe.api.riotgames.com").unwrap();
        let mut url = join_segments(&base, &endpoints::matches::MATCHES).unwrap();
        append_segments(&mut url, &["by-puuid", "a/b c", "ids"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://europe.api.riotgames.com/lol/match/v5/matches/by-puuid/a%2Fb%20c/ids"
        );
    }
}
