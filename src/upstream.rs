//! HTTP client for the third-party football data providers.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;

pub const FOOTYSTATS_BASE_URL: &str = "https://api.footystats.org/v3";
pub const FOOTBALL_DATA_BASE_URL: &str = "https://api.football-data-api.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    FootyStats,
    FootballData,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FootyStats => "footystats",
            Self::FootballData => "football_data",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::FootyStats => FOOTYSTATS_BASE_URL,
            Self::FootballData => FOOTBALL_DATA_BASE_URL,
        }
    }

    /// Both providers take the key as a `key` query parameter; FootyStats also
    /// expects the RapidAPI headers.
    fn auth_headers(self, api_key: &str) -> Vec<(&'static str, String)> {
        match self {
            Self::FootyStats => vec![
                ("X-RapidAPI-Key", api_key.to_string()),
                ("X-RapidAPI-Host", "footystats.org".to_string()),
            ],
            Self::FootballData => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProviderClient {
    provider: Provider,
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(provider: Provider, base_url: Option<String>, api_key: Option<String>) -> Self {
        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| provider.default_base_url().to_string());

        Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let opts = query
            .iter()
            .fold(RequestOptions::default(), |opts, (key, value)| {
                opts.with_query(key, value.clone())
            });
        self.request_json(Method::GET, endpoint, opts).await
    }

    /// Issues one request with no retries. A missing API key fails before any
    /// network I/O; non-success statuses fail with the status echoed.
    pub async fn request_json(
        &self,
        method: Method,
        endpoint: &str,
        opts: RequestOptions,
    ) -> Result<Value, ApiError> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;
        let url = self.url_for(endpoint);

        debug!(
            component = "upstream",
            event = "upstream.request",
            provider = self.provider.as_str(),
            method = method.as_str(),
            endpoint
        );

        let mut request = self
            .http
            .request(method, &url)
            .query(&[("key", api_key)])
            .query(&opts.query);
        for (name, value) in self.provider.auth_headers(api_key) {
            request = request.header(name, value);
        }
        for (name, value) in &opts.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &opts.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            warn!(
                component = "upstream",
                event = "upstream.transport_error",
                provider = self.provider.as_str(),
                endpoint,
                error = %err
            );
            ApiError::Transport(err.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                component = "upstream",
                event = "upstream.status_error",
                provider = self.provider.as_str(),
                endpoint,
                status = status.as_u16()
            );
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ApiError::Transport(err.without_url().to_string()))
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_and_trims_trailing_slash() {
        let client = ProviderClient::new(Provider::FootballData, None, Some("k".to_string()));
        assert_eq!(client.base_url(), FOOTBALL_DATA_BASE_URL);

        let client = ProviderClient::new(
            Provider::FootyStats,
            Some("http://localhost:9000/".to_string()),
            None,
        );
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.url_for("/leagues"), "http://localhost:9000/leagues");
        assert!(!client.has_api_key());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let client = ProviderClient::new(Provider::FootyStats, None, Some("  ".to_string()));
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        // Port 9 is discard; a request attempt would surface as a transport error.
        let client = ProviderClient::new(
            Provider::FootyStats,
            Some("http://127.0.0.1:9".to_string()),
            None,
        );
        let err = client.get_json("leagues", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingApiKey));
        assert_eq!(err.to_string(), "API key not configured");
    }

    #[test]
    fn footystats_sends_rapidapi_headers() {
        let headers = Provider::FootyStats.auth_headers("secret");
        assert_eq!(headers[0], ("X-RapidAPI-Key", "secret".to_string()));
        assert_eq!(headers[1].1, "footystats.org");
        assert!(Provider::FootballData.auth_headers("secret").is_empty());
    }
}
