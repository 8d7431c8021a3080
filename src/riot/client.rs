use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::region::{Platform, Region};
use crate::error::AppError;

/// Thin Riot API client. Every request waits on a shared rate limiter first.
#[derive(Debug, Clone)]
pub struct RiotClient {
    http: reqwest::Client,
    limiter: Arc<DefaultDirectRateLimiter>,
    api_key: String,
    /// Replaces every routing host, used to point the client at a mock server.
    base_url: Option<String>,
}

impl RiotClient {
    pub fn new(api_key: String, requests_per_second: NonZeroU32) -> Self {
        Self {
            http: reqwest::Client::new(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second))),
            api_key,
            base_url: None,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub(super) fn platform_url(&self, platform: Platform) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.riotgames.com", platform.host()))
    }

    pub(super) fn region_url(&self, region: Region) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.riotgames.com", region.host()))
    }

    pub(super) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.limiter.until_ready().await;
        trace!(url, "🛰️ Riot API request");

        let res = self
            .http
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(res.json().await?),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = res
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(AppError::RateLimited { retry_after })
            }
            status => {
                let message = res.text().await.unwrap_or_default();
                Err(AppError::RiotApi {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> RiotClient {
        RiotClient::new("TEST_KEY".into(), NonZeroU32::new(100).unwrap())
            .with_base_url(server.base_url())
    }

    #[tokio::test]
    async fn ok_response_is_decoded_and_key_is_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/ping")
                    .header("X-Riot-Token", "TEST_KEY");
                then.status(200).json_body(json!({ "value": 7 }));
            })
            .await;

        #[derive(serde::Deserialize)]
        struct Pong {
            value: u8,
        }

        let url = format!("{}/ping", server.base_url());
        let pong: Pong = client(&server).get(&url).await.unwrap();

        assert_eq!(pong.value, 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/limited");
                then.status(429).header("Retry-After", "3");
            })
            .await;

        let url = format!("{}/limited", server.base_url());
        let res: Result<(), _> = client(&server).get(&url).await;

        assert!(matches!(
            res,
            Err(AppError::RateLimited { retry_after: Some(d) }) if d == Duration::from_secs(3)
        ));
    }

    #[tokio::test]
    async fn rate_limit_without_header_has_no_hint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/limited");
                then.status(429);
            })
            .await;

        let url = format!("{}/limited", server.base_url());
        let res: Result<(), _> = client(&server).get(&url).await;

        assert!(matches!(res, Err(AppError::RateLimited { retry_after: None })));
    }

    #[tokio::test]
    async fn other_statuses_map_to_riot_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404).body("Data not found");
            })
            .await;

        let url = format!("{}/missing", server.base_url());
        let err = client(&server).get::<()>(&url).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(err, AppError::RiotApi { message, .. } if message == "Data not found"));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let client = RiotClient::new("TEST_KEY".into(), NonZeroU32::new(100).unwrap());
        let res: Result<(), _> = client.get("ht!tp://invalid-url").await;

        assert!(matches!(res, Err(AppError::Http(_))));
    }
}
