// src/core/service_client.rs
//! JSON-over-HTTP client shared by the third-party integrations

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::app_log;

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client with a request timeout and headers sent on every call
    pub fn new(base_url: String, timeout_seconds: u64, headers: &[(&str, &str)]) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name: {}", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name))?;
            default_headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .default_headers(default_headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for a RapidAPI-hosted service
    pub fn rapidapi(base_url: String, host: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        Self::new(
            base_url,
            timeout_seconds,
            &[("x-rapidapi-key", api_key), ("x-rapidapi-host", host)],
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generic GET request with query parameters
    pub async fn get_with_query<R>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        app_log!(debug, "GET {} with {} query params", url, query.len());

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        Self::parse_json(response).await
    }

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        self.get_with_query(endpoint, &[]).await
    }

    /// Generic POST request with JSON, bearer-authenticated when a token is given
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T, bearer: Option<&str>) -> Result<R>
    where
        T: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        app_log!(trace, "POST {}", url);

        let mut request = self.client.post(&url).json(payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        Self::parse_json(response).await
    }

    async fn parse_json<R>(response: reqwest::Response) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .context("Failed to parse JSON response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            app_log!(error, "Service error response {}: {}", status, error_text);
            anyhow::bail!("HTTP {} error: {}", status, error_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    /// Expect default headers to be sent and JSON to be decoded on success
    #[tokio::test]
    async fn test_get_sends_rapidapi_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("x-rapidapi-key", "secret")
            .match_header("x-rapidapi-host", "example.p.rapidapi.com")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client =
            ServiceClient::rapidapi(server.url(), "example.p.rapidapi.com", "secret", 5).unwrap();
        let body: Value = client.get("/ping").await.unwrap();

        assert_eq!(body["ok"], Value::Bool(true));
        mock.assert_async().await;
    }

    /// Expect non-success statuses to surface as errors carrying the status
    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;

        let client = ServiceClient::new(server.url(), 5, &[]).unwrap();
        let err = client.get::<Value>("/missing").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        assert!(ServiceClient::new("http://localhost".into(), 5, &[("bad header", "x")]).is_err());
    }
}
