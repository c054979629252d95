//! REST client for the analytics backend
//!
//! One method per backend capability. Purely a stateless translation from
//! typed calls to HTTP: no retries, no caching, no timeouts beyond the
//! transport-level ones configured on the underlying client.

use crate::types::*;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default backend base URL (local development server)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status}")]
    Status {
        status: u16,
        body: String,
    },

    #[error("Deserialization failed: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Stateless client for the analytics backend REST API
pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    /// Create a client against the default local backend
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Derive the alert WebSocket URL from the HTTP base URL
    pub fn ws_alerts_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            format!("ws://{}", self.base_url)
        };
        format!("{}/ws/alerts", ws_base)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} with {} params", url, params.len());

        let response = self.client.get(&url).query(params).send().await?;
        Self::decode_response(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(&body).send().await?;
        Self::decode_response(response).await
    }

    async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("API returned {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Run a full analysis pass for a ticker, optionally with a question
    pub async fn analyze(&self, ticker: &str, question: Option<&str>) -> Result<AnalyzeResponse> {
        self.post_json(
            "/api/analyze",
            json!({ "ticker": ticker, "question": question }),
        )
        .await
    }

    /// Send one chat turn to the AI assistant
    pub async fn chat(&self, message: &str) -> Result<ChatResponse> {
        self.post_json("/api/chat", json!({ "message": message })).await
    }

    /// Technical snapshot for a ticker
    pub async fn technical(&self, ticker: &str) -> Result<TechnicalData> {
        self.get_json(&format!("/api/technical/{}", ticker), &[]).await
    }

    /// Implied-volatility snapshot for a ticker
    pub async fn iv(&self, ticker: &str) -> Result<IvData> {
        self.get_json(&format!("/api/iv/{}", ticker), &[]).await
    }

    /// Recent news articles for a ticker
    pub async fn news(&self, ticker: &str) -> Result<NewsResponse> {
        self.get_json(&format!("/api/news/{}", ticker), &[]).await
    }

    /// Unusual-activity scan; `tickers` restricts the universe when given
    pub async fn scanner_unusual(&self, tickers: Option<&[String]>) -> Result<ScannerResponse> {
        let mut params = Vec::new();
        if let Some(list) = tickers {
            if !list.is_empty() {
                params.push(("tickers", list.join(",")));
            }
        }
        self.get_json("/api/scanner/unusual", &params).await
    }

    /// OHLCV price history for a ticker over a fixed lookback window
    pub async fn price_history(&self, ticker: &str, period: Period) -> Result<PriceHistoryResponse> {
        self.get_json(
            &format!("/api/price-history/{}", ticker),
            &[("period", period.as_str().to_string())],
        )
        .await
    }

    /// Options chain for a ticker, optionally filtered by contract type
    pub async fn chain(
        &self,
        ticker: &str,
        contract_type: Option<ContractType>,
    ) -> Result<ChainResponse> {
        let mut params = Vec::new();
        if let Some(ct) = contract_type {
            params.push(("contract_type", ct.as_str().to_string()));
        }
        self.get_json(&format!("/api/chain/{}", ticker), &params).await
    }

    /// Ranked strategy recommendations for a ticker
    pub async fn strategy(
        &self,
        ticker: &str,
        risk_level: &str,
        account_size: f64,
    ) -> Result<StrategyResponse> {
        self.get_json(
            &format!("/api/strategy/{}", ticker),
            &[
                ("risk_level", risk_level.to_string()),
                ("account_size", account_size.to_string()),
            ],
        )
        .await
    }

    /// Paper-trading account snapshot
    pub async fn account(&self) -> Result<AccountData> {
        self.get_json("/api/account", &[]).await
    }

    /// Open paper-trading positions
    pub async fn positions(&self) -> Result<Vec<Position>> {
        self.get_json("/api/positions", &[]).await
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RestClient::new();
        assert_eq!(client.base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = RestClient::with_base_url("https://analytics.example.com");
        assert_eq!(client.base_url(), "https://analytics.example.com");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = RestClient::with_base_url("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_ws_alerts_url_http() {
        let client = RestClient::with_base_url("http://localhost:8000");
        assert_eq!(client.ws_alerts_url(), "ws://localhost:8000/ws/alerts");
    }

    #[test]
    fn test_ws_alerts_url_https() {
        let client = RestClient::with_base_url("https://analytics.example.com");
        assert_eq!(
            client.ws_alerts_url(),
            "wss://analytics.example.com/ws/alerts"
        );
    }
}
