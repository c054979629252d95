//! Backend API trait seam
//!
//! The store depends on `dyn MarketApi` rather than `RestClient` directly so
//! its behavior (cache clearing, failure policy, staleness discard) can be
//! exercised against a scripted backend in tests.

use crate::rest::{RestClient, Result};
use crate::types::*;
use async_trait::async_trait;

#[async_trait]
pub trait MarketApi: Send + Sync {
    async fn chat(&self, message: &str) -> Result<ChatResponse>;
    async fn technical(&self, ticker: &str) -> Result<TechnicalData>;
    async fn iv(&self, ticker: &str) -> Result<IvData>;
    async fn news(&self, ticker: &str) -> Result<NewsResponse>;
    async fn scanner_unusual(&self, tickers: Option<&[String]>) -> Result<ScannerResponse>;
    async fn price_history(&self, ticker: &str, period: Period) -> Result<PriceHistoryResponse>;
    async fn chain(
        &self,
        ticker: &str,
        contract_type: Option<ContractType>,
    ) -> Result<ChainResponse>;
    async fn strategy(
        &self,
        ticker: &str,
        risk_level: &str,
        account_size: f64,
    ) -> Result<StrategyResponse>;
    async fn account(&self) -> Result<AccountData>;
    async fn positions(&self) -> Result<Vec<Position>>;
}

#[async_trait]
impl MarketApi for RestClient {
    async fn chat(&self, message: &str) -> Result<ChatResponse> {
        RestClient::chat(self, message).await
    }

    async fn technical(&self, ticker: &str) -> Result<TechnicalData> {
        RestClient::technical(self, ticker).await
    }

    async fn iv(&self, ticker: &str) -> Result<IvData> {
        RestClient::iv(self, ticker).await
    }

    async fn news(&self, ticker: &str) -> Result<NewsResponse> {
        RestClient::news(self, ticker).await
    }

    async fn scanner_unusual(&self, tickers: Option<&[String]>) -> Result<ScannerResponse> {
        RestClient::scanner_unusual(self, tickers).await
    }

    async fn price_history(&self, ticker: &str, period: Period) -> Result<PriceHistoryResponse> {
        RestClient::price_history(self, ticker, period).await
    }

    async fn chain(
        &self,
        ticker: &str,
        contract_type: Option<ContractType>,
    ) -> Result<ChainResponse> {
        RestClient::chain(self, ticker, contract_type).await
    }

    async fn strategy(
        &self,
        ticker: &str,
        risk_level: &str,
        account_size: f64,
    ) -> Result<StrategyResponse> {
        RestClient::strategy(self, ticker, risk_level, account_size).await
    }

    async fn account(&self) -> Result<AccountData> {
        RestClient::account(self).await
    }

    async fn positions(&self) -> Result<Vec<Position>> {
        RestClient::positions(self).await
    }
}
