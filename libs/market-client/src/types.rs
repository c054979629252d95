//! Wire types for the analytics backend
//!
//! These mirror the backend's JSON responses field for field. All analytics
//! are computed server-side; nothing here is derived locally. Nullable
//! backend fields are `Option` so partial payloads deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Tri-state market signal as emitted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    #[default]
    Neutral,
    /// Backend emits this for trend when it has insufficient history
    #[serde(other)]
    Unknown,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Bullish => "bullish",
            Signal::Bearish => "bearish",
            Signal::Neutral => "neutral",
            Signal::Unknown => "unknown",
        }
    }
}

/// Computed indicator bundle for a ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalData {
    pub ticker: String,
    pub current_price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    #[serde(default)]
    pub trend: Signal,
    pub rsi: Option<f64>,
    #[serde(default)]
    pub rsi_signal: String,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    #[serde(default)]
    pub macd_cross: String,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    #[serde(default)]
    pub bb_position: String,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub atr: Option<f64>,
    pub atr_pct: Option<f64>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub volume_sma20: f64,
    #[serde(default)]
    pub volume_ratio: f64,
    #[serde(default)]
    pub support_20d: f64,
    #[serde(default)]
    pub resistance_20d: f64,
    #[serde(default)]
    pub signal: Signal,
    #[serde(default)]
    pub strength: f64,
}

/// Implied-volatility snapshot (current / percentile / rank)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IvData {
    pub ticker: String,
    pub current_iv: Option<f64>,
    pub iv_percentile: Option<f64>,
    pub iv_rank: Option<f64>,
    pub iv_min: Option<f64>,
    pub iv_max: Option<f64>,
    #[serde(default)]
    pub data_points: u32,
    pub message: Option<String>,
}

/// Single option contract row in the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub ticker: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub strike: f64,
    pub expiry: String,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub mid: Option<f64>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub open_interest: f64,
    pub iv: Option<f64>,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub theta: Option<f64>,
    pub vega: Option<f64>,
    pub break_even: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainSummary {
    #[serde(default)]
    pub total_contracts: u32,
    pub avg_iv: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub underlying: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub contracts: Vec<OptionContract>,
    #[serde(default)]
    pub summary: ChainSummary,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub ticker: String,
    #[serde(default)]
    pub news_count: u32,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
}

/// Detected options-flow anomaly pushed by the scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusualAlert {
    pub ticker: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub contract: Option<String>,
    pub side: Option<String>,
    pub strike: Option<f64>,
    pub expiration: Option<String>,
    pub dte: Option<i64>,
    pub volume: Option<f64>,
    pub open_interest: Option<f64>,
    pub vol_oi_ratio: Option<f64>,
    pub iv: Option<f64>,
    pub mid_price: Option<f64>,
    #[serde(default)]
    pub premium_flow: f64,
    #[serde(default)]
    pub interpretation: String,
    pub put_volume: Option<f64>,
    pub call_volume: Option<f64>,
    pub pc_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerResponse {
    #[serde(default)]
    pub scan_time: String,
    #[serde(default)]
    pub total_alerts: u32,
    #[serde(default)]
    pub alerts: Vec<UnusualAlert>,
}

/// One OHLCV bar from the price-history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryResponse {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub data: Vec<PriceBar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyLeg {
    #[serde(default)]
    pub action: String,
    #[serde(rename = "type", default)]
    pub leg_type: String,
    pub strike: Option<f64>,
    pub expiry: Option<String>,
    pub price: Option<f64>,
}

/// Ranked options-strategy suggestion with risk metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub legs: Vec<StrategyLeg>,
    pub max_profit: Option<f64>,
    pub max_loss: Option<f64>,
    pub probability_of_profit: Option<f64>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResponse {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub recommendations: Vec<StrategyRecommendation>,
    pub error: Option<String>,
}

/// Paper-trading account snapshot. The backend serializes money fields as
/// strings (broker API passthrough), so they stay strings here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default)]
    pub equity: String,
    #[serde(default)]
    pub cash: String,
    #[serde(default)]
    pub buying_power: String,
    #[serde(default)]
    pub portfolio_value: String,
    #[serde(default)]
    pub status: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    #[serde(default)]
    pub qty: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub avg_entry_price: String,
    #[serde(default)]
    pub current_price: String,
    #[serde(default)]
    pub unrealized_pl: String,
    #[serde(default)]
    pub unrealized_plpc: String,
    #[serde(default)]
    pub market_value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub analysis: String,
}

/// Envelope the alert WebSocket pushes; frames without `alert` are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct AlertFrame {
    pub alert: UnusualAlert,
}

/// Lookback window accepted by the price-history endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
        }
    }
}

/// Contract-type filter for the chain endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractType {
    Call,
    Put,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Call => "call",
            ContractType::Put => "put",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_deserialize_known_values() {
        let s: Signal = serde_json::from_str("\"bullish\"").unwrap();
        assert_eq!(s, Signal::Bullish);
        let s: Signal = serde_json::from_str("\"bearish\"").unwrap();
        assert_eq!(s, Signal::Bearish);
        let s: Signal = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(s, Signal::Neutral);
    }

    #[test]
    fn test_signal_deserialize_unknown_falls_through() {
        let s: Signal = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(s, Signal::Unknown);
        let s: Signal = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(s, Signal::Unknown);
    }

    #[test]
    fn test_technical_data_partial_payload() {
        // Backend omits indicators it cannot compute; everything optional
        // must default rather than fail the whole snapshot.
        let json = r#"{
            "ticker": "TSLA",
            "current_price": 251.3,
            "change": -4.2,
            "change_pct": -1.64,
            "sma20": null,
            "sma50": 248.9,
            "sma200": null,
            "trend": "bearish",
            "rsi": 41.7,
            "macd": null,
            "macd_signal": null,
            "macd_histogram": null,
            "bb_upper": null,
            "bb_middle": null,
            "bb_lower": null,
            "stoch_k": null,
            "stoch_d": null,
            "atr": null,
            "atr_pct": null,
            "signal": "neutral"
        }"#;
        let data: TechnicalData = serde_json::from_str(json).unwrap();
        assert_eq!(data.ticker, "TSLA");
        assert_eq!(data.trend, Signal::Bearish);
        assert_eq!(data.sma50, Some(248.9));
        assert!(data.sma20.is_none());
        assert_eq!(data.volume, 0.0);
    }

    #[test]
    fn test_alert_frame_roundtrip() {
        let json = r#"{"alert": {"ticker": "NVDA", "type": "volume_surge",
            "premium_flow": 1250000.0,
            "interpretation": "Call volume 8x open interest"}}"#;
        let frame: AlertFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.alert.ticker, "NVDA");
        assert_eq!(frame.alert.alert_type, "volume_surge");
        assert_eq!(frame.alert.premium_flow, 1_250_000.0);
    }

    #[test]
    fn test_period_strings() {
        assert_eq!(Period::OneMonth.as_str(), "1mo");
        assert_eq!(Period::ThreeMonths.as_str(), "3mo");
        assert_eq!(Period::SixMonths.as_str(), "6mo");
        assert_eq!(Period::OneYear.as_str(), "1y");
        assert_eq!(Period::default(), Period::SixMonths);
    }
}
