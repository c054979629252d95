//! Central store
//!
//! Single authority for all fetched data and UI selection state. Views read
//! snapshots; every mutation goes through an action method here. Fetches for
//! a ticker are tagged with the ticker they were issued for and their
//! results are discarded if the selection changed while they were in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use market_client::{
    AccountData, ChainResponse, IvData, MarketApi, NewsResponse, Period, Position, PriceBar,
    ScannerResponse, StrategyResponse, TechnicalData, UnusualAlert,
};
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::DashboardConfig;

/// Default risk parameters for strategy recommendations
const STRATEGY_RISK_LEVEL: &str = "moderate";
const STRATEGY_ACCOUNT_SIZE: f64 = 10_000.0;

/// Fallback assistant message when a chat turn fails
pub const CHAT_FALLBACK_MESSAGE: &str =
    "Failed to get a response. Check that the backend is running and its API key is configured.";

/// Active view tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Analysis,
    Scanner,
    Account,
    Chat,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Analysis => "Analysis",
            View::Scanner => "Scanner",
            View::Account => "Account",
            View::Chat => "Chat",
        }
    }

    /// Map a single-digit shortcut to a view
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(View::Dashboard),
            '2' => Some(View::Analysis),
            '3' => Some(View::Scanner),
            '4' => Some(View::Account),
            '5' => Some(View::Chat),
            _ => None,
        }
    }

    pub fn all() -> [View; 5] {
        [
            View::Dashboard,
            View::Analysis,
            View::Scanner,
            View::Account,
            View::Chat,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Ephemeral notification; self-expires after its duration
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Placeholder awaiting the backend response
    pub loading: bool,
}

/// All client-held state. Cloned wholesale for rendering.
#[derive(Debug, Clone)]
pub struct StoreState {
    pub selected_ticker: String,
    pub active_view: View,

    pub watchlist: Vec<String>,
    pub watchlist_data: HashMap<String, TechnicalData>,
    pub watchlist_loading: bool,

    // Ticker-scoped caches, nulled when the selection changes
    pub technical: Option<TechnicalData>,
    pub technical_loading: bool,
    pub iv: Option<IvData>,
    pub iv_loading: bool,
    pub chain: Option<ChainResponse>,
    pub chain_loading: bool,
    pub news: Option<NewsResponse>,
    pub news_loading: bool,
    pub strategy: Option<StrategyResponse>,
    pub strategy_loading: bool,
    pub price_history: Option<Vec<PriceBar>>,
    pub price_history_loading: bool,

    // Global caches
    pub scanner: Option<ScannerResponse>,
    pub scanner_loading: bool,
    pub account: Option<AccountData>,
    pub positions: Option<Vec<Position>>,

    pub chat_messages: Vec<ChatMessage>,
    pub chat_loading: bool,

    pub toasts: Vec<Toast>,
}

impl StoreState {
    pub(crate) fn new(config: &DashboardConfig) -> Self {
        Self {
            selected_ticker: config.default_ticker.clone(),
            active_view: View::Dashboard,
            watchlist: config.watchlist.clone(),
            watchlist_data: HashMap::new(),
            watchlist_loading: false,
            technical: None,
            technical_loading: false,
            iv: None,
            iv_loading: false,
            chain: None,
            chain_loading: false,
            news: None,
            news_loading: false,
            strategy: None,
            strategy_loading: false,
            price_history: None,
            price_history_loading: false,
            scanner: None,
            scanner_loading: false,
            account: None,
            positions: None,
            chat_messages: Vec::new(),
            chat_loading: false,
            toasts: Vec::new(),
        }
    }

    fn clear_ticker_caches(&mut self) {
        self.technical = None;
        self.iv = None;
        self.chain = None;
        self.news = None;
        self.strategy = None;
        self.price_history = None;
        // A selection change orphans any in-flight fetch for the old
        // ticker; its stale resolution no longer touches the loading
        // flags, so they must be reset here or a category could read as
        // loading forever with nothing outstanding.
        self.technical_loading = false;
        self.iv_loading = false;
        self.chain_loading = false;
        self.news_loading = false;
        self.strategy_loading = false;
        self.price_history_loading = false;
    }
}

/// Central store: API client + shared state behind a single writer path
pub struct Store {
    api: Arc<dyn MarketApi>,
    state: Arc<RwLock<StoreState>>,
    runtime: Handle,
    toast_duration_ms: u64,
    toast_seq: AtomicU64,
}

impl Store {
    pub fn new(api: Arc<dyn MarketApi>, config: &DashboardConfig, runtime: Handle) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(StoreState::new(config))),
            runtime,
            toast_duration_ms: config.toast_duration_ms,
            toast_seq: AtomicU64::new(0),
        }
    }

    /// Clone of the full state for rendering
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn set_active_view(&self, view: View) {
        self.state.write().active_view = view;
    }

    /// True when the in-flight fetch's ticker still matches the selection.
    /// Stale results are discarded without touching caches or loading flags.
    fn is_current(&self, ticker: &str) -> bool {
        let current = self.state.read().selected_ticker == ticker;
        if !current {
            debug!("Discarding stale fetch result for {}", ticker);
        }
        current
    }

    /// Select a ticker: switch to the analysis view, drop every
    /// ticker-scoped cache, then fetch the primary categories concurrently.
    /// Strategy is fetched after the others settle.
    pub async fn select_ticker(&self, symbol: &str) {
        let ticker = symbol.trim().to_uppercase();
        if ticker.is_empty() {
            return;
        }

        {
            let mut state = self.state.write();
            state.selected_ticker = ticker.clone();
            state.active_view = View::Analysis;
            state.clear_ticker_caches();
        }

        tokio::join!(
            self.fetch_technical(&ticker),
            self.fetch_iv(&ticker),
            self.fetch_news(&ticker),
            self.fetch_price_history(&ticker, Period::default()),
        );

        self.fetch_strategy(&ticker).await;
    }

    /// Bulk technical fetch for the watchlist. Per-symbol outcomes are
    /// independent; a failed symbol is simply absent from the result map.
    pub async fn load_watchlist(&self) {
        let symbols = {
            let mut state = self.state.write();
            state.watchlist_loading = true;
            state.watchlist.clone()
        };

        let fetches = symbols.iter().map(|symbol| {
            let api = Arc::clone(&self.api);
            async move { (symbol.clone(), api.technical(symbol).await) }
        });

        let results = futures::future::join_all(fetches).await;

        let mut data = HashMap::new();
        for (symbol, result) in results {
            match result {
                Ok(snapshot) => {
                    data.insert(symbol, snapshot);
                }
                Err(e) => {
                    debug!("Watchlist fetch failed for {}: {}", symbol, e);
                }
            }
        }

        let mut state = self.state.write();
        state.watchlist_data = data;
        state.watchlist_loading = false;
    }

    pub async fn fetch_technical(&self, ticker: &str) {
        self.state.write().technical_loading = true;

        match self.api.technical(ticker).await {
            Ok(data) => {
                if self.is_current(ticker) {
                    let mut state = self.state.write();
                    state.technical = Some(data);
                    state.technical_loading = false;
                }
            }
            Err(e) => {
                warn!("Technical fetch failed for {}: {}", ticker, e);
                if self.is_current(ticker) {
                    self.state.write().technical_loading = false;
                    self.add_toast(
                        ToastKind::Error,
                        format!("Failed to load technical data for {}", ticker),
                    );
                }
            }
        }
    }

    pub async fn fetch_iv(&self, ticker: &str) {
        self.state.write().iv_loading = true;

        match self.api.iv(ticker).await {
            Ok(data) => {
                if self.is_current(ticker) {
                    let mut state = self.state.write();
                    state.iv = Some(data);
                    state.iv_loading = false;
                }
            }
            Err(e) => {
                warn!("IV fetch failed for {}: {}", ticker, e);
                if self.is_current(ticker) {
                    self.state.write().iv_loading = false;
                    self.add_toast(
                        ToastKind::Error,
                        format!("Failed to load IV data for {}", ticker),
                    );
                }
            }
        }
    }

    pub async fn fetch_chain(&self, ticker: &str) {
        self.state.write().chain_loading = true;

        match self.api.chain(ticker, None).await {
            Ok(data) => {
                if self.is_current(ticker) {
                    let mut state = self.state.write();
                    state.chain = Some(data);
                    state.chain_loading = false;
                }
            }
            Err(e) => {
                warn!("Chain fetch failed for {}: {}", ticker, e);
                if self.is_current(ticker) {
                    self.state.write().chain_loading = false;
                    self.add_toast(
                        ToastKind::Error,
                        format!("Failed to load options chain for {}", ticker),
                    );
                }
            }
        }
    }

    pub async fn fetch_news(&self, ticker: &str) {
        self.state.write().news_loading = true;

        match self.api.news(ticker).await {
            Ok(data) => {
                if self.is_current(ticker) {
                    let mut state = self.state.write();
                    state.news = Some(data);
                    state.news_loading = false;
                }
            }
            Err(e) => {
                warn!("News fetch failed for {}: {}", ticker, e);
                if self.is_current(ticker) {
                    self.state.write().news_loading = false;
                    self.add_toast(
                        ToastKind::Error,
                        format!("Failed to load news for {}", ticker),
                    );
                }
            }
        }
    }

    /// Strategy is auxiliary: the backend endpoint may be unconfigured, so
    /// failures leave the cache untouched and raise nothing.
    pub async fn fetch_strategy(&self, ticker: &str) {
        self.state.write().strategy_loading = true;

        match self
            .api
            .strategy(ticker, STRATEGY_RISK_LEVEL, STRATEGY_ACCOUNT_SIZE)
            .await
        {
            Ok(data) => {
                if self.is_current(ticker) {
                    let mut state = self.state.write();
                    state.strategy = Some(data);
                    state.strategy_loading = false;
                }
            }
            Err(e) => {
                debug!("Strategy fetch failed for {}: {}", ticker, e);
                if self.is_current(ticker) {
                    self.state.write().strategy_loading = false;
                }
            }
        }
    }

    /// Price history is auxiliary; failures are silent.
    pub async fn fetch_price_history(&self, ticker: &str, period: Period) {
        self.state.write().price_history_loading = true;

        match self.api.price_history(ticker, period).await {
            Ok(data) => {
                if self.is_current(ticker) {
                    let mut state = self.state.write();
                    state.price_history = Some(data.data);
                    state.price_history_loading = false;
                }
            }
            Err(e) => {
                debug!("Price history fetch failed for {}: {}", ticker, e);
                if self.is_current(ticker) {
                    self.state.write().price_history_loading = false;
                }
            }
        }
    }

    pub async fn fetch_scanner(&self) {
        self.state.write().scanner_loading = true;

        match self.api.scanner_unusual(None).await {
            Ok(data) => {
                let total = data.total_alerts;
                {
                    let mut state = self.state.write();
                    state.scanner = Some(data);
                    state.scanner_loading = false;
                }
                self.add_toast(
                    ToastKind::Success,
                    format!("Scan complete: {} alerts found", total),
                );
            }
            Err(e) => {
                warn!("Scanner failed: {}", e);
                self.state.write().scanner_loading = false;
                self.add_toast(
                    ToastKind::Error,
                    "Scanner failed. Is the backend running?".to_string(),
                );
            }
        }
    }

    pub async fn fetch_account(&self) {
        match self.api.account().await {
            Ok(data) => self.state.write().account = Some(data),
            Err(e) => debug!("Account fetch failed: {}", e),
        }
    }

    pub async fn fetch_positions(&self) {
        match self.api.positions().await {
            Ok(data) => self.state.write().positions = Some(data),
            Err(e) => debug!("Positions fetch failed: {}", e),
        }
    }

    /// Send one chat turn. Strictly sequential: a call while another turn
    /// is pending is rejected. Appends the user message plus a loading
    /// placeholder, then replaces the placeholder with the response or the
    /// fixed fallback message.
    pub async fn send_chat(&self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }

        let now = Utc::now();
        {
            let mut state = self.state.write();
            if state.chat_loading {
                debug!("Rejecting chat send while a turn is pending");
                return;
            }
            state.chat_loading = true;
            state.chat_messages.push(ChatMessage {
                id: format!("msg-{}-user", now.timestamp_millis()),
                role: ChatRole::User,
                content: message.to_string(),
                timestamp: now,
                loading: false,
            });
            state.chat_messages.push(ChatMessage {
                id: format!("msg-{}-loading", now.timestamp_millis()),
                role: ChatRole::Assistant,
                content: String::new(),
                timestamp: now,
                loading: true,
            });
        }

        let content = match self.api.chat(message).await {
            Ok(reply) if !reply.response.is_empty() => reply.response,
            Ok(_) => "No response".to_string(),
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                CHAT_FALLBACK_MESSAGE.to_string()
            }
        };

        let done = Utc::now();
        let mut state = self.state.write();
        state.chat_messages.retain(|m| !m.loading);
        state.chat_messages.push(ChatMessage {
            id: format!("msg-{}-assistant", done.timestamp_millis()),
            role: ChatRole::Assistant,
            content,
            timestamp: done,
            loading: false,
        });
        state.chat_loading = false;
    }

    pub fn clear_chat(&self) {
        self.state.write().chat_messages.clear();
    }

    /// Enqueue a toast; it removes itself after its duration.
    pub fn add_toast(&self, kind: ToastKind, message: String) {
        let id = self.toast_seq.fetch_add(1, Ordering::Relaxed);
        let duration_ms = self.toast_duration_ms;

        self.state.write().toasts.push(Toast {
            id,
            kind,
            message,
            duration_ms,
        });

        let state = Arc::clone(&self.state);
        self.runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            state.write().toasts.retain(|t| t.id != id);
        });
    }

    pub fn remove_toast(&self, id: u64) {
        self.state.write().toasts.retain(|t| t.id != id);
    }

    /// Sink entry point for the realtime alert listener
    pub fn on_alert(&self, alert: UnusualAlert) {
        self.add_toast(
            ToastKind::Warning,
            format!(
                "{}: {} - {}",
                alert.ticker, alert.alert_type, alert.interpretation
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_from_digit() {
        assert_eq!(View::from_digit('1'), Some(View::Dashboard));
        assert_eq!(View::from_digit('2'), Some(View::Analysis));
        assert_eq!(View::from_digit('3'), Some(View::Scanner));
        assert_eq!(View::from_digit('4'), Some(View::Account));
        assert_eq!(View::from_digit('5'), Some(View::Chat));
        assert_eq!(View::from_digit('6'), None);
        assert_eq!(View::from_digit('x'), None);
    }

    #[test]
    fn test_clear_ticker_caches_leaves_global_state() {
        let config = DashboardConfig::default();
        let mut state = StoreState::new(&config);
        state.scanner = Some(ScannerResponse {
            scan_time: String::new(),
            total_alerts: 0,
            alerts: Vec::new(),
        });
        state.strategy = Some(StrategyResponse {
            ticker: "TSLA".to_string(),
            risk_level: "moderate".to_string(),
            recommendations: Vec::new(),
            error: None,
        });

        state.clear_ticker_caches();

        assert!(state.strategy.is_none());
        assert!(state.scanner.is_some());
    }
}
