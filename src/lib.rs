//! Options Analytics Terminal - Main Library
//!
//! Terminal dashboard for stock/options analytics. All indicators, IV
//! statistics, chain data, and alerts are computed by an external backend;
//! this crate is the client orchestration layer:
//!
//! - **market-client**: REST surface + realtime alert listener (re-exported)
//! - **store**: central cache/selection state behind action methods
//! - **format**: pure display helpers
//! - **app / ui**: crossterm event handling and ratatui views

pub use market_client;

pub mod app;
pub mod config;
pub mod format;
pub mod logging;
pub mod store;
pub mod ui;

pub use app::{App, InputMode};
pub use config::DashboardConfig;
pub use store::{Store, StoreState, Toast, ToastKind, View};
