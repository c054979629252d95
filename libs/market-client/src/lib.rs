//! Client library for the stock/options analytics backend
//!
//! REST surface (one call per endpoint), wire types, and the realtime
//! alert listener. All analytics are computed by the backend; this crate
//! only moves JSON.

pub mod alerts;
pub mod api;
pub mod rest;
pub mod types;

pub use alerts::{parse_alert_frame, spawn_alerts_listener, AlertSink, DEFAULT_RECONNECT_DELAY};
pub use api::MarketApi;
pub use rest::{ApiError, RestClient, Result, DEFAULT_API_BASE_URL};
pub use types::*;
