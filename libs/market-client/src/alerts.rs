//! Realtime unusual-activity alert listener
//!
//! Maintains a best-effort WebSocket connection to the backend's
//! `/ws/alerts` push endpoint. Frames that parse as an alert envelope are
//! forwarded to the sink; anything else is dropped without surfacing an
//! error. On close or error the listener sleeps a fixed delay and
//! reconnects, indefinitely. Flipping the shutdown flag stops the loop, and
//! wakes a pending reconnect sleep early so teardown never waits out the
//! full delay.

use crate::types::{AlertFrame, UnusualAlert};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Default delay between reconnection attempts
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// How often the read loop and reconnect sleep re-check the shutdown flag
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Consumer of inbound alerts. Blanket-implemented for closures so the
/// store can hand in its toast enqueue directly.
pub trait AlertSink: Send + Sync + 'static {
    fn on_alert(&self, alert: UnusualAlert);
}

impl<F> AlertSink for F
where
    F: Fn(UnusualAlert) + Send + Sync + 'static,
{
    fn on_alert(&self, alert: UnusualAlert) {
        self(alert)
    }
}

/// Parse a raw frame as an alert envelope.
///
/// Malformed JSON and well-formed JSON without an `alert` key both yield
/// `None`; the caller discards them silently per the push-channel contract.
pub fn parse_alert_frame(text: &str) -> Option<UnusualAlert> {
    match serde_json::from_str::<AlertFrame>(text) {
        Ok(frame) => Some(frame.alert),
        Err(e) => {
            debug!("[Alerts WS] Ignoring unrecognized frame: {}", e);
            None
        }
    }
}

/// Sleep for a duration, waking early if the shutdown flag flips
async fn interruptible_sleep(duration: Duration, shutdown: &Arc<AtomicBool>) {
    let mut elapsed = Duration::ZERO;
    while elapsed < duration && shutdown.load(Ordering::Acquire) {
        sleep(SHUTDOWN_POLL_INTERVAL).await;
        elapsed += SHUTDOWN_POLL_INTERVAL;
    }
}

/// Spawn the alert listener task.
///
/// `shutdown_flag` semantics: true = keep running, false = shutdown
/// requested.
pub fn spawn_alerts_listener(
    url: String,
    reconnect_delay: Duration,
    shutdown_flag: Arc<AtomicBool>,
    sink: Arc<dyn AlertSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_alerts_listener(url, reconnect_delay, shutdown_flag, sink).await;
    })
}

async fn run_alerts_listener(
    url: String,
    reconnect_delay: Duration,
    shutdown_flag: Arc<AtomicBool>,
    sink: Arc<dyn AlertSink>,
) {
    'reconnect: loop {
        if !shutdown_flag.load(Ordering::Acquire) {
            info!("[Alerts WS] Shutdown signal received before connect");
            break 'reconnect;
        }

        debug!("[Alerts WS] Connecting to {}", url);

        let ws_stream = match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                info!("[Alerts WS] Connected to alert feed");
                stream
            }
            Err(e) => {
                // Backend may simply not be running; this channel is
                // best-effort so keep retrying quietly.
                warn!("[Alerts WS] Connection failed: {}", e);
                interruptible_sleep(reconnect_delay, &shutdown_flag).await;
                continue 'reconnect;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        loop {
            if !shutdown_flag.load(Ordering::Acquire) {
                info!("[Alerts WS] Shutdown signal received");
                break 'reconnect;
            }

            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(alert) = parse_alert_frame(&text) {
                                debug!(
                                    "[Alerts WS] Alert for {}: {}",
                                    alert.ticker, alert.alert_type
                                );
                                sink.on_alert(alert);
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            // Servers that enforce keepalive drop silent
                            // clients, so answer in-band.
                            if let Err(e) = write.send(Message::Pong(payload)).await {
                                warn!("[Alerts WS] Pong failed: {}", e);
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            warn!("[Alerts WS] Connection closed by server");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Pong/binary frames carry no alerts
                        }
                        Some(Err(e)) => {
                            warn!("[Alerts WS] Read error: {}", e);
                            break;
                        }
                    }
                }
                _ = sleep(SHUTDOWN_POLL_INTERVAL) => {
                    // Loop back around to re-check the shutdown flag
                }
            }
        }

        info!(
            "[Alerts WS] Reconnecting in {}s",
            reconnect_delay.as_secs()
        );
        interruptible_sleep(reconnect_delay, &shutdown_flag).await;
    }

    info!("[Alerts WS] Listener stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_parse_valid_alert_frame() {
        let text = r#"{"alert": {"ticker": "AMD", "type": "institutional_flow",
            "premium_flow": 980000.0, "interpretation": "Large sweep at ask"}}"#;
        let alert = parse_alert_frame(text).unwrap();
        assert_eq!(alert.ticker, "AMD");
        assert_eq!(alert.alert_type, "institutional_flow");
    }

    #[test]
    fn test_parse_malformed_frame_discarded() {
        assert!(parse_alert_frame("not json at all").is_none());
        assert!(parse_alert_frame("{\"ping\": 1}").is_none());
        assert!(parse_alert_frame("").is_none());
    }

    #[tokio::test]
    async fn test_interruptible_sleep_wakes_on_shutdown() {
        let shutdown = Arc::new(AtomicBool::new(true));
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            shutdown_clone.store(false, Ordering::Release);
        });

        let start = Instant::now();
        interruptible_sleep(Duration::from_secs(30), &shutdown).await;
        // Must return shortly after the flag flips, not after 30s
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
