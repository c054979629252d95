//! Integration tests for the alert listener
//!
//! Runs the listener against a local mock push server to verify frame
//! handling, fixed-delay reconnection spacing, and that teardown cancels a
//! pending reconnect instead of waiting it out.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::MockAlertServer;
use market_client::{spawn_alerts_listener, UnusualAlert};
use tokio::time::{sleep, timeout};

fn alert_frame(ticker: &str) -> String {
    format!(
        r#"{{"alert": {{"ticker": "{}", "type": "volume_surge",
            "premium_flow": 1000000.0, "interpretation": "test"}}}}"#,
        ticker
    )
}

struct CollectingSink {
    alerts: Mutex<Vec<UnusualAlert>>,
}

impl CollectingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            alerts: Mutex::new(Vec::new()),
        })
    }

    fn count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

impl market_client::AlertSink for CollectingSink {
    fn on_alert(&self, alert: UnusualAlert) {
        self.alerts.lock().unwrap().push(alert);
    }
}

async fn wait_for<F: Fn() -> bool>(cond: F, limit: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < limit {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(20)).await;
    }
    cond()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alerts_forwarded_and_garbage_discarded() {
    let server = MockAlertServer::start(vec![
        "not json".to_string(),
        r#"{"ping": 1}"#.to_string(),
        alert_frame("NVDA"),
    ])
    .await;

    let shutdown = Arc::new(AtomicBool::new(true));
    let sink = CollectingSink::new();

    let task = spawn_alerts_listener(
        server.url(),
        Duration::from_secs(30),
        shutdown.clone(),
        sink.clone(),
    );

    assert!(
        wait_for(|| sink.count() == 1, Duration::from_secs(3)).await,
        "expected exactly the one well-formed alert"
    );
    assert_eq!(sink.alerts.lock().unwrap()[0].ticker, "NVDA");

    shutdown.store(false, Ordering::Release);
    timeout(Duration::from_secs(3), task).await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reconnect_waits_fixed_delay_after_close() {
    let delay = Duration::from_millis(500);
    let server = MockAlertServer::start(vec![alert_frame("AMD")]).await;

    let shutdown = Arc::new(AtomicBool::new(true));
    let sink = CollectingSink::new();

    let task = spawn_alerts_listener(server.url(), delay, shutdown.clone(), sink.clone());

    // Server closes after pushing one frame; the listener must come back,
    // but no sooner than the fixed delay.
    assert!(
        wait_for(|| server.accept_count() >= 2, Duration::from_secs(5)).await,
        "listener never reconnected"
    );

    let times = server.accept_times();
    let gap = times[1].duration_since(times[0]);
    assert!(
        gap >= delay - Duration::from_millis(50),
        "reconnected after {:?}, before the fixed delay {:?}",
        gap,
        delay
    );

    // Each connection replays the frame, so the sink keeps receiving
    assert!(wait_for(|| sink.count() >= 2, Duration::from_secs(3)).await);

    shutdown.store(false, Ordering::Release);
    timeout(Duration::from_secs(3), task).await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_pings_are_ponged() {
    let server = MockAlertServer::start_with_keepalive(vec![alert_frame("QQQ")]).await;

    let shutdown = Arc::new(AtomicBool::new(true));
    let sink = CollectingSink::new();

    let task = spawn_alerts_listener(
        server.url(),
        Duration::from_secs(30),
        shutdown.clone(),
        sink.clone(),
    );

    assert!(wait_for(|| sink.count() >= 1, Duration::from_secs(3)).await);
    // A keepalive-enforcing server must see its ping answered, otherwise
    // it drops the connection every interval and the listener churns.
    assert!(
        wait_for(|| server.pong_count() >= 1, Duration::from_secs(3)).await,
        "server ping was never answered"
    );

    shutdown.store(false, Ordering::Release);
    timeout(Duration::from_secs(3), task).await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_cancels_pending_reconnect() {
    // Long delay: teardown during the reconnect wait must not sit it out
    let delay = Duration::from_secs(30);
    let server = MockAlertServer::start(vec![alert_frame("SPY")]).await;

    let shutdown = Arc::new(AtomicBool::new(true));
    let sink = CollectingSink::new();

    let task = spawn_alerts_listener(server.url(), delay, shutdown.clone(), sink.clone());

    // Wait for the first connection to come and go
    assert!(wait_for(|| sink.count() >= 1, Duration::from_secs(3)).await);
    assert!(wait_for(|| server.accept_count() == 1, Duration::from_secs(1)).await);

    // The listener is now inside its 30s reconnect sleep
    sleep(Duration::from_millis(200)).await;
    shutdown.store(false, Ordering::Release);

    let start = Instant::now();
    timeout(Duration::from_secs(3), task).await.unwrap().unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(server.accept_count(), 1, "no reconnect after shutdown");
}
