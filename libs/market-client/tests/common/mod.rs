//! Common test utilities for market-client integration tests

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// A mock alert push server: every accepted connection gets the configured
/// frames, then the server closes the socket. Accept times are recorded so
/// tests can measure reconnection spacing. With keepalive enabled the
/// server pings after the frames and counts the pongs it gets back.
pub struct MockAlertServer {
    pub addr: SocketAddr,
    accepts: Arc<Mutex<Vec<Instant>>>,
    pongs: Arc<AtomicUsize>,
}

impl MockAlertServer {
    pub async fn start(frames: Vec<String>) -> Self {
        Self::start_inner(frames, false).await
    }

    pub async fn start_with_keepalive(frames: Vec<String>) -> Self {
        Self::start_inner(frames, true).await
    }

    async fn start_inner(frames: Vec<String>, keepalive: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        let accepts_clone = accepts.clone();
        let pongs = Arc::new(AtomicUsize::new(0));
        let pongs_clone = pongs.clone();

        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        accepts_clone.lock().unwrap().push(Instant::now());
                        let frames = frames.clone();
                        let pongs = pongs_clone.clone();
                        tokio::spawn(async move {
                            Self::handle_connection(stream, frames, keepalive, pongs).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("Accept error: {}", e);
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            accepts,
            pongs,
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        frames: Vec<String>,
        keepalive: bool,
        pongs: Arc<AtomicUsize>,
    ) {
        let mut ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        for frame in frames {
            if ws_stream.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }

        if keepalive {
            if ws_stream.send(Message::Ping(vec![0xAB])).await.is_err() {
                return;
            }
            let answered = tokio::time::timeout(Duration::from_secs(2), async {
                while let Some(Ok(msg)) = ws_stream.next().await {
                    if matches!(msg, Message::Pong(_)) {
                        return true;
                    }
                }
                false
            })
            .await
            .unwrap_or(false);
            if answered {
                pongs.fetch_add(1, Ordering::SeqCst);
            }
        }

        let _ = ws_stream.send(Message::Close(None)).await;
        let _ = ws_stream.close(None).await;
    }

    pub fn url(&self) -> String {
        format!("ws://{}/ws/alerts", self.addr)
    }

    pub fn accept_count(&self) -> usize {
        self.accepts.lock().unwrap().len()
    }

    pub fn accept_times(&self) -> Vec<Instant> {
        self.accepts.lock().unwrap().clone()
    }

    pub fn pong_count(&self) -> usize {
        self.pongs.load(Ordering::SeqCst)
    }
}
