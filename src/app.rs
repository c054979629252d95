//! Main application state and event handling for the terminal dashboard

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use market_client::{spawn_alerts_listener, RestClient, UnusualAlert};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::DashboardConfig;
use crate::store::{Store, View};

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a ticker symbol after `/`
    TickerSearch,
    /// Typing a chat message
    ChatInput,
}

/// Top-level application: store handle, input state, background tasks
pub struct App {
    pub store: Arc<Store>,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub should_quit: bool,
    shutdown_flag: Arc<AtomicBool>,
    alerts_task: Option<JoinHandle<()>>,
    runtime: Handle,
}

impl App {
    /// Wire up the store, kick off the initial loads, and start the alert
    /// listener.
    pub fn initialize(runtime: Handle, config: DashboardConfig) -> Result<Self> {
        // true = keep running, false = shutdown requested
        let shutdown_flag = Arc::new(AtomicBool::new(true));

        let client = RestClient::with_base_url(&config.api_base_url);
        let ws_url = client.ws_alerts_url();

        let store = Arc::new(Store::new(Arc::new(client), &config, runtime.clone()));

        // Initial loads: watchlist for the dashboard, account snapshot for
        // the header. Both best-effort.
        {
            let store = Arc::clone(&store);
            runtime.spawn(async move {
                tokio::join!(store.load_watchlist(), store.fetch_account());
            });
        }

        let alerts_task = {
            let sink_store = Arc::clone(&store);
            let _guard = runtime.enter();
            spawn_alerts_listener(
                ws_url,
                Duration::from_secs(config.reconnect_delay_secs),
                Arc::clone(&shutdown_flag),
                Arc::new(move |alert: UnusualAlert| sink_store.on_alert(alert)),
            )
        };

        Ok(Self {
            store,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            should_quit: false,
            shutdown_flag,
            alerts_task: Some(alerts_task),
            runtime,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::TickerSearch => self.handle_search_key(key),
            InputMode::ChatInput => self.handle_chat_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(view) = View::from_digit(c) {
                    self.switch_view(view);
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::TickerSearch;
                self.input_buffer.clear();
            }
            KeyCode::Char('i') => {
                if self.store.snapshot().active_view == View::Chat {
                    self.input_mode = InputMode::ChatInput;
                    self.input_buffer.clear();
                }
            }
            KeyCode::Char('s') => {
                let store = Arc::clone(&self.store);
                self.store.set_active_view(View::Scanner);
                self.runtime.spawn(async move { store.fetch_scanner().await });
            }
            KeyCode::Char('r') => {
                self.refresh_current_view();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                let symbol = self.input_buffer.trim().to_string();
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                if !symbol.is_empty() {
                    let store = Arc::clone(&self.store);
                    self.runtime
                        .spawn(async move { store.select_ticker(&symbol).await });
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '.' || c == '-' => {
                self.input_buffer.push(c.to_ascii_uppercase());
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                let message = self.input_buffer.trim().to_string();
                self.input_buffer.clear();
                if !message.is_empty() {
                    let store = Arc::clone(&self.store);
                    self.runtime
                        .spawn(async move { store.send_chat(&message).await });
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            _ => {}
        }
    }

    fn switch_view(&mut self, view: View) {
        self.store.set_active_view(view);

        let snapshot = self.store.snapshot();
        let store = Arc::clone(&self.store);
        match view {
            View::Analysis => {
                // First visit for this ticker: hydrate the panels
                if snapshot.technical.is_none() && !snapshot.technical_loading {
                    let ticker = snapshot.selected_ticker.clone();
                    self.runtime
                        .spawn(async move { store.select_ticker(&ticker).await });
                } else if snapshot.chain.is_none() && !snapshot.chain_loading {
                    let ticker = snapshot.selected_ticker.clone();
                    self.runtime
                        .spawn(async move { store.fetch_chain(&ticker).await });
                }
            }
            View::Account => {
                self.runtime.spawn(async move {
                    tokio::join!(store.fetch_account(), store.fetch_positions());
                });
            }
            _ => {}
        }
    }

    fn refresh_current_view(&mut self) {
        let snapshot = self.store.snapshot();
        let store = Arc::clone(&self.store);

        match snapshot.active_view {
            View::Dashboard => {
                self.runtime.spawn(async move { store.load_watchlist().await });
            }
            View::Analysis => {
                let ticker = snapshot.selected_ticker.clone();
                self.runtime.spawn(async move {
                    store.select_ticker(&ticker).await;
                    store.fetch_chain(&ticker).await;
                });
            }
            View::Scanner => {
                self.runtime.spawn(async move { store.fetch_scanner().await });
            }
            View::Account => {
                self.runtime.spawn(async move {
                    tokio::join!(store.fetch_account(), store.fetch_positions());
                });
            }
            View::Chat => {}
        }
    }

    /// Stop background tasks. Flipping the flag ends the alert listener's
    /// read loop and cancels any pending reconnect delay.
    pub fn shutdown(&mut self) {
        info!("Shutting down");
        self.shutdown_flag.store(false, Ordering::Release);

        if let Some(task) = self.alerts_task.take() {
            let _ = self.runtime.block_on(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn test_app() -> (App, tokio::runtime::Runtime) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let app = App::initialize(runtime.handle().clone(), DashboardConfig::default()).unwrap();
        (app, runtime)
    }

    #[test]
    fn test_digit_switches_view() {
        let (mut app, _rt) = test_app();
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.store.snapshot().active_view, View::Scanner);
        app.handle_key(key(KeyCode::Char('5')));
        assert_eq!(app.store.snapshot().active_view, View::Chat);
    }

    #[test]
    fn test_digits_ignored_in_search_mode() {
        let (mut app, _rt) = test_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::TickerSearch);
        app.handle_key(key(KeyCode::Char('3')));
        // Digit went into the buffer, not the view switcher
        assert_eq!(app.input_buffer, "3");
        assert_eq!(app.store.snapshot().active_view, View::Dashboard);
    }

    #[test]
    fn test_search_input_uppercases_and_escapes() {
        let (mut app, _rt) = test_app();
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('v')));
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.input_buffer, "NVDA");

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn test_quit_key() {
        let (mut app, _rt) = test_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
