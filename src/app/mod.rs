//! Application core - owns the session state and coordinates input, timers and
//! mailbox completions

mod actions;
mod event_loop;
mod handlers;
pub mod render_thread;
pub mod state;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use render_thread::RenderThread;

use crate::actor::{MailboxHandle, RetryConfig, mailbox, spawn_mailbox_actor};
use crate::cache::CacheStore;
use crate::config::Config;
use crate::event::{Event, Request};
use crate::input::KeyBindings;
use crate::mail::MailboxClient;
use crate::ui::Theme;
use state::{DateFormats, SessionState};

pub struct App {
    pub(crate) config: Config,
    pub(crate) state: SessionState,
    pub(crate) bindings: KeyBindings,
    pub(crate) mailbox: MailboxHandle,
    pub(crate) cache: CacheStore,
    pub(crate) theme: Theme,
    /// Sender half handed to detached side effects (browser, ticker)
    pub(crate) events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    /// Fired on shutdown; stops the actor, the ticker and pending backoffs
    pub(crate) cancel: CancellationToken,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
    pub(crate) quit: bool,
}

impl App {
    /// Build the controller and spawn its mailbox actor.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: Config, address: String, client: Arc<dyn MailboxClient>) -> Result<Self> {
        let cache = if config.cache.enabled {
            CacheStore::new(Config::cache_path()?, config.cache.expiry())
        } else {
            CacheStore::disabled()
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let mailbox = spawn_mailbox_actor(
            client,
            RetryConfig::default(),
            mailbox::downloads_dir(),
            cancel.clone(),
            events_tx.clone(),
        );

        Ok(Self::from_parts(
            config, address, mailbox, cache, events_tx, events_rx, cancel,
        ))
    }

    fn from_parts(
        config: Config,
        address: String,
        mailbox: MailboxHandle,
        cache: CacheStore,
        events_tx: mpsc::UnboundedSender<Event>,
        events_rx: mpsc::UnboundedReceiver<Event>,
        cancel: CancellationToken,
    ) -> Self {
        let formats = DateFormats {
            list: config.ui.list_date_format.clone(),
            detail: config.ui.detail_date_format.clone(),
        };
        let mut state = SessionState::new(address, formats, config.ui.auto_refresh);

        // Seed from the snapshot so the first frame is not empty; still loading
        if let Some(messages) = cache.load() {
            tracing::debug!("Seeded {} messages from cache", messages.len());
            state.messages = messages;
            state.recompute_view();
        }

        Self {
            theme: Theme::new(config.ui.theme),
            config,
            state,
            bindings: KeyBindings::new(),
            mailbox,
            cache,
            events_tx,
            events_rx,
            cancel,
            dirty: true, // Start dirty for initial render
            quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn(self.theme)?;

        if let Ok((width, height)) = crossterm::terminal::size() {
            self.state.set_viewport(width, height);
        }

        self.state.set_status("Loading messages...");
        self.mailbox.dispatch(Request::LoadList);
        self.spawn_ticker();

        let result = self.event_loop(&render_thread).await;

        // Stop the actor, ticker and any browser cleanup timers
        self.cancel.cancel();

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        result
    }

    /// Perpetual auto-refresh timer; the controller decides whether a tick
    /// actually refreshes.
    fn spawn_ticker(&self) {
        let period = self.config.refresh.interval();
        let events = self.events_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if events.send(Event::Tick).is_err() {
                            tracing::warn!("Refresh ticker: event receiver dropped");
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Best-effort snapshot of the current list
    pub(crate) fn save_cache(&self) {
        self.cache.save(&self.state.messages);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::App;
    use crate::actor::MailboxHandle;
    use crate::actor::mailbox::Dispatch;
    use crate::cache::CacheStore;
    use crate::config::Config;
    use crate::event::Event;
    use crate::view::fixtures::inbox;

    /// Controller wired to a detached mailbox and a temporary cache file
    pub(crate) struct Harness {
        pub app: App,
        dispatches: mpsc::UnboundedReceiver<Dispatch>,
        _dir: TempDir,
    }

    impl Harness {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let cache = CacheStore::new(dir.path().join("inbox.json"), Duration::from_secs(300));
            let (mailbox, dispatches) = MailboxHandle::detached();
            let (events_tx, events_rx) = mpsc::unbounded_channel();

            let app = App::from_parts(
                Config::default(),
                "me@example.test".to_string(),
                mailbox,
                cache,
                events_tx,
                events_rx,
                CancellationToken::new(),
            );

            Self {
                app,
                dispatches,
                _dir: dir,
            }
        }

        /// Three-message inbox, loaded and idle
        pub fn with_inbox() -> Self {
            let mut harness = Self::new();
            harness.app.handle_event(Event::ListLoaded(inbox()));
            harness.take_dispatches();
            harness
        }

        pub fn take_dispatches(&mut self) -> Vec<Dispatch> {
            let mut out = Vec::new();
            while let Ok(dispatch) = self.dispatches.try_recv() {
                out.push(dispatch);
            }
            out
        }

        pub fn press(&mut self, code: KeyCode) {
            self.app
                .handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
        }

        pub fn key(&mut self, c: char) {
            self.press(KeyCode::Char(c));
        }

        pub fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.key(c);
            }
        }

        /// IDs in view order
        pub fn view_ids(&self) -> Vec<String> {
            let state = &self.app.state;
            state
                .view
                .iter()
                .map(|&i| state.messages[i].id.clone())
                .collect()
        }
    }
}
