//! Main event loop and event dispatch

use anyhow::Result;
use crossterm::event::{self as term, Event as TermEvent};
use std::time::Duration;

use crate::constants::{POLL_BUSY_MS, POLL_IDLE_MS};
use crate::event::Event;
use crate::input::{InputResult, handle_input};

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Process completions FIRST (non-blocking) - prioritize responsiveness
            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event);
                self.dirty = true;
            }

            if self.quit {
                break;
            }

            // Clear expired errors
            if self.state.clear_error_if_expired() {
                self.dirty = true;
            }

            // Render when dirty, and continuously while the spinner is visible
            if (self.dirty || self.state.status.loading)
                && render_thread.render(self.state.clone())
            {
                self.dirty = false;
            }

            // Handle input (adaptive timeout: faster while loading)
            let poll_timeout = if self.state.status.loading {
                POLL_BUSY_MS
            } else {
                POLL_IDLE_MS
            };
            if term::poll(Duration::from_millis(poll_timeout))? {
                match term::read()? {
                    TermEvent::Key(key) => self.handle_event(Event::Key(key)),
                    TermEvent::Resize(width, height) => {
                        self.handle_event(Event::Resize { width, height })
                    }
                    _ => {}
                }
                // Any input event (including resize) requires re-render
                self.dirty = true;
            }

            if self.quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one event to the session state.
    ///
    /// Never fails: every error is recorded in the status state instead.
    pub(crate) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match handle_input(key, &self.state, &self.bindings) {
                InputResult::Action(action) => {
                    self.state.acknowledge_error();
                    self.handle_action(action);
                }
                InputResult::Char(c) => {
                    self.state.acknowledge_error();
                    self.handle_char(c);
                }
                InputResult::Backspace => {
                    self.state.acknowledge_error();
                    self.handle_backspace();
                }
                InputResult::Continue => {}
            },
            Event::Resize { width, height } => self.handle_resize(width, height),
            Event::Tick => self.handle_tick(),
            Event::ListLoaded(messages) => self.handle_list_loaded(messages),
            Event::DetailLoaded(detail) => self.handle_detail_loaded(detail),
            Event::Deleted { id } => self.handle_deleted(id),
            Event::BulkDeleted { ids } => self.handle_bulk_deleted(ids),
            Event::AttachmentSaved { filename, path } => {
                self.handle_attachment_saved(filename, path)
            }
            Event::Notice(message) => self.state.set_status(message),
            Event::SideEffectFailed(error) => self.state.set_error(error),
            Event::Failure { request, error } => self.handle_failure(request, error),
        }
    }
}
