//! Clipboard and browser side effects

use std::time::Duration;

use crate::app::state::Screen;
use crate::constants::HTML_FILE_CLEANUP_SECS;
use crate::event::Event;

use super::super::App;

impl App {
    /// Sender address in the list, message body in the detail screen
    pub(crate) fn copy_to_clipboard(&mut self) {
        let (text, what) = match &self.state.screen {
            Screen::List => match self.state.cursor_message() {
                Some(message) => (message.sender().to_string(), "Email"),
                None => return,
            },
            Screen::Detail { .. } => match &self.state.detail_view {
                Some(view) => (view.body.clone(), "Message"),
                None => return,
            },
            _ => return,
        };

        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.state.set_status(format!("{} copied to clipboard", what)),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.state.set_error(format!("Clipboard unavailable: {}", e));
            }
        }
    }

    /// Write the HTML body to a temp file and hand it to the OS browser.
    /// The file is removed after a grace period or on shutdown.
    pub(crate) fn open_in_browser(&mut self) {
        let Some(detail) = self.state.open_detail().cloned() else {
            return;
        };
        if !detail.has_html() {
            self.state.set_status("No HTML content to open");
            return;
        }

        let path = std::env::temp_dir().join(format!("burnmail-{}.html", detail.id()));
        let html = detail.html_document();
        let events = self.events_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            if let Err(e) = tokio::fs::write(&path, html).await {
                let _ = events.send(Event::SideEffectFailed(format!(
                    "Failed to write HTML file: {}",
                    e
                )));
                return;
            }

            let target = path.clone();
            match tokio::task::spawn_blocking(move || open::that(&target)).await {
                Ok(Ok(())) => {
                    let _ = events.send(Event::Notice("Opened HTML in browser".to_string()));
                }
                Ok(Err(e)) => {
                    let _ = events.send(Event::SideEffectFailed(format!(
                        "Failed to open browser: {}",
                        e
                    )));
                }
                Err(e) => tracing::warn!("Browser launch task failed: {}", e),
            }

            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_secs(HTML_FILE_CLEANUP_SECS)) => {}
            }
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::debug!("Failed to remove {}: {}", path.display(), e);
            }
        });

        self.state.set_status("Opening in browser...");
    }
}
