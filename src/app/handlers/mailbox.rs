//! Mailbox completion handlers
//!
//! Each handler applies the typed result of one request kind. Completions may
//! arrive after the user has moved on, so messages are always matched by ID.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::state::{BaseScreen, Screen};
use crate::constants::{SESSION_RETRY_CEILING, SESSION_RETRY_STEP_MS};
use crate::event::Request;
use crate::mail::{MessageDetail, MessageSummary};

use super::super::App;
use super::super::actions::REFRESHING_STATUS;

impl App {
    pub(crate) fn handle_list_loaded(&mut self, messages: Vec<MessageSummary>) {
        tracing::debug!("Loaded {} messages", messages.len());

        if self.state.retry_count > 0 || self.state.status.message == REFRESHING_STATUS {
            self.state.set_status("");
        }
        self.state.messages = messages;
        self.state.retry_count = 0;
        self.state.status.clear_error();
        self.save_cache();
        self.state.recompute_view();
        self.state.status.loading = false;
    }

    pub(crate) fn handle_detail_loaded(&mut self, detail: Box<MessageDetail>) {
        let detail: Arc<MessageDetail> = Arc::from(detail);
        let id = detail.id().to_string();

        self.state.mark_seen(&id);
        self.state.details.insert(id.clone(), Arc::clone(&detail));
        self.state.retry_count = 0;
        self.state.status.loading = false;

        // Only the most recent Enter opens a screen, and only from the list
        if self.state.pending_open.as_deref() == Some(id.as_str()) {
            self.state.pending_open = None;
            if self.state.screen.is_list() {
                self.state.set_status("");
                self.show_detail(&detail);
            }
        }
    }

    pub(crate) fn handle_deleted(&mut self, id: String) {
        self.state.status.loading = false;
        self.state.details.remove(&id);
        self.state.remove_messages(std::slice::from_ref(&id));

        // The open message may sit under help or its own delete dialog
        if self.state.screen.base() == (BaseScreen::Detail { id: id.clone() }) {
            let under_help = matches!(self.state.screen, Screen::Help { .. });
            self.close_detail();
            if under_help {
                self.state.screen = Screen::Help {
                    back: BaseScreen::List,
                };
            }
        }

        self.state.set_status("Message deleted");
        self.save_cache();
    }

    pub(crate) fn handle_bulk_deleted(&mut self, ids: Vec<String>) {
        self.state.status.loading = false;
        for id in &ids {
            self.state.details.remove(id);
        }
        self.state.remove_messages(&ids);
        self.state.bulk_mode = false;

        let noun = if ids.len() == 1 { "message" } else { "messages" };
        self.state.set_status(format!("{} {} deleted", ids.len(), noun));
        self.save_cache();
    }

    pub(crate) fn handle_attachment_saved(&mut self, filename: String, path: PathBuf) {
        tracing::info!("Saved attachment {} to {}", filename, path.display());
        self.state
            .set_status(format!("Saved {} to {}", filename, path.display()));
    }

    pub(crate) fn handle_failure(&mut self, request: Request, error: String) {
        tracing::warn!("Failed to {}: {}", request.describe(), error);

        match request {
            Request::LoadDetail { ref id } if self.state.pending_open.as_ref() != Some(id) => {
                tracing::debug!("Ignoring failure for detail {} no longer requested", id);
            }
            r if r.is_read() => self.retry_read(r, error),
            r => {
                if r.affects_loading() {
                    self.state.status.loading = false;
                }
                self.report_mutation_failure(r, error);
            }
        }
    }

    fn report_mutation_failure(&mut self, request: Request, error: String) {
        match request {
            Request::DownloadAttachment { attachment, .. } => {
                self.state.set_error(format!(
                    "Failed to download {}: {}",
                    attachment.filename, error
                ));
            }
            Request::BulkDelete { .. } => {
                // Some deletions may have landed; the server list is authoritative
                self.state.set_error(format!("Failed to delete messages: {}", error));
                self.state.status.loading = true;
                self.mailbox.dispatch(Request::LoadList);
            }
            _ => self.state.set_error(format!("Failed to delete message: {}", error)),
        }
    }

    fn retry_read(&mut self, request: Request, error: String) {
        self.state.retry_count += 1;
        let attempt = self.state.retry_count;

        if attempt < SESSION_RETRY_CEILING {
            self.state.set_status(format!(
                "Error (retry {}/{}): {}",
                attempt, SESSION_RETRY_CEILING, error
            ));
            let delay = Duration::from_millis(SESSION_RETRY_STEP_MS * u64::from(attempt));
            self.mailbox.dispatch_after(request, delay);
            return;
        }

        self.state.status.loading = false;
        if matches!(request, Request::LoadDetail { .. }) {
            self.state.pending_open = None;
        }
        self.state.set_status("");
        self.state.status.set_persistent_error(format!(
            "Error after {} retries: {}",
            SESSION_RETRY_CEILING, error
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyCode;

    use crate::app::state::{BaseScreen, Screen};
    use crate::app::testing::Harness;
    use crate::event::{Event, Request};
    use crate::mail::MessageDetail;
    use crate::view::fixtures::{inbox, message};

    fn showing(h: &Harness, id: &str) -> bool {
        h.app.state.screen.detail_id() == Some(id)
    }

    fn detail(id: &str) -> Box<MessageDetail> {
        Box::new(MessageDetail {
            summary: message(id, "bob@example.test", "Subject", 0),
            text: "Body".to_string(),
            html: Vec::new(),
            attachments: Vec::new(),
        })
    }

    #[test]
    fn test_list_loaded_replaces_list_and_writes_cache() {
        let mut h = Harness::new();
        assert!(h.app.state.status.loading);

        h.app.handle_event(Event::ListLoaded(inbox()));

        assert!(!h.app.state.status.loading);
        assert_eq!(h.view_ids(), vec!["3", "2", "1"]);
        assert_eq!(h.app.cache.load().map(|m| m.len()), Some(3));
    }

    #[test]
    fn test_bulk_delete_scenario() {
        let mut h = Harness::with_inbox();

        h.key('v');
        h.key(' ');
        h.key('j');
        h.key('j');
        h.key(' ');
        h.key('d');
        assert!(matches!(h.app.state.screen, Screen::Confirm(_)));
        assert!(h.take_dispatches().is_empty());

        h.key('y');
        let dispatches = h.take_dispatches();
        assert_eq!(dispatches.len(), 1);
        let Request::BulkDelete { ids } = dispatches[0].request.clone() else {
            panic!("expected bulk delete, got {:?}", dispatches[0].request);
        };
        assert_eq!(ids, vec!["3".to_string(), "1".to_string()]);

        h.app.handle_event(Event::BulkDeleted { ids });

        assert_eq!(h.app.state.messages.len(), 1);
        assert!(h.app.state.selection.is_empty());
        assert!(!h.app.state.bulk_mode);
        let cached = h.app.cache.load().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, "2");
    }

    #[test]
    fn test_stale_delete_matched_by_id() {
        let mut h = Harness::with_inbox();
        h.app.handle_event(Event::DetailLoaded(detail("1")));
        let open = h.app.state.details["1"].clone();
        h.app.show_detail(&open);

        h.app.handle_event(Event::Deleted { id: "3".into() });

        assert!(showing(&h, "1"));
        assert_eq!(h.view_ids(), vec!["2", "1"]);
    }

    #[test]
    fn test_delete_of_open_message_returns_to_list() {
        let mut h = Harness::with_inbox();
        h.app.state.screen = Screen::Detail { id: "2".into() };

        h.app.handle_event(Event::Deleted { id: "2".into() });

        assert_eq!(h.app.state.screen, Screen::List);
        assert_eq!(h.app.state.status.message, "Message deleted");
        assert_eq!(h.app.cache.load().map(|m| m.len()), Some(2));
    }

    fn open(h: &mut Harness, id: &str) {
        h.app.state.pending_open = Some(id.to_string());
        h.app.handle_event(Event::DetailLoaded(detail(id)));
        assert!(showing(h, id));
    }

    #[test]
    fn test_delete_under_help_leaves_detail() {
        let mut h = Harness::with_inbox();
        open(&mut h, "2");
        h.key('d');
        h.key('y');
        assert_eq!(h.take_dispatches().len(), 1);
        h.key('?');

        h.app.handle_event(Event::Deleted { id: "2".into() });

        assert_eq!(
            h.app.state.screen,
            Screen::Help {
                back: BaseScreen::List
            }
        );
        assert!(h.app.state.detail_view.is_none());

        h.press(KeyCode::Esc);
        assert_eq!(h.app.state.screen, Screen::List);
        h.key('d');
        h.key('y');
        assert!(h.take_dispatches().is_empty());
    }

    #[test]
    fn test_delete_under_confirm_dialog_leaves_detail() {
        let mut h = Harness::with_inbox();
        open(&mut h, "2");
        h.key('d');
        assert!(matches!(h.app.state.screen, Screen::Confirm(_)));

        // An earlier delete of the same message lands while the dialog is up
        h.app.handle_event(Event::Deleted { id: "2".into() });
        assert_eq!(h.app.state.screen, Screen::List);
        assert!(h.app.state.detail_view.is_none());

        h.key('y');
        assert!(h.take_dispatches().is_empty());
        assert_eq!(h.view_ids(), vec!["3", "1"]);
    }

    #[test]
    fn test_read_failures_retry_until_ceiling() {
        let mut h = Harness::with_inbox();
        let fail = || Event::Failure {
            request: Request::LoadList,
            error: "status 500".into(),
        };

        h.app.handle_event(fail());
        h.app.handle_event(fail());
        let retries = h.take_dispatches();
        assert_eq!(retries.len(), 2);
        assert_eq!(retries[0].delay, Duration::from_secs(1));
        assert_eq!(retries[1].delay, Duration::from_secs(2));
        assert_eq!(h.app.state.status.message, "Error (retry 2/3): status 500");

        h.app.handle_event(fail());
        assert!(h.take_dispatches().is_empty());
        assert!(h.app.state.status.persistent);
        assert!(!h.app.state.status.loading);
        assert_eq!(
            h.app.state.status.error.as_deref(),
            Some("Error after 3 retries: status 500")
        );

        // Auto-refresh stays quiet until the user asks again
        h.app.handle_event(Event::Tick);
        assert!(h.take_dispatches().is_empty());

        h.key('r');
        assert_eq!(h.take_dispatches().len(), 1);
        assert_eq!(h.app.state.retry_count, 0);
        assert!(h.app.state.status.error.is_none());
    }

    #[test]
    fn test_mutation_failure_is_not_retried() {
        let mut h = Harness::with_inbox();
        h.app.state.status.loading = true;
        h.app.handle_event(Event::Failure {
            request: Request::Delete { id: "1".into() },
            error: "status 500".into(),
        });

        assert!(h.take_dispatches().is_empty());
        assert!(h.app.state.status.error.is_some());
        assert!(!h.app.state.status.loading);
        assert_eq!(h.app.state.messages.len(), 3);
    }

    #[test]
    fn test_bulk_failure_refetches_list() {
        let mut h = Harness::with_inbox();
        h.app.handle_event(Event::Failure {
            request: Request::BulkDelete {
                ids: vec!["1".into(), "2".into()],
            },
            error: "status 500".into(),
        });

        let dispatches = h.take_dispatches();
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].request, Request::LoadList);
        assert_eq!(h.app.state.messages.len(), 3);
    }

    #[test]
    fn test_open_fetches_then_serves_from_cache() {
        let mut h = Harness::with_inbox();

        h.press(KeyCode::Enter);
        let dispatches = h.take_dispatches();
        assert_eq!(
            dispatches[0].request,
            Request::LoadDetail { id: "3".into() }
        );
        assert!(h.app.state.status.loading);

        h.app.handle_event(Event::DetailLoaded(detail("3")));
        assert!(showing(&h, "3"));
        assert!(h.app.state.messages.iter().any(|m| m.id == "3" && m.seen));

        h.press(KeyCode::Esc);
        assert_eq!(h.app.state.screen, Screen::List);

        h.press(KeyCode::Enter);
        assert!(h.take_dispatches().is_empty());
        assert!(showing(&h, "3"));
    }

    #[test]
    fn test_superseded_detail_is_cached_but_not_shown() {
        let mut h = Harness::with_inbox();

        h.press(KeyCode::Enter);
        h.key('j');
        h.press(KeyCode::Enter);
        assert_eq!(h.take_dispatches().len(), 2);

        h.app.handle_event(Event::DetailLoaded(detail("3")));
        assert_eq!(h.app.state.screen, Screen::List);
        assert!(h.app.state.details.contains_key("3"));

        h.app.handle_event(Event::DetailLoaded(detail("2")));
        assert!(showing(&h, "2"));
    }

    #[test]
    fn test_download_failure_does_not_touch_loading() {
        let mut h = Harness::with_inbox();
        // A refresh is still running
        h.app.state.status.loading = true;
        h.app.handle_event(Event::Failure {
            request: Request::DownloadAttachment {
                message_id: "1".into(),
                attachment: crate::mail::Attachment {
                    id: "A".into(),
                    filename: "a.pdf".into(),
                    content_type: String::new(),
                    size: 0,
                    download_url: String::new(),
                },
            },
            error: "status 404".into(),
        });

        assert!(h.app.state.status.loading);
        assert_eq!(
            h.app.state.status.error.as_deref(),
            Some("Failed to download a.pdf: status 404")
        );
        assert!(h.take_dispatches().is_empty());
    }
}
