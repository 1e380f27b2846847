//! Confirmation gate for quit and deletions

use crate::app::state::{ConfirmAction, Confirmation, Screen};
use crate::event::Request;

use super::super::App;

impl App {
    /// Show the dialog. A second request while one is pending is ignored.
    pub(crate) fn request_confirmation(&mut self, action: ConfirmAction, description: String) {
        if matches!(self.state.screen, Screen::Confirm(_)) {
            return;
        }
        self.state.screen = Screen::Confirm(Confirmation {
            action,
            description,
            back: self.state.screen.base(),
        });
    }

    /// Consume the pending confirmation, returning to the screen behind it
    fn take_confirmation(&mut self) -> Option<Confirmation> {
        match std::mem::take(&mut self.state.screen) {
            Screen::Confirm(confirmation) => {
                self.state.screen = Screen::from(confirmation.back.clone());
                Some(confirmation)
            }
            other => {
                self.state.screen = other;
                None
            }
        }
    }

    pub(crate) fn confirm_yes(&mut self) {
        let Some(confirmation) = self.take_confirmation() else {
            return;
        };

        match confirmation.action {
            ConfirmAction::Quit => self.quit = true,
            ConfirmAction::DeleteSingle { id } => {
                self.state.status.loading = true;
                self.state.set_status("Deleting message...");
                self.mailbox.dispatch(Request::Delete { id });
            }
            ConfirmAction::DeleteBulk { ids } => {
                self.state.status.loading = true;
                self.state
                    .set_status(format!("Deleting {} messages...", ids.len()));
                self.mailbox.dispatch(Request::BulkDelete { ids });
            }
        }
    }

    pub(crate) fn confirm_no(&mut self) {
        self.take_confirmation();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::app::state::{ConfirmAction, Screen};
    use crate::app::testing::Harness;
    use crate::event::{Event, Request};
    use crate::mail::MessageDetail;
    use crate::view::fixtures::message;

    fn open_detail(h: &mut Harness, id: &str) {
        let detail = MessageDetail {
            summary: message(id, "carol@shop.test", "Your invoice", 5),
            text: "Amount due".to_string(),
            html: Vec::new(),
            attachments: Vec::new(),
        };
        h.app.state.pending_open = Some(id.to_string());
        h.app.handle_event(Event::DetailLoaded(Box::new(detail)));
        assert_eq!(h.app.state.screen, Screen::Detail { id: id.into() });
    }

    #[test]
    fn test_decline_then_accept_single_delete() {
        let mut h = Harness::with_inbox();
        open_detail(&mut h, "2");

        h.key('d');
        let Screen::Confirm(confirmation) = &h.app.state.screen else {
            panic!("expected confirmation");
        };
        assert_eq!(confirmation.description, "delete message 'Your invoice'");
        assert_eq!(
            confirmation.action,
            ConfirmAction::DeleteSingle { id: "2".into() }
        );

        h.key('n');
        assert_eq!(h.app.state.screen, Screen::Detail { id: "2".into() });
        assert!(h.take_dispatches().is_empty());
        assert_eq!(h.app.state.messages.len(), 3);

        h.key('d');
        h.key('y');
        let dispatches = h.take_dispatches();
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].request, Request::Delete { id: "2".into() });

        h.app.handle_event(Event::Deleted { id: "2".into() });
        assert_eq!(h.app.state.screen, Screen::List);
        assert_eq!(h.view_ids(), vec!["3", "1"]);
    }

    #[test]
    fn test_escape_declines() {
        let mut h = Harness::with_inbox();
        h.key('q');
        assert!(matches!(h.app.state.screen, Screen::Confirm(_)));

        h.press(KeyCode::Esc);
        assert_eq!(h.app.state.screen, Screen::List);
        assert!(!h.app.quit);
    }

    #[test]
    fn test_quit_requires_yes() {
        let mut h = Harness::with_inbox();
        h.key('q');
        h.key('j');
        assert!(!h.app.quit);
        h.key('y');
        assert!(h.app.quit);
    }

    #[test]
    fn test_confirmation_consumed_once() {
        let mut h = Harness::with_inbox();
        h.key('v');
        h.key(' ');
        h.key('d');
        h.key('y');
        h.key('y');
        assert_eq!(h.take_dispatches().len(), 1);
    }

    #[test]
    fn test_bulk_ids_captured_when_dialog_opens() {
        let mut h = Harness::with_inbox();
        h.key('v');
        h.key(' ');
        h.key('d');

        // A refresh lands while the dialog is open and reorders the list
        let mut messages = crate::view::fixtures::inbox();
        messages.reverse();
        h.app.handle_event(Event::ListLoaded(messages));

        h.key('y');
        let dispatches = h.take_dispatches();
        assert_eq!(
            dispatches[0].request,
            Request::BulkDelete {
                ids: vec!["3".into()]
            }
        );
    }
}
