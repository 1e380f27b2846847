//! Message list operations

use crate::app::state::{ConfirmAction, Screen};
use crate::event::Request;
use crate::view::truncate;

use super::super::App;
use super::REFRESHING_STATUS;

impl App {
    /// Open the cursor row: served from the detail cache when possible
    pub(crate) fn open_selected(&mut self) {
        if !self.state.screen.is_list() {
            return;
        }
        let Some(id) = self.state.cursor_message().map(|m| m.id.clone()) else {
            return;
        };

        if let Some(detail) = self.state.details.get(&id).cloned() {
            self.state.mark_seen(&id);
            self.show_detail(&detail);
            return;
        }

        self.state.pending_open = Some(id.clone());
        self.state.status.loading = true;
        self.mailbox.dispatch(Request::LoadDetail { id });
    }

    /// Explicit refresh; also the only way out of a persistent error
    pub(crate) fn refresh(&mut self) {
        if !self.state.screen.is_list() {
            return;
        }
        self.state.retry_count = 0;
        self.state.status.clear_error();
        self.state.status.loading = true;
        self.state.set_status(REFRESHING_STATUS);
        self.mailbox.dispatch(Request::LoadList);
    }

    pub(crate) fn toggle_auto_refresh(&mut self) {
        if !self.state.screen.is_list() {
            return;
        }
        self.state.auto_refresh = !self.state.auto_refresh;
        let msg = if self.state.auto_refresh {
            format!(
                "Auto-refresh enabled (every {}s)",
                self.config.refresh.interval().as_secs()
            )
        } else {
            "Auto-refresh disabled".to_string()
        };
        self.state.set_status(msg);
    }

    pub(crate) fn cycle_sort(&mut self) {
        if !self.state.screen.is_list() {
            return;
        }
        self.state.sort = self.state.sort.next();
        self.state.recompute_view();
        self.state
            .set_status(format!("Sorted by: {}", self.state.sort.title()));
    }

    pub(crate) fn toggle_bulk(&mut self) {
        if !self.state.screen.is_list() {
            return;
        }
        self.state.bulk_mode = !self.state.bulk_mode;
        if !self.state.bulk_mode {
            self.state.selection.clear();
        }
        let mode = if self.state.bulk_mode { "on" } else { "off" };
        self.state.set_status(format!("Bulk mode: {}", mode));
    }

    pub(crate) fn toggle_select(&mut self) {
        if self.state.screen.is_list() && self.state.bulk_mode {
            self.state.toggle_selection();
        }
    }

    /// Route a delete through the confirmation gate.
    ///
    /// Bulk deletes capture IDs now; view positions may shift before the
    /// dialog is answered.
    pub(crate) fn request_delete(&mut self) {
        match &self.state.screen {
            Screen::Detail { id } => {
                let id = id.clone();
                let subject = self
                    .state
                    .details
                    .get(&id)
                    .map(|d| d.summary.subject.clone())
                    .unwrap_or_default();
                self.request_confirmation(
                    ConfirmAction::DeleteSingle { id },
                    format!("delete message '{}'", truncate(&subject, 30)),
                );
            }
            Screen::List if self.state.bulk_mode => {
                let ids = self.state.selected_ids();
                if ids.is_empty() {
                    self.state.set_status("No messages selected");
                    return;
                }
                let noun = if ids.len() == 1 { "message" } else { "messages" };
                let description = format!("delete {} selected {}", ids.len(), noun);
                self.request_confirmation(ConfirmAction::DeleteBulk { ids }, description);
            }
            Screen::List => {
                self.state
                    .set_status("Press v for bulk mode to select messages to delete");
            }
            _ => {}
        }
    }

    /// Quitting from the list asks first; everywhere else exits at once
    pub(crate) fn request_quit(&mut self) {
        if self.state.screen.is_list() {
            self.request_confirmation(ConfirmAction::Quit, "quit".to_string());
        } else {
            self.quit = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::app::state::Screen;
    use crate::app::testing::Harness;
    use crate::event::Request;
    use crate::view::SortMode;

    #[test]
    fn test_cycle_sort_resorts_immediately() {
        let mut h = Harness::with_inbox();
        assert_eq!(h.view_ids(), vec!["3", "2", "1"]);

        h.key('s');
        assert_eq!(h.app.state.sort, SortMode::Sender);
        // Raw byte order: uppercase sorts first
        assert_eq!(h.view_ids(), vec!["2", "3", "1"]);
        assert_eq!(h.app.state.status.message, "Sorted by: Sender");

        h.key('s');
        h.key('s');
        assert_eq!(h.app.state.sort, SortMode::Date);
    }

    #[test]
    fn test_leaving_bulk_mode_clears_selection() {
        let mut h = Harness::with_inbox();
        h.key(' ');
        assert!(h.app.state.selection.is_empty());

        h.key('v');
        h.key(' ');
        assert_eq!(h.app.state.selection.len(), 1);

        h.key('v');
        assert!(!h.app.state.bulk_mode);
        assert!(h.app.state.selection.is_empty());
    }

    #[test]
    fn test_delete_outside_bulk_mode_does_nothing() {
        let mut h = Harness::with_inbox();
        h.key('d');
        assert_eq!(h.app.state.screen, Screen::List);

        h.key('v');
        h.key('d');
        assert_eq!(h.app.state.screen, Screen::List);
        assert!(h.take_dispatches().is_empty());
    }

    #[test]
    fn test_refresh_only_from_list() {
        let mut h = Harness::with_inbox();
        h.app.state.screen = Screen::Detail { id: "1".into() };
        h.key('r');
        assert!(h.take_dispatches().is_empty());

        h.press(KeyCode::Esc);
        h.key('r');
        let dispatches = h.take_dispatches();
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].request, Request::LoadList);
        assert_eq!(h.app.state.status.message, "Refreshing...");
    }

    #[test]
    fn test_quit_from_detail_is_immediate() {
        let mut h = Harness::with_inbox();
        h.app.state.screen = Screen::Detail { id: "1".into() };
        h.key('q');
        assert!(h.app.quit);
    }
}
