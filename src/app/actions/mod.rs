//! Action handlers for user input
//!
//! This module is split into focused submodules:
//! - `navigation`: Cursor movement, scrolling and screen changes
//! - `message`: List operations (open, refresh, sort, bulk selection, delete)
//! - `search`: Live filter input
//! - `confirm`: The yes/no gate in front of quit and deletions
//! - `attachment`: Attachment downloads
//! - `external`: Clipboard and browser

mod attachment;
mod confirm;
mod external;
mod message;
mod navigation;
mod search;

use crate::input::Action;

use super::App;

pub(crate) const REFRESHING_STATUS: &str = "Refreshing...";

impl App {
    pub(crate) fn handle_action(&mut self, action: Action) {
        match action {
            // Navigation
            Action::Up => self.move_by(-1),
            Action::Down => self.move_by(1),
            Action::Top => self.move_to_top(),
            Action::Bottom => self.move_to_bottom(),
            Action::PageUp => self.move_page(-1),
            Action::PageDown => self.move_page(1),
            Action::Back => self.go_back(),
            Action::Help => self.open_help(),

            // Messages
            Action::Open => self.open_selected(),
            Action::Refresh => self.refresh(),
            Action::ToggleAutoRefresh => self.toggle_auto_refresh(),
            Action::CycleSort => self.cycle_sort(),
            Action::ToggleBulk => self.toggle_bulk(),
            Action::ToggleSelect => self.toggle_select(),
            Action::Delete => self.request_delete(),
            Action::Quit => self.request_quit(),

            // Search
            Action::Search => self.start_search(),
            Action::SubmitSearch => self.submit_search(),
            Action::CancelSearch => self.cancel_search(),

            // Confirmation
            Action::ConfirmYes => self.confirm_yes(),
            Action::ConfirmNo => self.confirm_no(),

            // Side effects
            Action::Copy => self.copy_to_clipboard(),
            Action::OpenInBrowser => self.open_in_browser(),
            Action::Download(index) => self.download_attachment(usize::from(index)),
            Action::DownloadAll => self.download_all_attachments(),
        }
    }

    pub(crate) fn handle_char(&mut self, c: char) {
        if self.state.search.active {
            self.state.search.query.push(c);
            self.state.recompute_view();
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        if self.state.search.active && self.state.search.query.pop().is_some() {
            self.state.recompute_view();
        }
    }
}
