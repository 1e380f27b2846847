//! Session state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::constants::ERROR_TTL_SECS;
use crate::mail::{MessageDetail, MessageSummary};
use crate::view::{self, ColumnLayout, DetailView, SortMode};

/// Screens a help page or confirmation dialog can return to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseScreen {
    List,
    Detail { id: String },
}

/// Irreversible or session-ending actions gated behind a confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Quit,
    DeleteSingle { id: String },
    /// IDs captured from the selection when the dialog opened
    DeleteBulk { ids: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub action: ConfirmAction,
    /// Completes "Are you sure you want to ...?"
    pub description: String,
    pub back: BaseScreen,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    List,
    Detail {
        id: String,
    },
    Help {
        back: BaseScreen,
    },
    Confirm(Confirmation),
}

impl From<BaseScreen> for Screen {
    fn from(base: BaseScreen) -> Self {
        match base {
            BaseScreen::List => Screen::List,
            BaseScreen::Detail { id } => Screen::Detail { id },
        }
    }
}

impl Screen {
    /// The list or detail screen underneath any overlay
    pub fn base(&self) -> BaseScreen {
        match self {
            Screen::List => BaseScreen::List,
            Screen::Detail { id } => BaseScreen::Detail { id: id.clone() },
            Screen::Help { back } => back.clone(),
            Screen::Confirm(confirmation) => confirmation.back.clone(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Screen::List)
    }

    pub fn detail_id(&self) -> Option<&str> {
        match self {
            Screen::Detail { id } => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Search field has focus and captures keystrokes
    pub active: bool,
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub loading: bool,
    pub error: Option<String>,
    pub error_time: Option<std::time::Instant>,
    /// Persistent errors survive the TTL and stay until the next refresh
    pub persistent: bool,
    pub message: String,
    /// Persists after error bar expires - shown as indicator in status bar
    pub has_unacknowledged_error: bool,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(std::time::Instant::now());
        self.persistent = false;
        self.has_unacknowledged_error = true;
    }

    pub fn set_persistent_error(&mut self, error: impl ToString) {
        self.set_error(error);
        self.persistent = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
        self.persistent = false;
    }

    /// Acknowledge the error indicator (clear the persistent flag)
    /// Call this on user input to dismiss the status bar indicator
    pub fn acknowledge_error(&mut self) {
        self.has_unacknowledged_error = false;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if self.persistent {
            return false;
        }
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
    }
}

/// Terminal geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
        }
    }
}

impl Viewport {
    /// Rows available to the message table or detail body
    pub fn body_height(&self) -> usize {
        (self.height as usize).saturating_sub(10).max(5)
    }

    /// Wrap width for converted HTML bodies
    pub fn text_width(&self) -> usize {
        (self.width as usize).saturating_sub(4).max(20)
    }
}

#[derive(Debug, Clone)]
pub struct DateFormats {
    pub list: String,
    pub detail: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            list: "%d/%m %H:%M".to_string(),
            detail: "%d/%m/%Y %H:%M:%S".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Mailbox address shown in the title
    pub address: String,

    /// Full message list, replaced wholesale on refresh
    pub messages: Vec<MessageSummary>,
    /// Filtered/sorted view: positions into `messages`
    pub view: Vec<usize>,
    /// Positions in `view` marked for bulk deletion
    pub selection: BTreeSet<usize>,
    /// Cursor position in `view`
    pub cursor: usize,

    /// Details fetched this session, never evicted
    pub details: HashMap<String, Arc<MessageDetail>>,
    /// Formatted content of the open detail screen
    pub detail_view: Option<Arc<DetailView>>,
    pub detail_scroll: u16,
    /// Detail requested with Enter and not yet shown
    pub pending_open: Option<String>,

    pub screen: Screen,
    pub search: SearchState,
    pub sort: SortMode,
    pub auto_refresh: bool,
    pub bulk_mode: bool,

    pub status: StatusState,
    /// Consecutive failed reads
    pub retry_count: u32,

    pub viewport: Viewport,
    pub layout: ColumnLayout,
    pub formats: DateFormats,
}

impl SessionState {
    pub fn new(address: impl Into<String>, formats: DateFormats, auto_refresh: bool) -> Self {
        Self {
            address: address.into(),
            formats,
            auto_refresh,
            status: StatusState {
                loading: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Rebuild the filtered/sorted view from scratch.
    ///
    /// Cursor and selection follow their messages by ID; entries whose message
    /// left the view are dropped.
    pub fn recompute_view(&mut self) {
        let cursor_id = self.cursor_message().map(|m| m.id.clone());
        let selected_ids: HashSet<String> = self.selected_ids().into_iter().collect();

        self.view = view::build_view(&self.messages, &self.search.query, self.sort);

        self.selection = self
            .view
            .iter()
            .enumerate()
            .filter(|&(_, &index)| selected_ids.contains(&self.messages[index].id))
            .map(|(pos, _)| pos)
            .collect();

        self.cursor = cursor_id
            .and_then(|id| self.position_of(&id))
            .unwrap_or(self.cursor)
            .min(self.view.len().saturating_sub(1));
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.view
            .iter()
            .position(|&index| self.messages.get(index).is_some_and(|m| m.id == id))
    }

    pub fn message_at(&self, pos: usize) -> Option<&MessageSummary> {
        self.view.get(pos).and_then(|&index| self.messages.get(index))
    }

    pub fn cursor_message(&self) -> Option<&MessageSummary> {
        self.message_at(self.cursor)
    }

    /// IDs of selected messages, in view order
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection
            .iter()
            .filter_map(|&pos| self.message_at(pos))
            .map(|m| m.id.clone())
            .collect()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.view.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.view.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.view.len().saturating_sub(1);
    }

    pub fn toggle_selection(&mut self) {
        if self.cursor >= self.view.len() {
            return;
        }
        if !self.selection.remove(&self.cursor) {
            self.selection.insert(self.cursor);
        }
    }

    /// Drop messages by ID from the full list. Selection is cleared because
    /// view positions shift.
    pub fn remove_messages(&mut self, ids: &[String]) {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.messages.retain(|m| !ids.contains(m.id.as_str()));
        self.selection.clear();
        self.recompute_view();
    }

    pub fn mark_seen(&mut self, id: &str) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.seen = true;
        }
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Viewport { width, height };
        self.layout = ColumnLayout::for_width(width);
    }

    /// Open detail screen content, if the open message is loaded
    pub fn open_detail(&self) -> Option<&Arc<MessageDetail>> {
        self.screen.detail_id().and_then(|id| self.details.get(id))
    }

    pub fn title(&self) -> String {
        let count = self.messages.len();
        let noun = if count == 1 { "message" } else { "messages" };
        format!("Burnmail - {} ({} {})", self.address, count, noun)
    }

    pub fn set_error(&mut self, error: impl ToString) {
        self.status.set_error(error);
    }

    pub fn clear_error_if_expired(&mut self) -> bool {
        self.status.clear_error_if_expired()
    }

    pub fn acknowledge_error(&mut self) {
        self.status.acknowledge_error();
    }

    pub fn set_status(&mut self, msg: impl ToString) {
        self.status.set_message(msg);
    }
}
