//! Navigation actions (movement, scrolling, screen changes)

use std::sync::Arc;

use crate::app::state::Screen;
use crate::mail::MessageDetail;
use crate::view::build_detail;

use super::super::App;

impl App {
    pub(crate) fn move_by(&mut self, delta: isize) {
        match self.state.screen {
            Screen::List => self.state.move_cursor(delta),
            Screen::Detail { .. } => self.scroll_detail(delta),
            _ => {}
        }
    }

    pub(crate) fn move_to_top(&mut self) {
        match self.state.screen {
            Screen::List => self.state.cursor_to_top(),
            Screen::Detail { .. } => self.state.detail_scroll = 0,
            _ => {}
        }
    }

    pub(crate) fn move_to_bottom(&mut self) {
        match self.state.screen {
            Screen::List => self.state.cursor_to_bottom(),
            Screen::Detail { .. } => self.state.detail_scroll = self.detail_scroll_limit(),
            _ => {}
        }
    }

    /// Move a full body height in `direction` (-1 or 1)
    pub(crate) fn move_page(&mut self, direction: isize) {
        let page = self.state.viewport.body_height() as isize;
        self.move_by(direction * page);
    }

    fn scroll_detail(&mut self, delta: isize) {
        let limit = self.detail_scroll_limit();
        let scroll = usize::from(self.state.detail_scroll).saturating_add_signed(delta);
        self.state.detail_scroll = scroll.min(usize::from(limit)) as u16;
    }

    fn detail_scroll_limit(&self) -> u16 {
        let Some(view) = &self.state.detail_view else {
            return 0;
        };
        let hidden = view
            .row_count()
            .saturating_sub(self.state.viewport.body_height());
        hidden.min(usize::from(u16::MAX)) as u16
    }

    pub(crate) fn go_back(&mut self) {
        match &self.state.screen {
            Screen::Detail { .. } => self.close_detail(),
            Screen::Help { back } => self.state.screen = Screen::from(back.clone()),
            Screen::List if !self.state.search.query.is_empty() => self.clear_search(),
            _ => {}
        }
    }

    pub(crate) fn open_help(&mut self) {
        if matches!(self.state.screen, Screen::List | Screen::Detail { .. }) {
            self.state.screen = Screen::Help {
                back: self.state.screen.base(),
            };
        }
    }

    /// Switch to the detail screen for a loaded message
    pub(crate) fn show_detail(&mut self, detail: &Arc<MessageDetail>) {
        self.state.screen = Screen::Detail {
            id: detail.id().to_string(),
        };
        self.state.detail_scroll = 0;
        self.state.detail_view = Some(Arc::new(build_detail(
            detail,
            &self.state.formats.detail,
            self.state.viewport.text_width(),
        )));
    }

    /// Re-format the open message, e.g. after the wrap width changed
    pub(crate) fn rebuild_detail_view(&mut self) {
        let Some(detail) = self.state.open_detail().cloned() else {
            return;
        };
        self.state.detail_view = Some(Arc::new(build_detail(
            &detail,
            &self.state.formats.detail,
            self.state.viewport.text_width(),
        )));
        self.state.detail_scroll = self.state.detail_scroll.min(self.detail_scroll_limit());
    }

    pub(crate) fn close_detail(&mut self) {
        self.state.screen = Screen::List;
        self.state.detail_view = None;
        self.state.detail_scroll = 0;
    }
}
