//! Resize and timer handlers

use crate::event::Request;

use super::super::App;

impl App {
    pub(crate) fn handle_resize(&mut self, width: u16, height: u16) {
        self.state.set_viewport(width, height);
        // Converted HTML is wrapped to the terminal width
        self.rebuild_detail_view();
    }

    /// Refresh only when the user is looking at the list, nothing is in
    /// flight, and no persistent error is waiting for an explicit refresh.
    pub(crate) fn handle_tick(&mut self) {
        let status = &self.state.status;
        if !self.state.auto_refresh
            || !self.state.screen.is_list()
            || status.loading
            || status.persistent
        {
            return;
        }

        tracing::debug!("Auto-refresh");
        self.state.status.loading = true;
        self.mailbox.dispatch(Request::LoadList);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::Screen;
    use crate::app::testing::Harness;
    use crate::event::{Event, Request};
    use crate::view::Column;

    #[test]
    fn test_tick_refreshes_idle_list() {
        let mut h = Harness::with_inbox();

        h.app.handle_event(Event::Tick);
        let dispatches = h.take_dispatches();
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].request, Request::LoadList);

        // Still loading: the next tick is skipped
        h.app.handle_event(Event::Tick);
        assert!(h.take_dispatches().is_empty());
    }

    #[test]
    fn test_tick_gated_by_screen_and_toggle() {
        let mut h = Harness::with_inbox();

        h.app.state.screen = Screen::Detail { id: "1".into() };
        h.app.handle_event(Event::Tick);
        assert!(h.take_dispatches().is_empty());

        h.app.state.screen = Screen::List;
        h.key('a');
        assert!(!h.app.state.auto_refresh);
        h.app.handle_event(Event::Tick);
        assert!(h.take_dispatches().is_empty());
    }

    #[test]
    fn test_resize_switches_column_tier() {
        let mut h = Harness::with_inbox();

        h.app.handle_event(Event::Resize {
            width: 70,
            height: 30,
        });
        assert!(!h.app.state.layout.has(Column::Preview));
        assert_eq!(h.app.state.viewport.body_height(), 20);

        h.app.handle_event(Event::Resize {
            width: 140,
            height: 30,
        });
        assert!(h.app.state.layout.has(Column::Preview));
    }
}
