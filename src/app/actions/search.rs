//! Live search filter

use super::super::App;

impl App {
    pub(crate) fn start_search(&mut self) {
        if self.state.screen.is_list() {
            self.state.search.active = true;
        }
    }

    /// Leave the field, keeping the filter
    pub(crate) fn submit_search(&mut self) {
        self.state.search.active = false;
    }

    /// Leave the field and drop the filter
    pub(crate) fn cancel_search(&mut self) {
        self.state.search.active = false;
        self.clear_search();
    }

    pub(crate) fn clear_search(&mut self) {
        if !self.state.search.query.is_empty() {
            self.state.search.query.clear();
            self.state.recompute_view();
        }
    }
}
