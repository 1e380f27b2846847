mod confirm;
mod detail;
mod help;
mod list;
mod status_bar;
pub mod theme;
mod widgets;

use ratatui::{Frame, widgets::Block};

use crate::app::state::{BaseScreen, Screen, SessionState};

pub use theme::Theme;

/// Draw one frame of the session
pub fn render(frame: &mut Frame, state: &SessionState, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.text()), area);

    match &state.screen {
        Screen::List => list::render(frame, area, state, theme),
        Screen::Detail { .. } => detail::render(frame, area, state, theme),
        Screen::Help { .. } => help::render(frame, area, theme),
        Screen::Confirm(confirmation) => {
            match confirmation.back {
                BaseScreen::List => list::render(frame, area, state, theme),
                BaseScreen::Detail { .. } => detail::render(frame, area, state, theme),
            }
            confirm::render(frame, area, confirmation, theme);
        }
    }
}
