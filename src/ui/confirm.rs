//! Yes/no dialog drawn over the list or detail screen

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme::{Theme, symbols};
use crate::app::state::Confirmation;

const DIALOG_WIDTH: u16 = 60;
const DIALOG_MIN_WIDTH: u16 = 36;
const DIALOG_HEIGHT: u16 = 8;

/// Centered in `area`, shrinking with a 2-cell margin down to the minimum width
fn dialog_area(area: Rect) -> Rect {
    let width = DIALOG_WIDTH
        .min(area.width.saturating_sub(4))
        .max(DIALOG_MIN_WIDTH)
        .min(area.width);
    let height = DIALOG_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn render(frame: &mut Frame, area: Rect, confirmation: &Confirmation, theme: &Theme) {
    let popup_area = dialog_area(area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.popup_border_type())
        .border_style(theme.border_dialog());

    let lines = vec![
        Line::from(Span::styled(
            format!("{} Confirmation Required", symbols::WARNING),
            theme.title(),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Are you sure you want to {}?", confirmation.description),
            theme.text(),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("Y", theme.help_key()),
            Span::styled(" - Yes, proceed", theme.text_secondary()),
        ]),
        Line::from(vec![
            Span::styled("N", theme.help_key()),
            Span::styled(" - No, cancel", theme.text_secondary()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_centered() {
        let area = dialog_area(Rect::new(0, 0, 120, 40));
        assert_eq!(area, Rect::new(30, 16, 60, 8));
    }

    #[test]
    fn test_dialog_fits_tiny_terminal() {
        let outer = Rect::new(0, 0, 30, 5);
        let area = dialog_area(outer);
        assert_eq!(area.width, 30);
        assert_eq!(area.height, 5);
        assert_eq!(outer.intersection(area), area);
    }
}
