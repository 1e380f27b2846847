//! Full-screen key reference

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme::{Theme, symbols};
use super::widgets::help_bar;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "General",
        &[
            ("?", "Show this help screen"),
            ("q", "Quit application (with confirmation)"),
            ("esc", "Go back / Cancel"),
            ("r", "Refresh messages"),
        ],
    ),
    (
        "List View",
        &[
            ("↑/↓ or j/k", "Navigate messages"),
            ("enter", "View selected message"),
            ("/", "Search messages"),
            ("s", "Cycle sort (Date → Sender → Subject)"),
            ("c", "Copy sender email to clipboard"),
            ("a", "Toggle auto-refresh"),
            ("v", "Toggle bulk selection mode"),
            ("space", "Select/deselect message (bulk mode)"),
            ("d", "Delete selected message(s)"),
        ],
    ),
    (
        "Detail View",
        &[
            ("↑/↓ or j/k", "Scroll message content"),
            ("o", "Open HTML content in browser"),
            ("c", "Copy message content to clipboard"),
            ("d", "Delete message"),
            ("1-9", "Download attachment by number"),
            ("shift+a", "Download all attachments"),
            ("esc", "Back to list"),
        ],
    ),
];

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.popup_border_type())
        .border_style(theme.border_focused())
        .title(Span::styled(" Burnmail - Help ", theme.title()));

    frame.render_widget(Paragraph::new(help_lines(theme)).block(block), chunks[0]);
    help_bar(frame, chunks[1], &[("esc/?/q", "close help")], theme);
}

fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (title, items)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("{} {}", symbols::BULLET, title),
            theme.header(),
        )));
        for (key, desc) in items.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<10} ", key), theme.help_key()),
                Span::styled(*desc, theme.text_secondary()),
            ]));
        }
    }
    lines
}
