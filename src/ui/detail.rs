//! Message detail screen

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::status_bar::{status_line, title_bar};
use super::theme::{Theme, symbols};
use super::widgets::{help_bar, sanitize_text};
use crate::app::state::SessionState;
use crate::view::DetailView;
use crate::view::detail::{ATTACHMENT_HINT, SEPARATOR_WIDTH};

pub fn render(frame: &mut Frame, area: Rect, state: &SessionState, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    title_bar(frame, chunks[0], state, theme);
    status_line(frame, chunks[1], state, theme);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border());

    let paragraph = match state.detail_view.as_deref() {
        Some(view) => Paragraph::new(detail_lines(view, theme))
            .wrap(Wrap { trim: false })
            .scroll((state.detail_scroll, 0)),
        None => Paragraph::new(Span::styled("Loading message...", theme.text_muted())),
    };
    frame.render_widget(paragraph.block(block), chunks[2]);

    help_bar(
        frame,
        chunks[3],
        &[
            ("↑/↓", "scroll"),
            ("o", "browser"),
            ("c", "copy"),
            ("d", "delete"),
            ("esc", "back"),
            ("?", "help"),
        ],
        theme,
    );
}

/// Lines in the order counted by `DetailView::row_count`
fn detail_lines<'a>(view: &'a DetailView, theme: &Theme) -> Vec<Line<'a>> {
    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(label, theme.header()),
            Span::styled(sanitize_text(value), theme.text()),
        ])
    };

    let mut lines = vec![
        field("From: ", &view.from),
        field("Subject: ", &view.subject),
        field("Date: ", &view.date),
        Line::from(Span::styled(
            symbols::SEPARATOR.repeat(SEPARATOR_WIDTH),
            theme.separator(),
        )),
        Line::default(),
    ];

    let body = sanitize_text(&view.body);
    lines.extend(
        body.lines()
            .map(|line| Line::from(Span::styled(line.to_string(), theme.text()))),
    );

    if view.can_open_in_browser() {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Press ", theme.text_muted()),
            Span::styled("'o'", theme.help_key()),
            Span::styled(" to open HTML in browser", theme.text_muted()),
        ]));
    }

    if !view.attachments.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            view.attachments_title(),
            theme.header(),
        )));
        for attachment in &view.attachments {
            lines.push(Line::from(vec![
                Span::styled(attachment.marker(), theme.help_key()),
                Span::styled(sanitize_text(&attachment.filename), theme.text()),
                Span::styled(attachment.details(), theme.text_muted()),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(ATTACHMENT_HINT, theme.text_muted())));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::detail::{AttachmentLine, BodySource};

    fn view(body: &str, source: BodySource, attachments: usize, width: usize) -> DetailView {
        DetailView {
            from: "sender@example.test".to_string(),
            subject: "Hello".to_string(),
            date: "01/02/2025 10:00".to_string(),
            body: body.to_string(),
            source,
            attachments: (0..attachments)
                .map(|i| AttachmentLine {
                    number: Some(i + 1),
                    filename: format!("file{}.txt", i),
                    content_type: "text/plain".to_string(),
                    size: "1.0 KB".to_string(),
                })
                .collect(),
            width,
        }
    }

    #[test]
    fn test_lines_match_row_count() {
        let theme = Theme::default();
        for width in [100, 30] {
            for detail in [
                view("one\ntwo", BodySource::Text, 0, width),
                view("rendered", BodySource::Html, 0, width),
                view("rendered\nhtml", BodySource::Html, 3, width),
                view("", BodySource::Empty, 1, width),
            ] {
                let rows: usize = detail_lines(&detail, &theme)
                    .iter()
                    .map(|line| line.width().div_ceil(width).max(1))
                    .sum();
                assert_eq!(rows, detail.row_count(), "width {}", width);
            }
        }
    }
}
