//! Title and status lines shared by the list and detail screens

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::{Theme, symbols};
use crate::app::state::SessionState;
use crate::constants::SPINNER_FRAME_MS;

/// Calculate display width of a string (accounting for Unicode)
fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate string to fit display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width < 4 {
        return s.chars().take(max_width).collect();
    }

    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);
        if width + char_width > max_width - 3 {
            break;
        }
        width += char_width;
        result.push(c);
    }
    result.push_str("...");
    result
}

/// Title with mailbox address and count, spinner while loading, and mode
/// flags on the right
pub fn title_bar(frame: &mut Frame, area: Rect, state: &SessionState, theme: &Theme) {
    let width = area.width as usize;

    let mut right = Vec::new();
    if state.bulk_mode {
        right.push(format!("bulk ({})", state.selection.len()));
    }
    if state.auto_refresh {
        right.push(symbols::AUTO_REFRESH.to_string());
    }
    let right = if right.is_empty() {
        String::new()
    } else {
        format!("{} ", right.join("  "))
    };

    let spinner = if state.status.loading {
        format!("{} ", spinner_char())
    } else {
        String::new()
    };

    let available = width.saturating_sub(display_width(&right) + display_width(&spinner) + 2);
    let title = truncate_to_width(&state.title(), available);
    let padding =
        width.saturating_sub(1 + display_width(&title) + 1 + display_width(&spinner) + display_width(&right));

    let line = Line::from(vec![
        Span::styled(" ", theme.text()),
        Span::styled(title, theme.title()),
        Span::styled(" ", theme.text()),
        Span::styled(spinner, theme.spinner()),
        Span::styled(" ".repeat(padding), theme.text()),
        Span::styled(right, theme.text_accent()),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.text()), area);
}

/// One-line status: the current error if any, else the last message
pub fn status_line(frame: &mut Frame, area: Rect, state: &SessionState, theme: &Theme) {
    let status = &state.status;
    let width = area.width as usize;

    let line = if let Some(error) = &status.error {
        let text = if status.persistent {
            format!(" {} {} (press r to refresh) ", symbols::WARNING, error)
        } else {
            format!(" {} {} ", symbols::WARNING, error)
        };
        Line::from(Span::styled(truncate_to_width(&text, width), theme.error_bar()))
    } else {
        let mut spans = Vec::new();
        // Error expired before the user saw it
        if status.has_unacknowledged_error {
            spans.push(Span::styled(" ! ", theme.status_error()));
        }
        if !status.message.is_empty() {
            let text = format!(" {} {}", symbols::BULLET, status.message);
            spans.push(Span::styled(
                truncate_to_width(&text, width.saturating_sub(3)),
                theme.status_message(),
            ));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).style(theme.status_bar()), area);
}

/// Get an animated spinner character for loading states
pub fn spinner_char() -> char {
    let spinner = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
    let idx = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / SPINNER_FRAME_MS) as usize
        % spinner.chars().count();

    spinner.chars().nth(idx).unwrap_or('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a longer title", 8), "a lon...");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn test_spinner_char_is_braille() {
        assert!("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏".contains(spinner_char()));
    }
}
