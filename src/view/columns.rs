//! Message table layout and row formatting.

use std::collections::BTreeSet;
use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::constants::{MIN_WORD_TRUNCATE_WIDTH, NARROW_BREAKPOINT, WIDE_BREAKPOINT};
use crate::mail::MessageSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Bulk-selection checkbox
    Selected,
    Attachment,
    From,
    Subject,
    Preview,
    Date,
}

impl Column {
    pub fn title(self) -> &'static str {
        match self {
            Self::Selected => "✓",
            Self::Attachment => "📎",
            Self::From => "From",
            Self::Subject => "Subject",
            Self::Preview => "Preview",
            Self::Date => "Date",
        }
    }
}

/// Columns shown at a given terminal width, with their widths in cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub columns: Vec<(Column, u16)>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::for_width(WIDE_BREAKPOINT)
    }
}

impl ColumnLayout {
    /// Narrow terminals drop the attachment and preview columns; wide ones
    /// give the fixed columns more room. Subject takes what is left.
    pub fn for_width(width: u16) -> Self {
        let columns = if width < NARROW_BREAKPOINT {
            vec![
                (Column::Selected, 2),
                (Column::From, 15),
                (Column::Subject, width.saturating_sub(30).max(20)),
                (Column::Date, 10),
            ]
        } else if width < WIDE_BREAKPOINT {
            vec![
                (Column::Selected, 3),
                (Column::Attachment, 3),
                (Column::From, 20),
                (Column::Subject, width.saturating_sub(55).max(25)),
                (Column::Preview, 15),
                (Column::Date, 12),
            ]
        } else {
            vec![
                (Column::Selected, 3),
                (Column::Attachment, 3),
                (Column::From, 25),
                (Column::Subject, width.saturating_sub(85).max(30)),
                (Column::Preview, 25),
                (Column::Date, 14),
            ]
        };
        Self { columns }
    }

    #[cfg(test)]
    pub fn width_of(&self, column: Column) -> Option<u16> {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, w)| *w)
    }

    #[cfg(test)]
    pub fn has(&self, column: Column) -> bool {
        self.width_of(column).is_some()
    }
}

/// Shorten `s` to at most `max` terminal columns.
///
/// Cuts at word boundaries and appends `...`; only columns narrower than the
/// minimum word-truncation width are cut mid-word (without an ellipsis).
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max < MIN_WORD_TRUNCATE_WIDTH {
        return take_columns(s, max);
    }

    let budget = max - 3;
    let mut kept: Vec<&str> = Vec::new();
    let mut length = 0;
    for word in s.split_whitespace() {
        let word_len = word.width();
        if length + word_len + 1 > budget {
            break;
        }
        kept.push(word);
        length += word_len + 1;
    }

    if kept.is_empty() {
        format!("{}...", take_columns(s, budget))
    } else {
        format!("{}...", kept.join(" "))
    }
}

/// Longest prefix of `s` that fits in `max` columns
fn take_columns(s: &str, max: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= max
        })
        .collect()
}

/// Format in local time; an invalid user format falls back to `fallback`
pub fn format_date(date: &DateTime<Utc>, format: &str, fallback: &str) -> String {
    let local = date.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", local.format(fallback));
    }
    out
}

/// A render-ready table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub seen: bool,
    pub selected: bool,
}

fn cell(message: &MessageSummary, column: Column, width: u16, selected: bool, date: &str) -> String {
    let width = width as usize;
    match column {
        Column::Selected => (if selected { "✓" } else { " " }).to_string(),
        Column::Attachment => (if message.has_attachments { "📎" } else { " " }).to_string(),
        Column::From => truncate(&message.from.address, width),
        Column::Subject => truncate(&message.subject, width),
        Column::Preview => truncate(&message.intro, width),
        Column::Date => date.to_string(),
    }
}

/// Rows for the filtered/sorted `view`. `selection` holds positions in `view`.
pub fn table_rows(
    messages: &[MessageSummary],
    view: &[usize],
    selection: &BTreeSet<usize>,
    layout: &ColumnLayout,
    date_format: &str,
) -> Vec<Row> {
    view.iter()
        .enumerate()
        .filter_map(|(pos, &index)| messages.get(index).map(|m| (pos, m)))
        .map(|(pos, message)| {
            let selected = selection.contains(&pos);
            let date = format_date(&message.created_at, date_format, "%d/%m %H:%M");
            let cells = layout
                .columns
                .iter()
                .map(|&(column, width)| cell(message, column, width, selected, &date))
                .collect();
            Row {
                cells,
                seen: message.seen,
                selected,
            }
        })
        .collect()
}
