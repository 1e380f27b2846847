//! Message list screen

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::status_bar::{status_line, title_bar};
use super::theme::{Theme, symbols};
use super::widgets::{help_bar, sanitize_text};
use crate::app::state::SessionState;
use crate::view::{self, Column};

pub fn render(frame: &mut Frame, area: Rect, state: &SessionState, theme: &Theme) {
    let show_search = state.search.active || !state.search.query.is_empty();

    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Length(1), // status
        Constraint::Length(if show_search { 3 } else { 0 }),
        Constraint::Min(3),
        Constraint::Length(1), // sort + help pointer
        Constraint::Length(1), // key hints
    ])
    .split(area);

    title_bar(frame, chunks[0], state, theme);
    status_line(frame, chunks[1], state, theme);
    if show_search {
        render_search(frame, chunks[2], state, theme);
    }
    render_table(frame, chunks[3], state, theme);
    render_footer(frame, chunks[4], chunks[5], state, theme);
}

fn render_search(frame: &mut Frame, area: Rect, state: &SessionState, theme: &Theme) {
    let (border_style, border_type) = if state.search.active {
        (theme.border_focused(), theme.popup_border_type())
    } else {
        (theme.border(), BorderType::Plain)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(Span::styled(" Search ", theme.header()));

    let mut spans = vec![Span::styled(state.search.query.clone(), theme.text())];
    if state.search.active {
        spans.push(Span::styled("█", theme.text_accent()));
    } else {
        spans.push(Span::styled(
            format!("  ({} of {})", state.view.len(), state.messages.len()),
            theme.text_muted(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_table(frame: &mut Frame, area: Rect, state: &SessionState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border());

    if state.view.is_empty() {
        let text = if !state.search.query.is_empty() {
            format!("No messages match \"{}\"", state.search.query)
        } else if state.status.loading {
            "Loading messages...".to_string()
        } else {
            "No messages yet. Waiting for mail...".to_string()
        };
        let paragraph = Paragraph::new(Span::styled(text, theme.text_muted())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = view::table_rows(
        &state.messages,
        &state.view,
        &state.selection,
        &state.layout,
        &state.formats.list,
    );

    let table_rows: Vec<Row> = rows
        .into_iter()
        .map(|row| {
            let style = if row.selected {
                theme.text_marked()
            } else if row.seen {
                theme.text_secondary()
            } else {
                theme.text_unread()
            };
            let cells = state
                .layout
                .columns
                .iter()
                .zip(row.cells)
                .map(|(&(column, _), text)| match column {
                    // Unread marker replaces the empty checkbox outside bulk mode
                    Column::Selected if !state.bulk_mode => Cell::from(if row.seen {
                        symbols::READ
                    } else {
                        symbols::UNREAD
                    })
                    .style(theme.text_accent()),
                    _ => Cell::from(sanitize_text(&text)),
                });
            Row::new(cells).style(style)
        })
        .collect();

    let header = Row::new(
        state
            .layout
            .columns
            .iter()
            .map(|&(column, _)| Cell::from(column.title())),
    )
    .style(theme.header());

    let widths: Vec<Constraint> = state
        .layout
        .columns
        .iter()
        .map(|&(column, width)| match column {
            Column::Subject => Constraint::Min(width),
            _ => Constraint::Length(width),
        })
        .collect();

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(theme.selected().add_modifier(Modifier::BOLD));

    let mut table_state = TableState::default().with_selected(Some(state.cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_footer(frame: &mut Frame, info: Rect, hints: Rect, state: &SessionState, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" Sort: ", theme.text_muted()),
        Span::styled(state.sort.title(), theme.text_accent()),
        Span::styled(" • Press ", theme.text_muted()),
        Span::styled("?", theme.help_key()),
        Span::styled(" for help", theme.text_muted()),
    ]);
    frame.render_widget(Paragraph::new(line), info);

    if state.search.active {
        help_bar(
            frame,
            hints,
            &[("enter", "keep filter"), ("esc", "clear")],
            theme,
        );
        return;
    }

    let auto = if state.auto_refresh { "auto:ON" } else { "auto:OFF" };
    let mut list: Vec<(&str, &str)> = vec![
        ("↑/↓/j/k", "navigate"),
        ("enter", "open"),
        ("s", "sort"),
        ("c", "copy"),
        ("v", "bulk"),
    ];
    if state.bulk_mode {
        list.push(("space", "select"));
        list.push(("d", "delete"));
    }
    list.extend([("r", "refresh"), ("/", "search"), ("a", auto), ("q", "quit")]);
    help_bar(frame, hints, &list, theme);
}
