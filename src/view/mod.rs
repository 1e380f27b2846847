//! Render pipeline: pure functions from session data to render-ready output.
//!
//! Nothing here performs I/O. The filtered/sorted view is expressed as indices
//! into the full message list and is always rebuilt from scratch.

pub mod columns;
pub mod detail;

use crate::mail::MessageSummary;

pub use columns::{Column, ColumnLayout, Row, table_rows, truncate};
pub use detail::{DetailView, build_detail};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Newest first
    #[default]
    Date,
    Sender,
    Subject,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Sender,
            Self::Sender => Self::Subject,
            Self::Subject => Self::Date,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Sender => "Sender",
            Self::Subject => "Subject",
        }
    }
}

/// Case-insensitive substring match on sender address, subject and preview.
/// `needle` must already be lowercase.
fn matches(message: &MessageSummary, needle: &str) -> bool {
    message.from.address.to_lowercase().contains(needle)
        || message.subject.to_lowercase().contains(needle)
        || message.intro.to_lowercase().contains(needle)
}

/// Positions in `messages` that match `query`, in list order
pub fn filter(messages: &[MessageSummary], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..messages.len()).collect();
    }
    let needle = query.to_lowercase();
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| matches(m, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Stable sort of `indices` by `mode`
pub fn sort(messages: &[MessageSummary], indices: &mut [usize], mode: SortMode) {
    match mode {
        SortMode::Date => {
            indices.sort_by(|&a, &b| messages[b].created_at.cmp(&messages[a].created_at))
        }
        SortMode::Sender => {
            indices.sort_by(|&a, &b| messages[a].from.address.cmp(&messages[b].from.address))
        }
        SortMode::Subject => {
            indices.sort_by(|&a, &b| messages[a].subject.cmp(&messages[b].subject))
        }
    }
}

/// The filtered and sorted view: positions into `messages`
pub fn build_view(messages: &[MessageSummary], query: &str, mode: SortMode) -> Vec<usize> {
    let mut view = filter(messages, query);
    sort(messages, &mut view, mode);
    view
}


#[cfg(test)]
mod tests {
    use super::fixtures::{inbox, message};
    use super::*;

    fn ids(messages: &[MessageSummary], view: &[usize]) -> Vec<String> {
        view.iter().map(|&i| messages[i].id.clone()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let messages = inbox();
        assert_eq!(filter(&messages, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_matches_subject_case_insensitive() {
        let messages = inbox();
        assert_eq!(ids(&messages, &filter(&messages, "INVOICE")), vec!["2"]);
    }

    #[test]
    fn test_filter_matches_sender_and_preview() {
        let messages = inbox();
        assert_eq!(ids(&messages, &filter(&messages, "carol")), vec!["2"]);
        assert_eq!(ids(&messages, &filter(&messages, "preview of week")), vec!["3"]);
        assert_eq!(
            ids(&messages, &filter(&messages, "example.test")),
            vec!["1", "3"]
        );
        assert!(filter(&messages, "nothing matches").is_empty());
    }

    #[test]
    fn test_sort_modes() {
        let messages = inbox();

        let by_date = build_view(&messages, "", SortMode::Date);
        assert_eq!(ids(&messages, &by_date), vec!["3", "2", "1"]);

        // Raw byte order: uppercase sorts before lowercase
        let by_sender = build_view(&messages, "", SortMode::Sender);
        assert_eq!(ids(&messages, &by_sender), vec!["2", "3", "1"]);

        let by_subject = build_view(&messages, "", SortMode::Subject);
        assert_eq!(ids(&messages, &by_subject), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut messages = inbox();
        messages.push(message("4", "bob@example.test", "Another", 5));

        for mode in [SortMode::Date, SortMode::Sender, SortMode::Subject] {
            let mut once = filter(&messages, "");
            sort(&messages, &mut once, mode);
            let mut twice = once.clone();
            sort(&messages, &mut twice, mode);
            assert_eq!(once, twice, "{:?}", mode);
        }
    }

    #[test]
    fn test_sort_mode_cycle() {
        assert_eq!(SortMode::Date.next(), SortMode::Sender);
        assert_eq!(SortMode::Sender.next(), SortMode::Subject);
        assert_eq!(SortMode::Subject.next(), SortMode::Date);
    }
}
