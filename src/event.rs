//! Events consumed by the session controller.
//!
//! Terminal input, timer ticks and every completion of detached work arrive as
//! one of these variants; each completion carries the typed result of exactly
//! one request kind.

use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::mail::{Attachment, MessageDetail, MessageSummary};

/// Unit of detached work the controller can dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadList,
    LoadDetail {
        id: String,
    },
    Delete {
        id: String,
    },
    /// IDs are captured when the request is issued, never re-read from indices
    BulkDelete {
        ids: Vec<String>,
    },
    DownloadAttachment {
        message_id: String,
        attachment: Attachment,
    },
}

impl Request {
    /// Reads are re-issued by the controller after a failure; mutations are not
    pub fn is_read(&self) -> bool {
        matches!(self, Request::LoadList | Request::LoadDetail { .. })
    }

    /// Whether completion of this request clears the global loading flag
    pub fn affects_loading(&self) -> bool {
        !matches!(self, Request::DownloadAttachment { .. })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Request::LoadList => "load messages",
            Request::LoadDetail { .. } => "load message",
            Request::Delete { .. } => "delete message",
            Request::BulkDelete { .. } => "delete messages",
            Request::DownloadAttachment { .. } => "download attachment",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    /// Auto-refresh timer fired
    Tick,
    ListLoaded(Vec<MessageSummary>),
    DetailLoaded(Box<MessageDetail>),
    Deleted {
        id: String,
    },
    BulkDeleted {
        ids: Vec<String>,
    },
    AttachmentSaved {
        filename: String,
        path: PathBuf,
    },
    /// Side effect outside the mailbox finished with a status line to show
    Notice(String),
    /// Side effect outside the mailbox failed
    SideEffectFailed(String),
    Failure {
        request: Request,
        error: String,
    },
}
