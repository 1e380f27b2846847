//! Mailbox service access: the client contract the session controller depends
//! on, its error type and the mail.tm REST implementation.

pub mod client;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::actor::Retryable;

pub use client::MailTmClient;
pub use types::{Attachment, MessageDetail, MessageSummary};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("rate limited by server (429)")]
    RateLimited,
    #[error("{context} failed with status {status}")]
    Status { status: u16, context: &'static str },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
    #[error("operation cancelled")]
    Cancelled,
}

impl Retryable for MailError {
    fn is_rate_limited(&self) -> bool {
        match self {
            MailError::RateLimited => true,
            MailError::Status { status, .. } => *status == 429,
            _ => false,
        }
    }

    fn cancelled() -> Self {
        MailError::Cancelled
    }
}

/// Message operations the session controller issues.
///
/// Every call is a single logical request; retries are layered on top by the
/// caller.
#[async_trait]
pub trait MailboxClient: Send + Sync {
    async fn list_messages(&self) -> Result<Vec<MessageSummary>, MailError>;

    async fn message(&self, id: &str) -> Result<MessageDetail, MailError>;

    async fn delete_message(&self, id: &str) -> Result<(), MailError>;

    /// Best-effort; callers ignore failures
    async fn mark_read(&self, id: &str) -> Result<(), MailError>;

    async fn download_attachment(
        &self,
        message_id: &str,
        attachment: &Attachment,
    ) -> Result<Vec<u8>, MailError>;
}
