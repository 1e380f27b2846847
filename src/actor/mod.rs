pub mod mailbox;
pub mod retry;

pub use mailbox::{MailboxHandle, spawn_mailbox_actor};
pub use retry::{RetryConfig, Retryable, with_retry};
