//! Mailbox actor: runs dispatched requests as detached tasks and reports each
//! outcome back to the event loop as exactly one completion event.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::retry::{RetryConfig, with_retry};
use crate::event::{Event, Request};
use crate::mail::{Attachment, MailError, MailboxClient};

/// A request plus how long to wait before starting it
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub request: Request,
    pub delay: Duration,
}

/// Handle for sending work to the mailbox actor
#[derive(Clone)]
pub struct MailboxHandle {
    cmd_tx: mpsc::UnboundedSender<Dispatch>,
}

impl MailboxHandle {
    /// Handle whose dispatches land in the returned receiver instead of an actor
    #[cfg(test)]
    pub fn detached() -> (Self, mpsc::UnboundedReceiver<Dispatch>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        (Self { cmd_tx }, cmd_rx)
    }

    pub fn dispatch(&self, request: Request) {
        self.dispatch_after(request, Duration::ZERO);
    }

    pub fn dispatch_after(&self, request: Request, delay: Duration) {
        tracing::debug!("Dispatching {:?} (delay {:?})", request, delay);
        if self.cmd_tx.send(Dispatch { request, delay }).is_err() {
            tracing::warn!("Mailbox actor: command receiver dropped");
        }
    }
}

/// Shared context for every task spawned by the actor
struct Worker {
    client: Arc<dyn MailboxClient>,
    retry: RetryConfig,
    downloads_dir: PathBuf,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<Event>,
}

/// Spawn the mailbox actor task.
///
/// The actor stops accepting work once `cancel` fires; tasks already running
/// abandon their backoff and post nothing.
pub fn spawn_mailbox_actor(
    client: Arc<dyn MailboxClient>,
    retry: RetryConfig,
    downloads_dir: PathBuf,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<Event>,
) -> MailboxHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let worker = Arc::new(Worker {
        client,
        retry,
        downloads_dir,
        cancel,
        events,
    });
    tokio::spawn(mailbox_actor_loop(worker, cmd_rx));

    MailboxHandle { cmd_tx }
}

async fn mailbox_actor_loop(worker: Arc<Worker>, mut cmd_rx: mpsc::UnboundedReceiver<Dispatch>) {
    loop {
        tokio::select! {
            _ = worker.cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(dispatch) => {
                    let worker = Arc::clone(&worker);
                    tokio::spawn(async move { worker.run(dispatch).await });
                }
                None => break,
            },
        }
    }
    tracing::debug!("Mailbox actor stopped");
}

impl Worker {
    async fn run(&self, dispatch: Dispatch) {
        if !dispatch.delay.is_zero() {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(dispatch.delay) => {}
            }
        }

        let request = dispatch.request;
        let event = match self.execute(&request).await {
            Ok(event) => event,
            Err(e) if is_cancelled(&e) => {
                tracing::debug!("{} cancelled", request.describe());
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to {}: {:#}", request.describe(), e);
                Event::Failure {
                    request,
                    error: format!("{:#}", e),
                }
            }
        };

        if self.events.send(event).is_err() {
            tracing::warn!("Mailbox actor: event receiver dropped");
        }
    }

    async fn execute(&self, request: &Request) -> Result<Event> {
        match request {
            Request::LoadList => {
                let messages =
                    with_retry(&self.retry, &self.cancel, || self.client.list_messages()).await?;
                Ok(Event::ListLoaded(messages))
            }
            Request::LoadDetail { id } => {
                let detail =
                    with_retry(&self.retry, &self.cancel, || self.client.message(id)).await?;
                self.mark_read_in_background(id.clone());
                Ok(Event::DetailLoaded(Box::new(detail)))
            }
            Request::Delete { id } => {
                with_retry(&self.retry, &self.cancel, || self.client.delete_message(id)).await?;
                Ok(Event::Deleted { id: id.clone() })
            }
            Request::BulkDelete { ids } => {
                let results = join_all(ids.iter().map(|id| {
                    with_retry(&self.retry, &self.cancel, move || {
                        self.client.delete_message(id)
                    })
                }))
                .await;

                if let Some(first_failure) = results.into_iter().find_map(Result::err) {
                    return Err(first_failure.into());
                }
                Ok(Event::BulkDeleted { ids: ids.clone() })
            }
            Request::DownloadAttachment {
                message_id,
                attachment,
            } => self.download(message_id, attachment).await,
        }
    }

    fn mark_read_in_background(&self, id: String) {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            if let Err(e) = client.mark_read(&id).await {
                tracing::debug!("Failed to mark {} as read: {}", id, e);
            }
        });
    }

    async fn download(&self, message_id: &str, attachment: &Attachment) -> Result<Event> {
        let bytes = with_retry(&self.retry, &self.cancel, || {
            self.client.download_attachment(message_id, attachment)
        })
        .await?;

        let dir = self.downloads_dir.clone();
        let filename = attachment.safe_filename();
        let path = tokio::task::spawn_blocking(move || save_unique(&dir, &filename, &bytes))
            .await
            .context("Download writer task failed")?
            .with_context(|| format!("Failed to save {}", attachment.filename))?;

        tracing::info!("Saved attachment to {}", path.display());
        Ok(Event::AttachmentSaved {
            filename: attachment.filename.clone(),
            path,
        })
    }
}

fn is_cancelled(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<MailError>(), Some(MailError::Cancelled))
}

/// Where attachments are saved: the platform downloads folder, else the
/// current directory.
pub fn downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Candidate name for the `n`th collision: `report.pdf` -> `report_2.pdf`
fn numbered_name(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    }
}

/// Write `bytes` under `dir`, probing numbered names until an unused one is
/// found. Files are created exclusively so a concurrent download cannot
/// clobber the same name.
fn save_unique(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let mut n = 0;
    loop {
        let candidate = dir.join(numbered_name(filename, n));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => {
                fill_claimed(&candidate, file, bytes)?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Write into a freshly claimed file, releasing the name if the write fails
fn fill_claimed(path: &Path, mut file: impl Write, bytes: &[u8]) -> io::Result<()> {
    if let Err(e) = file.write_all(bytes) {
        if let Err(remove) = fs::remove_file(path) {
            tracing::warn!("Failed to remove partial {}: {}", path.display(), remove);
        }
        return Err(e);
    }
    Ok(())
}
