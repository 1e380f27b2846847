//! Attachment downloads
//!
//! Downloads run detached in the mailbox actor and never touch the loading
//! flag; only the status line reports progress.

use crate::event::Request;
use crate::mail::Attachment;

use super::super::App;

impl App {
    fn open_attachments(&self) -> Option<(String, Vec<Attachment>)> {
        let detail = self.state.open_detail()?;
        Some((detail.id().to_string(), detail.attachments.clone()))
    }

    /// Download the attachment at zero-based `index` of the open message
    pub(crate) fn download_attachment(&mut self, index: usize) {
        let Some((message_id, attachments)) = self.open_attachments() else {
            return;
        };
        let Some(attachment) = attachments.into_iter().nth(index) else {
            return;
        };

        self.state
            .set_status(format!("Downloading {}...", attachment.filename));
        self.mailbox.dispatch(Request::DownloadAttachment {
            message_id,
            attachment,
        });
    }

    pub(crate) fn download_all_attachments(&mut self) {
        let Some((message_id, attachments)) = self.open_attachments() else {
            return;
        };
        if attachments.is_empty() {
            self.state.set_status("No attachments");
            return;
        }

        self.state
            .set_status(format!("Downloading {} attachments...", attachments.len()));
        for attachment in attachments {
            self.mailbox.dispatch(Request::DownloadAttachment {
                message_id: message_id.clone(),
                attachment,
            });
        }
    }
}
