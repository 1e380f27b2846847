use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender or recipient as reported by the mailbox service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    #[serde(default)]
    pub name: String,
}

/// One row of the inbox listing.
///
/// This is also the on-disk cache schema, so field names follow the service's
/// camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    pub from: Address,
    #[serde(default)]
    pub to: Vec<Address>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub seen: bool,
    #[serde(default)]
    pub has_attachments: bool,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

impl MessageSummary {
    pub fn sender(&self) -> &str {
        &self.from.address
    }
}

/// Attachment descriptor. Bytes are only fetched on demand through `download_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: String,
}

impl Attachment {
    /// Filename safe to join onto a directory
    pub fn safe_filename(&self) -> String {
        let name = self
            .filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        if name.is_empty() || name == "." || name == ".." {
            format!("attachment-{}", self.id)
        } else {
            name.to_string()
        }
    }
}

/// Full message as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDetail {
    #[serde(flatten)]
    pub summary: MessageSummary,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl MessageDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn has_html(&self) -> bool {
        self.html.iter().any(|part| !part.trim().is_empty())
    }

    /// All HTML fragments joined into one document
    pub fn html_document(&self) -> String {
        self.html.join("\n")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub domain: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Account as returned by account creation
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAccount {
    pub id: String,
    pub address: String,
}

/// Bearer token returned by login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "@id": "/messages/abc",
        "id": "abc",
        "accountId": "acc1",
        "msgid": "<x@y>",
        "from": {"address": "alice@example.com", "name": "Alice"},
        "to": [{"address": "me@dispostable.test", "name": ""}],
        "subject": "Your invoice",
        "intro": "Please find attached",
        "seen": false,
        "isDeleted": false,
        "hasAttachments": true,
        "size": 2048,
        "downloadUrl": "/messages/abc/download",
        "createdAt": "2024-03-01T10:15:00+00:00",
        "updatedAt": "2024-03-01T10:15:00+00:00",
        "text": "Hello",
        "html": ["<p>Hello</p>"],
        "attachments": [{
            "id": "ATTACH000001",
            "filename": "invoice.pdf",
            "contentType": "application/pdf",
            "disposition": "attachment",
            "size": 12,
            "downloadUrl": "/messages/abc/attachment/ATTACH000001"
        }]
    }"#;

    #[test]
    fn test_detail_parses_service_json() {
        let detail: MessageDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.id(), "abc");
        assert_eq!(detail.summary.sender(), "alice@example.com");
        assert_eq!(detail.summary.from.name, "Alice");
        assert!(detail.summary.has_attachments);
        assert!(detail.has_html());
        assert_eq!(detail.attachments.len(), 1);
        assert_eq!(detail.attachments[0].content_type, "application/pdf");
    }

    #[test]
    fn test_summary_requires_identity_and_date() {
        let missing_date = r#"{"id": "a", "from": {"address": "x@y.z"}}"#;
        assert!(serde_json::from_str::<MessageSummary>(missing_date).is_err());
    }

    #[test]
    fn test_safe_filename_strips_directories() {
        let mut attachment = Attachment {
            id: "A1".to_string(),
            filename: "../../etc/passwd".to_string(),
            content_type: String::new(),
            size: 0,
            download_url: String::new(),
        };
        assert_eq!(attachment.safe_filename(), "passwd");

        attachment.filename = "..".to_string();
        assert_eq!(attachment.safe_filename(), "attachment-A1");
    }
}
