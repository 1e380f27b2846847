//! mail.tm REST client

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{AuthToken, Domain, RemoteAccount};
use super::{Attachment, MailError, MailboxClient, MessageDetail, MessageSummary};
use crate::config::ApiConfig;

/// List endpoints answer either with a bare array or a hydra collection
#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    Plain(Vec<T>),
    Hydra {
        #[serde(rename = "hydra:member")]
        member: Vec<T>,
    },
}

impl<T> Collection<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Collection::Plain(items) => items,
            Collection::Hydra { member } => member,
        }
    }
}

fn parse_collection<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, MailError> {
    serde_json::from_slice::<Collection<T>>(body)
        .map(Collection::into_vec)
        .map_err(|e| MailError::UnexpectedFormat(e.to_string()))
}

/// HTTP client for one mailbox. Holds the bearer token explicitly.
#[derive(Clone)]
pub struct MailTmClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl MailTmClient {
    pub fn new(config: &ApiConfig) -> Result<Self, MailError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("burnmail/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Whether `url` points into the API rather than some other host
    fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
    }

    /// Request to `url`, carrying the bearer token only when it targets the API
    fn authorized(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.http.request(method, url);
        match self.token {
            Some(ref token) if self.is_api_url(url) => request.bearer_auth(token),
            Some(_) => {
                tracing::debug!("Not sending credentials to {}", url);
                request
            }
            None => request,
        }
    }

    /// Map anything but `expected` to a typed error
    fn check(
        response: Response,
        expected: StatusCode,
        context: &'static str,
    ) -> Result<Response, MailError> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        tracing::debug!("{} returned {}", context, status);
        if status == StatusCode::TOO_MANY_REQUESTS {
            Err(MailError::RateLimited)
        } else {
            Err(MailError::Status {
                status: status.as_u16(),
                context,
            })
        }
    }

    /// Active domains accounts can be created on
    pub async fn domains(&self) -> Result<Vec<Domain>, MailError> {
        let response = self.http.get(self.url("/domains")).send().await?;
        let body = Self::check(response, StatusCode::OK, "get domains")?
            .bytes()
            .await?;
        let domains: Vec<Domain> = parse_collection(&body)?;
        if domains.is_empty() {
            return Err(MailError::UnexpectedFormat("no domains returned".into()));
        }
        Ok(domains)
    }

    pub async fn create_account(
        &self,
        address: &str,
        password: &str,
    ) -> Result<RemoteAccount, MailError> {
        let response = self
            .http
            .post(self.url("/accounts"))
            .json(&json!({ "address": address, "password": password }))
            .send()
            .await?;
        let account = Self::check(response, StatusCode::CREATED, "create account")?
            .json()
            .await?;
        Ok(account)
    }

    pub async fn login(&self, address: &str, password: &str) -> Result<AuthToken, MailError> {
        let response = self
            .http
            .post(self.url("/token"))
            .json(&json!({ "address": address, "password": password }))
            .send()
            .await?;
        let token = Self::check(response, StatusCode::OK, "login")?
            .json()
            .await?;
        Ok(token)
    }

    pub async fn delete_account(&self, account_id: &str) -> Result<(), MailError> {
        let response = self
            .authorized(Method::DELETE, &self.url(&format!("/accounts/{}", account_id)))
            .send()
            .await?;
        Self::check(response, StatusCode::NO_CONTENT, "delete account")?;
        Ok(())
    }
}

#[async_trait]
impl MailboxClient for MailTmClient {
    async fn list_messages(&self) -> Result<Vec<MessageSummary>, MailError> {
        let response = self
            .authorized(Method::GET, &self.url("/messages"))
            .send()
            .await?;
        let body = Self::check(response, StatusCode::OK, "list messages")?
            .bytes()
            .await?;
        parse_collection(&body)
    }

    async fn message(&self, id: &str) -> Result<MessageDetail, MailError> {
        let response = self
            .authorized(Method::GET, &self.url(&format!("/messages/{}", id)))
            .send()
            .await?;
        let body = Self::check(response, StatusCode::OK, "get message")?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn delete_message(&self, id: &str) -> Result<(), MailError> {
        let response = self
            .authorized(Method::DELETE, &self.url(&format!("/messages/{}", id)))
            .send()
            .await?;
        Self::check(response, StatusCode::NO_CONTENT, "delete message")?;
        Ok(())
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailError> {
        let response = self
            .authorized(Method::PATCH, &self.url(&format!("/messages/{}", id)))
            .header(reqwest::header::CONTENT_TYPE, "application/merge-patch+json")
            .body(json!({ "seen": true }).to_string())
            .send()
            .await?;
        Self::check(response, StatusCode::OK, "mark as read")?;
        Ok(())
    }

    async fn download_attachment(
        &self,
        message_id: &str,
        attachment: &Attachment,
    ) -> Result<Vec<u8>, MailError> {
        let path = if attachment.download_url.is_empty() {
            format!("/messages/{}/attachment/{}", message_id, attachment.id)
        } else {
            attachment.download_url.clone()
        };
        let response = self
            .authorized(Method::GET, &self.url(&path))
            .send()
            .await?;
        let bytes = Self::check(response, StatusCode::OK, "download attachment")?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}
