//! Typed client for the wedding wishes API.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishList {
    pub data: Vec<serde_json::Value>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInvite {
    pub name: String,
    pub slug: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestName {
    pub name: String,
}

/// A non-2xx reply: status plus the server's `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiFailure {}

#[derive(Debug)]
pub enum SdkError {
    Http(reqwest::Error),
    Api(ApiFailure),
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkError::Http(e) => write!(f, "HTTP error: {}", e),
            SdkError::Api(e) => write!(f, "API error: {}", e),
        }
    }
}

impl std::error::Error for SdkError {}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Http(e)
    }
}

impl SdkError {
    /// The API failure, if this was one.
    pub fn api(&self) -> Option<&ApiFailure> {
        match self {
            SdkError::Api(f) => Some(f),
            SdkError::Http(_) => None,
        }
    }
}

pub struct WishesClient {
    client: Client,
    base_url: String,
}

impl WishesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, SdkError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let message = resp
            .json::<Message>()
            .await
            .map(|m| m.message)
            .unwrap_or_default();
        Err(SdkError::Api(ApiFailure { status, message }))
    }

    pub async fn health(&self) -> Result<Message, SdkError> {
        let resp = self.client.get(format!("{}/", self.base_url)).send().await?;
        Self::decode(resp).await
    }

    /// Submit a wish. Fields are optional so callers can probe validation.
    pub async fn send_wish(&self, name: Option<&str>, message: Option<&str>) -> Result<Message, SdkError> {
        let mut body = serde_json::Map::new();
        if let Some(name) = name {
            body.insert("name".into(), name.into());
        }
        if let Some(message) = message {
            body.insert("message".into(), message.into());
        }
        let resp = self
            .client
            .post(format!("{}/wish", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn list_wishes(&self) -> Result<WishList, SdkError> {
        let resp = self.client.get(format!("{}/wish", self.base_url)).send().await?;
        Self::decode(resp).await
    }

    pub async fn create_guest(&self, name: &str) -> Result<GuestInvite, SdkError> {
        let resp = self
            .client
            .post(format!("{}/admin/guest", self.base_url))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn get_guest(&self, slug: &str) -> Result<GuestName, SdkError> {
        let resp = self
            .client
            .get(format!("{}/guest/{}", self.base_url, slug))
            .send()
            .await?;
        Self::decode(resp).await
    }
}
