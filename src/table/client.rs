use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use super::config::RowId;
use crate::core::ResourcePage;

/// Failures as seen by the table, mirroring the server's error taxonomy
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("{message}")]
    Validation {
        message: String,
        details: BTreeMap<String, Vec<String>>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// One fetch as issued by the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub params: Vec<(String, String)>,
}

impl PageRequest {
    /// Query-string pairs in a fixed order
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        query.extend(self.params.iter().cloned());
        query
    }
}

/// Transport used by the table; one implementation per environment
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn fetch_page(
        &self,
        endpoint: &str,
        request: &PageRequest,
    ) -> Result<ResourcePage<Value>, TableError>;

    async fn delete_row(&self, endpoint: &str, id: &RowId) -> Result<(), TableError>;
}

/// reqwest-backed client for the admin API.
///
/// Requests are sent once; there is no retry or caching layer.
#[derive(Clone)]
pub struct HttpTableApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTableApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Bearer token sent with mutating requests
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// `{endpoint}/{id}` with the id percent-encoded as one path segment
    fn row_url(&self, endpoint: &str, id: &RowId) -> Result<Url, TableError> {
        let mut url = Url::parse(&self.url(endpoint))
            .map_err(|e| TableError::Transport(format!("Invalid table URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| TableError::Transport("Table URL cannot take a row id".to_string()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl TableApi for HttpTableApi {
    async fn fetch_page(
        &self,
        endpoint: &str,
        request: &PageRequest,
    ) -> Result<ResourcePage<Value>, TableError> {
        let url = self.url(endpoint);

        let response = self
            .client
            .get(&url)
            .query(&request.to_query())
            .send()
            .await
            .map_err(|e| TableError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TableError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| TableError::Decode(e.to_string()))
    }

    async fn delete_row(&self, endpoint: &str, id: &RowId) -> Result<(), TableError> {
        let url = self.row_url(endpoint, id)?;

        let mut request = self.client.delete(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TableError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TableError::Transport(e.to_string()))?;
        Err(classify(status, &body))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: BTreeMap<String, Vec<String>>,
}

/// Map a non-success response back to a `TableError`
pub fn classify(status: StatusCode, body: &[u8]) -> TableError {
    let ErrorBody { error, details } = serde_json::from_slice(body).unwrap_or_default();
    let message = if error.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        error
    };

    match status {
        StatusCode::BAD_REQUEST => TableError::Validation { message, details },
        StatusCode::NOT_FOUND => TableError::NotFound(message),
        StatusCode::CONFLICT => TableError::Conflict(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TableError::Unauthorized(message),
        _ => TableError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
