// src/infrastructure/http.rs
use crate::application::{ListNotesParams, NoteService};
use crate::domain::{DeleteConfirmation, DomainError, NewNotePayload, Note, NotesPage};
use crate::infrastructure::config::{Config, ENV_TOKEN};
use anyhow::{bail, Context, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Which call a failed response belongs to; the same status maps differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Delete(u64),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-success status to the error callers see.
pub fn classify(operation: Operation, status: StatusCode, message: String) -> DomainError {
    let auth_failure = status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
    match operation {
        Operation::Create if status.is_client_error() && !auth_failure => {
            DomainError::Rejected(message)
        }
        Operation::Delete(id) if status.is_client_error() && !auth_failure => {
            DomainError::NotFound(id)
        }
        _ => DomainError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn transport_error(err: reqwest::Error) -> DomainError {
    if err.is_timeout() {
        DomainError::Network("request timed out".to_string())
    } else {
        DomainError::Network(err.to_string())
    }
}

/// NoteHub REST client.
#[derive(Clone)]
pub struct HttpNoteService {
    client: reqwest::Client,
    base_url: Url,
    token: Option<Arc<str>>,
}

impl HttpNoteService {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL: {}", config.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            bail!("Base URL must be an http(s) URL: {}", config.base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("Failed to initialize HTTP client")?;

        let token: Option<Arc<str>> = config.token.as_deref().map(Arc::from);
        if token.is_none() {
            warn!(
                "{} is not set; requests are sent without credentials and may be rejected (401)",
                ENV_TOKEN
            );
        }

        debug!(%base_url, "Created NoteHub client");
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// `{base}/notes` or `{base}/notes/{id}`.
    pub fn notes_url(&self, id: Option<u64>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("notes");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        url
    }

    /// List URL; `search` is only present when it has non-blank content.
    pub fn list_url(&self, params: &ListNotesParams) -> Url {
        let mut url = self.notes_url(None);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &params.page.to_string())
                .append_pair("perPage", &params.per_page.to_string());
            if let Some(search) = params.search_filter() {
                query.append_pair("search", search);
            }
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, operation: Operation) -> Result<Response, DomainError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
            });
        debug!(?operation, status = status.as_u16(), %message, "Request failed");
        Err(classify(operation, status, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::Api {
            status,
            message: format!("unexpected response: {e}"),
        })
    }
}

impl NoteService for HttpNoteService {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&self, params: &ListNotesParams) -> Result<NotesPage, DomainError> {
        let request = self.client.get(self.list_url(params));
        let response = self.send(request, Operation::List).await?;
        let page: NotesPage = Self::decode(response).await?;
        debug!(count = page.notes.len(), total_pages = page.total_pages, "Fetched notes");
        Ok(page.normalized())
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_note(&self, payload: &NewNotePayload) -> Result<Note, DomainError> {
        let request = self.client.post(self.notes_url(None)).json(payload);
        let response = self.send(request, Operation::Create).await?;
        Self::decode(response).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: u64) -> Result<DeleteConfirmation, DomainError> {
        let request = self.client.delete(self.notes_url(Some(id)));
        let response = self.send(request, Operation::Delete(id)).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        // any 2xx is a confirmation; the body is informational only
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }
}
