use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::traits::CodeBrainApi;
use crate::config::ApiConfig;
use crate::error::{CodeBrainError, CodeBrainResult};
use crate::models::{Playbook, PlaybookCreate, Task, TaskCreate};
use crate::operation::Operation;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct InteractionRequest<'a> {
    input: &'a str,
}

/// reqwest-backed implementation of [`CodeBrainApi`].
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Resolve the endpoint base once from configuration.
    pub fn new(config: &ApiConfig) -> CodeBrainResult<Self> {
        let base = config.endpoint_base();
        let base_url = Url::parse(&base).map_err(|e| CodeBrainError::InvalidConfigValue {
            key: "api.base_url".to_string(),
            message: format!("'{}' is not a valid URL: {}", base, e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(CodeBrainError::InvalidConfigValue {
                key: "api.base_url".to_string(),
                message: format!("'{}' cannot be used as a base URL", base),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| CodeBrainError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        debug!("API client targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    /// Convenience constructor for a base URL that already includes any prefix.
    pub fn with_base_url(base_url: impl Into<String>) -> CodeBrainResult<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            path_prefix: Some(String::new()),
            timeout_secs: None,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, operation: Operation, segments: &[&str]) -> CodeBrainResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                CodeBrainError::request_failed(operation, "base URL cannot carry a path")
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn execute(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> CodeBrainResult<Response> {
        let response = request.send().await.map_err(|e| {
            let err = CodeBrainError::from_reqwest(operation, e);
            warn!(operation = %operation, "Request failed: {}", err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(status.as_u16(), status.canonical_reason(), &body);
            warn!(
                operation = %operation,
                status = status.as_u16(),
                "Request failed: {}",
                detail
            );
            return Err(CodeBrainError::status(operation, status.as_u16(), detail));
        }

        debug!(operation = %operation, status = status.as_u16(), "Request succeeded");
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> CodeBrainResult<T> {
        let response = self.execute(operation, request).await?;
        response.json::<T>().await.map_err(|e| {
            let err = CodeBrainError::from_reqwest(operation, e);
            warn!(operation = %operation, "Could not decode response: {}", err);
            err
        })
    }
}

/// Pull a readable reason out of an error response.
///
/// The service answers errors as `{"detail": "..."}`; anything else is truncated.
fn error_detail(status: u16, reason: Option<&str>, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        });

    let text = detail.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
            let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
            format!("{}...", cut)
        } else {
            trimmed.to_string()
        }
    });

    match (reason, text.is_empty()) {
        (Some(reason), true) => format!("HTTP {} {}", status, reason),
        (None, true) => format!("HTTP {}", status),
        (Some(reason), false) => format!("HTTP {} {}: {}", status, reason, text),
        (None, false) => format!("HTTP {}: {}", status, text),
    }
}

#[async_trait]
impl CodeBrainApi for HttpApiClient {
    async fn fetch_playbooks(&self) -> CodeBrainResult<Vec<Playbook>> {
        let op = Operation::LoadPlaybooks;
        let url = self.endpoint(op, &["playbooks"])?;
        self.request_json(op, self.client.get(url)).await
    }

    async fn get_playbook(&self, id: &str) -> CodeBrainResult<Playbook> {
        let op = Operation::LoadPlaybook;
        let url = self.endpoint(op, &["playbooks", id])?;
        self.request_json(op, self.client.get(url)).await
    }

    async fn create_playbook(&self, playbook: &PlaybookCreate) -> CodeBrainResult<Playbook> {
        let op = Operation::CreatePlaybook;
        let url = self.endpoint(op, &["playbooks"])?;
        self.request_json(op, self.client.post(url).json(playbook))
            .await
    }

    async fn delete_playbook(&self, id: &str) -> CodeBrainResult<()> {
        let op = Operation::DeletePlaybook;
        let url = self.endpoint(op, &["playbooks", id])?;
        self.execute(op, self.client.delete(url)).await?;
        Ok(())
    }

    async fn create_task(&self, task: &TaskCreate) -> CodeBrainResult<Task> {
        let op = Operation::CreateTask;
        let url = self.endpoint(op, &["tasks"])?;
        self.request_json(op, self.client.post(url).json(task)).await
    }

    async fn get_task(&self, id: &str) -> CodeBrainResult<Task> {
        let op = Operation::LoadTask;
        let url = self.endpoint(op, &["tasks", id])?;
        self.request_json(op, self.client.get(url)).await
    }

    async fn confirm_task(&self, id: &str) -> CodeBrainResult<Task> {
        let op = Operation::ConfirmTask;
        let url = self.endpoint(op, &["tasks", id, "confirm"])?;
        self.request_json(op, self.client.post(url)).await
    }

    async fn send_interaction(&self, id: &str, input: &str) -> CodeBrainResult<Task> {
        let op = Operation::SendInteraction;
        let url = self.endpoint(op, &["tasks", id, "interact"])?;
        let body = InteractionRequest { input };
        self.request_json(op, self.client.post(url).json(&body))
            .await
    }
}
