use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::user::dto::{ErrorMessage, RegisterRequest, RegisterResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server responded with {status}")]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            ApiError::Transport(_) => None,
        }
    }
}

/// The one backend call the signup page makes.
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RegistrationApi for ApiClient {
    #[instrument(skip_all, fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let url = format!("{}/user/register", self.base_url);
        let res = self.http.post(&url).json(request).send().await?;
        let status = res.status();
        if status.is_success() {
            debug!(%status, "registration accepted");
            return Ok(res.json::<RegisterResponse>().await?);
        }

        let body = res.bytes().await?;
        let message = extract_message(&body);
        warn!(%status, message = ?message, "registration refused");
        Err(ApiError::Server { status, message })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: Option<ErrorMessage>,
}

fn extract_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.message)
        .map(ErrorMessage::into_text)
        .filter(|m| !m.is_empty())
}
