use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::models::Settings;

/// The AI API key. Only ever held by a [`GenAiClient`] or on its way there.
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        Ok(ApiCredentials { api_key })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let api_key = settings
            .api_key
            .as_ref()
            .ok_or(ClientError::MissingApiKey)?;
        Self::new(api_key.as_str())
    }

    /// Asks the key endpoint for `{"apiKey": ...}`.
    pub async fn fetch(http: &reqwest::Client, endpoint: &str) -> Result<Self, ClientError> {
        debug!("Fetching AI API key from {}", endpoint);
        let response = http.get(endpoint).send().await?;
        let status = response.status();
        let body = response.text().await?;
        parse_key_response(status, &body)
    }
}

#[derive(Deserialize)]
struct KeyResponse {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
    error: Option<String>,
}

pub fn parse_key_response(status: StatusCode, body: &str) -> Result<ApiCredentials, ClientError> {
    let parsed = serde_json::from_str::<KeyResponse>(body).ok();

    if !status.is_success() {
        let reason = parsed
            .and_then(|r| r.error)
            .unwrap_or_else(|| status.to_string());
        return Err(ClientError::KeyEndpoint(reason));
    }

    let parsed = parsed.ok_or_else(|| ClientError::KeyEndpoint("Invalid JSON".to_string()))?;
    if let Some(error) = parsed.error {
        return Err(ClientError::KeyEndpoint(error));
    }
    ApiCredentials::new(parsed.api_key.unwrap_or_default())
}

/// Client for the generative AI API. Build one at startup and pass it by
/// reference; it owns the credentials and the HTTP connection pool.
#[derive(Debug)]
pub struct GenAiClient {
    http: reqwest::Client,
    credentials: ApiCredentials,
    api_base: String,
    model: String,
    timeout_secs: u64,
}

impl GenAiClient {
    pub fn new(credentials: ApiCredentials, settings: &Settings) -> Result<Self, ClientError> {
        let http = build_http(settings)?;
        Ok(Self::with_http(http, credentials, settings))
    }

    /// Uses the configured key, or fetches one from the key endpoint when
    /// only that is configured.
    pub async fn connect(settings: &Settings) -> Result<Self, ClientError> {
        let http = build_http(settings)?;
        let credentials = match (ApiCredentials::from_settings(settings), &settings.key_endpoint) {
            (Ok(credentials), _) => credentials,
            (Err(ClientError::MissingApiKey), Some(endpoint)) => {
                ApiCredentials::fetch(&http, endpoint).await?
            }
            (Err(err), _) => return Err(err),
        };
        info!("AI client ready for model {}", settings.model);
        Ok(Self::with_http(http, credentials, settings))
    }

    fn with_http(http: reqwest::Client, credentials: ApiCredentials, settings: &Settings) -> Self {
        GenAiClient {
            http,
            credentials,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            timeout_secs: settings.request_timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.api_base, self.model)
    }

    /// `Ok(false)` when the API rejects the key. Nothing is retried.
    pub async fn verify_key(&self) -> Result<bool, ClientError> {
        let response = self
            .http
            .get(self.model_url())
            .header("x-goog-api-key", &self.credentials.api_key)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            warn!("AI API rejected the key: {}", status);
            return Ok(false);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::Http(err)
        }
    }
}

fn build_http(settings: &Settings) -> Result<reqwest::Client, ClientError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()?;
    Ok(client)
}
