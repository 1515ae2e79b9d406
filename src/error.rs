use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invoice feed lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("AI API key missing")]
    MissingApiKey,
    #[error("Key endpoint error: {0}")]
    KeyEndpoint(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("AI API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
