//! Error types for the AI gateway.

/// Errors surfaced by generative backends and `AiGateway::try_analyze`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No API key was configured.
    #[error("api key not configured")]
    NotConfigured,
    /// Transport-level failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The service answered without any text.
    #[error("empty response from service")]
    EmptyResponse,
    /// Response text was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Reading the image failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
