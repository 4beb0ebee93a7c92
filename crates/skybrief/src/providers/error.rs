use reqwest::StatusCode;
use thiserror::Error;

/// Gateway failures. These abort the turn that triggered them; unlike
/// adapter failures they are never fed back to the model as content.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection, DNS, or timeout problems before a status line arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication rejected ({0})")]
    Auth(StatusCode),

    #[error("rate limited by the model endpoint")]
    RateLimit,

    #[error("model endpoint error: {0}")]
    Server(StatusCode),

    /// Any other non-success status, with whatever detail the body carried.
    #[error("request rejected ({status}): {detail}")]
    Api { status: StatusCode, detail: String },

    /// The request could not be expressed in the wire schema.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A 200 response whose body does not form a usable assistant turn.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}
