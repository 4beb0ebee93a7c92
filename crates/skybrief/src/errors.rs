use thiserror::Error;

use crate::providers::error::ProviderError;

/// Fatal startup problems. These are reported before the first turn is
/// accepted; nothing in the conversation path produces one.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),
}

/// Failures that abort a single call to [`crate::agent::Agent::advance`].
///
/// Adapter and registry failures never surface here; they are encoded as
/// marked tool-result text and flow back to the model instead.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("model gateway call failed: {0}")]
    Gateway(#[from] ProviderError),
    #[error("model reply broke the tool-call protocol: {0}")]
    Protocol(String),
}
