use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use crate::models::message::Turn;
use crate::models::tool::ToolSpec;

/// Token accounting reported by the model endpoint, when available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// The seam between the orchestration loop and the model service.
///
/// One call produces one assistant turn: either terminal text, or a
/// non-empty set of pending tool calls that must all be resolved before the
/// conversation is submitted again. Submitting with an empty `tools` catalog
/// tells the model it must answer in text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Submit the full conversation (including its system turn) and the
    /// tool catalog, and return the model's next turn with usage data.
    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[ToolSpec],
    ) -> Result<(Turn, Usage), ProviderError>;
}
