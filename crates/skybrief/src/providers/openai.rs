use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use super::base::{Provider, Usage};
use super::error::ProviderError;
use super::utils::{response_to_turn, tools_to_openai_spec, turns_to_openai_spec};
use crate::config::{self, Config};
use crate::models::message::Turn;
use crate::models::tool::ToolSpec;

/// Connection settings for an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
}

impl OpenAiProviderConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.openai_host, &config.openai_api_key, &config.model)
    }
}

/// A [`Provider`] speaking the OpenAI chat-completions schema.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config::GATEWAY_TIMEOUT)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    fn get_usage(response: &Value) -> Usage {
        let field = |name: &str| {
            response
                .pointer(&format!("/usage/{name}"))
                .and_then(Value::as_i64)
                .map(|v| v as i32)
        };
        let input = field("prompt_tokens");
        let output = field("completion_tokens");
        let total = field("total_tokens").or(match (input, output) {
            (Some(i), Some(o)) => Some(i + o),
            _ => None,
        });
        Usage::new(input, output, total)
    }

    async fn post(&self, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Auth(status)),
            StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimit),
            status if status.is_server_error() => Err(ProviderError::Server(status)),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(ProviderError::Api { status, detail })
            }
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[ToolSpec],
    ) -> Result<(Turn, Usage), ProviderError> {
        let mut payload = json!({
            "model": self.config.model,
            "messages": turns_to_openai_spec(turns),
        });
        // An empty catalog is omitted entirely; some endpoints reject
        // "tools": [].
        if !tools.is_empty() {
            let tools_spec = tools_to_openai_spec(tools)?;
            if let Some(object) = payload.as_object_mut() {
                object.insert("tools".to_string(), json!(tools_spec));
            }
        }

        let response = self.post(payload).await?;

        // Some compatible gateways report failures in a 200 body.
        if let Some(error) = response.get("error") {
            return Err(ProviderError::MalformedResponse(format!(
                "response carried an error body: {error}"
            )));
        }

        let turn = response_to_turn(&response)?;
        let usage = Self::get_usage(&response);
        debug!(?usage, "chat completion finished");
        Ok((turn, usage))
    }
}
