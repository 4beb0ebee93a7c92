use anyhow::Result;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config;
use crate::models::tool::{ToolParam, ToolSpec};
use crate::registry::ToolHandler;

/// How many results one search returns.
const MAX_RESULTS: usize = 3;

lazy_static! {
    // Result links on the HTML endpoint carry the result__a class.
    static ref RESULT_LINK_RE: Regex = Regex::new(
        r#"(?is)<a[^>]*class="[^"]*result__a[^"]*"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#
    )
    .unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
}

/// Client for the DuckDuckGo HTML endpoint, which needs no API key.
pub struct WebSearchClient {
    host: String,
    client: Client,
}

impl WebSearchClient {
    pub fn new() -> Result<Self> {
        Self::with_host(config::SEARCH_HOST)
    }

    /// Point the client at a different endpoint. Tests use this.
    pub fn with_host(host: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config::WEB_SEARCH_TIMEOUT)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(WebSearchClient {
            host: host.into(),
            client,
        })
    }

    /// Top results for a query, as titled links.
    pub async fn search(&self, query: &str) -> String {
        debug!(%query, "searching the web");
        let url = format!("{}/html/", self.host.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .form(&[("q", query)])
            .send()
            .await
            .and_then(|response| response.error_for_status());

        let body = match response {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(err) => return format!("❌ Error during web search: {err}"),
            },
            Err(err) => return format!("❌ Error during web search: {err}"),
        };

        parse_results(&body, query)
    }
}

fn parse_results(html: &str, query: &str) -> String {
    let results: Vec<String> = RESULT_LINK_RE
        .captures_iter(html)
        .take(MAX_RESULTS)
        .map(|caps| {
            let link = caps[1].to_string();
            let title = TAG_RE.replace_all(&caps[2], "");
            format!("🔗 {}\n{link}", title.trim())
        })
        .collect();

    if results.is_empty() {
        return format!("⚠️ No web results found for '{query}'.");
    }
    results.join("\n\n")
}

/// `search_web`: general lookups the weather tools do not cover.
pub struct WebSearchTool {
    client: WebSearchClient,
}

impl WebSearchTool {
    pub fn new() -> Result<Self> {
        Ok(WebSearchTool {
            client: WebSearchClient::new()?,
        })
    }

    pub fn with_client(client: WebSearchClient) -> Self {
        WebSearchTool { client }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            "search_web",
            "Search the web for information the weather tools do not cover, like airport services or fuel prices.",
        )
        .with_param(ToolParam::required("query", "The search query."))
    }
}

#[async_trait]
impl ToolHandler for WebSearchTool {
    async fn call(&self, args: &Value) -> String {
        let query = args.get("query").and_then(Value::as_str).unwrap_or_default();
        self.client.search(query).await
    }
}
