use anyhow::Result;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::validate_icao;
use crate::config;
use crate::models::tool::{ToolParam, ToolSpec};
use crate::registry::ToolHandler;

lazy_static! {
    // The retrieval page wraps the raw NOTAM text in a single <pre> block.
    static ref PRE_BLOCK_RE: Regex = Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap();
}

/// Client for the FAA PilotWeb NOTAM retrieval page.
pub struct NotamClient {
    host: String,
    client: Client,
}

impl NotamClient {
    pub fn new() -> Result<Self> {
        Self::with_host(config::NOTAM_HOST)
    }

    /// Point the client at a different endpoint. Tests use this.
    pub fn with_host(host: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config::NOTAM_TIMEOUT)
            .user_agent(config::USER_AGENT)
            .build()?;
        Ok(NotamClient {
            host: host.into(),
            client,
        })
    }

    /// Current NOTAMs for a station, capped at
    /// [`config::MAX_NOTAMS_DISPLAY`] entries.
    pub async fn fetch_notams(&self, icao: &str) -> String {
        let icao = match validate_icao(icao) {
            Ok(icao) => icao,
            Err(message) => return message,
        };

        debug!(%icao, "fetching NOTAMs");
        let url = format!(
            "{}/PilotWeb/notamsRetrievalByICAOAction.do",
            self.host.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("method", "displayByICAOs"),
                ("reportType", "RAW"),
                ("formatType", "DOMESTIC"),
                ("retrieveLocId", icao.as_str()),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status());

        let body = match response {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(err) => return format!("❌ Error fetching NOTAMs for {icao}: {err}"),
            },
            Err(err) => return format!("❌ Error fetching NOTAMs for {icao}: {err}"),
        };

        parse_notams(&body, &icao)
    }
}

/// Extract and trim the NOTAM block from the retrieval page.
fn parse_notams(html: &str, icao: &str) -> String {
    let block = match PRE_BLOCK_RE.captures(html).and_then(|caps| caps.get(1)) {
        Some(block) => block.as_str().trim(),
        None => return format!("⚠️ Could not find NOTAM block for {icao}."),
    };

    if block.to_uppercase().contains("NO NOTAM") {
        return format!("✅ No NOTAMs found for {icao}.");
    }

    let notams: Vec<&str> = block
        .split("\n\n")
        .map(str::trim)
        .filter(|notam| !notam.is_empty())
        .collect();
    if notams.is_empty() {
        return format!("✅ No NOTAMs found for {icao}.");
    }

    let shown: Vec<&str> = notams
        .iter()
        .take(config::MAX_NOTAMS_DISPLAY)
        .copied()
        .collect();
    format!("📢 NOTAMs for {icao}:\n\n{}", shown.join("\n\n"))
}

/// `fetch_notams`: active notices for an airport.
pub struct NotamTool {
    client: NotamClient,
}

impl NotamTool {
    pub fn new() -> Result<Self> {
        Ok(NotamTool {
            client: NotamClient::new()?,
        })
    }

    pub fn with_client(client: NotamClient) -> Self {
        NotamTool { client }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            "fetch_notams",
            "Fetch current NOTAMs (notices to air missions) for an ICAO airport code.",
        )
        .with_param(ToolParam::required(
            "icao",
            "The 4-letter ICAO code for the airport, e.g. KSEA or KSFO.",
        ))
    }
}

#[async_trait]
impl ToolHandler for NotamTool {
    async fn call(&self, args: &Value) -> String {
        let icao = args.get("icao").and_then(Value::as_str).unwrap_or_default();
        self.client.fetch_notams(icao).await
    }
}
