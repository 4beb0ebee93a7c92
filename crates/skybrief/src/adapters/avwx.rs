use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::validate_icao;
use crate::config;
use crate::models::tool::{ToolParam, ToolSpec};
use crate::registry::ToolHandler;

/// Client for the AVWX REST service, which serves both METARs and TAFs.
pub struct AvwxClient {
    host: String,
    api_key: String,
    client: Client,
}

impl AvwxClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_host(config::AVWX_HOST, api_key)
    }

    /// Point the client at a different endpoint. Tests use this.
    pub fn with_host(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(config::USER_AGENT).build()?;
        Ok(AvwxClient {
            host: host.into(),
            api_key: api_key.into(),
            client,
        })
    }

    async fn get_json(&self, path: &str, timeout: std::time::Duration) -> Result<Value, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.host.trim_end_matches('/'), path))
            .timeout(timeout)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// The latest METAR for a station, as raw report text.
    pub async fn fetch_metar(&self, icao: &str) -> String {
        let icao = match validate_icao(icao) {
            Ok(icao) => icao,
            Err(message) => return message,
        };

        debug!(%icao, "fetching METAR");
        match self.get_json(&format!("/api/metar/{icao}"), config::METAR_TIMEOUT).await {
            Ok(data) => match data.get("raw").and_then(Value::as_str) {
                Some(raw) if !raw.is_empty() => raw.to_string(),
                _ => format!("⚠️ METAR not found for {icao}."),
            },
            Err(err) if err.is_timeout() => format!("❌ Timeout fetching METAR for {icao}."),
            Err(err) if err.is_status() => format!("❌ AVWX HTTP error for {icao}: {err}"),
            Err(err) => format!("❌ Failed to fetch METAR for {icao} from AVWX: {err}"),
        }
    }

    /// The latest TAF for a station, falling back to nearby fields when the
    /// station publishes none.
    pub async fn fetch_taf(&self, icao: &str) -> String {
        let icao = match validate_icao(icao) {
            Ok(icao) => icao,
            Err(message) => return message,
        };

        debug!(%icao, "fetching TAF");
        match self.get_json(&format!("/api/taf/{icao}"), config::TAF_TIMEOUT).await {
            Ok(data) => {
                if let Some(raw) = data.get("raw").and_then(Value::as_str).filter(|r| !r.is_empty()) {
                    return format!("📄 TAF for {icao}:\n{raw}");
                }
                self.nearby_taf(&icao).await
            }
            Err(err) if err.is_timeout() => format!("❌ Timeout fetching forecast for {icao}."),
            Err(err) if err.is_status() => format!("❌ AVWX HTTP error for {icao}: {err}"),
            Err(err) => format!("❌ Error fetching TAF for {icao}: {err}"),
        }
    }

    /// Look up the station's coordinates and try the closest fields, in the
    /// order AVWX returns them, for a published TAF.
    async fn nearby_taf(&self, icao: &str) -> String {
        let not_found = format!("⚠️ No TAF available for {icao}, and unable to find nearby airports.");

        let station = match self
            .get_json(&format!("/api/station/{icao}"), config::TAF_TIMEOUT)
            .await
        {
            Ok(station) => station,
            Err(_) => return not_found,
        };

        let coordinates = (
            station.get("latitude").and_then(Value::as_f64),
            station.get("longitude").and_then(Value::as_f64),
        );
        let (latitude, longitude) = match coordinates {
            (Some(latitude), Some(longitude)) => (latitude, longitude),
            _ => return not_found,
        };

        debug!(%icao, latitude, longitude, "no TAF published, trying nearby stations");
        let near_path = format!(
            "/api/station?near={latitude},{longitude}&n={}",
            config::NEARBY_STATION_LIMIT
        );
        let stations = match self.get_json(&near_path, config::TAF_TIMEOUT).await {
            Ok(stations) => stations,
            Err(_) => return not_found,
        };

        for station in stations.as_array().into_iter().flatten() {
            let nearby = match station.get("icao").and_then(Value::as_str) {
                Some(nearby) if nearby != icao => nearby,
                _ => continue,
            };
            if let Ok(data) = self.get_json(&format!("/api/taf/{nearby}"), config::TAF_TIMEOUT).await {
                if let Some(raw) = data.get("raw").and_then(Value::as_str).filter(|r| !r.is_empty()) {
                    return format!("📄 No TAF for {icao}, but found nearby at {nearby}:\n{raw}");
                }
            }
        }

        format!("⚠️ No TAF available for {icao} or nearby airports.")
    }
}

/// `fetch_metar`: current observed conditions for an airport.
pub struct MetarTool {
    client: Arc<AvwxClient>,
}

impl MetarTool {
    pub fn new(client: Arc<AvwxClient>) -> Self {
        MetarTool { client }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            "fetch_metar",
            "Fetch the latest METAR (current observed weather) for an ICAO airport code.",
        )
        .with_param(ToolParam::required(
            "icao",
            "The 4-letter ICAO code for the airport, e.g. KSEA or KSFO.",
        ))
    }
}

#[async_trait]
impl ToolHandler for MetarTool {
    async fn call(&self, args: &Value) -> String {
        let icao = args.get("icao").and_then(Value::as_str).unwrap_or_default();
        self.client.fetch_metar(icao).await
    }
}

/// `fetch_taf`: forecast conditions for an airport, with nearby fallback.
pub struct TafTool {
    client: Arc<AvwxClient>,
}

impl TafTool {
    pub fn new(client: Arc<AvwxClient>) -> Self {
        TafTool { client }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            "fetch_taf",
            "Fetch the latest TAF (terminal forecast) for an ICAO airport code, checking nearby airports if the field publishes none.",
        )
        .with_param(ToolParam::required(
            "icao",
            "The 4-letter ICAO code for the airport, e.g. KSEA or KSFO.",
        ))
    }
}

#[async_trait]
impl ToolHandler for TafTool {
    async fn call(&self, args: &Value) -> String {
        let icao = args.get("icao").and_then(Value::as_str).unwrap_or_default();
        self.client.fetch_taf(icao).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> AvwxClient {
        AvwxClient::with_host(server.uri(), "avwx-test").unwrap()
    }

    #[tokio::test]
    async fn metar_returns_the_raw_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metar/KSEA"))
            .and(header("Authorization", "avwx-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "raw": "METAR KSEA 211853Z 18010KT 10SM FEW250 22/10 A3012",
            })))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_metar("ksea").await;
        assert_eq!(result, "METAR KSEA 211853Z 18010KT 10SM FEW250 22/10 A3012");
    }

    #[tokio::test]
    async fn metar_without_raw_text_is_a_soft_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metar/KSEA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"raw": ""})))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_metar("KSEA").await;
        assert_eq!(result, "⚠️ METAR not found for KSEA.");
    }

    #[tokio::test]
    async fn metar_http_error_is_marked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metar/KSEA"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_metar("KSEA").await;
        assert!(result.starts_with("❌ AVWX HTTP error for KSEA:"), "{result}");
    }

    #[tokio::test]
    async fn invalid_icao_never_reaches_the_network() {
        let server = MockServer::start().await;
        let result = client(&server).await.fetch_metar("SEATAC").await;
        assert!(result.starts_with("❌ Invalid ICAO format"), "{result}");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn taf_returns_the_labelled_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/taf/KSEA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "raw": "TAF KSEA 211720Z 2118/2224 18008KT P6SM FEW250",
            })))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_taf("KSEA").await;
        assert_eq!(
            result,
            "📄 TAF for KSEA:\nTAF KSEA 211720Z 2118/2224 18008KT P6SM FEW250"
        );
    }

    #[tokio::test]
    async fn taf_falls_back_to_the_nearest_publishing_station() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/taf/KRNT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"raw": ""})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/station/KRNT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 47.493,
                "longitude": -122.215,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/station"))
            .and(query_param("near", "47.493,-122.215"))
            .and(query_param("n", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"icao": "KRNT"},
                {"icao": "KBFI"},
                {"icao": "KSEA"},
            ])))
            .mount(&server)
            .await;
        // The first candidate after the station itself has no TAF either.
        Mock::given(method("GET"))
            .and(path("/api/taf/KBFI"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/taf/KSEA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "raw": "TAF KSEA 211720Z 2118/2224 18008KT P6SM FEW250",
            })))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_taf("KRNT").await;
        assert_eq!(
            result,
            "📄 No TAF for KRNT, but found nearby at KSEA:\nTAF KSEA 211720Z 2118/2224 18008KT P6SM FEW250"
        );
    }

    #[tokio::test]
    async fn taf_reports_when_no_station_nearby_publishes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/taf/KRNT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/station/KRNT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 47.493,
                "longitude": -122.215,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/station"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"icao": "KRNT"}])))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_taf("KRNT").await;
        assert_eq!(result, "⚠️ No TAF available for KRNT or nearby airports.");
    }

    #[tokio::test]
    async fn taf_fallback_degrades_when_the_station_lookup_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/taf/KRNT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/station/KRNT"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client(&server).await.fetch_taf("KRNT").await;
        assert_eq!(
            result,
            "⚠️ No TAF available for KRNT, and unable to find nearby airports."
        );
    }

    #[tokio::test]
    async fn metar_tool_reads_the_icao_argument() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metar/KSFO"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "raw": "METAR KSFO 211856Z 28012KT 10SM FEW008 18/12 A3008",
            })))
            .mount(&server)
            .await;

        let tool = MetarTool::new(Arc::new(client(&server).await));
        let result = tool.call(&json!({"icao": "KSFO"})).await;
        assert_eq!(result, "METAR KSFO 211856Z 28012KT 10SM FEW008 18/12 A3008");
    }
}
