use crate::adapters::avwx::AvwxClient;
use crate::adapters::interpret::interpret_report;
use crate::adapters::{validate_icao, FAILURE_MARK};

/// Compose a full weather briefing for one airport without going through
/// the model loop.
///
/// Unlike tool dispatch, which always hands failures to the model to
/// explain, this direct path short-circuits on the first failed fetch and
/// surfaces the failure to the caller immediately.
pub async fn full_brief(client: &AvwxClient, icao: &str) -> String {
    let icao = match validate_icao(icao) {
        Ok(icao) => icao,
        Err(message) => return message,
    };

    let metar = client.fetch_metar(&icao).await;
    if metar.contains(FAILURE_MARK) {
        return format!("❌ Failed to get METAR for {icao}. Skipping briefing.");
    }

    let taf = client.fetch_taf(&icao).await;
    if taf.contains(FAILURE_MARK) {
        return format!("❌ Failed to get TAF for {icao}. Skipping briefing.");
    }

    let interpretation = interpret_report(&taf);

    format!(
        "📋 Full Weather Briefing for {icao}:\n\n\
         ---\n\n\
         🛰️ METAR:\n{metar}\n\n\
         ---\n\n\
         📄 TAF (Forecast):\n{taf}\n\n\
         ---\n\n\
         🧠 Interpreted Forecast:\n{interpretation}"
    )
}
