//! Tool adapters over the aviation weather services.
//!
//! Every adapter resolves to plain text for the conversation. Failures are
//! encoded inline rather than raised: ❌ marks a hard failure (bad input,
//! network trouble, upstream error) and ⚠️ marks a soft miss (the service
//! answered but had nothing useful). The orchestration loop never inspects
//! the markers; they exist for the model and for the shell's briefing
//! shortcut.

pub mod avwx;
pub mod interpret;
pub mod notams;
pub mod web_search;

use std::sync::Arc;

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Config;
use crate::registry::ToolRegistry;

use avwx::{AvwxClient, MetarTool, TafTool};
use interpret::InterpretTool;
use notams::NotamTool;
use web_search::WebSearchTool;

/// Prefix on adapter output that reports a hard failure.
pub const FAILURE_MARK: &str = "❌";
/// Prefix on adapter output that reports a soft miss.
pub const WARNING_MARK: &str = "⚠️";

lazy_static! {
    static ref ICAO_RE: Regex = Regex::new(r"^[A-Z]{4}$").unwrap();
}

/// Normalize and validate an ICAO airport identifier.
///
/// Returns the cleaned code, or the marked failure text to hand back as the
/// adapter's result.
pub fn validate_icao(icao: &str) -> Result<String, String> {
    let cleaned = icao.trim().to_uppercase();
    if ICAO_RE.is_match(&cleaned) {
        Ok(cleaned)
    } else {
        Err(format!(
            "❌ Invalid ICAO format: {icao}. Must be 4 letters (e.g., KSEA, KSFO)."
        ))
    }
}

/// Assemble the default tool catalog, backed by the live weather services.
pub fn weather_toolset(config: &Config) -> Result<ToolRegistry> {
    let avwx = Arc::new(AvwxClient::new(&config.avwx_api_key)?);

    let mut registry = ToolRegistry::new();
    registry
        .register(MetarTool::spec(), MetarTool::new(avwx.clone()))
        .register(TafTool::spec(), TafTool::new(avwx))
        .register(InterpretTool::spec(), InterpretTool)
        .register(NotamTool::spec(), NotamTool::new()?)
        .register(WebSearchTool::spec(), WebSearchTool::new()?);
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icao_codes_are_trimmed_and_uppercased() {
        assert_eq!(validate_icao("ksea").unwrap(), "KSEA");
        assert_eq!(validate_icao("  EGLL  ").unwrap(), "EGLL");
    }

    #[test]
    fn bad_icao_codes_come_back_marked() {
        for bad in ["KS", "KSEAX", "K1EA", "", "sea-tac"] {
            let err = validate_icao(bad).unwrap_err();
            assert!(err.starts_with(FAILURE_MARK), "{bad:?} -> {err}");
            assert!(err.contains("Invalid ICAO format"));
        }
    }

    #[test]
    fn default_toolset_registers_the_full_catalog() {
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            avwx_api_key: "avwx-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            openai_host: "http://localhost".to_string(),
        };

        let registry = weather_toolset(&config).unwrap();
        let names: Vec<_> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "fetch_metar",
                "fetch_taf",
                "interpret_report",
                "fetch_notams",
                "search_web",
            ]
        );
    }
}
