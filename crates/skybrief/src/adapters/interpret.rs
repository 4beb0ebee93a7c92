use async_trait::async_trait;
use indoc::formatdoc;
use serde_json::Value;

use crate::models::tool::{ToolParam, ToolSpec};
use crate::registry::ToolHandler;

/// Wrap a raw report in an interpretation request for the model.
///
/// Nothing is parsed here. The wrapped prompt rides back through the loop as
/// a tool result, and the model authors the actual plain-English explanation
/// in its final reply.
pub fn interpret_report(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "❌ No report provided for interpretation.".to_string();
    }

    if looks_like_taf(raw) {
        formatdoc! {"
            📄 Here's a plain-English summary of the TAF:

            \"{raw}\"

            Please explain the forecast periods, wind changes, visibility, precipitation, and cloud layers in detail.
        "}
    } else {
        formatdoc! {"
            📝 Please interpret the following METAR in plain English:

            {raw}

            Break down the wind, visibility, temperature, altimeter setting, cloud layers, and any special weather remarks. Mention if conditions are VFR, MVFR, or IFR.
        "}
    }
}

/// TAF detection must also work on composed text that prefixes the raw
/// report with a label line, so check line starts rather than the first
/// character of the whole string.
fn looks_like_taf(raw: &str) -> bool {
    raw.lines().any(|line| line.trim_start().starts_with("TAF"))
}

/// `interpret_report`: turn a raw METAR or TAF into flight-condition prose.
pub struct InterpretTool;

impl InterpretTool {
    pub fn spec() -> ToolSpec {
        ToolSpec::new(
            "interpret_report",
            "Interpret a raw METAR or TAF report into human-friendly flight conditions.",
        )
        .with_param(ToolParam::required(
            "raw_text",
            "The raw METAR or TAF string to interpret.",
        ))
    }
}

#[async_trait]
impl ToolHandler for InterpretTool {
    async fn call(&self, args: &Value) -> String {
        let raw = args.get("raw_text").and_then(Value::as_str).unwrap_or_default();
        interpret_report(raw)
    }
}
