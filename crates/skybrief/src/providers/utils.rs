use serde_json::{json, Map, Value};

use super::error::ProviderError;
use crate::models::message::{PendingToolCall, Role, Turn};
use crate::models::tool::ToolSpec;

/// Convert conversation turns to the chat-completions message array.
///
/// Tool results go out under role "tool"; the internal role name differs
/// because the wire name collides with the tool catalog itself.
pub fn turns_to_openai_spec(turns: &[Turn]) -> Vec<Value> {
    turns.iter().map(turn_to_openai_spec).collect()
}

fn turn_to_openai_spec(turn: &Turn) -> Value {
    match turn.role {
        Role::System | Role::User => json!({
            "role": turn.role,
            "content": turn.content,
        }),
        Role::Assistant => {
            let mut message = Map::new();
            message.insert("role".to_string(), json!(turn.role));
            if let Some(content) = &turn.content {
                message.insert("content".to_string(), json!(content));
            }
            if !turn.tool_calls.is_empty() {
                let calls: Vec<Value> = turn
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments,
                            },
                        })
                    })
                    .collect();
                message.insert("tool_calls".to_string(), json!(calls));
            }
            Value::Object(message)
        }
        Role::ToolResult => json!({
            "role": "tool",
            "tool_call_id": turn.tool_call_id,
            "content": turn.content,
        }),
    }
}

/// Convert the registry catalog to the chat-completions tools array.
pub fn tools_to_openai_spec(tools: &[ToolSpec]) -> Result<Vec<Value>, ProviderError> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for tool in tools {
        if !seen.insert(tool.name.as_str()) {
            return Err(ProviderError::InvalidRequest(format!(
                "duplicate tool name in catalog: {}",
                tool.name
            )));
        }
        result.push(json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters_schema(),
            },
        }));
    }
    Ok(result)
}

/// Parse a chat-completions response body into an assistant turn.
///
/// A reply must carry text, tool calls, or both; one with neither cannot
/// advance the conversation and is rejected as malformed.
pub fn response_to_turn(response: &Value) -> Result<Turn, ProviderError> {
    let message = response
        .pointer("/choices/0/message")
        .ok_or_else(|| ProviderError::MalformedResponse("response carried no choices".to_string()))?;

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut calls = Vec::new();
    if let Some(raw_calls) = message.get("tool_calls").and_then(Value::as_array) {
        for raw in raw_calls {
            let id = raw.get("id").and_then(Value::as_str).unwrap_or_default();
            let name = raw
                .pointer("/function/name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let arguments = raw
                .pointer("/function/arguments")
                .and_then(Value::as_str)
                .unwrap_or_default();
            calls.push(PendingToolCall::new(id, name, arguments));
        }
    }

    if calls.is_empty() {
        match content {
            Some(text) => Ok(Turn::assistant(text)),
            None => Err(ProviderError::MalformedResponse(
                "assistant reply carried neither text nor tool calls".to_string(),
            )),
        }
    } else {
        Ok(Turn::assistant_with_calls(content, calls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tool::ToolParam;

    #[test]
    fn turns_convert_basic_text() {
        let turns = vec![Turn::system("Be helpful."), Turn::user("Hi there")];
        let spec = turns_to_openai_spec(&turns);

        assert_eq!(spec.len(), 2);
        assert_eq!(spec[0]["role"], "system");
        assert_eq!(spec[0]["content"], "Be helpful.");
        assert_eq!(spec[1]["role"], "user");
        assert_eq!(spec[1]["content"], "Hi there");
    }

    #[test]
    fn turns_convert_a_full_tool_exchange() {
        let turns = vec![
            Turn::user("What's the weather at KSEA?"),
            Turn::assistant_with_calls(
                None,
                vec![PendingToolCall::new(
                    "call_1",
                    "fetch_metar",
                    r#"{"icao": "KSEA"}"#,
                )],
            ),
            Turn::tool_result("call_1", "METAR KSEA 211853Z 18010KT 10SM FEW250 22/10 A3012"),
            Turn::assistant("Conditions look VFR."),
        ];

        let spec = turns_to_openai_spec(&turns);
        assert_eq!(spec.len(), 4);

        // The requesting turn has tool_calls and no content key at all.
        assert_eq!(spec[1]["role"], "assistant");
        assert!(spec[1].get("content").is_none());
        assert_eq!(spec[1]["tool_calls"][0]["id"], "call_1");
        assert_eq!(spec[1]["tool_calls"][0]["type"], "function");
        assert_eq!(spec[1]["tool_calls"][0]["function"]["name"], "fetch_metar");
        assert_eq!(
            spec[1]["tool_calls"][0]["function"]["arguments"],
            r#"{"icao": "KSEA"}"#
        );

        // The result rides back under role "tool" with the matching id.
        assert_eq!(spec[2]["role"], "tool");
        assert_eq!(spec[2]["tool_call_id"], "call_1");
        assert_eq!(
            spec[2]["content"],
            "METAR KSEA 211853Z 18010KT 10SM FEW250 22/10 A3012"
        );

        assert_eq!(spec[3]["role"], "assistant");
        assert_eq!(spec[3]["content"], "Conditions look VFR.");
    }

    #[test]
    fn tools_convert_to_function_declarations() {
        let tools = vec![ToolSpec::new("fetch_metar", "Fetch the latest METAR.")
            .with_param(ToolParam::required("icao", "The 4-letter ICAO code."))];

        let spec = tools_to_openai_spec(&tools).unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec[0]["type"], "function");
        assert_eq!(spec[0]["function"]["name"], "fetch_metar");
        assert_eq!(spec[0]["function"]["description"], "Fetch the latest METAR.");
        assert_eq!(
            spec[0]["function"]["parameters"]["required"],
            json!(["icao"])
        );
    }

    #[test]
    fn duplicate_tool_names_are_rejected() {
        let tools = vec![
            ToolSpec::new("fetch_metar", "One."),
            ToolSpec::new("fetch_metar", "Two."),
        ];
        let err = tools_to_openai_spec(&tools).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn response_with_text_becomes_a_terminal_turn() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "Conditions look VFR."}}],
        });
        let turn = response_to_turn(&response).unwrap();
        assert_eq!(turn.text(), Some("Conditions look VFR."));
        assert!(!turn.has_tool_calls());
    }

    #[test]
    fn response_with_tool_calls_keeps_raw_arguments() {
        let response = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {"name": "fetch_taf", "arguments": "{\"icao\":\"KSFO\"}"},
                }],
            }}],
        });

        let turn = response_to_turn(&response).unwrap();
        assert!(turn.content.is_none());
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].id, "call_abc");
        assert_eq!(turn.tool_calls[0].name, "fetch_taf");
        assert_eq!(turn.tool_calls[0].arguments, "{\"icao\":\"KSFO\"}");
    }

    #[test]
    fn response_with_text_and_tool_calls_keeps_both() {
        let response = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "Let me check that.",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "fetch_metar", "arguments": "{}"},
                }],
            }}],
        });

        let turn = response_to_turn(&response).unwrap();
        assert_eq!(turn.text(), Some("Let me check that."));
        assert!(turn.has_tool_calls());
    }

    #[test]
    fn response_with_neither_text_nor_calls_is_malformed() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": null}}],
        });
        let err = response_to_turn(&response).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn response_without_choices_is_malformed() {
        let err = response_to_turn(&json!({"object": "chat.completion"})).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
