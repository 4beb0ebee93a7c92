use std::collections::HashSet;

use futures::future::join_all;
use indoc::indoc;
use tracing::{debug, warn};

use crate::conversation::Conversation;
use crate::errors::AgentError;
use crate::models::message::Turn;
use crate::providers::base::Provider;
use crate::registry::ToolRegistry;

/// Default system framing for the aviation assistant.
pub const SYSTEM_PROMPT: &str = indoc! {"
    You are an aviation weather assistant for pilots. You can fetch METAR
    reports, TAF forecasts, and NOTAMs for any ICAO airport code, interpret
    raw reports into plain English, and search the web for anything the
    weather tools do not cover. Always call the tools before answering a
    question about airport weather, and tell the pilot whether conditions
    are VFR, MVFR, or IFR and what the winds and visibility are like.
    Never invent report contents; if a tool reports a failure, say so.
"};

/// Drives the conversation one user turn at a time: submit the history and
/// tool catalog, dispatch whatever the model requests, feed the results
/// back, and land on a final text reply.
pub struct Agent {
    provider: Box<dyn Provider>,
    registry: ToolRegistry,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider>, registry: ToolRegistry) -> Self {
        Agent { provider, registry }
    }

    /// Advance the conversation by one user turn.
    ///
    /// On success the conversation gains the user turn, any tool exchange
    /// the model requested, and a final assistant turn. The exchange is
    /// buffered and committed only once the whole turn succeeds, so a
    /// gateway failure, a protocol violation, or a cancelled (dropped) call
    /// leaves the conversation with only the user turn appended and no
    /// partially resolved tool calls.
    ///
    /// A turn makes at most two gateway calls: the second submission carries
    /// an empty catalog, which obliges the model to answer in text.
    pub async fn advance(
        &self,
        conversation: &mut Conversation,
        user_text: impl Into<String>,
    ) -> Result<(), AgentError> {
        conversation.push(Turn::user(user_text));

        let catalog = self.registry.specs();
        debug!(tools = catalog.len(), turns = conversation.len(), "submitting conversation");
        let (reply, usage) = self.provider.complete(conversation.turns(), &catalog).await?;
        debug!(?usage, "first gateway round finished");

        if !reply.has_tool_calls() {
            conversation.push(reply);
            return Ok(());
        }

        check_distinct_ids(&reply)?;

        let mut exchange = vec![reply];
        let calls = exchange[0].tool_calls.clone();

        debug!(calls = calls.len(), "dispatching requested tools");
        let dispatches = calls
            .iter()
            .map(|call| self.registry.dispatch(&call.name, &call.arguments));
        let outputs = join_all(dispatches).await;

        for (call, output) in calls.iter().zip(outputs) {
            exchange.push(Turn::tool_result(call.id.clone(), output));
        }

        let submission: Vec<Turn> = conversation
            .turns()
            .iter()
            .chain(exchange.iter())
            .cloned()
            .collect();
        let (final_reply, usage) = self.provider.complete(&submission, &[]).await?;
        debug!(?usage, "final gateway round finished");

        if final_reply.has_tool_calls() {
            warn!("model requested tools in the text-only round");
            return Err(AgentError::Protocol(
                "model requested further tools in the text-only round".to_string(),
            ));
        }

        exchange.push(final_reply);
        conversation.extend(exchange);
        Ok(())
    }
}

/// Every pending call in one assistant turn must carry a distinct id;
/// results are correlated by id, so a duplicate is undispatchable.
fn check_distinct_ids(reply: &Turn) -> Result<(), AgentError> {
    let mut seen = HashSet::new();
    for call in &reply.tool_calls {
        if !seen.insert(call.id.as_str()) {
            return Err(AgentError::Protocol(format!(
                "tool call id `{}` issued twice in one assistant turn",
                call.id
            )));
        }
    }
    Ok(())
}
