use std::sync::Arc;

use anyhow::Result;
use skybrief::adapters::avwx::AvwxClient;
use skybrief::agent::Agent;
use skybrief::briefing::full_brief;
use skybrief::conversation::Conversation;

use crate::prompt::{InputType, Prompt};

pub struct Session {
    agent: Agent,
    prompt: Box<dyn Prompt>,
    avwx: Arc<AvwxClient>,
    conversation: Conversation,
}

impl Session {
    pub fn new(
        agent: Agent,
        prompt: Box<dyn Prompt>,
        avwx: Arc<AvwxClient>,
        conversation: Conversation,
    ) -> Self {
        Session {
            agent,
            prompt,
            avwx,
            conversation,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.ready();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = input.content {
                        self.process_turn(&content).await;
                    }
                }
                InputType::Brief => match input.content {
                    Some(icao) => self.run_briefing(&icao).await,
                    None => self.prompt.render_error("Usage: /brief <ICAO>"),
                },
                InputType::Help => self.prompt.show_help(),
                InputType::AskAgain => continue,
                InputType::Exit => break,
            }
        }

        self.prompt.close();
        Ok(())
    }

    /// Run one full orchestration turn and render whatever it appended.
    ///
    /// On failure or interrupt the conversation is reset to before the user
    /// message, so retyping it does not stack duplicate turns.
    async fn process_turn(&mut self, content: &str) {
        let checkpoint = self.conversation.len();
        self.prompt.show_busy();

        let outcome = tokio::select! {
            outcome = self.agent.advance(&mut self.conversation, content) => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };
        self.prompt.hide_busy();

        match outcome {
            Some(Ok(())) => {
                // Skip the user's own message; render the exchange.
                for turn in &self.conversation.turns()[checkpoint + 1..] {
                    self.prompt.render(turn);
                }
            }
            Some(Err(err)) => {
                self.conversation.truncate(checkpoint);
                self.prompt.render_error(&format!("Turn failed: {err}"));
            }
            None => {
                self.conversation.truncate(checkpoint);
                self.prompt.render_error(
                    "Interrupted. Conversation reset to before the last message.",
                );
            }
        }
    }

    /// The /brief shortcut goes straight to the weather services.
    async fn run_briefing(&mut self, icao: &str) {
        self.prompt.show_busy();
        let briefing = full_brief(&self.avwx, icao).await;
        self.prompt.hide_busy();
        self.prompt.render_text(&briefing);
    }
}
