use anyhow::Result;
use skybrief::models::message::Turn;

pub mod rustyline;

/// Terminal surface for a session. The session loop talks to this trait so
/// tests can drive it with a scripted implementation.
pub trait Prompt {
    fn render(&mut self, turn: &Turn);
    fn render_text(&mut self, content: &str);
    fn render_error(&self, message: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&self);
    fn close(&self);

    fn ready(&self) {
        println!();
        println!("🛫 Aviation weather assistant. Ask about conditions at any airport.");
        println!("   Try \"what's the weather at KSEA?\" or /brief KSEA. Type /help for commands.");
        println!();
    }

    fn show_help(&self) {
        println!("Commands:");
        println!("/brief <ICAO> - Full METAR/TAF briefing without asking the model");
        println!("/t - Toggle Light/Dark theme");
        println!("/? | /help - Display this help message");
        println!("exit | /exit - Leave the session");
        println!("Ctrl+C - Interrupt the current request and reset to before it");
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>,
}

pub enum InputType {
    /// Ask the user for input again. Control flow only.
    AskAgain,
    /// A message bound for the conversation.
    Message,
    /// Direct briefing request that bypasses the model.
    Brief,
    /// Show the command list.
    Help,
    /// Leave the session.
    Exit,
}

pub enum Theme {
    Light,
    Dark,
}

/// Classify one line of user input. Pure so the command grammar is testable
/// without a terminal.
pub fn classify(line: &str) -> Input {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Input {
            input_type: InputType::AskAgain,
            content: None,
        };
    }

    let lowered = trimmed.to_lowercase();
    if matches!(lowered.as_str(), "exit" | "quit" | "/exit" | "/quit") {
        return Input {
            input_type: InputType::Exit,
            content: None,
        };
    }
    if matches!(lowered.as_str(), "/help" | "/?") {
        return Input {
            input_type: InputType::Help,
            content: None,
        };
    }
    if lowered == "/brief" {
        return Input {
            input_type: InputType::Brief,
            content: None,
        };
    }
    if let Some(rest) = trimmed.strip_prefix("/brief ") {
        return Input {
            input_type: InputType::Brief,
            content: Some(rest.trim().to_string()),
        };
    }

    Input {
        input_type: InputType::Message,
        content: Some(trimmed.to_string()),
    }
}
