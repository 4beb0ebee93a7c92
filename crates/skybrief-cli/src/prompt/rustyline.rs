use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use serde_json::Value;
use skybrief::models::message::{PendingToolCall, Role, Turn};

use super::{classify, Input, InputType, Prompt, Theme};

const PROMPT: &str = "\x1b[1m\x1b[38;5;30m(✈ )> \x1b[0m";
const MAX_STRING_LENGTH: usize = 40;
const INDENT: &str = "    ";

pub struct RustylinePrompt {
    spinner: cliclack::ProgressBar,
    theme: Theme,
}

impl RustylinePrompt {
    pub fn new() -> Self {
        RustylinePrompt {
            spinner: spinner(),
            theme: Theme::Dark,
        }
    }

    fn theme_name(&self) -> &'static str {
        match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }
}

impl Default for RustylinePrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn print_markdown(content: &str, theme: &str) {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .unwrap();
}

fn print_tool_request(call: &PendingToolCall) {
    println!();
    println!(
        "─── {} ──────────────────────────",
        style(&call.name).magenta(),
    );

    // Every registered tool takes a flat map of string arguments, but the
    // payload is whatever the model sent; anything that doesn't parse as an
    // object is shown raw.
    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(Value::Object(args)) => {
            for (key, val) in &args {
                println!("{INDENT}{}: {}", style(key).dim(), format_arg(val));
            }
        }
        _ => println!("{INDENT}{}", style(&call.arguments).dim()),
    }
    println!();
}

fn format_arg(value: &Value) -> String {
    match value {
        // Raw reports passed to interpret_report can run long; elide them.
        Value::String(s) if s.chars().count() > MAX_STRING_LENGTH => {
            let head: String = s.chars().take(MAX_STRING_LENGTH).collect();
            style(format!("{head}...")).green().to_string()
        }
        Value::String(s) => style(s).green().to_string(),
        other => style(other).blue().to_string(),
    }
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, turn: &Turn) {
        let theme = self.theme_name();

        match turn.role {
            Role::Assistant => {
                for call in &turn.tool_calls {
                    print_tool_request(call);
                }
                if let Some(text) = turn.text() {
                    if !text.is_empty() {
                        print_markdown(text, theme);
                    }
                }
            }
            Role::ToolResult => {
                if let Some(text) = turn.text() {
                    print_markdown(text, theme);
                }
            }
            // The user typed it; the system turn is framing. Neither needs
            // echoing back.
            Role::User | Role::System => {}
        }

        println!();
        io::stdout().flush().expect("Failed to flush stdout");
    }

    fn render_text(&mut self, content: &str) {
        print_markdown(content, self.theme_name());
        println!();
        io::stdout().flush().expect("Failed to flush stdout");
    }

    fn render_error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    fn get_input(&mut self) -> Result<Input> {
        let mut editor = rustyline::DefaultEditor::new()?;
        let input = editor.readline(PROMPT);
        let line = match input {
            Ok(text) => text,
            Err(e) => {
                match e {
                    rustyline::error::ReadlineError::Interrupted => (),
                    rustyline::error::ReadlineError::Eof => (),
                    _ => eprintln!("Input error: {}", e),
                }
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                });
            }
        };

        if line.trim().eq_ignore_ascii_case("/t") {
            self.theme = match self.theme {
                Theme::Light => {
                    println!("Switching to Dark theme");
                    Theme::Dark
                }
                Theme::Dark => {
                    println!("Switching to Light theme");
                    Theme::Light
                }
            };
            return Ok(Input {
                input_type: InputType::AskAgain,
                content: None,
            });
        }

        Ok(classify(&line))
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("checking the charts...");
    }

    fn hide_busy(&self) {
        self.spinner.stop("");
    }

    fn close(&self) {
        // No cleanup required
    }
}
