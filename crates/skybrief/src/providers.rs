//! Boundaries to the language-model service.
//!
//! [`base::Provider`] is the seam the orchestration loop depends on;
//! [`openai::OpenAiProvider`] speaks the OpenAI chat-completions schema over
//! HTTP, and [`mock::MockProvider`] replays a script for tests.

pub mod base;
pub mod error;
pub mod mock;
pub mod openai;
pub mod utils;
