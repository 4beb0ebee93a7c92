use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::base::{Provider, Usage};
use super::error::ProviderError;
use crate::models::message::Turn;
use crate::models::tool::ToolSpec;

/// A provider that replays a script instead of calling a service.
///
/// Clones share the script, so a test can keep a handle to inspect how many
/// gateway calls the loop made after moving the provider into an agent.
#[derive(Clone)]
pub struct MockProvider {
    script: Arc<Mutex<Vec<Result<Turn, ProviderError>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Script a sequence of successful replies, handed out in order. When
    /// the script runs dry the provider answers with empty text.
    pub fn new(replies: Vec<Turn>) -> Self {
        Self::from_script(replies.into_iter().map(Ok).collect())
    }

    /// Script successful turns and gateway failures together, in order.
    pub fn from_script(script: Vec<Result<Turn, ProviderError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times `complete` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _turns: &[Turn],
        _tools: &[ToolSpec],
    ) -> Result<(Turn, Usage), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Ok((Turn::assistant(""), Usage::default()))
        } else {
            script.remove(0).map(|turn| (turn, Usage::default()))
        }
    }
}
