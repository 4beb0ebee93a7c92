use serde::{Deserialize, Serialize};

use crate::models::message::Turn;

/// The ordered, append-only log of turns for one session.
///
/// A conversation is owned by exactly one orchestration loop. The full
/// history is resent to the gateway on every call, so this log is the single
/// source of truth for a session; there is no hidden state elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a conversation with the given system framing as its first turn.
    pub fn new(system: impl Into<String>) -> Self {
        Conversation {
            turns: vec![Turn::system(system)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append a completed exchange in one step. The loop buffers the turns
    /// of an in-flight exchange and commits them here only once the whole
    /// turn has succeeded.
    pub fn extend(&mut self, turns: impl IntoIterator<Item = Turn>) {
        self.turns.extend(turns);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn past `len`. The shell uses this to roll back a turn
    /// that failed or was interrupted so a retry does not duplicate turns.
    pub fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
    }
}
