//! # Conversation Store
//!
//! Append-only log of turns for one widget instance. Order is conversation
//! order; turns are never edited or removed once appended.
//!
//! Role alternation is not checked. A failed exchange leaves a lone user
//! turn, and the retry appends another user turn right after it.

use serde::{Deserialize, Serialize};

use crate::transport::ChatRequest;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation, tagged with its author.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn and returns a reference to it.
    pub fn append(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        self.turns.last().expect("just pushed a turn")
    }

    /// Every turn except the most recent one: the `history` of a request.
    pub fn snapshot_excluding_last(&self) -> Vec<Turn> {
        match self.turns.split_last() {
            Some((_, rest)) => rest.to_vec(),
            None => Vec::new(),
        }
    }

    /// Builds the outbound request: the latest turn becomes `message`,
    /// everything before it becomes `history`.
    pub fn to_request(&self) -> Option<ChatRequest> {
        let latest = self.turns.last()?;
        Some(ChatRequest {
            message: latest.content.clone(),
            history: self.snapshot_excluding_last(),
        })
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
}
