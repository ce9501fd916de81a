//! # Conversation History
//!
//! The authoritative, ordered list of messages sent to the model.
//!
//! ```text
//! [system?] user assistant user assistant ... user
//!                                              └── outstanding turn (awaiting reply)
//! ```
//!
//! At most one user turn can be outstanding. A turn is closed either by its
//! assistant reply or by [`ConversationStore::abandon_turn`] when the
//! completion failed. An abandoned turn keeps its user message.

use std::fmt;

use crate::inference::{Message, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// The submitted text was empty after trimming.
    InvalidInput,
    /// A user turn is still waiting for its reply.
    TurnOutstanding,
    /// An assistant reply arrived without a user turn to answer.
    NoOutstandingTurn,
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationError::InvalidInput => write!(f, "message is empty"),
            ConversationError::TurnOutstanding => write!(f, "a reply is still pending"),
            ConversationError::NoOutstandingTurn => write!(f, "no user message awaiting a reply"),
        }
    }
}

impl std::error::Error for ConversationError {}

#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    awaiting_reply: bool,
}

impl ConversationStore {
    /// Creates the history, seeded with a system message when the prompt is non-empty.
    pub fn new(system_prompt: Option<&str>) -> Self {
        let messages = match system_prompt.map(str::trim) {
            Some(prompt) if !prompt.is_empty() => vec![Message::system(prompt)],
            _ => Vec::new(),
        };
        Self {
            messages,
            awaiting_reply: false,
        }
    }

    /// Appends a trimmed user message and opens a turn.
    pub fn append_user(&mut self, text: &str) -> Result<&Message, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::InvalidInput);
        }
        if self.awaiting_reply {
            return Err(ConversationError::TurnOutstanding);
        }
        self.messages.push(Message::user(text));
        self.awaiting_reply = true;
        Ok(self.last_pushed())
    }

    /// Appends the reply to the outstanding user turn and closes it.
    pub fn append_assistant(&mut self, text: &str) -> Result<&Message, ConversationError> {
        if !self.awaiting_reply {
            return Err(ConversationError::NoOutstandingTurn);
        }
        self.messages.push(Message::assistant(text));
        self.awaiting_reply = false;
        Ok(self.last_pushed())
    }

    /// Closes the outstanding turn without a reply. The user message stays in
    /// history so the next request carries it.
    pub fn abandon_turn(&mut self) -> Result<(), ConversationError> {
        if !self.awaiting_reply {
            return Err(ConversationError::NoOutstandingTurn);
        }
        self.awaiting_reply = false;
        Ok(())
    }

    /// Owned copy of the history, safe to move into a background task.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn has_system_prompt(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role() == Role::System)
    }

    fn last_pushed(&self) -> &Message {
        // Only called right after a push.
        &self.messages[self.messages.len() - 1]
    }
}
