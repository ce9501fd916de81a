//! # Application State
//!
//! Everything the session controller owns, in one place. No terminal types
//! live here; the TUI reads `rendered` and `input` and draws them.
//!
//! ```text
//! App
//! ├── client: Arc<dyn CompletionClient>  // remote model, never called from here
//! ├── model_name: String
//! ├── conversation: ConversationStore    // what the model sees
//! ├── entries: Vec<ChatEntry>            // what the user sees
//! ├── pending_index: Option<usize>       // entry awaiting a reply
//! ├── input: String                      // input box buffer
//! ├── spinner: Spinner                   // "thinking" animation
//! ├── viewport: Viewport                 // conversation area size + scroll
//! └── rendered: Vec<ViewLine>            // output of refresh()
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::conversation::ConversationStore;
use crate::core::persona::USER_LABEL;
use crate::core::view::{Spinner, THINKING_TEXT, ViewLine};
use crate::inference::CompletionClient;

/// Rows taken by the input box (border, one text row, border).
pub const INPUT_HEIGHT: u16 = 3;
/// Blank rows between the conversation and the input box.
pub const GAP_HEIGHT: u16 = 1;
/// Maximum number of characters the input box accepts.
pub const INPUT_CHAR_LIMIT: usize = 1024;

/// Shown in place of an error message that carries no text.
pub const FALLBACK_ERROR_TEXT: &str = "Something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Settled,
    /// Placeholder while the completion call is outstanding.
    Pending,
    /// The completion call failed; `text` holds the failure message.
    Failed,
}

/// One line of the conversation as the user sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub author: Author,
    pub sender: String,
    pub text: String,
    pub state: EntryState,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            sender: USER_LABEL.to_string(),
            text: text.into(),
            state: EntryState::Settled,
        }
    }

    pub fn pending(sender: &str) -> Self {
        Self {
            author: Author::Assistant,
            sender: sender.to_string(),
            text: THINKING_TEXT.to_string(),
            state: EntryState::Pending,
        }
    }

    pub fn reply(sender: &str, text: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            sender: sender.to_string(),
            text: text.into(),
            state: EntryState::Settled,
        }
    }

    pub fn failure(sender: &str, text: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            sender: sender.to_string(),
            text: text.into(),
            state: EntryState::Failed,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == EntryState::Pending
    }

    pub fn is_error(&self) -> bool {
        self.state == EntryState::Failed
    }
}

/// Size of the conversation area and its scroll offset (top visible line).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub scroll: u16,
}

pub struct App {
    pub client: Arc<dyn CompletionClient>,
    pub model_name: String,
    pub assistant_label: String,
    pub conversation: ConversationStore,
    pub entries: Vec<ChatEntry>,
    pub input: String,
    pub spinner: Spinner,
    pub viewport: Viewport,
    pub rendered: Vec<ViewLine>,
    /// Index into `entries` of the pending reply. Loading iff `Some`.
    pending_index: Option<usize>,
}

impl App {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        model_name: String,
        assistant_label: &str,
        system_prompt: &str,
    ) -> Self {
        Self {
            client,
            model_name,
            assistant_label: assistant_label.to_string(),
            conversation: ConversationStore::new(Some(system_prompt)),
            entries: Vec::new(),
            input: String::new(),
            spinner: Spinner::default(),
            viewport: Viewport::default(),
            rendered: Vec::new(),
            pending_index: None,
        }
    }

    pub fn from_config(client: Arc<dyn CompletionClient>, config: &ResolvedConfig) -> Self {
        Self::new(
            client,
            config.model_name.clone(),
            config.persona.assistant_label(),
            &config.system_prompt,
        )
    }

    pub fn is_loading(&self) -> bool {
        self.pending_index.is_some()
    }

    pub fn pending_index(&self) -> Option<usize> {
        self.pending_index
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::AwaitingReply
        } else {
            Phase::Idle
        }
    }

    /// Appends the placeholder entry and enters `AwaitingReply`.
    pub(crate) fn begin_pending(&mut self) {
        self.pending_index = Some(self.entries.len());
        self.entries.push(ChatEntry::pending(&self.assistant_label));
        self.spinner.reset();
    }

    /// Replaces the placeholder in place and returns to `Idle`.
    /// Returns false when nothing was pending.
    pub(crate) fn settle_pending(&mut self, entry: ChatEntry) -> bool {
        match self.pending_index.take() {
            Some(index) if index < self.entries.len() => {
                self.entries[index] = entry;
                true
            }
            Some(_) => {
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    /// Largest valid scroll offset for the current rendered buffer.
    pub fn max_scroll(&self) -> u16 {
        let total = u16::try_from(self.rendered.len()).unwrap_or(u16::MAX);
        total.saturating_sub(self.viewport.height)
    }

    pub fn scroll_to_bottom(&mut self) {
        self.viewport.scroll = self.max_scroll();
    }
}
