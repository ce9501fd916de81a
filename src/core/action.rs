//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The model answers? That's `Action::ReplyReceived(text)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` telling the host loop what to do next.
//! No I/O happens here; the host spawns requests and quits.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Session phases:
//!
//! ```text
//!            Submit (non-empty)
//!   Idle ─────────────────────────▶ AwaitingReply
//!    ▲                                   │
//!    └──── ReplyReceived / ReplyFailed ──┘
//! ```

use log::{debug, info, warn};

use crate::core::conversation::ConversationError;
use crate::core::state::{
    App, ChatEntry, FALLBACK_ERROR_TEXT, GAP_HEIGHT, INPUT_CHAR_LIMIT, INPUT_HEIGHT,
};
use crate::inference::Message;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Typed character for the input box.
    InsertChar(char),
    /// Pasted text for the input box.
    InsertText(String),
    DeleteBackward,
    ClearInput,
    /// Enter: send the input box contents.
    Submit,
    /// The outstanding completion call returned a reply.
    ReplyReceived(String),
    /// The outstanding completion call failed.
    ReplyFailed(String),
    /// Spinner timer.
    Tick,
    /// Terminal resized to the given total size.
    Resize { width: u16, height: u16 },
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToBottom,
    Quit,
}

/// A completion call the host should run in the background.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    /// History snapshot taken at submit time; sent verbatim.
    pub messages: Vec<Message>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing changed that needs drawing.
    None,
    /// State changed; draw the next frame.
    Redraw,
    /// Start the completion call and draw.
    SpawnRequest(PendingRequest),
    /// Leave the event loop.
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::InsertChar(c) => insert_text(app, c.encode_utf8(&mut [0; 4])),
        Action::InsertText(text) => insert_text(app, &text),
        Action::DeleteBackward => {
            if app.input.pop().is_some() {
                Effect::Redraw
            } else {
                Effect::None
            }
        }
        Action::ClearInput => {
            if app.input.is_empty() {
                Effect::None
            } else {
                app.input.clear();
                Effect::Redraw
            }
        }
        Action::Submit => submit(app),
        Action::ReplyReceived(reply) => reply_received(app, reply),
        Action::ReplyFailed(message) => reply_failed(app, message),
        Action::Tick => {
            if !app.is_loading() {
                return Effect::None;
            }
            app.spinner.tick();
            app.refresh();
            Effect::Redraw
        }
        Action::Resize { width, height } => {
            app.viewport.width = width;
            app.viewport.height = height.saturating_sub(INPUT_HEIGHT + GAP_HEIGHT);
            debug!(
                "Viewport resized to {}x{}",
                app.viewport.width, app.viewport.height
            );
            app.refresh();
            Effect::Redraw
        }
        Action::ScrollUp(lines) => {
            app.viewport.scroll = app.viewport.scroll.saturating_sub(lines);
            Effect::Redraw
        }
        Action::ScrollDown(lines) => {
            app.viewport.scroll = app
                .viewport
                .scroll
                .saturating_add(lines)
                .min(app.max_scroll());
            Effect::Redraw
        }
        Action::ScrollToBottom => {
            app.scroll_to_bottom();
            Effect::Redraw
        }
        Action::Quit => {
            info!("Quit requested");
            Effect::Quit
        }
    }
}

/// Appends to the input buffer. Line breaks become spaces (Enter submits) and
/// anything past the character limit is dropped.
fn insert_text(app: &mut App, text: &str) -> Effect {
    let room = INPUT_CHAR_LIMIT.saturating_sub(app.input.chars().count());
    let before = app.input.len();
    app.input.extend(
        text.chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .filter(|c| !c.is_control())
            .take(room),
    );
    if app.input.len() == before {
        Effect::None
    } else {
        Effect::Redraw
    }
}

fn submit(app: &mut App) -> Effect {
    if app.is_loading() {
        debug!("Submit ignored: reply still pending");
        return Effect::None;
    }

    let text = app.input.trim().to_string();
    match app.conversation.append_user(&text) {
        Ok(_) => {}
        Err(ConversationError::InvalidInput) => return Effect::None,
        Err(e) => {
            warn!("Submit rejected by conversation: {}", e);
            return Effect::None;
        }
    }

    app.entries.push(ChatEntry::user(text));
    app.begin_pending();
    app.input.clear();
    app.refresh();

    let request = PendingRequest {
        messages: app.conversation.snapshot(),
        model: app.model_name.clone(),
    };
    info!(
        "Submitted turn: {} messages in history",
        request.messages.len()
    );
    Effect::SpawnRequest(request)
}

fn reply_received(app: &mut App, reply: String) -> Effect {
    if !app.is_loading() {
        warn!("Reply received with nothing pending, discarding");
        return Effect::None;
    }
    if let Err(e) = app.conversation.append_assistant(&reply) {
        warn!("Reply could not be recorded: {}", e);
    }
    let entry = ChatEntry::reply(&app.assistant_label, reply);
    app.settle_pending(entry);
    app.refresh();
    Effect::Redraw
}

fn reply_failed(app: &mut App, message: String) -> Effect {
    if !app.is_loading() {
        warn!("Failure received with nothing pending, discarding: {}", message);
        return Effect::None;
    }
    info!("Completion failed: {}", message);
    if let Err(e) = app.conversation.abandon_turn() {
        warn!("Failed turn could not be closed: {}", e);
    }
    let text = if message.trim().is_empty() {
        FALLBACK_ERROR_TEXT.to_string()
    } else {
        message
    };
    let entry = ChatEntry::failure(&app.assistant_label, text);
    app.settle_pending(entry);
    app.refresh();
    Effect::Redraw
}
