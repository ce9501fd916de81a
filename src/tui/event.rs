use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::core::action::Action;

/// Lines moved per arrow key or mouse wheel notch.
const SCROLL_STEP: u16 = 1;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Quit,
    Submit,
    InputChar(char),
    Paste(String), // Bracketed paste
    Backspace,
    ClearLine, // Ctrl+U
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToBottom,
    Resize(u16, u16),
}

impl TuiEvent {
    /// Maps the event to a core action. `page` is the conversation height,
    /// used for page scrolling.
    pub fn into_action(self, page: u16) -> Action {
        match self {
            TuiEvent::Quit => Action::Quit,
            TuiEvent::Submit => Action::Submit,
            TuiEvent::InputChar(c) => Action::InsertChar(c),
            TuiEvent::Paste(text) => Action::InsertText(text),
            TuiEvent::Backspace => Action::DeleteBackward,
            TuiEvent::ClearLine => Action::ClearInput,
            TuiEvent::ScrollUp => Action::ScrollUp(SCROLL_STEP),
            TuiEvent::ScrollDown => Action::ScrollDown(SCROLL_STEP),
            TuiEvent::ScrollPageUp => Action::ScrollUp(page.max(1)),
            TuiEvent::ScrollPageDown => Action::ScrollDown(page.max(1)),
            TuiEvent::ScrollToBottom => Action::ScrollToBottom,
            TuiEvent::Resize(width, height) => Action::Resize { width, height },
        }
    }
}

fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Release/repeat reports would double every keystroke
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(TuiEvent::ClearLine),
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => None,
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Quit),
        (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
        (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
        (_, KeyCode::End) => Some(TuiEvent::ScrollToBottom),
        _ => None,
    }
}

/// Translates a raw crossterm event. Unhandled events map to `None`.
pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            translate_key(key_event)
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
        _ => None,
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        Ok(translate(event::read()?))
    } else {
        Ok(None)
    }
}
