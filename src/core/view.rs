//! # View Projection
//!
//! Turns the chat entries into the wrapped, labelled lines shown in the
//! conversation area. Pure: the same entries, spinner frame and width always
//! give the same lines.
//!
//! ```text
//! ChatEntry { sender: "You", text: "hello" }       →  "You: hello"
//! ChatEntry { sender: "Assistant", Pending }       →  "Assistant: ⣽ Thinking…"
//! ```

use std::time::Duration;

use crate::core::state::{App, Author, ChatEntry, EntryState};

pub const THINKING_TEXT: &str = "Thinking…";

pub const WELCOME_LINES: [&str; 2] = [
    "Welcome to the moodify chat.",
    "Type a message and press Enter to send.",
];

/// Braille dot spinner, one frame per tick.
const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// How often the host loop should send `Action::Tick` while a reply is pending.
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    pub fn current(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    User,
    Assistant,
    Pending,
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    pub text: String,
    pub style: LineStyle,
}

fn line_style(entry: &ChatEntry) -> LineStyle {
    match (entry.author, entry.state) {
        (_, EntryState::Pending) => LineStyle::Pending,
        (_, EntryState::Failed) => LineStyle::Error,
        (Author::User, EntryState::Settled) => LineStyle::User,
        (Author::Assistant, EntryState::Settled) => LineStyle::Assistant,
    }
}

fn wrap_into(out: &mut Vec<ViewLine>, text: &str, style: LineStyle, width: u16) {
    let options = textwrap::Options::new(width as usize).break_words(true);
    for line in textwrap::wrap(text, options) {
        out.push(ViewLine {
            text: line.into_owned(),
            style,
        });
    }
}

/// Projects entries to wrapped lines. The pending entry shows the spinner
/// frame while `loading` is set. With no entries, the welcome notice is shown.
pub fn project(entries: &[ChatEntry], spinner: &str, loading: bool, width: u16) -> Vec<ViewLine> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }

    if entries.is_empty() {
        for notice in WELCOME_LINES {
            wrap_into(&mut lines, notice, LineStyle::Notice, width);
        }
        return lines;
    }

    for entry in entries {
        let content = if entry.is_pending() && loading {
            format!("{spinner} {}", entry.text)
        } else {
            entry.text.clone()
        };
        let line = format!("{}: {}", entry.sender, content);
        wrap_into(&mut lines, &line, line_style(entry), width);
    }
    lines
}

impl App {
    /// Recomputes `rendered` from the entries and scrolls to the bottom.
    /// Does nothing until the viewport has a width.
    pub fn refresh(&mut self) {
        if self.viewport.width == 0 {
            return;
        }
        self.rendered = project(
            &self.entries,
            self.spinner.current(),
            self.is_loading(),
            self.viewport.width,
        );
        self.scroll_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    fn texts(lines: &[ViewLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_spinner_cycles() {
        let mut spinner = Spinner::default();
        let first = spinner.current();
        for _ in 0..SPINNER_FRAMES.len() {
            spinner.tick();
        }
        assert_eq!(spinner.current(), first);
        spinner.tick();
        assert_ne!(spinner.current(), first);
        spinner.reset();
        assert_eq!(spinner.current(), first);
    }

    #[test]
    fn test_project_empty_shows_welcome() {
        let lines = project(&[], "⣾", false, 80);
        assert_eq!(texts(&lines), WELCOME_LINES.to_vec());
        assert!(lines.iter().all(|l| l.style == LineStyle::Notice));
    }

    #[test]
    fn test_project_labels_each_entry() {
        let entries = vec![
            ChatEntry::user("hello"),
            ChatEntry::reply("Assistant", "hi there"),
        ];
        let lines = project(&entries, "⣾", false, 80);
        assert_eq!(texts(&lines), vec!["You: hello", "Assistant: hi there"]);
        assert_eq!(lines[0].style, LineStyle::User);
        assert_eq!(lines[1].style, LineStyle::Assistant);
    }

    #[test]
    fn test_project_pending_shows_spinner_only_while_loading() {
        let entries = vec![ChatEntry::user("hello"), ChatEntry::pending("Assistant")];

        let loading = project(&entries, "⣽", true, 80);
        assert_eq!(loading[1].text, "Assistant: ⣽ Thinking…");
        assert_eq!(loading[1].style, LineStyle::Pending);

        let idle = project(&entries, "⣽", false, 80);
        assert_eq!(idle[1].text, "Assistant: Thinking…");
    }

    #[test]
    fn test_project_error_style() {
        let entries = vec![ChatEntry::failure("Assistant", "network error: refused")];
        let lines = project(&entries, "⣾", false, 80);
        assert_eq!(lines[0].style, LineStyle::Error);
        assert_eq!(lines[0].text, "Assistant: network error: refused");
    }

    #[test]
    fn test_project_wraps_to_width() {
        let entries = vec![ChatEntry::user("one two three four")];
        let lines = project(&entries, "⣾", false, 10);
        assert_eq!(texts(&lines), vec!["You: one", "two three", "four"]);
        assert!(lines.iter().all(|l| l.style == LineStyle::User));
    }

    #[test]
    fn test_project_keeps_reply_newlines() {
        let entries = vec![ChatEntry::reply("Assistant", "first\nsecond")];
        let lines = project(&entries, "⣾", false, 80);
        assert_eq!(texts(&lines), vec!["Assistant: first", "second"]);
    }

    #[test]
    fn test_project_zero_width_is_empty() {
        let entries = vec![ChatEntry::user("hello")];
        assert!(project(&entries, "⣾", false, 0).is_empty());
    }

    #[test]
    fn test_refresh_noop_without_width() {
        let mut app = test_app(None);
        app.viewport.width = 0;
        app.rendered = vec![ViewLine {
            text: "stale".to_string(),
            style: LineStyle::Notice,
        }];
        app.entries.push(ChatEntry::user("hello"));
        app.refresh();
        assert_eq!(texts(&app.rendered), vec!["stale"]);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut app = test_app(None);
        app.entries.push(ChatEntry::user("hello"));
        app.refresh();
        let first = app.rendered.clone();
        let first_viewport = app.viewport;
        app.refresh();
        assert_eq!(app.rendered, first);
        assert_eq!(app.viewport, first_viewport);
    }

    #[test]
    fn test_refresh_scrolls_to_bottom() {
        let mut app = test_app(None);
        app.viewport.height = 3;
        for i in 0..10 {
            app.entries.push(ChatEntry::user(format!("line {i}")));
        }
        app.refresh();
        assert_eq!(app.rendered.len(), 10);
        assert_eq!(app.viewport.scroll, 7);
    }
}
