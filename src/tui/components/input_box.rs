//! # InputBox Component
//!
//! Single-line prompt under the conversation. The buffer itself lives in
//! `App::input`; this component only draws it. Text wider than the box is
//! shown from the end so the cursor stays visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::Component;

pub const PROMPT: &str = "┃ ";
pub const PLACEHOLDER: &str = "Send a message...";

/// Border (1 left + 1 right) plus the prompt.
const HORIZONTAL_OVERHEAD: u16 = 2 + 2;

pub struct InputBox<'a> {
    pub buffer: &'a str,
    pub title: &'a str,
}

impl<'a> InputBox<'a> {
    pub fn new(buffer: &'a str, title: &'a str) -> Self {
        Self { buffer, title }
    }
}

/// Longest suffix of `text` whose display width fits in `width` columns,
/// with one column kept free for the cursor. Returns the suffix and its width.
fn visible_tail(text: &str, width: u16) -> (&str, u16) {
    let budget = usize::from(width.saturating_sub(1));
    let mut used = 0usize;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start = i;
    }
    (&text[start..], used as u16)
}

impl Component for InputBox<'_> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.title);

        let available = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let (visible, visible_width) = visible_tail(self.buffer, available);

        let content = if self.buffer.is_empty() {
            Line::from(vec![
                Span::raw(PROMPT),
                Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![Span::raw(PROMPT), Span::raw(visible)])
        };

        frame.render_widget(Paragraph::new(content).block(block), area);

        if area.width > HORIZONTAL_OVERHEAD && area.height > 2 {
            let cursor_x = area.x + HORIZONTAL_OVERHEAD - 1 + visible_width;
            frame.set_cursor_position((cursor_x, area.y + 1));
        }
    }
}
