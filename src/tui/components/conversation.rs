use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::view::{LineStyle, ViewLine};
use crate::tui::component::Component;

/// The conversation area: pre-wrapped lines, scrolled to `scroll`.
///
/// Wrapping already happened in `App::refresh`, so the paragraph is drawn
/// without ratatui's own wrapping; each `ViewLine` is one terminal row.
pub struct ConversationView<'a> {
    pub lines: &'a [ViewLine],
    pub scroll: u16,
}

impl<'a> ConversationView<'a> {
    pub fn new(lines: &'a [ViewLine], scroll: u16) -> Self {
        Self { lines, scroll }
    }
}

pub(crate) fn line_style(style: LineStyle) -> Style {
    match style {
        LineStyle::User => Style::default().fg(Color::Indexed(5)),
        LineStyle::Assistant => Style::default().fg(Color::Indexed(6)),
        LineStyle::Pending => Style::default().fg(Color::Indexed(205)),
        LineStyle::Error => Style::default().fg(Color::Indexed(1)),
        LineStyle::Notice => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

impl Component for ConversationView<'_> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|l| Line::styled(l.text.as_str(), line_style(l.style)))
            .collect();
        let paragraph = Paragraph::new(lines).scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
