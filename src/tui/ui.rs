use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::{App, GAP_HEIGHT, INPUT_HEIGHT};
use crate::tui::component::Component;
use crate::tui::components::{ConversationView, InputBox};

/// Splits the screen into conversation, gap and input rows. The conversation
/// height matches `App::viewport.height` as computed on resize.
pub fn layout(area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Min(0), Length(GAP_HEIGHT), Length(INPUT_HEIGHT)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let [conversation_area, _gap, input_area] = layout(frame.area());

    ConversationView::new(&app.rendered, app.viewport.scroll).render(frame, conversation_area);

    let title = format!(" {} · {} ", app.assistant_label, app.model_name);
    InputBox::new(&app.input, &title).render(frame, input_area);
}
