use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components are transient: they are built each frame from the data they
/// display (props) and render into a given `Rect`. Session state stays in
/// `core::state::App`; components never mutate it.
pub trait Component {
    /// Render the component into the given area.
    fn render(&self, frame: &mut Frame, area: Rect);
}
