//! # TUI Components
//!
//! Stateless, props-based components for the chat screen:
//!
//! - `ConversationView`: the scrolling conversation, drawn from the lines
//!   produced by `App::refresh`
//! - `InputBox`: the prompt line with placeholder and cursor
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── conversation.rs   (Scrolling conversation area)
//! └── input_box.rs      (Input line)
//! ```

mod conversation;
mod input_box;

pub use conversation::ConversationView;
pub use input_box::InputBox;
