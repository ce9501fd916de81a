//! # Core Application Logic
//!
//! This module contains the session's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • View (projection)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │ Inference  │
//!          │  Adapter   │ ── spawns ───▶ │  (client)  │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`conversation`]: `ConversationStore`, the history sent to the model
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`view`]: Projection of chat entries into wrapped lines
//! - [`persona`]: Roast / praise / chat instructions and labels
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod conversation;
pub mod persona;
pub mod state;
pub mod view;
