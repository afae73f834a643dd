#![forbid(unsafe_code)]

//! The Gridplan editing engine.
//!
//! Sits between the pure data model in `gridplan-core` and a hosting
//! surface. The host feeds [`InputEvent`](gridplan_core::event::InputEvent)s
//! into an [`Editor`], applies the returned [`Effect`]s (pointer capture,
//! cursor shape, redraw scheduling), and pulls a [`Scene`] once per tick
//! when one is available.

pub mod engine;
pub mod history;
pub mod render;
pub mod session;

pub use engine::{Editor, EditorState};
pub use history::{HistoryConfig, UndoHistory};
pub use render::{DrawOp, Scene, build_scene};
pub use session::{Cursor, Effect, HoverTarget, Session};
