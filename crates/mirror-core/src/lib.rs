//! # mirror-core
//!
//! Shared library for MirrorBox containing the window-matching rules, the
//! captured input event model, the virtual-key table and the translation of
//! captured input into window messages.
//!
//! This crate has zero dependencies on OS APIs.  Everything here is pure and
//! can be tested on any platform.
//!
//! # Architecture overview
//!
//! MirrorBox mirrors the mouse and keyboard input received by one "source"
//! window to any number of "target" windows on the same machine.  Input is
//! captured globally while the source window is in the foreground, converted
//! into window messages expressed in each target's client coordinates, and
//! posted to the targets' message queues.
//!
//! - **`domain`** – Window handles, rectangles, title queries and the raw input
//!   event model produced by the capture layer.
//!
//! - **`keymap`** – The fixed table between captured key symbols and Windows
//!   Virtual Key codes.
//!
//! - **`message`** – Target messages and their packing into the native
//!   `(msg, wParam, lParam)` triple.
//!
//! - **`translate`** – The pure function turning one captured event into one
//!   target message for a given pair of source/target client rectangles.

pub mod domain;
pub mod keymap;
pub mod message;
pub mod translate;

pub use domain::input::{MouseButton, RawInputEvent};
pub use domain::query::{QueryError, TitleQuery};
pub use domain::window::{MatchedTarget, Rect, WindowHandle, WindowInfo};
pub use keymap::KeySymbol;
pub use message::{PackedMessage, TargetMessage};
pub use translate::translate;
