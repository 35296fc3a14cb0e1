//! Infrastructure layer for MirrorBox.
//!
//! Contains OS-facing adapters: the global input capture hooks, the native
//! window enumeration/posting API, and TOML configuration storage.
//!
//! # Sub-modules
//!
//! - **`input_capture`** – `InputSource` implementations.  On Windows this
//!   installs low-level keyboard and mouse hooks; a mock is always compiled
//!   for tests.
//!
//! - **`windowing`** – `WindowSystem` implementations: window enumeration,
//!   titles, client rectangles, foreground detection and `PostMessageW`.
//!
//! - **`storage`** – Loading the session configuration from `config.toml`.

pub mod input_capture;
pub mod storage;
pub mod windowing;
