//! Application layer use cases for MirrorBox.
//!
//! Use cases here orchestrate `mirror_core` types and depend only on the
//! traits defined in the infrastructure layer ([`WindowSystem`],
//! [`InputSource`]), never on a concrete OS adapter.
//!
//! # Sub-modules
//!
//! - **`resolve_windows`** – Turns title queries into live window handles and
//!   produces the diagnostic listings.
//!
//! - **`dispatch`** – Posts a translated message to every matched target and
//!   records a per-target outcome; one failing target never stops the others.
//!
//! - **`mirror_session`** – The controller: tracks whether the source window
//!   is in the foreground, pulls captured events, and drives translate →
//!   dispatch for each of them until cancelled.
//!
//! [`WindowSystem`]: crate::infrastructure::windowing::WindowSystem
//! [`InputSource`]: crate::infrastructure::input_capture::InputSource

pub mod dispatch;
pub mod mirror_session;
pub mod resolve_windows;
