//! Domain entities for MirrorBox.
//!
//! Pure data types with no infrastructure dependencies: the window model the
//! resolver works with, the title queries that select source and target
//! windows, and the input events produced by the capture layer.

/// Captured input events.
pub mod input;

/// Case-insensitive title queries.
pub mod query;

/// Window handles, rectangles and match records.
pub mod window;
