//! Pure presentation logic for the PasteBar clipboard dashboard.
//!
//! Everything in this crate is synchronous and free of I/O: keyboard drag
//! navigation between drop targets, bounded clip previews, and the dashboard
//! tree helpers the UI builds on.

/// BBCode-style tag closing for truncated previews.
pub mod bbcode;
/// Keyboard-driven drag navigation.
pub mod dnd;
/// Screen-space rectangles and points.
pub mod geometry;
/// Identifier types.
pub mod id;
/// Per-item display options.
pub mod item_options;
/// Kinds of draggable dashboard items.
pub mod kind;
/// Clip preview truncation.
pub mod preview;
/// Case-insensitive text matching.
pub mod text_matcher;
/// Dashboard board/clip tree.
pub mod tree;

pub use dnd::{DragGeometrySnapshot, KeyboardOutcome, resolve_next_drop_target};
pub use geometry::{Coordinate, Rect};
pub use id::ItemId;
pub use kind::DragKind;
pub use preview::{PreviewResult, compute_preview, count_extra_lines};
pub use tree::DashboardNode;
