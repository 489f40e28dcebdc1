//! # composer-core
//!
//! Slot allocator for a composited multi-party video canvas.
//!
//! The crate decides *where* each participant's video appears inside the mixed
//! output picture.  It never touches pixels and never creates media-pipeline
//! elements: it only tells each participant's [`OutputSink`] which rectangle
//! to draw into and whether to draw at all.
//!
//! # Architecture overview (for beginners)
//!
//! A video conference mixer takes N incoming streams and paints them into one
//! outgoing picture (the "canvas").  Each rectangle of that canvas is a
//! **slot**.  Participants join and leave at any time, an operator may promote
//! the active speaker to the big "floor" slot, and the overall arrangement
//! (the **mode**) can be switched while the call is running.
//!
//! - **`domain::geometry`** – Pure functions that turn a slot count and a canvas
//!   size into pixel rectangles.
//!
//! - **`domain::slots`** / **`domain::users`** – The two tables the engine
//!   keeps: which rectangles exist, and which participants are registered.
//!
//! - **`domain::engine`** – The [`LayoutEngine`]: the thread-safe aggregate
//!   that ties the tables together and drives the sinks.
//!
//! - **`sink`** – The [`OutputSink`] capability supplied by the caller for each
//!   participant.

pub mod domain;
pub mod sink;

// Re-export the most-used types at the crate root so callers can write
// `composer_core::LayoutEngine` instead of `composer_core::domain::engine::LayoutEngine`.
pub use domain::engine::{EngineConfig, LayoutEngine};
pub use domain::geometry::{Canvas, SlotGeometry, NOMINAL_CANVAS};
pub use domain::mode::{LayoutError, LayoutMode};
pub use domain::snapshot::{LayoutSnapshot, SlotSnapshot};
pub use domain::users::UserId;
pub use sink::OutputSink;
