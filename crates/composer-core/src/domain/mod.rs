//! Domain entities for the slot allocator.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//! Nothing in here knows what a media pipeline is; participants' outputs are
//! reached only through the [`OutputSink`](crate::sink::OutputSink) trait.
//!
//! # Layering (for beginners)
//!
//! The sub-modules are listed leaves first.  Each one only depends on the
//! modules above it:
//!
//! ```text
//! geometry ─► users ─► slots ─► mode ─► snapshot ─► engine
//! ```

/// Pixel geometry for unbounded and fixed topologies.
pub mod geometry;

/// The table of registered participants.
pub mod users;

/// The ordered table of canvas slots.
pub mod slots;

/// Layout topologies and mode parsing errors.
pub mod mode;

/// Read-only captures of engine state.
pub mod snapshot;

/// The thread-safe layout engine.
///
/// See [`engine::LayoutEngine`] for the main type.
pub mod engine;
