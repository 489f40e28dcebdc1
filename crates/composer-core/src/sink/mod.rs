//! The output capability the engine drives for each participant.
//!
//! A sink stands for whatever actually renders one participant's video into
//! the composited picture: in a GStreamer pipeline that would be a caps filter
//! plus a compositor pad.  The engine only ever sends two kinds of command to
//! it: "draw yourself in this rectangle" and "hide".
//!
//! # Deferred dispatch
//!
//! Engine operations never call a sink while holding the engine lock.  Instead
//! they collect [`SinkUpdate`] values under the lock and apply them once the
//! lock has been released, so a slow sink cannot stall other threads.

use std::sync::Arc;

use crate::domain::geometry::SlotGeometry;

pub mod mock;

/// Compositing opacity for a visible participant.
pub const OPAQUE: f64 = 1.0;

/// Compositing opacity for a hidden participant.
pub const TRANSPARENT: f64 = 0.0;

/// External rendering target for one participant's video.
///
/// Implementations must be thread-safe: the engine may be driven from a
/// signalling thread and a media thread at the same time.
pub trait OutputSink: Send + Sync {
    /// Configures the rendered rectangle and its compositing opacity.
    ///
    /// `alpha` is in `[0, 1]`; `1.0` is fully opaque.
    fn set_geometry(&self, width: u32, height: u32, top: u32, left: u32, alpha: f64);

    /// Hides the participant: zero size, zero opacity, parked at the origin.
    fn set_hidden(&self) {
        self.set_geometry(0, 0, 0, 0, TRANSPARENT);
    }
}

/// A sink command recorded under the engine lock and applied after it is released.
pub(crate) enum SinkUpdate {
    Show {
        sink: Arc<dyn OutputSink>,
        geometry: SlotGeometry,
    },
    Hide {
        sink: Arc<dyn OutputSink>,
    },
}

impl SinkUpdate {
    pub(crate) fn apply(&self) {
        match self {
            SinkUpdate::Show { sink, geometry } => sink.set_geometry(
                geometry.width,
                geometry.height,
                geometry.top,
                geometry.left,
                OPAQUE,
            ),
            SinkUpdate::Hide { sink } => sink.set_hidden(),
        }
    }
}

/// Applies a batch of updates in the order they were recorded.
pub(crate) fn dispatch(updates: Vec<SinkUpdate>) {
    for update in &updates {
        update.apply();
    }
}
