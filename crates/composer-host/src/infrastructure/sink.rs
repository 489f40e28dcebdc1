//! An [`OutputSink`] that logs geometry commands instead of rendering.
//!
//! The host process has no media pipeline attached, so each participant's
//! "video" is a `TracingSink` that reports every command at `info` level and
//! remembers the last rectangle it was asked to draw.

use std::sync::{Mutex, PoisonError};

use composer_core::{OutputSink, SlotGeometry, UserId};
use tracing::info;

/// Logging sink for one participant.
#[derive(Debug)]
pub struct TracingSink {
    id: UserId,
    /// `None` while hidden (or before the first command).
    last: Mutex<Option<SlotGeometry>>,
}

impl TracingSink {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            last: Mutex::new(None),
        }
    }

    /// Participant this sink renders.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// The rectangle from the most recent visible command, if the sink is
    /// currently shown.
    pub fn last_geometry(&self) -> Option<SlotGeometry> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_visible(&self) -> bool {
        self.last_geometry().is_some()
    }
}

impl OutputSink for TracingSink {
    fn set_geometry(&self, width: u32, height: u32, top: u32, left: u32, alpha: f64) {
        let visible = alpha > 0.0 && width > 0 && height > 0;
        if visible {
            info!(
                user = self.id,
                width, height, top, left, alpha, "participant shown"
            );
        } else {
            info!(user = self.id, "participant hidden");
        }
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) =
            visible.then(|| SlotGeometry::new(width, height, top, left));
    }
}
