//! Recording sink for unit and integration testing.
//!
//! # Why a recording sink?
//!
//! A real sink reconfigures live pipeline elements, which cannot be observed
//! from test code and needs a running media pipeline.  `RecordingSink` keeps
//! every command it receives in a `Mutex<Vec<...>>` so that assertions can
//! inspect exactly what the engine sent and in what order.
//!
//! # Usage in tests
//!
//! ```
//! use std::sync::Arc;
//! use composer_core::{LayoutEngine, sink::mock::RecordingSink};
//!
//! let engine = LayoutEngine::new(1280, 720);
//! let sink = Arc::new(RecordingSink::new());
//! engine.register_user(1, sink.clone());
//!
//! let last = sink.last().expect("registration must drive the sink");
//! assert_eq!((last.width, last.height), (1280, 720));
//! assert!(!sink.is_hidden());
//! ```

use std::sync::Mutex;

use super::OutputSink;

/// One `set_geometry` call as seen by a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkCommand {
    pub width: u32,
    pub height: u32,
    pub top: u32,
    pub left: u32,
    pub alpha: f64,
}

impl SinkCommand {
    /// Returns `true` if this command hides the participant.
    pub fn is_hidden(&self) -> bool {
        self.width == 0 && self.height == 0 && self.alpha == 0.0
    }
}

/// A sink that records all commands without rendering anything.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Every command received, oldest first.
    pub commands: Mutex<Vec<SinkCommand>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent command, if any.
    pub fn last(&self) -> Option<SinkCommand> {
        self.lock().last().copied()
    }

    pub fn command_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the most recent command hid the participant.
    ///
    /// A sink that never received a command is not considered hidden.
    pub fn is_hidden(&self) -> bool {
        self.last().is_some_and(|c| c.is_hidden())
    }

    /// Forgets all recorded commands.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SinkCommand>> {
        self.commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OutputSink for RecordingSink {
    fn set_geometry(&self, width: u32, height: u32, top: u32, left: u32, alpha: f64) {
        self.lock().push(SinkCommand {
            width,
            height,
            top,
            left,
            alpha,
        });
    }
}
