//! Scenario replay: drives a [`LayoutEngine`] through a scripted session.
//!
//! A scenario file lists participant events in order:
//!
//! ```toml
//! [[step]]
//! op = "register"
//! id = 1
//!
//! [[step]]
//! op = "mode"
//! mode = "grid6"
//!
//! [[step]]
//! op = "canvas"
//! width = 1920
//! height = 1080
//! ```
//!
//! Every registered id gets its own [`TracingSink`], so the log shows each
//! geometry command the engine emits.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use composer_core::{LayoutEngine, LayoutError, LayoutMode, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::infrastructure::sink::TracingSink;
use crate::infrastructure::storage::config::{read_toml, ConfigError};

// ── Scenario schema ───────────────────────────────────────────────────────────

/// An ordered list of session events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One session event.  `op` selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Register { id: UserId },
    Unregister { id: UserId },
    Floor { id: UserId },
    Insert { id: UserId },
    /// Mode names are resolved at replay time so a typo skips one step
    /// instead of rejecting the whole file.
    Mode { mode: String },
    Canvas { width: u32, height: u32 },
}

/// Parses a scenario from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a step has an
/// unknown `op` or missing fields.
pub fn parse_scenario(content: &str) -> Result<Scenario, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Reads a scenario file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if its content is not a valid scenario.
pub fn load_scenario(path: &Path) -> Result<Scenario, ConfigError> {
    read_toml(path)
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Counts reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps handed to the engine.
    pub applied: usize,
    /// Steps skipped because they could not be interpreted.
    pub rejected: usize,
}

/// Replays [`Step`]s against one engine, creating a sink per registration.
pub struct SessionRunner {
    engine: Arc<LayoutEngine>,
    sinks: HashMap<UserId, Arc<TracingSink>>,
}

impl SessionRunner {
    pub fn new(engine: Arc<LayoutEngine>) -> Self {
        Self {
            engine,
            sinks: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &Arc<LayoutEngine> {
        &self.engine
    }

    /// Sink created by the most recent registration of `id`.
    ///
    /// Sinks outlive unregistration so their final (hidden) state can still be
    /// inspected.
    pub fn sink(&self, id: UserId) -> Option<Arc<TracingSink>> {
        self.sinks.get(&id).cloned()
    }

    /// Applies one step.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownModeName`] for a `mode` step naming no
    /// known topology; the engine is left untouched.
    pub fn apply(&mut self, step: &Step) -> Result<(), LayoutError> {
        debug!(?step, "applying step");
        match step {
            Step::Register { id } => {
                let sink = Arc::new(TracingSink::new(*id));
                self.sinks.insert(*id, Arc::clone(&sink));
                self.engine.register_user(*id, sink);
            }
            Step::Unregister { id } => self.engine.unregister_user(*id),
            Step::Floor { id } => self.engine.set_floor(*id),
            Step::Insert { id } => self.engine.try_insert(*id),
            Step::Mode { mode } => {
                let mode: LayoutMode = mode.parse()?;
                self.engine.switch_mode(mode);
            }
            Step::Canvas { width, height } => self.engine.set_canvas_size(*width, *height),
        }
        Ok(())
    }

    /// Applies every step in order, skipping the ones that fail.
    pub fn run(&mut self, scenario: &Scenario) -> RunSummary {
        let mut summary = RunSummary::default();
        for (index, step) in scenario.steps.iter().enumerate() {
            match self.apply(step) {
                Ok(()) => summary.applied += 1,
                Err(e) => {
                    warn!(step = index, "skipping step: {e}");
                    summary.rejected += 1;
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::SlotGeometry;

    fn runner() -> SessionRunner {
        SessionRunner::new(Arc::new(LayoutEngine::new(1280, 720)))
    }

    #[test]
    fn test_parse_scenario_reads_every_op() {
        let scenario = parse_scenario(
            r#"
[[step]]
op = "register"
id = 1

[[step]]
op = "unregister"
id = 2

[[step]]
op = "floor"
id = 3

[[step]]
op = "insert"
id = 4

[[step]]
op = "mode"
mode = "single"

[[step]]
op = "canvas"
width = 1920
height = 1080
"#,
        )
        .expect("valid scenario");

        assert_eq!(
            scenario.steps,
            vec![
                Step::Register { id: 1 },
                Step::Unregister { id: 2 },
                Step::Floor { id: 3 },
                Step::Insert { id: 4 },
                Step::Mode {
                    mode: "single".to_string()
                },
                Step::Canvas {
                    width: 1920,
                    height: 1080
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty_scenario_has_no_steps() {
        assert!(parse_scenario("").unwrap().steps.is_empty());
    }

    #[test]
    fn test_parse_unknown_op_is_parse_error() {
        let result = parse_scenario("[[step]]\nop = \"explode\"\nid = 1\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_step_missing_field_is_parse_error() {
        let result = parse_scenario("[[step]]\nop = \"register\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_register_creates_sink_and_shows_it() {
        let mut runner = runner();
        runner.apply(&Step::Register { id: 9 }).unwrap();

        let sink = runner.sink(9).expect("sink created");
        assert_eq!(
            sink.last_geometry(),
            Some(SlotGeometry::new(1280, 720, 0, 0))
        );
    }

    #[test]
    fn test_unregister_keeps_sink_in_hidden_state() {
        let mut runner = runner();
        runner.apply(&Step::Register { id: 1 }).unwrap();
        runner.apply(&Step::Unregister { id: 1 }).unwrap();

        assert!(!runner.engine().is_registered(1));
        assert!(!runner.sink(1).unwrap().is_visible());
    }

    #[test]
    fn test_unknown_mode_name_is_rejected_without_touching_engine() {
        let mut runner = runner();
        let err = runner
            .apply(&Step::Mode {
                mode: "mosaic".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, LayoutError::UnknownModeName(_)));
        assert_eq!(runner.engine().get_mode(), LayoutMode::Unbounded);
    }

    #[test]
    fn test_run_counts_applied_and_rejected_steps() {
        let mut runner = runner();
        let scenario = Scenario {
            steps: vec![
                Step::Register { id: 1 },
                Step::Mode {
                    mode: "grid9".to_string(),
                },
                Step::Mode {
                    mode: "Grid6".to_string(),
                },
            ],
        };

        let summary = runner.run(&scenario);

        assert_eq!(
            summary,
            RunSummary {
                applied: 2,
                rejected: 1
            }
        );
        assert_eq!(runner.engine().get_mode(), LayoutMode::Grid6);
    }

    #[test]
    fn test_canvas_step_applies_on_next_recompute() {
        let mut runner = runner();
        runner.apply(&Step::Register { id: 1 }).unwrap();
        runner
            .apply(&Step::Canvas {
                width: 1920,
                height: 1080,
            })
            .unwrap();
        // Existing slot keeps its geometry until the next registration.
        assert_eq!(
            runner.sink(1).unwrap().last_geometry(),
            Some(SlotGeometry::new(1280, 720, 0, 0))
        );

        runner.apply(&Step::Register { id: 2 }).unwrap();
        assert_eq!(
            runner.sink(2).unwrap().last_geometry(),
            Some(SlotGeometry::new(960, 1080, 0, 960))
        );
    }
}
