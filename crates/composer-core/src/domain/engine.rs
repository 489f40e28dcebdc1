//! The layout engine: slot allocation under concurrent mutation.
//!
//! [`LayoutEngine`] owns the slot table, the user table, the current topology
//! and the canvas size.  Every public method is safe to call from any thread.
//!
//! # Locking model (for beginners)
//!
//! All state lives in one [`EngineState`] behind one `std::sync::Mutex`.  A
//! second mutex, the dispatch lock, orders the delivery of sink commands.
//! Each mutating method follows the same steps:
//!
//! ```text
//! lock state ─► mutate EngineState, recording SinkUpdates
//!            ─► lock dispatch ─► unlock state ─► apply updates ─► unlock dispatch
//! ```
//!
//! `EngineState` methods never take the lock themselves and never call back
//! into `LayoutEngine`, so a re-entrant mutex is not needed.  Sinks are always
//! driven after the state lock is released, but the dispatch lock is acquired
//! first, so batches reach the sinks in the same order as the table changes
//! that produced them and a sink always ends up showing what the table says.
//! Two consecutive calls are still not atomic as a pair.
//!
//! A sink must not call back into the engine that drives it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use super::geometry::{unbounded_geometry, Canvas, SlotGeometry, NOMINAL_CANVAS};
use super::mode::LayoutMode;
use super::slots::SlotTable;
use super::snapshot::{LayoutSnapshot, SlotSnapshot};
use super::users::{UserId, UserKey, UserTable};
use crate::sink::{dispatch, OutputSink, SinkUpdate};

/// Construction parameters for a [`LayoutEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Canvas used for geometry until the first topology switch.
    pub canvas: Canvas,
    /// Canvas every topology switch resets to.
    pub nominal_canvas: Canvas,
    /// Topology applied right after construction.
    pub initial_mode: LayoutMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: NOMINAL_CANVAS,
            nominal_canvas: NOMINAL_CANVAS,
            initial_mode: LayoutMode::Unbounded,
        }
    }
}

/// Mutable engine state.  Only ever touched with the engine lock held.
struct EngineState {
    slots: SlotTable,
    users: UserTable,
    mode: LayoutMode,
    canvas: Canvas,
    nominal_canvas: Canvas,
}

impl EngineState {
    fn new(canvas: Canvas, nominal_canvas: Canvas) -> Self {
        Self {
            slots: SlotTable::new(),
            users: UserTable::new(),
            mode: LayoutMode::Unbounded,
            canvas,
            nominal_canvas,
        }
    }

    // ── Sink command helpers ──────────────────────────────────────────────────

    /// Records a geometry push for whoever occupies the slot at `index`.
    fn show(&self, index: usize, updates: &mut Vec<SinkUpdate>) {
        let Some(slot) = self.slots.get(index) else {
            return;
        };
        let Some(user) = slot.occupant().and_then(|key| self.users.get(key)) else {
            return;
        };
        updates.push(SinkUpdate::Show {
            sink: Arc::clone(&user.sink),
            geometry: slot.geometry(),
        });
    }

    fn show_all(&self, updates: &mut Vec<SinkUpdate>) {
        for (index, _) in self.slots.occupied() {
            self.show(index, updates);
        }
    }

    fn hide(&self, key: UserKey, updates: &mut Vec<SinkUpdate>) {
        if let Some(user) = self.users.get(key) {
            updates.push(SinkUpdate::Hide {
                sink: Arc::clone(&user.sink),
            });
        }
    }

    /// Applies the grid geometry to every slot and pushes it to every occupant.
    fn recompute_unbounded(&mut self, updates: &mut Vec<SinkUpdate>) {
        let geometries = unbounded_geometry(self.slots.len(), self.canvas);
        self.slots.set_geometries(&geometries);
        self.show_all(updates);
    }

    /// Tries to seat an unplaced user.  Returns `false` when no slot is free.
    fn place(&mut self, key: UserKey, updates: &mut Vec<SinkUpdate>) -> bool {
        if !self.mode.is_fixed() {
            let index = self.slots.push(SlotGeometry::default());
            self.slots.bind(index, key);
            self.recompute_unbounded(updates);
            return true;
        }
        match self.slots.first_available() {
            Some(index) => {
                self.slots.bind(index, key);
                self.show(index, updates);
                true
            }
            None => false,
        }
    }

    // ── Operations ────────────────────────────────────────────────────────────

    fn register_user(&mut self, id: UserId, sink: Arc<dyn OutputSink>) -> Vec<SinkUpdate> {
        let mut updates = Vec::new();
        let key = self.users.insert(id, Arc::clone(&sink));
        if !self.place(key, &mut updates) {
            debug!(
                "no free slot for user {id} in {} mode; keeping it registered but hidden",
                self.mode
            );
            updates.push(SinkUpdate::Hide { sink });
        }
        updates
    }

    fn unregister_user(&mut self, id: UserId) -> Vec<SinkUpdate> {
        let mut updates = Vec::new();
        let Some(key) = self.users.find(id).map(|u| u.key) else {
            debug!("unregister ignored: user {id} is not registered");
            return updates;
        };

        if let Some(index) = self.slots.position_of(key) {
            self.slots.release(index);
            self.hide(key, &mut updates);
            if !self.mode.is_fixed() {
                self.slots.remove(index);
                self.recompute_unbounded(&mut updates);
            }
        }
        self.users.remove(id);
        updates
    }

    fn try_insert(&mut self, id: UserId) -> Vec<SinkUpdate> {
        let mut updates = Vec::new();
        let Some(key) = self.users.find(id).map(|u| u.key) else {
            debug!("insert ignored: user {id} is not registered");
            return updates;
        };
        if self.slots.position_of(key).is_some() {
            return updates;
        }
        if !self.place(key, &mut updates) {
            debug!("insert of user {id} skipped: no free slot in {} mode", self.mode);
        }
        updates
    }

    fn switch_mode(&mut self, target: LayoutMode) -> Vec<SinkUpdate> {
        let mut updates = Vec::new();
        let old = std::mem::take(&mut self.slots);

        match target.fixed_geometry(self.canvas) {
            Some(geometries) => {
                let mut new = SlotTable::from_geometries(geometries);
                for (index, key) in old.occupied() {
                    if index < new.len() {
                        new.bind(index, key);
                    } else {
                        self.hide(key, &mut updates);
                    }
                }
                self.slots = new;
                self.canvas = self.nominal_canvas;
                self.show_all(&mut updates);
            }
            None => {
                let mut new = old;
                new.remove_empty();
                self.slots = new;
                self.canvas = self.nominal_canvas;
                self.recompute_unbounded(&mut updates);
            }
        }

        debug!(
            "layout switched from {} to {target}: {} slots, {} placed",
            self.mode,
            self.slots.len(),
            self.slots.occupied().count()
        );
        self.mode = target;
        updates
    }

    fn set_floor(&mut self, id: UserId) -> Vec<SinkUpdate> {
        let mut updates = Vec::new();
        if self.slots.is_empty() {
            debug!("floor change ignored: layout has no slots");
            return updates;
        }
        let Some(key) = self.users.find(id).map(|u| u.key) else {
            debug!("floor change ignored: user {id} is not registered");
            return updates;
        };

        match self.slots.position_of(key) {
            Some(0) => {}
            Some(index) => {
                self.slots.swap_occupants(0, index);
                self.show(0, &mut updates);
                self.show(index, &mut updates);
            }
            None => {
                // Takeover: the evicted occupant is left unplaced.
                if let Some(evicted) = self.slots.release(0) {
                    self.hide(evicted, &mut updates);
                }
                self.slots.bind(0, key);
                self.show(0, &mut updates);
            }
        }
        updates
    }

    fn placement_of(&self, id: UserId) -> Option<usize> {
        let key = self.users.find(id)?.key;
        self.slots.position_of(key)
    }

    fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            mode: self.mode,
            canvas: self.canvas,
            slots: self
                .slots
                .iter()
                .map(|slot| SlotSnapshot {
                    geometry: slot.geometry(),
                    occupant: slot
                        .occupant()
                        .and_then(|key| self.users.get(key))
                        .map(|u| u.id),
                })
                .collect(),
            users: self.users.iter().map(|u| u.id).collect(),
        }
    }
}

/// Thread-safe slot allocator for one composited canvas.
///
/// Share it between threads with an `Arc`.  No method returns an error or
/// panics on bad input: unknown ids, full layouts and unknown mode codes are
/// all no-ops (logged at `debug` or `warn`).
pub struct LayoutEngine {
    state: Mutex<EngineState>,
    /// Held while a batch of sink updates is applied.  Taken before the state
    /// lock is released, so batches reach the sinks in the order their table
    /// changes were made.
    dispatch_order: Mutex<()>,
}

impl LayoutEngine {
    /// Creates an engine in [`LayoutMode::Unbounded`] with the given canvas.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self::from_config(&EngineConfig {
            canvas: Canvas::new(canvas_width, canvas_height),
            ..EngineConfig::default()
        })
    }

    /// Creates an engine from explicit configuration.
    ///
    /// A non-default `initial_mode` is applied exactly like a call to
    /// [`switch_mode`](Self::switch_mode), so the canvas is reset to
    /// `nominal_canvas` afterwards.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut state = EngineState::new(config.canvas, config.nominal_canvas);
        let updates = if config.initial_mode.is_fixed() {
            state.switch_mode(config.initial_mode)
        } else {
            Vec::new()
        };
        dispatch(updates);
        Self {
            state: Mutex::new(state),
            dispatch_order: Mutex::new(()),
        }
    }

    /// Registers a participant and tries to give it a slot.
    ///
    /// In [`LayoutMode::Unbounded`] a new slot is always created and every
    /// placed participant receives its recomputed rectangle.  In a fixed mode
    /// the first free slot is used; if there is none the participant stays
    /// registered and its sink is hidden.
    ///
    /// Ids are not deduplicated: registering the same id twice creates two
    /// independent registrations.
    pub fn register_user(&self, id: UserId, sink: Arc<dyn OutputSink>) {
        self.run(|state| state.register_user(id, sink));
    }

    /// Removes a participant, hiding it and freeing its slot.  Unknown ids are ignored.
    pub fn unregister_user(&self, id: UserId) {
        self.run(|state| state.unregister_user(id));
    }

    pub fn is_registered(&self, id: UserId) -> bool {
        self.lock().users.contains(id)
    }

    /// Moves a participant onto the floor (slot 0).
    ///
    /// - Placed participant: trades places with the current floor occupant.
    /// - Registered but unplaced participant: takes the floor; the previous
    ///   occupant is hidden and left without a slot.
    /// - Unknown id, or no slots at all: nothing happens.
    pub fn set_floor(&self, id: UserId) {
        self.run(|state| state.set_floor(id));
    }

    /// Switches the topology, carrying occupants over by slot index.
    ///
    /// Occupants whose index does not exist in the new topology are hidden and
    /// become unplaced; call [`try_insert`](Self::try_insert) to re-seat them.
    /// Fixed topologies take their geometry from the canvas in effect at the
    /// time of the call.  The canvas is then reset to the nominal size.
    pub fn switch_mode(&self, mode: LayoutMode) {
        self.run(|state| state.switch_mode(mode));
    }

    /// Switches the topology by wire code (see [`LayoutMode::code`]).
    ///
    /// An unknown code leaves the engine untouched and logs a warning.
    pub fn switch_mode_code(&self, code: i32) {
        match LayoutMode::try_from(code) {
            Ok(mode) => self.switch_mode(mode),
            Err(e) => warn!("layout switch ignored: {e}"),
        }
    }

    /// Seats a registered participant that currently holds no slot.
    ///
    /// No-op if the id is unknown, already placed, or no slot is free.
    pub fn try_insert(&self, id: UserId) {
        self.run(|state| state.try_insert(id));
    }

    /// Stores a new canvas size.
    ///
    /// Already placed participants keep their rectangles until the next
    /// geometry computation (a placement or removal in unbounded mode, or a
    /// topology switch).
    pub fn set_canvas_size(&self, width: u32, height: u32) {
        let mut state = self.lock();
        state.canvas = Canvas::new(width, height);
        trace!("canvas size set to {width}x{height}");
    }

    /// Stores a new canvas width.  See [`set_canvas_size`](Self::set_canvas_size).
    pub fn set_canvas_width(&self, width: u32) {
        self.lock().canvas.width = width;
    }

    /// Stores a new canvas height.  See [`set_canvas_size`](Self::set_canvas_size).
    pub fn set_canvas_height(&self, height: u32) {
        self.lock().canvas.height = height;
    }

    pub fn get_mode(&self) -> LayoutMode {
        self.lock().mode
    }

    /// Capacity implied by the current topology, `None` if uncapped.
    pub fn max_users(&self) -> Option<usize> {
        self.get_mode().max_users()
    }

    pub fn canvas(&self) -> Canvas {
        self.lock().canvas
    }

    pub fn slot_count(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Slot index held by the participant, `None` if unknown or unplaced.
    pub fn placement_of(&self, id: UserId) -> Option<usize> {
        self.lock().placement_of(id)
    }

    /// Copies the current state out of the engine.
    pub fn snapshot(&self) -> LayoutSnapshot {
        self.lock().snapshot()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        // Sinks never run under the lock, so poisoning can only come from a
        // bug inside EngineState; keep serving rather than cascade the panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run<F>(&self, op: F)
    where
        F: FnOnce(&mut EngineState) -> Vec<SinkUpdate>,
    {
        let mut state = self.lock();
        let updates = op(&mut state);
        let _order = self
            .dispatch_order
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        drop(state);
        trace!("dispatching {} sink updates", updates.len());
        dispatch(updates);
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
