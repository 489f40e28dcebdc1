//! The ordered table of canvas slots.
//!
//! Order matters: index 0 is the floor, and topology switches transfer
//! occupants by index.  A slot's availability is derived from its occupant,
//! so a slot can never be "taken" without someone in it, or the reverse.

use super::geometry::SlotGeometry;
use super::users::UserKey;

/// One rectangle of the canvas, optionally bound to a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    geometry: SlotGeometry,
    occupant: Option<UserKey>,
}

impl Slot {
    /// Creates an empty slot.
    pub fn new(geometry: SlotGeometry) -> Self {
        Self {
            geometry,
            occupant: None,
        }
    }

    pub fn geometry(&self) -> SlotGeometry {
        self.geometry
    }

    pub fn occupant(&self) -> Option<UserKey> {
        self.occupant
    }

    /// Returns `true` if no participant is bound to this slot.
    pub fn is_available(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Ordered sequence of slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table of empty slots, one per rectangle, in the given order.
    pub fn from_geometries(geometries: Vec<SlotGeometry>) -> Self {
        Self {
            slots: geometries.into_iter().map(Slot::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Index of the first slot with no occupant.
    pub fn first_available(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_available)
    }

    /// Index of the slot holding `key`, if the user is placed.
    pub fn position_of(&self, key: UserKey) -> Option<usize> {
        self.slots.iter().position(|s| s.occupant == Some(key))
    }

    /// Appends an empty slot and returns its index.
    pub fn push(&mut self, geometry: SlotGeometry) -> usize {
        self.slots.push(Slot::new(geometry));
        self.slots.len() - 1
    }

    /// Removes the slot at `index`, shifting later slots down by one.
    pub fn remove(&mut self, index: usize) -> Option<Slot> {
        (index < self.slots.len()).then(|| self.slots.remove(index))
    }

    /// Binds `key` to the slot at `index`, returning the previous occupant.
    ///
    /// The caller is responsible for `key` not being placed anywhere else.
    pub fn bind(&mut self, index: usize, key: UserKey) -> Option<UserKey> {
        debug_assert!(
            self.position_of(key).map_or(true, |p| p == index),
            "user is already placed in another slot"
        );
        self.slots
            .get_mut(index)
            .and_then(|slot| slot.occupant.replace(key))
    }

    /// Clears the slot at `index` and returns whoever was in it.
    pub fn release(&mut self, index: usize) -> Option<UserKey> {
        self.slots.get_mut(index).and_then(|slot| slot.occupant.take())
    }

    /// Exchanges the occupants of two slots.  Geometry stays with the slot.
    pub fn swap_occupants(&mut self, a: usize, b: usize) {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return;
        }
        let tmp = self.slots[a].occupant.take();
        self.slots[a].occupant = self.slots[b].occupant.take();
        self.slots[b].occupant = tmp;
    }

    /// Overwrites slot geometry in index order.
    ///
    /// Extra rectangles are ignored; slots without a rectangle keep theirs.
    pub fn set_geometries(&mut self, geometries: &[SlotGeometry]) {
        for (slot, geometry) in self.slots.iter_mut().zip(geometries) {
            slot.geometry = *geometry;
        }
    }

    /// `(index, occupant)` for every bound slot, in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, UserKey)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.occupant.map(|key| (i, key)))
    }

    /// Drops every empty slot, keeping the relative order of the rest.
    pub fn remove_empty(&mut self) {
        self.slots.retain(|s| !s.is_available());
    }
}
