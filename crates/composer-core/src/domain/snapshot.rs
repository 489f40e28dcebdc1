//! Point-in-time copies of engine state.
//!
//! A [`LayoutSnapshot`] is taken under the engine lock and then handed out by
//! value, so inspecting it never blocks the engine.  Hosts print it, tests
//! compare two of them to prove an operation changed nothing.

use serde::Serialize;

use super::geometry::{Canvas, SlotGeometry};
use super::mode::LayoutMode;
use super::users::UserId;

/// One slot as seen from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub geometry: SlotGeometry,
    /// Id of the participant bound to this slot.
    pub occupant: Option<UserId>,
}

impl SlotSnapshot {
    pub fn is_available(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Everything observable about an engine at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSnapshot {
    pub mode: LayoutMode,
    pub canvas: Canvas,
    /// Slots in index order; index 0 is the floor.
    pub slots: Vec<SlotSnapshot>,
    /// Registered participant ids in registration order.
    pub users: Vec<UserId>,
}

impl LayoutSnapshot {
    /// Occupant of the slot at `index`, `None` if empty or out of range.
    pub fn occupant_at(&self, index: usize) -> Option<UserId> {
        self.slots.get(index).and_then(|s| s.occupant)
    }

    /// Index of the first slot occupied by `id`.
    pub fn placement_of(&self, id: UserId) -> Option<usize> {
        self.slots.iter().position(|s| s.occupant == Some(id))
    }

    /// Ids of registered participants that hold no slot.
    ///
    /// A duplicated id counts as placed as soon as one registration is placed.
    pub fn unplaced(&self) -> Vec<UserId> {
        self.users
            .iter()
            .copied()
            .filter(|id| self.placement_of(*id).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> LayoutSnapshot {
        LayoutSnapshot {
            mode: LayoutMode::Single,
            canvas: Canvas::new(1280, 720),
            slots: vec![SlotSnapshot {
                geometry: SlotGeometry::new(1280, 720, 0, 0),
                occupant: Some(1),
            }],
            users: vec![1, 2],
        }
    }

    #[test]
    fn test_occupant_at_reports_bound_user() {
        let s = snapshot();
        assert_eq!(s.occupant_at(0), Some(1));
        assert_eq!(s.occupant_at(1), None);
    }

    #[test]
    fn test_unplaced_lists_registered_users_without_slot() {
        assert_eq!(snapshot().unplaced(), vec![2]);
    }

    #[test]
    fn test_slot_snapshot_availability_follows_occupant() {
        let s = snapshot();
        assert!(!s.slots[0].is_available());
    }
}
