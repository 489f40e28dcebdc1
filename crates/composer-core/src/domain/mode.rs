//! Layout topologies.
//!
//! A topology decides how many slots exist and what shape they have:
//!
//! | Mode        | Code | Slots                      |
//! |-------------|------|----------------------------|
//! | `Unbounded` | 0    | one per placed participant |
//! | `Grid6`     | 1    | six, floor plus thumbnails |
//! | `Single`    | 2    | one, full canvas           |
//!
//! The numeric codes are what control-plane callers send over the wire; the
//! lower-case names are what configuration files use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{self, Canvas, SlotGeometry, GRID6_SLOTS};

/// Errors produced when a topology value cannot be recognised.
///
/// The engine itself never returns these; they surface only from the parsing
/// helpers so that callers can log and ignore bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A numeric mode code outside the known range.
    #[error("there is no layout mode {0}")]
    UnknownMode(i32),

    /// A mode name that matches no topology.
    #[error("there is no layout mode named {0:?}")]
    UnknownModeName(String),
}

/// Slot topology of the composited canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Near-square grid that grows and shrinks with the number of participants.
    #[default]
    Unbounded,
    /// One dominant floor slot and five thumbnails.
    Grid6,
    /// One slot covering the whole canvas.
    Single,
}

impl LayoutMode {
    /// Wire code of this mode.
    pub fn code(self) -> i32 {
        match self {
            LayoutMode::Unbounded => 0,
            LayoutMode::Grid6 => 1,
            LayoutMode::Single => 2,
        }
    }

    /// Maximum number of simultaneously placed participants, `None` if uncapped.
    pub fn max_users(self) -> Option<usize> {
        match self {
            LayoutMode::Unbounded => None,
            LayoutMode::Grid6 => Some(GRID6_SLOTS),
            LayoutMode::Single => Some(1),
        }
    }

    /// Returns `true` for topologies with a fixed slot count.
    pub fn is_fixed(self) -> bool {
        self.max_users().is_some()
    }

    /// Static slot rectangles for a fixed topology.
    ///
    /// Returns `None` for [`LayoutMode::Unbounded`], whose geometry depends on
    /// the number of placed participants.
    pub fn fixed_geometry(self, canvas: Canvas) -> Option<Vec<SlotGeometry>> {
        match self {
            LayoutMode::Unbounded => None,
            LayoutMode::Grid6 => Some(geometry::grid6_geometry(canvas)),
            LayoutMode::Single => Some(geometry::single_geometry(canvas)),
        }
    }

    fn name(self) -> &'static str {
        match self {
            LayoutMode::Unbounded => "unbounded",
            LayoutMode::Grid6 => "grid6",
            LayoutMode::Single => "single",
        }
    }
}

impl TryFrom<i32> for LayoutMode {
    type Error = LayoutError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(LayoutMode::Unbounded),
            1 => Ok(LayoutMode::Grid6),
            2 => Ok(LayoutMode::Single),
            other => Err(LayoutError::UnknownMode(other)),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbounded" => Ok(LayoutMode::Unbounded),
            "grid6" => Ok(LayoutMode::Grid6),
            "single" => Ok(LayoutMode::Single),
            _ => Err(LayoutError::UnknownModeName(s.to_string())),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_unbounded() {
        assert_eq!(LayoutMode::default(), LayoutMode::Unbounded);
    }

    #[test]
    fn test_codes_round_trip_through_try_from() {
        for mode in [LayoutMode::Unbounded, LayoutMode::Grid6, LayoutMode::Single] {
            assert_eq!(LayoutMode::try_from(mode.code()), Ok(mode));
        }
    }

    #[test]
    fn test_try_from_rejects_unknown_code() {
        assert_eq!(LayoutMode::try_from(3), Err(LayoutError::UnknownMode(3)));
        assert_eq!(LayoutMode::try_from(-1), Err(LayoutError::UnknownMode(-1)));
    }

    #[test]
    fn test_from_str_accepts_names_case_insensitively() {
        assert_eq!("Grid6".parse::<LayoutMode>(), Ok(LayoutMode::Grid6));
        assert_eq!(" single ".parse::<LayoutMode>(), Ok(LayoutMode::Single));
        assert_eq!("unbounded".parse::<LayoutMode>(), Ok(LayoutMode::Unbounded));
    }

    #[test]
    fn test_from_str_rejects_unknown_name() {
        assert_eq!(
            "grid9".parse::<LayoutMode>(),
            Err(LayoutError::UnknownModeName("grid9".to_string()))
        );
    }

    #[test]
    fn test_display_matches_config_name() {
        assert_eq!(LayoutMode::Grid6.to_string(), "grid6");
    }

    #[test]
    fn test_max_users_per_mode() {
        assert_eq!(LayoutMode::Unbounded.max_users(), None);
        assert_eq!(LayoutMode::Grid6.max_users(), Some(6));
        assert_eq!(LayoutMode::Single.max_users(), Some(1));
        assert!(!LayoutMode::Unbounded.is_fixed());
    }

    #[test]
    fn test_fixed_geometry_none_for_unbounded() {
        assert!(LayoutMode::Unbounded
            .fixed_geometry(Canvas::new(1280, 720))
            .is_none());
        assert_eq!(
            LayoutMode::Grid6
                .fixed_geometry(Canvas::new(1280, 720))
                .map(|g| g.len()),
            Some(6)
        );
    }

    #[test]
    fn test_error_message_names_the_code() {
        assert_eq!(
            LayoutError::UnknownMode(7).to_string(),
            "there is no layout mode 7"
        );
    }
}
