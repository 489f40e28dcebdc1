//! Slot geometry calculator.
//!
//! Every rectangle the engine hands to a sink comes from this module.  The
//! functions here are pure: given a slot count (or a topology) and a canvas
//! size they return the rectangles in slot order, with slot 0 first.
//!
//! All arithmetic is unsigned integer arithmetic.  Divisions truncate, so the
//! cells of a grid may leave a few pixels of the canvas uncovered on the right
//! and bottom edges.

use serde::{Deserialize, Serialize};

/// Canvas size the engine falls back to whenever the topology is switched.
pub const NOMINAL_CANVAS: Canvas = Canvas {
    width: 1280,
    height: 720,
};

/// Number of slots in the dominant-speaker grid topology.
pub const GRID6_SLOTS: usize = 6;

/// Size of the composited output picture in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A rectangle of the canvas, in pixels, with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Y coordinate of the top edge.
    pub top: u32,
    /// X coordinate of the left edge.
    pub left: u32,
}

impl SlotGeometry {
    pub fn new(width: u32, height: u32, top: u32, left: u32) -> Self {
        Self {
            width,
            height,
            top,
            left,
        }
    }

    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Returns the bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// Returns `ceil(sqrt(count))` without going through floating point.
fn grid_columns(count: usize) -> usize {
    let mut columns = 0;
    while columns * columns < count {
        columns += 1;
    }
    columns
}

/// Lays out `count` equally sized cells in a near-square grid.
///
/// Used by the unbounded topology, where the number of slots always equals the
/// number of placed participants.  Cells are filled row-major:
///
/// ```text
/// count = 5  →  columns = 3, rows = 2
///
/// ┌───┬───┬───┐
/// │ 0 │ 1 │ 2 │
/// ├───┼───┼───┘
/// │ 3 │ 4 │
/// └───┴───┘
/// ```
///
/// Returns an empty vector when `count` is zero.
pub fn unbounded_geometry(count: usize, canvas: Canvas) -> Vec<SlotGeometry> {
    if count == 0 {
        return Vec::new();
    }
    let columns = grid_columns(count);
    let rows = count.div_ceil(columns);
    let width = canvas.width / columns as u32;
    let height = canvas.height / rows as u32;

    (0..count)
        .map(|i| SlotGeometry {
            width,
            height,
            top: (i / columns) as u32 * height,
            left: (i % columns) as u32 * width,
        })
        .collect()
}

/// One slot covering the whole canvas.
pub fn single_geometry(canvas: Canvas) -> Vec<SlotGeometry> {
    vec![SlotGeometry::new(canvas.width, canvas.height, 0, 0)]
}

/// The dominant-speaker layout: one large floor slot plus five thumbnails.
///
/// The canvas is divided into thirds in both directions.  Slot 0 takes the
/// top-left 2×2 block of cells, slots 1–3 fill the bottom row and slots 4–5
/// stack in the right-hand column:
///
/// ```text
/// ┌───────┬───┐
/// │       │ 4 │
/// │   0   ├───┤
/// │       │ 5 │
/// ├───┬───┼───┤
/// │ 1 │ 2 │ 3 │
/// └───┴───┴───┘
/// ```
pub fn grid6_geometry(canvas: Canvas) -> Vec<SlotGeometry> {
    let cell_w = canvas.width / 3;
    let cell_h = canvas.height / 3;

    let floor = SlotGeometry::new(cell_w * 2, cell_h * 2, 0, 0);
    let bottom_0 = SlotGeometry::new(cell_w, cell_h, floor.bottom(), 0);
    let bottom_1 = SlotGeometry::new(cell_w, cell_h, floor.bottom(), bottom_0.right());
    let bottom_2 = SlotGeometry::new(cell_w, cell_h, floor.bottom(), bottom_1.right());
    let side_0 = SlotGeometry::new(cell_w, cell_h, 0, floor.right());
    let side_1 = SlotGeometry::new(cell_w, cell_h, side_0.bottom(), floor.right());

    vec![floor, bottom_0, bottom_1, bottom_2, side_0, side_1]
}

// ── Tests ─────────────────────────────────────────────────────────────────────
