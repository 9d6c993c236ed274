#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed cell units, 0-indexed with the origin at the top
//! left of the caller's coordinate space. They only become 1-based at the
//! cursor-move boundary in [`crate::ansi`].

use std::cmp::Ordering;

/// A cell position on the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CellPos {
    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Compare two positions in text-flow order: row first, then column.
    #[inline]
    pub fn flow_cmp(&self, other: &CellPos) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

/// The rectangle a block of lines is rendered into.
///
/// `width <= 0` disables wrapping and `height <= 0` leaves no rows at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Column budget for wrapping.
    pub width: i32,
    /// Number of rows available.
    pub height: i32,
}

impl RenderRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left cell.
    #[inline]
    pub const fn origin(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }

    /// Last row that may be rendered (inclusive).
    ///
    /// Less than `y` when the rectangle has no rows.
    #[inline]
    pub const fn end_y(&self) -> i32 {
        self.y.saturating_add(self.height).saturating_sub(1)
    }

    /// Whether any row is available.
    #[inline]
    pub const fn has_rows(&self) -> bool {
        self.height > 0
    }

    /// Wrap width, or `None` when wrapping is disabled.
    #[inline]
    pub fn wrap_width(&self) -> Option<usize> {
        usize::try_from(self.width).ok().filter(|&w| w > 0)
    }
}
