#![forbid(unsafe_code)]

//! Clickable cell regions.
//!
//! The renderer reports each internal hyperlink it draws as a region of cells
//! bound to an action string. [`CellRegionTracker`] is the only thing the
//! renderer needs; [`MouseState`] is the tracker an application keeps around
//! to answer "what is under the pointer" and "what did that click do".
//!
//! Regions follow text flow rather than forming boxes: a region from `(3, 0)`
//! to `(2, 1)` covers columns 3.. of row 0 and columns ..2 of row 1. The end
//! cell is exclusive.
//!
//! ```
//! use linebox_render::mouse::{CellRegionTracker, MouseState};
//!
//! let mut mouse = MouseState::new();
//! mouse.add_cell_region("save", 0, 0, 4, 0);
//! assert_eq!(mouse.click(2, 0), Some("save"));
//! assert_eq!(mouse.click(4, 0), None);
//! ```

use std::cmp::Ordering;

use linebox_core::geometry::CellPos;

/// Receiver for cell regions produced while rendering.
pub trait CellRegionTracker {
    /// Associate `action` with the cells from `(start_x, start_y)` up to,
    /// but not including, `(end_x, end_y)` in text-flow order.
    fn add_cell_region(&mut self, action: &str, start_x: i32, start_y: i32, end_x: i32, end_y: i32);
}

impl<T: CellRegionTracker + ?Sized> CellRegionTracker for &mut T {
    fn add_cell_region(&mut self, action: &str, start_x: i32, start_y: i32, end_x: i32, end_y: i32) {
        (**self).add_cell_region(action, start_x, start_y, end_x, end_y);
    }
}

/// An action bound to a run of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRegion {
    /// Action dispatched when the region is clicked.
    pub action: String,
    /// First covered cell.
    pub start: CellPos,
    /// First cell past the region.
    pub end: CellPos,
}

impl CellRegion {
    /// Create a new region.
    pub fn new(action: impl Into<String>, start: CellPos, end: CellPos) -> Self {
        Self {
            action: action.into(),
            start,
            end,
        }
    }

    /// Whether `pos` falls inside the region.
    #[inline]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.flow_cmp(&self.start) != Ordering::Less && pos.flow_cmp(&self.end) == Ordering::Less
    }

    /// Whether the region covers no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.flow_cmp(&self.end) != Ordering::Less
    }
}

/// Registered regions plus hover state.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    regions: Vec<CellRegion>,
    hovered: Option<usize>,
}

impl MouseState {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every region and the hover state.
    pub fn clear_cell_regions(&mut self) {
        self.regions.clear();
        self.hovered = None;
    }

    /// Regions in registration order.
    #[inline]
    pub fn cell_regions(&self) -> &[CellRegion] {
        &self.regions
    }

    fn index_at(&self, pos: CellPos) -> Option<usize> {
        // Later registrations are drawn on top.
        self.regions.iter().rposition(|r| r.contains(pos))
    }

    fn action_of(&self, index: Option<usize>) -> Option<&str> {
        index
            .and_then(|i| self.regions.get(i))
            .map(|r| r.action.as_str())
    }

    /// The topmost region covering `(x, y)`.
    pub fn region_at(&self, x: i32, y: i32) -> Option<&CellRegion> {
        self.index_at(CellPos::new(x, y)).map(|i| &self.regions[i])
    }

    /// Move the pointer to `(x, y)`.
    ///
    /// Returns `true` when the hovered action changed, which is when a caller
    /// needs to redraw hover feedback.
    pub fn update_hover(&mut self, x: i32, y: i32) -> bool {
        let next = self.index_at(CellPos::new(x, y));
        let changed = self.action_of(self.hovered) != self.action_of(next);
        self.hovered = next;
        changed
    }

    /// Action under the pointer as of the last [`update_hover`](Self::update_hover).
    #[inline]
    pub fn hovered_action(&self) -> Option<&str> {
        self.action_of(self.hovered)
    }

    /// Action to dispatch for a click at `(x, y)`.
    pub fn click(&self, x: i32, y: i32) -> Option<&str> {
        self.region_at(x, y).map(|r| r.action.as_str())
    }
}

impl CellRegionTracker for MouseState {
    fn add_cell_region(&mut self, action: &str, start_x: i32, start_y: i32, end_x: i32, end_y: i32) {
        if action.is_empty() {
            return;
        }
        self.regions.push(CellRegion::new(
            action,
            CellPos::new(start_x, start_y),
            CellPos::new(end_x, end_y),
        ));
    }
}
