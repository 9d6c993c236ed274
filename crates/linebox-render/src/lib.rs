#![forbid(unsafe_code)]

//! Render: place lines in a terminal rectangle and turn internal hyperlinks
//! into clickable cell regions.
//!
//! # Role in linebox
//! `linebox-render` produces the bytes that draw a block of text. It owns the
//! per-row cursor positioning, the bottom-edge cutoff, and the translation of
//! OSC 8 hyperlink markers: standard links pass through to the terminal,
//! internal links are swallowed and reported as cell regions.
//!
//! # Primary responsibilities
//! - **render_lines**: expand, position, and emit lines into a rectangle.
//! - **hyperlink**: find hyperlink markers and build internal/standard links.
//! - **mouse**: the region tracker seam and the `MouseState` hit tester.
//! - **terminal_model** (`test-helpers`): a small emulator for checking
//!   rendered output.
//!
//! # How it fits in the system
//! Wrapping comes from `linebox-text`, widths and escape writers from
//! `linebox-core`. The `linebox` facade re-exports this crate's public API.

pub mod hyperlink;
pub mod mouse;
pub mod render_lines;
#[cfg(any(test, feature = "test-helpers"))]
pub mod terminal_model;

pub use hyperlink::{INTERNAL_HYPERLINK_PROTOCOL, hyperlink, internal_hyperlink};
pub use mouse::{CellRegion, CellRegionTracker, MouseState};
pub use render_lines::{RenderLines, RenderOutcome, RenderResult};
