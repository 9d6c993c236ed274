#![forbid(unsafe_code)]

//! Core: display width, cell geometry, and escape sequence writers.
//!
//! # Role in linebox
//! `linebox-core` is the bottom layer. It owns the pieces every other crate
//! measures or emits with: how many terminal columns a fragment of text
//! occupies, where a render rectangle sits on the cell grid, and the exact
//! bytes of the escape sequences that move the cursor or open and close
//! hyperlinks.
//!
//! # Primary responsibilities
//! - **text_width**: grapheme-aware display width with a CJK override.
//! - **geometry**: signed cell positions and render rectangles.
//! - **ansi**: cursor-move template and OSC 8 hyperlink writers.
//!
//! # How it fits in the system
//! `linebox-text` wraps lines using these widths, and `linebox-render` emits
//! cursor moves and hyperlinks through `ansi` while tracking the cursor with
//! `geometry::CellPos`.

pub mod ansi;
pub mod geometry;
pub mod logging;
pub mod text_width;
