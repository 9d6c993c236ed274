#![forbid(unsafe_code)]

//! Text layout for linebox: escape-aware tokenizing and wrapping.
//!
//! Input lines may carry terminal escape sequences (hyperlinks in
//! particular). This crate treats each recognized sequence as an atomic,
//! zero-width unit so wrapping decisions are made on visible columns only,
//! and hyperlinks that straddle a line break are closed and re-opened so
//! every physical line is self-contained.
//!
//! ```
//! use linebox_text::wrap::{WrapMode, wrap_text};
//!
//! let lines = wrap_text("Hello world foo bar", 10, WrapMode::Word);
//! assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
//! ```

pub mod escape;
pub mod wrap;

pub use escape::{Piece, pieces, visible_width};
pub use wrap::{WrapMode, WrapOptions, wrap_text, wrap_with_options};
