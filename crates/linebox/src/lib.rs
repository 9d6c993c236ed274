#![forbid(unsafe_code)]

//! linebox public facade crate.
//!
//! This crate provides the stable surface area for users. It re-exports the
//! common types from the internal crates and offers a small prelude.
//!
//! ```
//! use linebox::prelude::*;
//!
//! let mut mouse = MouseState::new();
//! let lines = [format!("press {}", internal_hyperlink("OK", "ok"))];
//! let result = RenderLines::default().in_rectangle(&lines, RenderRect::new(0, 0, 20, 1), &mut mouse);
//!
//! assert_eq!(result.output, "\x1b[1;1Hpress OK");
//! assert_eq!(mouse.click(6, 0), Some("ok"));
//! ```

use std::fmt;
use std::io::{self, BufRead};

// --- Core re-exports -------------------------------------------------------

pub use linebox_core::geometry::{CellPos, RenderRect};
pub use linebox_core::text_width::display_width;

// --- Text re-exports -------------------------------------------------------

pub use linebox_text::wrap::{WrapMode, WrapOptions, wrap_text, wrap_with_options};

// --- Render re-exports -----------------------------------------------------

pub use linebox_render::hyperlink::{INTERNAL_HYPERLINK_PROTOCOL, hyperlink, internal_hyperlink};
pub use linebox_render::mouse::{CellRegion, CellRegionTracker, MouseState};
pub use linebox_render::render_lines::{RenderLines, RenderOutcome, RenderResult};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for linebox.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while reading input or writing output.
    Io(io::Error),
    /// Input that cannot be rendered, with a message.
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidInput(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for linebox APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Input ----------------------------------------------------------------

/// Read logical lines from `reader`.
///
/// Lines end at `\n`; a `\r` before it is dropped. Input that is not UTF-8 is
/// rejected with [`Error::InvalidInput`] naming the 1-based line.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        match line {
            Ok(mut line) => {
                if line.ends_with('\r') {
                    line.pop();
                }
                lines.push(line);
            }
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                return Err(Error::InvalidInput(format!(
                    "line {}: input is not valid UTF-8",
                    idx + 1
                )));
            }
            Err(err) => return Err(Error::Io(err)),
        }
    }
    Ok(lines)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CellPos, CellRegion, CellRegionTracker, Error, MouseState, RenderLines, RenderRect,
        RenderResult, Result, WrapMode, WrapOptions, hyperlink, internal_hyperlink,
    };

    pub use crate::{core, render, text};
}

pub use linebox_core as core;
pub use linebox_render as render;
pub use linebox_text as text;
