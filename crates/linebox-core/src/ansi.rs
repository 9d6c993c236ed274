#![forbid(unsafe_code)]

//! Escape sequences emitted by the renderer.
//!
//! Every writer has two forms: an `io::Write` form for streaming output and a
//! `push_*` form that appends to a `String`, which is what the line renderer
//! accumulates into.
//!
//! | Sequence | Bytes |
//! |---|---|
//! | Cursor position (CUP) | `ESC [ row ; col H`, 1-based |
//! | Hyperlink open | `ESC ] 8 ; id ; url ESC \` |
//! | Hyperlink close | `ESC ] 8 ; ; ESC \` |
//! | Erase display | `ESC [ 2 J` |

use std::fmt::Write as _;
use std::io::{self, Write};

/// Escape byte.
pub const ESC: char = '\x1b';

/// BEL, the short OSC string terminator.
pub const BEL: char = '\x07';

/// `ESC \`, the standard string terminator.
pub const ST: &str = "\x1b\\";

/// OSC 8 hyperlink introducer.
pub const OSC8_PREFIX: &str = "\x1b]8;";

/// OSC 8 hyperlink closer with the standard terminator.
pub const HYPERLINK_END: &str = "\x1b]8;;\x1b\\";

/// Erase the entire display.
pub const ERASE_DISPLAY: &str = "\x1b[2J";

/// Append a cursor-move to the 0-indexed cell `(x, y)`.
///
/// The sequence carries the 1-based row first: `(x, y) = (0, 0)` renders as
/// `ESC [ 1 ; 1 H`.
#[inline]
pub fn push_cup(out: &mut String, x: i32, y: i32) {
    let _ = write!(
        out,
        "\x1b[{};{}H",
        i64::from(y) + 1,
        i64::from(x) + 1
    );
}

/// Write a cursor-move to the 0-indexed cell `(x, y)`.
pub fn cup<W: Write>(w: &mut W, x: i32, y: i32) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", i64::from(y) + 1, i64::from(x) + 1)
}

/// Append an OSC 8 hyperlink opener terminated with `ESC \`.
#[inline]
pub fn push_hyperlink_start(out: &mut String, id: &str, url: &str) {
    out.push_str(OSC8_PREFIX);
    out.push_str(id);
    out.push(';');
    out.push_str(url);
    out.push_str(ST);
}

/// Write an OSC 8 hyperlink opener terminated with `ESC \`.
pub fn hyperlink_start<W: Write>(w: &mut W, id: &str, url: &str) -> io::Result<()> {
    write!(w, "{OSC8_PREFIX}{id};{url}{ST}")
}

/// Append the OSC 8 hyperlink closer.
#[inline]
pub fn push_hyperlink_end(out: &mut String) {
    out.push_str(HYPERLINK_END);
}

/// Write the OSC 8 hyperlink closer.
pub fn hyperlink_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(HYPERLINK_END.as_bytes())
}

/// Write an erase-display sequence.
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_DISPLAY.as_bytes())
}
