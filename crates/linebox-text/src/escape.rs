#![forbid(unsafe_code)]

//! Split text into escape sequences and grapheme clusters.
//!
//! Two escape forms are recognized as atomic units:
//! - CSI: `ESC [` parameter/intermediate bytes, then a final byte in `@..=~`.
//! - OSC: `ESC ]` payload terminated by `BEL` or `ESC \`.
//!
//! A sequence that is cut off before its terminator is not an escape: the
//! `ESC` becomes an ordinary (zero-width) grapheme and scanning resumes right
//! after it, so no input byte is ever lost.
//!
//! ```
//! use linebox_text::escape::{Piece, pieces};
//!
//! let parts = pieces("a\x1b]8;;x\x07b");
//! assert_eq!(
//!     parts,
//!     vec![Piece::Grapheme("a"), Piece::Escape("\x1b]8;;x\x07"), Piece::Grapheme("b")]
//! );
//! ```

use unicode_segmentation::UnicodeSegmentation;

use linebox_core::ansi::OSC8_PREFIX;
use linebox_core::text_width::{display_width, grapheme_width};

/// One unit of a line: either an escape sequence or a visible grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// A complete CSI or OSC sequence, zero columns wide.
    Escape(&'a str),
    /// A grapheme cluster.
    Grapheme(&'a str),
}

impl<'a> Piece<'a> {
    /// The raw text of the piece.
    #[inline]
    pub const fn as_str(&self) -> &'a str {
        match self {
            Self::Escape(s) | Self::Grapheme(s) => *s,
        }
    }

    /// Whether the piece is a whitespace grapheme.
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        match self {
            Self::Escape(_) => false,
            Self::Grapheme(g) => g.chars().all(char::is_whitespace),
        }
    }
}

/// Length in bytes of the escape sequence at the start of `s`, if complete.
fn escape_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&0x1B) {
        return None;
    }
    match *bytes.get(1)? {
        b'[' => {
            let body = bytes.get(2..)?;
            let end = body.iter().position(|b| !(0x20..=0x3F).contains(b))?;
            (0x40..=0x7E)
                .contains(&body[end])
                .then_some(2 + end + 1)
        }
        b']' => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return Some(i + 1),
                    0x1B if bytes.get(i + 1) == Some(&b'\\') => return Some(i + 2),
                    _ => i += 1,
                }
            }
            None
        }
        _ => None,
    }
}

/// Split `text` into escape sequences and grapheme clusters, in order.
///
/// Concatenating the returned pieces reproduces `text` exactly.
pub fn pieces(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(len) = escape_len(rest) {
            out.push(Piece::Escape(&rest[..len]));
            rest = &rest[len..];
            continue;
        }
        // Plain run up to the next ESC that is not at the very start.
        let run_end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '\x1b')
            .map_or(rest.len(), |(i, _)| i);
        out.extend(rest[..run_end].graphemes(true).map(Piece::Grapheme));
        rest = &rest[run_end..];
    }
    out
}

/// Display width of `text` in cells, with escape sequences taking none.
///
/// ```
/// use linebox_text::escape::visible_width;
///
/// assert_eq!(visible_width("\x1b[1mbold\x1b[0m"), 4);
/// ```
#[must_use]
pub fn visible_width(text: &str) -> usize {
    if !text.contains('\x1b') {
        return display_width(text);
    }
    pieces(text)
        .iter()
        .map(|piece| match piece {
            Piece::Grapheme(g) => grapheme_width(g),
            Piece::Escape(_) => 0,
        })
        .sum()
}

/// The `(id, url)` fields of an OSC 8 hyperlink escape.
///
/// Returns `None` for anything that is not a complete OSC 8 sequence with
/// both fields present.
pub fn osc8_params(seq: &str) -> Option<(&str, &str)> {
    let body = seq.strip_prefix(OSC8_PREFIX)?;
    let body = body
        .strip_suffix('\x07')
        .or_else(|| body.strip_suffix("\x1b\\"))?;
    let (id, url) = body.split_once(';')?;
    Some((id, url))
}

/// Whether `seq` is an OSC 8 closer (`ESC ] 8 ; ; ST`).
#[inline]
pub fn is_hyperlink_closer(seq: &str) -> bool {
    matches!(osc8_params(seq), Some(("", "")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(parts: &[Piece<'_>]) -> String {
        parts.iter().map(Piece::as_str).collect()
    }

    #[test]
    fn plain_text_is_graphemes() {
        let parts = pieces("e\u{0301}b");
        assert_eq!(parts, vec![Piece::Grapheme("e\u{0301}"), Piece::Grapheme("b")]);
    }

    #[test]
    fn csi_sequence_is_atomic() {
        let parts = pieces("\x1b[1;31mX\x1b[0m");
        assert_eq!(
            parts,
            vec![
                Piece::Escape("\x1b[1;31m"),
                Piece::Grapheme("X"),
                Piece::Escape("\x1b[0m"),
            ]
        );
    }

    #[test]
    fn osc_accepts_both_terminators() {
        let parts = pieces("\x1b]8;;a\x1b\\\x1b]8;;\x07");
        assert_eq!(
            parts,
            vec![Piece::Escape("\x1b]8;;a\x1b\\"), Piece::Escape("\x1b]8;;\x07")]
        );
    }

    #[test]
    fn unterminated_osc_is_literal() {
        let text = "x\x1b]8;;http://a";
        let parts = pieces(text);
        assert_eq!(parts[1], Piece::Grapheme("\x1b"));
        assert!(parts.iter().all(|p| matches!(p, Piece::Grapheme(_))));
        assert_eq!(joined(&parts), text);
    }

    #[test]
    fn lone_escape_is_literal() {
        let parts = pieces("\x1b");
        assert_eq!(parts, vec![Piece::Grapheme("\x1b")]);
        let parts = pieces("\x1b7a");
        assert_eq!(joined(&parts), "\x1b7a");
    }

    #[test]
    fn pieces_round_trip() {
        let text = "ab \x1b]8;id;u\x1b\\c\u{4F60}\x1b[2K\x1b]8;;\x1b\\ \x1b";
        assert_eq!(joined(&pieces(text)), text);
    }

    #[test]
    fn visible_width_skips_escapes() {
        assert_eq!(visible_width("plain"), 5);
        assert_eq!(visible_width("\x1b[1;31mred\x1b[0m"), 3);
        assert_eq!(visible_width("\x1b]0;window title\x07ab"), 2);
        assert_eq!(visible_width("\x1b[38;5;208m\u{4F60}\x1b[0m"), 2);
        assert_eq!(visible_width("\x1b[0m"), 0);
    }

    #[test]
    fn visible_width_counts_cut_off_escape_text() {
        // Without a terminator the bytes after ESC are ordinary text.
        assert_eq!(visible_width("\x1b]8;;x"), 5);
    }

    #[test]
    fn osc8_params_extracts_fields() {
        assert_eq!(osc8_params("\x1b]8;id;url\x1b\\"), Some(("id", "url")));
        assert_eq!(osc8_params("\x1b]8;;url;with;semis\x07"), Some(("", "url;with;semis")));
        assert_eq!(osc8_params("\x1b]8;;\x1b\\"), Some(("", "")));
        assert_eq!(osc8_params("\x1b]0;title\x07"), None);
        assert_eq!(osc8_params("\x1b]8;noseparator\x07"), None);
    }

    #[test]
    fn closer_detection() {
        assert!(is_hyperlink_closer("\x1b]8;;\x1b\\"));
        assert!(is_hyperlink_closer("\x1b]8;;\x07"));
        assert!(!is_hyperlink_closer("\x1b]8;;x\x07"));
        assert!(!is_hyperlink_closer("\x1b[0m"));
    }
}
