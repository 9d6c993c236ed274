#![forbid(unsafe_code)]

//! Text wrapping with Unicode and escape-sequence correctness.
//!
//! This module provides width-correct text wrapping that respects:
//! - Grapheme cluster boundaries (never break emoji, ZWJ sequences, etc.)
//! - Cell widths (CJK characters are 2 cells wide)
//! - Word boundaries when possible
//! - Escape sequences, which are zero-width and never split
//!
//! When a break falls inside an OSC 8 hyperlink, the row that ends gets a
//! closer and the next row re-opens the same link, so every physical row is
//! self-contained. The last row is never modified this way.
//!
//! # Example
//! ```
//! use linebox_text::wrap::{wrap_text, WrapMode};
//!
//! // Word wrap
//! let lines = wrap_text("Hello world foo bar", 10, WrapMode::Word);
//! assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
//!
//! // Character wrap (for long words)
//! let lines = wrap_text("Supercalifragilistic", 10, WrapMode::Char);
//! assert_eq!(lines.len(), 2);
//! ```

use smallvec::SmallVec;

use linebox_core::ansi::HYPERLINK_END;
use linebox_core::text_width::grapheme_width;

use crate::escape::{Piece, is_hyperlink_closer, osc8_params, pieces};

/// Text wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// No wrapping - lines may exceed width. Embedded newlines still split.
    None,
    /// Wrap at word boundaries when possible.
    #[default]
    Word,
    /// Wrap at character (grapheme) boundaries.
    Char,
    /// Word wrap with character fallback for long words.
    WordChar,
}

/// Options for text wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapOptions {
    /// Maximum width in cells.
    pub width: usize,
    /// Wrapping mode.
    pub mode: WrapMode,
    /// Keep leading whitespace on continuation lines.
    ///
    /// The first line of each paragraph always keeps its indentation.
    pub preserve_indent: bool,
    /// Trim trailing whitespace from wrapped lines.
    pub trim_trailing: bool,
}

impl WrapOptions {
    /// Create new wrap options with the given width.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            mode: WrapMode::Word,
            preserve_indent: false,
            trim_trailing: true,
        }
    }

    /// Set the maximum width.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set the wrap mode.
    #[must_use]
    pub fn mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether to preserve indentation.
    #[must_use]
    pub fn preserve_indent(mut self, preserve: bool) -> Self {
        self.preserve_indent = preserve;
        self
    }

    /// Set whether to trim trailing whitespace.
    #[must_use]
    pub fn trim_trailing(mut self, trim: bool) -> Self {
        self.trim_trailing = trim;
        self
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80)
    }
}

/// Wrap text to the specified width.
///
/// Char mode keeps leading whitespace since it's raw character-boundary
/// wrapping.
#[must_use]
pub fn wrap_text(text: &str, width: usize, mode: WrapMode) -> Vec<String> {
    let preserve = mode == WrapMode::Char;
    wrap_with_options(
        text,
        &WrapOptions::new(width).mode(mode).preserve_indent(preserve),
    )
}

/// Wrap text with full options.
#[must_use]
pub fn wrap_with_options(text: &str, options: &WrapOptions) -> Vec<String> {
    if options.width == 0 {
        return vec![text.to_string()];
    }

    let lines = match options.mode {
        WrapMode::None => paragraphs(text).map(str::to_string).collect(),
        WrapMode::Char => wrap_chars(text, options),
        WrapMode::Word => wrap_words(text, options, false),
        WrapMode::WordChar => wrap_words(text, options, true),
    };
    carry_hyperlinks(lines)
}

/// Split on `\n`, dropping a `\r` that precedes it.
fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|raw| raw.strip_suffix('\r').unwrap_or(raw))
}

/// A physical line under construction.
#[derive(Debug, Default)]
struct LineBuf<'a> {
    pieces: Vec<Piece<'a>>,
    width: usize,
    continuation: bool,
}

impl<'a> LineBuf<'a> {
    fn push(&mut self, piece: Piece<'a>) {
        if let Piece::Grapheme(g) = piece {
            self.width += grapheme_width(g);
        }
        self.pieces.push(piece);
    }

    fn extend(&mut self, pieces: impl IntoIterator<Item = Piece<'a>>) {
        for piece in pieces {
            self.push(piece);
        }
    }

    fn has_graphemes(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Grapheme(_)))
    }

    /// End the line at a wrap point.
    ///
    /// Escapes trailing the last grapheme (other than hyperlink closers) move
    /// to the next line so they stay attached to the text they introduce.
    fn break_line(&mut self, options: &WrapOptions, lines: &mut Vec<String>) {
        let mut split = self.pieces.len();
        while split > 0 {
            match self.pieces[split - 1] {
                Piece::Escape(seq) if !is_hyperlink_closer(seq) => split -= 1,
                _ => break,
            }
        }
        let carried = self.pieces.split_off(split);
        self.finish(options, lines);
        self.extend(carried);
    }

    /// Emit the line as a string and reset for the next one.
    fn finish(&mut self, options: &WrapOptions, lines: &mut Vec<String>) {
        let mut pieces = std::mem::take(&mut self.pieces);
        if options.trim_trailing {
            trim_end(&mut pieces);
        }
        if self.continuation && !options.preserve_indent {
            trim_start(&mut pieces);
        }
        lines.push(pieces.iter().map(Piece::as_str).collect());
        self.width = 0;
        self.continuation = true;
    }
}

#[inline]
fn is_text(piece: &Piece<'_>) -> bool {
    matches!(piece, Piece::Grapheme(_)) && !piece.is_whitespace()
}

/// Drop whitespace graphemes after the last visible text, keeping escapes.
fn trim_end(pieces: &mut Vec<Piece<'_>>) {
    let keep_until = pieces.iter().rposition(is_text).map_or(0, |i| i + 1);
    let mut idx = 0;
    pieces.retain(|p| {
        let keep = idx < keep_until || matches!(p, Piece::Escape(_));
        idx += 1;
        keep
    });
}

/// Drop whitespace graphemes before the first visible text, keeping escapes.
fn trim_start(pieces: &mut Vec<Piece<'_>>) {
    let first = pieces.iter().position(is_text).unwrap_or(pieces.len());
    let mut idx = 0;
    pieces.retain(|p| {
        let keep = idx >= first || matches!(p, Piece::Escape(_));
        idx += 1;
        keep
    });
}

/// Wrap at grapheme boundaries (character wrap).
fn wrap_chars(text: &str, options: &WrapOptions) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in paragraphs(text) {
        let mut line = LineBuf::default();
        for piece in pieces(paragraph) {
            if let Piece::Grapheme(g) = piece {
                let width = grapheme_width(g);
                if line.width + width > options.width && line.width > 0 {
                    line.break_line(options, &mut lines);
                    if piece.is_whitespace() && !options.preserve_indent {
                        continue;
                    }
                }
            }
            line.push(piece);
        }
        line.finish(options, &mut lines);
    }

    lines
}

/// A run of whitespace or non-whitespace graphemes plus attached escapes.
#[derive(Debug, Default)]
struct Word<'a> {
    pieces: SmallVec<[Piece<'a>; 8]>,
    width: usize,
    is_ws: bool,
}

impl<'a> Word<'a> {
    fn push(&mut self, piece: Piece<'a>) {
        if let Piece::Grapheme(g) = piece {
            self.width += grapheme_width(g);
        }
        self.pieces.push(piece);
    }

    fn has_graphemes(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Grapheme(_)))
    }

    fn escapes(&self) -> impl Iterator<Item = Piece<'a>> + '_ {
        self.pieces
            .iter()
            .copied()
            .filter(|p| matches!(p, Piece::Escape(_)))
    }
}

/// Split text into words (preserving whitespace as separate words).
///
/// Hyperlink closers stick to the word before them; every other escape
/// sticks to the word after it.
fn split_words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut current = Word::default();
    let mut pending: SmallVec<[Piece<'_>; 4]> = SmallVec::new();

    for piece in pieces(text) {
        match piece {
            Piece::Escape(seq) => {
                if is_hyperlink_closer(seq) && pending.is_empty() && current.has_graphemes() {
                    current.push(piece);
                } else {
                    pending.push(piece);
                }
            }
            Piece::Grapheme(_) => {
                let is_ws = piece.is_whitespace();
                if current.has_graphemes() && is_ws != current.is_ws {
                    words.push(std::mem::take(&mut current));
                }
                current.pieces.extend(pending.drain(..));
                current.push(piece);
                current.is_ws = is_ws;
            }
        }
    }

    current.pieces.extend(pending.drain(..));
    if !current.pieces.is_empty() {
        words.push(current);
    }

    words
}

/// Wrap at word boundaries.
fn wrap_words(text: &str, options: &WrapOptions, char_fallback: bool) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for paragraph in paragraphs(text) {
        let len_before = lines.len();
        let mut line = LineBuf::default();

        for word in split_words(paragraph) {
            // If word fits on current line
            if line.width + word.width <= options.width {
                line.extend(word.pieces);
                continue;
            }

            if line.width > 0 {
                line.break_line(options, &mut lines);
                // Inter-word whitespace that would overflow is dropped at the
                // wrap. Closers stay on the row that just ended.
                if word.is_ws {
                    for piece in word.escapes() {
                        match (piece, lines.last_mut()) {
                            (Piece::Escape(seq), Some(prev)) if is_hyperlink_closer(seq) => {
                                prev.push_str(seq);
                            }
                            _ => line.push(piece),
                        }
                    }
                    continue;
                }
            } else if word.is_ws {
                line.extend(word.escapes());
                continue;
            }

            if word.width > options.width {
                if char_fallback {
                    wrap_long_word(&word, options, &mut line, &mut lines);
                } else {
                    // Just put the long word on its own line
                    line.extend(word.pieces);
                    line.break_line(options, &mut lines);
                }
            } else {
                line.extend(word.pieces);
            }
        }

        if line.has_graphemes() || lines.len() == len_before {
            line.finish(options, &mut lines);
        } else if let Some(prev) = lines.last_mut() {
            // Only escapes remain; they belong to the row that just ended.
            for piece in &line.pieces {
                prev.push_str(piece.as_str());
            }
        }
    }

    lines
}

/// Break a long word that exceeds the width limit.
fn wrap_long_word<'a>(
    word: &Word<'a>,
    options: &WrapOptions,
    line: &mut LineBuf<'a>,
    lines: &mut Vec<String>,
) {
    for &piece in &word.pieces {
        if let Piece::Grapheme(g) = piece {
            let width = grapheme_width(g);
            if line.width + width > options.width && line.width > 0 {
                line.break_line(options, lines);
            }
        }
        line.push(piece);
    }
}

/// Close hyperlinks at the end of each row they span and re-open them on the
/// following row.
fn carry_hyperlinks(lines: Vec<String>) -> Vec<String> {
    if lines.len() < 2 {
        return lines;
    }

    let last = lines.len() - 1;
    let mut open: Option<String> = None;
    let mut rows = Vec::with_capacity(lines.len());

    for (idx, line) in lines.into_iter().enumerate() {
        let mut row = String::with_capacity(line.len());
        if let Some(opener) = &open {
            row.push_str(opener);
        }
        for piece in pieces(&line) {
            if let Piece::Escape(seq) = piece {
                if let Some((id, url)) = osc8_params(seq) {
                    open = (!id.is_empty() || !url.is_empty()).then(|| seq.to_string());
                }
            }
        }
        row.push_str(&line);
        if open.is_some() && idx < last {
            row.push_str(HYPERLINK_END);
        }
        rows.push(row);
    }

    rows
}
