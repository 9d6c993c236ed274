#![forbid(unsafe_code)]

//! Render logical lines into a rectangle of terminal cells.
//!
//! Each logical line is expanded into physical lines (wrapped to the
//! rectangle width when it is positive), and every physical line that fits
//! above the rectangle's bottom edge is emitted as a cursor-move followed by
//! the line's text. Rendering stops at the first physical line that would
//! fall outside the rectangle.
//!
//! Hyperlink markers in the text are translated on the way through:
//!
//! | Marker | Hyperlink open | Nothing open |
//! |---|---|---|
//! | closer | commit the region, emit nothing | emit the closer |
//! | internal opener | commit, then open a new region | open a region |
//! | standard opener | commit, then emit the opener | emit the opener |
//!
//! Internal hyperlinks therefore never reach the terminal; their cells are
//! reported to a [`CellRegionTracker`] instead.
//!
//! # Example
//!
//! ```
//! use linebox_core::geometry::RenderRect;
//! use linebox_render::hyperlink::internal_hyperlink;
//! use linebox_render::mouse::MouseState;
//! use linebox_render::render_lines::RenderLines;
//!
//! let mut mouse = MouseState::new();
//! let lines = [internal_hyperlink("Click", "menu1")];
//! let result = RenderLines::default().in_rectangle(&lines, RenderRect::new(0, 0, 0, 1), &mut mouse);
//!
//! assert_eq!(result.output, "\x1b[1;1HClick");
//! assert_eq!(mouse.click(4, 0), Some("menu1"));
//! ```

use std::borrow::Cow;
use std::io::{self, Write};

use linebox_core::ansi::push_cup;
use linebox_core::geometry::{CellPos, RenderRect};
#[cfg(feature = "tracing")]
use linebox_core::logging::{RENDER_TARGET, debug, info_span, trace};
use linebox_text::escape::visible_width;
use linebox_text::wrap::{WrapMode, WrapOptions, wrap_with_options};

use crate::hyperlink::{HyperlinkMarker, find_markers, internal_action};
use crate::mouse::CellRegionTracker;

/// Upper bound on the output buffer reserved up front.
const MAX_PREALLOC: usize = 1 << 20;

/// Renders lines into a rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLines {
    /// How logical lines are wrapped. The width is taken from the rectangle.
    pub wrap_options: WrapOptions,
}

impl Default for RenderLines {
    fn default() -> Self {
        Self::new(WrapOptions::default().mode(WrapMode::WordChar))
    }
}

/// Result of [`RenderLines::in_rectangle`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderResult {
    /// Every physical line fit inside the rectangle.
    pub all_rendered: bool,
    /// First row not used by this render.
    pub final_y: i32,
    /// Cursor moves and text, ready to write to the terminal.
    pub output: String,
}

/// Result of [`RenderLines::write_in_rectangle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    /// Every physical line fit inside the rectangle.
    pub all_rendered: bool,
    /// First row not used by this render.
    pub final_y: i32,
    /// Bytes written to the sink.
    pub bytes_written: usize,
}

impl RenderLines {
    /// Create a renderer with the given wrap options.
    pub fn new(wrap_options: WrapOptions) -> Self {
        Self { wrap_options }
    }

    /// Render `lines` into `rect`, reporting internal hyperlinks to `tracker`.
    ///
    /// With `rect.width <= 0` lines are not wrapped and may overflow to the
    /// right. With `rect.height <= 0` nothing is emitted and `all_rendered`
    /// holds only for an empty input.
    pub fn in_rectangle<S, T>(&self, lines: &[S], rect: RenderRect, tracker: &mut T) -> RenderResult
    where
        S: AsRef<str>,
        T: CellRegionTracker + ?Sized,
    {
        #[cfg(feature = "tracing")]
        let _span = info_span!(
            target: RENDER_TARGET,
            "render_lines",
            lines = lines.len(),
            width = rect.width,
            height = rect.height
        );
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        if !rect.has_rows() {
            return RenderResult {
                all_rendered: lines.is_empty(),
                final_y: rect.y,
                output: String::new(),
            };
        }

        let per_line = usize::try_from(rect.width).unwrap_or(0).clamp(1, 256) * 3;
        let capacity = lines.len().saturating_mul(per_line).min(MAX_PREALLOC);
        let mut ctx = RenderContext::new(rect, tracker, capacity);
        let all_rendered = self.render_all(lines, rect, &mut ctx);
        ctx.finish();

        RenderResult {
            all_rendered,
            final_y: ctx.next_y,
            output: ctx.out,
        }
    }

    /// Render like [`in_rectangle`](Self::in_rectangle) and write the bytes to `w`.
    pub fn write_in_rectangle<W, S, T>(
        &self,
        w: &mut W,
        lines: &[S],
        rect: RenderRect,
        tracker: &mut T,
    ) -> io::Result<RenderOutcome>
    where
        W: Write + ?Sized,
        S: AsRef<str>,
        T: CellRegionTracker + ?Sized,
    {
        let result = self.in_rectangle(lines, rect, tracker);
        w.write_all(result.output.as_bytes())?;
        Ok(RenderOutcome {
            all_rendered: result.all_rendered,
            final_y: result.final_y,
            bytes_written: result.output.len(),
        })
    }

    /// Walk every physical line, stopping at the first one below the bottom
    /// edge. Returns whether all of them were rendered.
    fn render_all<S, T>(&self, lines: &[S], rect: RenderRect, ctx: &mut RenderContext<'_, T>) -> bool
    where
        S: AsRef<str>,
        T: CellRegionTracker + ?Sized,
    {
        let max_rows = usize::try_from(rect.height).unwrap_or(0);
        let options = rect
            .wrap_width()
            .map(|width| self.wrap_options.clone().width(width));

        let physical = lines
            .iter()
            .flat_map(|line| expand(line.as_ref(), options.as_ref()));

        for (row, line) in physical.enumerate() {
            if row >= max_rows {
                #[cfg(feature = "tracing")]
                debug!(
                    target: RENDER_TARGET,
                    final_y = ctx.next_y,
                    "rectangle full, remaining lines dropped"
                );
                return false;
            }
            ctx.render_line(&line, rect.x);
        }
        true
    }
}

/// Physical lines for one logical line.
fn expand<'l>(line: &'l str, options: Option<&WrapOptions>) -> Vec<Cow<'l, str>> {
    match options {
        None => vec![Cow::Borrowed(line)],
        Some(options) => wrap_with_options(line, options)
            .into_iter()
            .map(Cow::Owned)
            .collect(),
    }
}

/// An internal hyperlink waiting for its closer.
#[derive(Debug)]
struct OpenHyperlink {
    action: String,
    start: CellPos,
}

/// Mutable state for one render call.
struct RenderContext<'t, T: ?Sized> {
    /// Position after the last emitted text on the current row.
    cursor: CellPos,
    /// Row the next physical line goes to.
    next_y: i32,
    open: Option<OpenHyperlink>,
    out: String,
    tracker: &'t mut T,
}

impl<'t, T: CellRegionTracker + ?Sized> RenderContext<'t, T> {
    fn new(rect: RenderRect, tracker: &'t mut T, capacity: usize) -> Self {
        Self {
            cursor: rect.origin(),
            next_y: rect.y,
            open: None,
            out: String::with_capacity(capacity),
            tracker,
        }
    }

    fn render_line(&mut self, line: &str, start_x: i32) {
        self.cursor = CellPos::new(start_x, self.next_y);
        push_cup(&mut self.out, self.cursor.x, self.cursor.y);

        let mut start = 0;
        for marker in find_markers(line) {
            self.add_text(&line[start..marker.range.start]);
            start = marker.range.end;
            self.add_marker(&marker);
        }
        self.add_text(&line[start..]);

        self.next_y = self.next_y.saturating_add(1);
    }

    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.out.push_str(text);
        let width = i32::try_from(visible_width(text)).unwrap_or(i32::MAX);
        self.cursor.x = self.cursor.x.saturating_add(width);
    }

    fn add_marker(&mut self, marker: &HyperlinkMarker<'_>) {
        if marker.is_closer() {
            if self.open.is_some() {
                self.commit();
            } else {
                self.out.push_str(marker.raw);
            }
            return;
        }

        self.commit();
        match internal_action(marker.url) {
            Some(action) => {
                self.open = Some(OpenHyperlink {
                    action: action.to_string(),
                    start: self.cursor,
                });
            }
            None => self.out.push_str(marker.raw),
        }
    }

    /// Report the open internal hyperlink, if any, ending at the cursor.
    fn commit(&mut self) {
        self.commit_at(self.cursor);
    }

    /// Close out a link left open by the input. Its end sits on the row
    /// after the last one rendered, at the column the text stopped.
    fn finish(&mut self) {
        self.commit_at(CellPos::new(self.cursor.x, self.next_y));
    }

    fn commit_at(&mut self, end: CellPos) {
        let Some(open) = self.open.take() else {
            return;
        };

        #[cfg(feature = "tracing")]
        trace!(
            target: RENDER_TARGET,
            action = %open.action,
            start_x = open.start.x,
            start_y = open.start.y,
            end_x = end.x,
            end_y = end.y,
            "cell region"
        );

        self.tracker
            .add_cell_region(&open.action, open.start.x, open.start.y, end.x, end.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperlink::{hyperlink, internal_hyperlink};
    use crate::mouse::{CellRegion, MouseState};

    /// Records every registration, including empty actions.
    #[derive(Default)]
    struct Recorder(Vec<(String, i32, i32, i32, i32)>);

    impl CellRegionTracker for Recorder {
        fn add_cell_region(&mut self, action: &str, x1: i32, y1: i32, x2: i32, y2: i32) {
            self.0.push((action.to_string(), x1, y1, x2, y2));
        }
    }

    fn render(lines: &[&str], rect: RenderRect) -> (RenderResult, Recorder) {
        let mut rec = Recorder::default();
        let result = RenderLines::default().in_rectangle(lines, rect, &mut rec);
        (result, rec)
    }

    #[test]
    fn single_line_without_wrapping() {
        let (result, rec) = render(&["hello"], RenderRect::new(0, 0, 0, 1));
        assert_eq!(result.output, "\x1b[1;1Hhello");
        assert!(result.all_rendered);
        assert_eq!(result.final_y, 1);
        assert!(rec.0.is_empty());
    }

    #[test]
    fn cursor_move_uses_rect_origin() {
        let (result, _) = render(&["a", "b"], RenderRect::new(4, 7, 0, 5));
        assert_eq!(result.output, "\x1b[8;5Ha\x1b[9;5Hb");
        assert_eq!(result.final_y, 9);
    }

    #[test]
    fn stops_at_bottom_edge() {
        let (result, _) = render(&["a", "b", "c"], RenderRect::new(0, 0, 0, 2));
        assert_eq!(result.output, "\x1b[1;1Ha\x1b[2;1Hb");
        assert!(!result.all_rendered);
        assert_eq!(result.final_y, 2);
    }

    #[test]
    fn no_rows_means_no_output() {
        let (result, _) = render(&["a"], RenderRect::new(3, 9, 10, 0));
        assert_eq!(result.output, "");
        assert!(!result.all_rendered);
        assert_eq!(result.final_y, 9);

        let (result, _) = render(&[], RenderRect::new(3, 9, 10, -2));
        assert!(result.all_rendered);
        assert_eq!(result.final_y, 9);
    }

    #[test]
    fn empty_input_renders_nothing() {
        let (result, _) = render(&[], RenderRect::new(0, 2, 10, 3));
        assert_eq!(result.output, "");
        assert!(result.all_rendered);
        assert_eq!(result.final_y, 2);
    }

    #[test]
    fn wrapping_adds_physical_lines() {
        let (result, _) = render(&["hello world"], RenderRect::new(0, 0, 5, 3));
        assert_eq!(result.output, "\x1b[1;1Hhello\x1b[2;1Hworld");
        assert_eq!(result.final_y, 2);
    }

    #[test]
    fn wrapped_lines_count_against_height() {
        let (result, _) = render(&["aaa bbb", "ccc"], RenderRect::new(0, 0, 3, 2));
        assert_eq!(result.output, "\x1b[1;1Haaa\x1b[2;1Hbbb");
        assert!(!result.all_rendered);
        assert_eq!(result.final_y, 2);
    }

    #[test]
    fn standard_hyperlink_passes_through() {
        let line = hyperlink("docs", "https://docs.rs");
        let (result, rec) = render(&[&line], RenderRect::new(0, 0, 0, 1));
        assert_eq!(result.output, format!("\x1b[1;1H{line}"));
        assert!(rec.0.is_empty());
    }

    #[test]
    fn internal_hyperlink_becomes_region() {
        let line = format!("ab{}cd", internal_hyperlink("Click", "menu1"));
        let (result, rec) = render(&[&line], RenderRect::new(2, 3, 0, 1));
        assert_eq!(result.output, "\x1b[4;3HabClickcd");
        assert_eq!(rec.0, vec![("menu1".to_string(), 4, 3, 9, 3)]);
    }

    #[test]
    fn wide_text_advances_by_display_width() {
        let line = format!("\u{4F60}{}", internal_hyperlink("\u{597D}x", "w"));
        let (_, rec) = render(&[&line], RenderRect::new(0, 0, 0, 1));
        assert_eq!(rec.0, vec![("w".to_string(), 2, 0, 5, 0)]);
    }

    #[test]
    fn second_opener_commits_first() {
        let line = "\x1b]8;;linebox-ih:a\x1b\\xx\x1b]8;;linebox-ih:b\x1b\\yyy\x1b]8;;\x1b\\";
        let (result, rec) = render(&[line], RenderRect::new(0, 0, 0, 1));
        assert_eq!(result.output, "\x1b[1;1Hxxyyy");
        assert_eq!(
            rec.0,
            vec![("a".to_string(), 0, 0, 2, 0), ("b".to_string(), 2, 0, 5, 0)]
        );
    }

    #[test]
    fn standard_opener_commits_open_internal_link() {
        let line = "\x1b]8;;linebox-ih:a\x1b\\xx\x1b]8;;https://x\x1b\\y\x1b]8;;\x1b\\";
        let (result, rec) = render(&[line], RenderRect::new(0, 0, 0, 1));
        assert_eq!(
            result.output,
            "\x1b[1;1Hxx\x1b]8;;https://x\x1b\\y\x1b]8;;\x1b\\"
        );
        assert_eq!(rec.0, vec![("a".to_string(), 0, 0, 2, 0)]);
    }

    #[test]
    fn stray_closer_passes_through_verbatim() {
        let (result, rec) = render(&["a\x1b]8;;\x07b"], RenderRect::new(0, 0, 0, 1));
        assert_eq!(result.output, "\x1b[1;1Ha\x1b]8;;\x07b");
        assert!(rec.0.is_empty());
    }

    #[test]
    fn unclosed_internal_link_commits_at_end() {
        let lines = ["\x1b]8;;linebox-ih:tail\x1b\\abc", "de"];
        let (result, rec) = render(&lines, RenderRect::new(0, 0, 0, 5));
        assert_eq!(result.output, "\x1b[1;1Habc\x1b[2;1Hde");
        assert_eq!(result.final_y, 2);
        assert_eq!(rec.0, vec![("tail".to_string(), 0, 0, 2, 2)]);
    }

    #[test]
    fn unclosed_link_commits_when_truncated() {
        let lines = ["\x1b]8;;linebox-ih:cut\x1b\\abc", "never"];
        let (result, rec) = render(&lines, RenderRect::new(0, 0, 0, 1));
        assert!(!result.all_rendered);
        assert_eq!(rec.0, vec![("cut".to_string(), 0, 0, 3, 1)]);
    }

    #[test]
    fn unclosed_link_on_single_line_ends_below_it() {
        let (result, rec) = render(&["\x1b]8;;linebox-ih:tail\x1b\\abc"], RenderRect::new(0, 0, 0, 5));
        assert_eq!(result.output, "\x1b[1;1Habc");
        assert_eq!(result.final_y, 1);
        assert_eq!(rec.0, vec![("tail".to_string(), 0, 0, 3, 1)]);
    }

    #[test]
    fn closed_link_keeps_its_row() {
        let line = format!("{}\x1b[0m", internal_hyperlink("abc", "done"));
        let (_, rec) = render(&[&line], RenderRect::new(0, 0, 0, 5));
        assert_eq!(rec.0, vec![("done".to_string(), 0, 0, 3, 0)]);
    }

    #[test]
    fn sgr_around_internal_link_costs_no_columns() {
        let line = format!("\x1b[1m{}\x1b[0m", internal_hyperlink("Click", "m"));
        let (result, rec) = render(&[&line], RenderRect::new(0, 0, 0, 1));
        assert_eq!(result.output, "\x1b[1;1H\x1b[1mClick\x1b[0m");
        assert_eq!(rec.0, vec![("m".to_string(), 0, 0, 5, 0)]);
    }

    #[test]
    fn styled_menu_entries_line_up() {
        let line = format!(
            "\x1b[7m {} \x1b[0m\x1b]0;title\x07 \x1b[32m{}\x1b[39m",
            internal_hyperlink("File", "file"),
            internal_hyperlink("Edit", "edit"),
        );
        let (result, rec) = render(&[&line], RenderRect::new(2, 0, 0, 1));
        assert!(result.output.contains("\x1b]0;title\x07"));
        assert_eq!(
            rec.0,
            vec![("file".to_string(), 3, 0, 7, 0), ("edit".to_string(), 9, 0, 13, 0)]
        );
    }

    #[test]
    fn no_open_link_means_no_final_region() {
        let (_, rec) = render(&["plain", "text"], RenderRect::new(0, 0, 0, 1));
        assert!(rec.0.is_empty());
    }

    #[test]
    fn wrapped_internal_link_yields_region_per_row() {
        let line = internal_hyperlink("aaa bbb", "m");
        let mut mouse = MouseState::new();
        let result = RenderLines::default().in_rectangle(&[line], RenderRect::new(0, 0, 3, 4), &mut mouse);
        assert_eq!(result.output, "\x1b[1;1Haaa\x1b[2;1Hbbb");
        assert_eq!(
            mouse.cell_regions(),
            &[
                CellRegion::new("m", CellPos::new(0, 0), CellPos::new(3, 0)),
                CellRegion::new("m", CellPos::new(0, 1), CellPos::new(3, 1)),
            ]
        );
    }

    #[test]
    fn unwrapped_lines_keep_overflow() {
        let (result, _) = render(&["longer than rect"], RenderRect::new(0, 0, 0, 1));
        assert_eq!(result.output, "\x1b[1;1Hlonger than rect");
    }

    #[test]
    fn write_in_rectangle_writes_output() {
        let mut sink = Vec::new();
        let mut mouse = MouseState::new();
        let outcome = RenderLines::default()
            .write_in_rectangle(&mut sink, &["hi"], RenderRect::new(0, 0, 0, 1), &mut mouse)
            .expect("write to Vec");
        assert_eq!(sink, b"\x1b[1;1Hhi");
        assert_eq!(
            outcome,
            RenderOutcome {
                all_rendered: true,
                final_y: 1,
                bytes_written: 8,
            }
        );
    }
}
