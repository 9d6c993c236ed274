#![forbid(unsafe_code)]

//! OSC 8 hyperlink markers embedded in line text.
//!
//! A marker has the shape `ESC ] 8 ; <id> ; <url> <ST>` where `<id>` holds no
//! `;`, `<url>` is matched non-greedily, and `<ST>` is `ESC \` or `BEL`.
//! Markers are found leftmost-first without overlap. Anything else in a line,
//! including an unterminated marker, is plain text.
//!
//! A marker whose url starts with [`INTERNAL_HYPERLINK_PROTOCOL`] followed by
//! `:` is *internal*: it never reaches the terminal and instead becomes a
//! clickable cell region in the mouse tracker.
//!
//! ```
//! use linebox_render::hyperlink::{find_markers, internal_action, internal_hyperlink};
//!
//! let line = internal_hyperlink("Open", "menu:file");
//! let markers: Vec<_> = find_markers(&line).collect();
//! assert_eq!(markers.len(), 2);
//! assert_eq!(internal_action(markers[0].url), Some("menu:file"));
//! assert!(markers[1].is_closer());
//! ```

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use linebox_core::ansi::{HYPERLINK_END, push_hyperlink_start};

/// URL scheme that marks a hyperlink as an in-application action.
pub const INTERNAL_HYPERLINK_PROTOCOL: &str = "linebox-ih";

static HYPERLINK_REGEX: OnceLock<Regex> = OnceLock::new();

/// The compiled marker pattern, built on first use.
fn hyperlink_regex() -> &'static Regex {
    HYPERLINK_REGEX.get_or_init(|| {
        Regex::new(r"\x1b\]8;([^;]*);(.*?)(?:\x1b\\|\x07)")
            .expect("hyperlink pattern is valid and should always compile")
    })
}

/// One hyperlink escape found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkMarker<'a> {
    /// Byte range of the whole escape within the line.
    pub range: Range<usize>,
    /// The exact escape bytes.
    pub raw: &'a str,
    /// The `id=` parameter field (may be empty).
    pub id: &'a str,
    /// The target url (may be empty).
    pub url: &'a str,
}

impl HyperlinkMarker<'_> {
    /// A marker with both fields empty closes the current hyperlink.
    #[inline]
    pub fn is_closer(&self) -> bool {
        self.id.is_empty() && self.url.is_empty()
    }
}

/// Iterate the hyperlink markers of `line` in order.
pub fn find_markers(line: &str) -> impl Iterator<Item = HyperlinkMarker<'_>> {
    hyperlink_regex().captures_iter(line).filter_map(|caps| {
        let full = caps.get(0)?;
        Some(HyperlinkMarker {
            range: full.range(),
            raw: full.as_str(),
            id: caps.get(1).map_or("", |m| m.as_str()),
            url: caps.get(2).map_or("", |m| m.as_str()),
        })
    })
}

/// The action carried by an internal hyperlink url, if it is one.
#[inline]
pub fn internal_action(url: &str) -> Option<&str> {
    url.strip_prefix(INTERNAL_HYPERLINK_PROTOCOL)?
        .strip_prefix(':')
}

/// Wrap `text` in an internal hyperlink for `action`.
pub fn internal_hyperlink(text: &str, action: &str) -> String {
    let mut out = String::with_capacity(text.len() + action.len() + 32);
    out.push_str("\x1b]8;;");
    out.push_str(INTERNAL_HYPERLINK_PROTOCOL);
    out.push(':');
    out.push_str(action);
    out.push_str("\x1b\\");
    out.push_str(text);
    out.push_str(HYPERLINK_END);
    out
}

/// Wrap `text` in a standard hyperlink to `url`.
pub fn hyperlink(text: &str, url: &str) -> String {
    let mut out = String::with_capacity(text.len() + url.len() + 16);
    push_hyperlink_start(&mut out, "", url);
    out.push_str(text);
    out.push_str(HYPERLINK_END);
    out
}
