#![forbid(unsafe_code)]

//! Display width of text in terminal cells.
//!
//! Widths are measured per grapheme cluster so ZWJ emoji, flags, and
//! combining sequences count as the single glyph a terminal draws. Control
//! characters and zero-width code points occupy no columns.
//!
//! Ambiguous-width characters are treated as double-width when
//! `LINEBOX_CJK_WIDTH=1` is set, or when no override is present and
//! `LC_CTYPE`/`LANG` names a CJK locale. The decision is made once per
//! process.
//!
//! ```
//! use linebox_core::text_width::display_width;
//!
//! assert_eq!(display_width("hello"), 5);
//! assert_eq!(display_width("e\u{0301}"), 1);
//! ```

use std::sync::OnceLock;

use unicode_display_width::width as unicode_display_width;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Environment variable that forces ambiguous-width characters to two cells.
pub const CJK_WIDTH_ENV: &str = "LINEBOX_CJK_WIDTH";

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[inline]
fn is_cjk_locale(locale: &str) -> bool {
    let lower = locale.trim().to_ascii_lowercase();
    lower.starts_with("ja") || lower.starts_with("zh") || lower.starts_with("ko")
}

/// Whether ambiguous-width characters are measured as double-width.
#[inline]
pub fn use_cjk_width() -> bool {
    static CJK_WIDTH: OnceLock<bool> = OnceLock::new();
    *CJK_WIDTH.get_or_init(|| {
        if let Ok(value) = std::env::var(CJK_WIDTH_ENV) {
            return env_flag(&value);
        }
        if let Ok(locale) = std::env::var("LC_CTYPE").or_else(|_| std::env::var("LANG")) {
            return is_cjk_locale(&locale);
        }
        false
    })
}

#[inline]
fn ascii_display_width(text: &str) -> usize {
    text.bytes().filter(|b| (0x20..=0x7E).contains(b)).count()
}

/// Returns `Some(width)` if text is printable ASCII only, `None` otherwise.
///
/// For printable ASCII (0x20-0x7E) display width equals byte length.
///
/// ```
/// use linebox_core::text_width::ascii_width;
///
/// assert_eq!(ascii_width("hello"), Some(5));
/// assert_eq!(ascii_width("\u{4F60}"), None);
/// assert_eq!(ascii_width("a\tb"), None);
/// ```
#[inline]
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        Some(text.len())
    } else {
        None
    }
}

#[inline]
fn is_zero_width_codepoint(c: char) -> bool {
    let u = c as u32;
    matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
        || matches!(u, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
        || matches!(u, 0xFE20..=0xFE2F)
        || matches!(u, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
        || matches!(
            u,
            0x00AD | 0x034F | 0x180E | 0x200B | 0x200C | 0x200D | 0x200E | 0x200F | 0x2060 | 0xFEFF
        )
        || matches!(u, 0x202A..=0x202E | 0x2066..=0x2069 | 0x206A..=0x206F)
}

/// Width of a single grapheme cluster in cells.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_ascii() {
        return ascii_display_width(grapheme);
    }
    if grapheme.chars().all(is_zero_width_codepoint) {
        return 0;
    }
    if use_cjk_width() {
        return grapheme.width_cjk();
    }
    usize::try_from(unicode_display_width(grapheme)).unwrap_or(usize::MAX)
}

/// Width of a single scalar value in cells.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    if ch.is_ascii() {
        return usize::from((' '..='~').contains(&ch));
    }
    if is_zero_width_codepoint(ch) {
        return 0;
    }
    if use_cjk_width() {
        ch.width_cjk().unwrap_or(0)
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Display width of `text` in cells.
///
/// Printable ASCII takes a byte-count fast path; anything else is segmented
/// into grapheme clusters when it contains zero-width code points.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    if let Some(width) = ascii_width(text) {
        return width;
    }
    if text.is_ascii() {
        return ascii_display_width(text);
    }
    if !text.chars().any(is_zero_width_codepoint) {
        if use_cjk_width() {
            return text.width_cjk();
        }
        return usize::try_from(unicode_display_width(text)).unwrap_or(usize::MAX);
    }
    text.graphemes(true).map(grapheme_width).sum()
}
