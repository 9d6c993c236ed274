#![no_main]

use libfuzzer_sys::fuzz_target;
use linebox_core::text_width::grapheme_width;
use linebox_text::escape::{Piece, pieces};
use linebox_text::wrap::{WrapMode, wrap_text};

fn visible_width(line: &str) -> usize {
    pieces(line)
        .iter()
        .map(|p| match p {
            Piece::Grapheme(g) => grapheme_width(g),
            Piece::Escape(_) => 0,
        })
        .sum()
}

fn visible_text(text: &str) -> String {
    pieces(text)
        .iter()
        .filter(|p| matches!(p, Piece::Grapheme(_)) && !p.is_whitespace())
        .map(Piece::as_str)
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Cap length to keep fuzzing fast.
    if text.len() > 2048 {
        return;
    }

    let parsed = pieces(text);
    // A stray ESC can merge with a carried closer when rows are re-parsed.
    if parsed
        .iter()
        .any(|p| matches!(p, Piece::Grapheme(g) if g.starts_with('\x1b')))
    {
        return;
    }

    let widest = parsed
        .iter()
        .map(|p| match p {
            Piece::Grapheme(g) => grapheme_width(g),
            Piece::Escape(_) => 0,
        })
        .max()
        .unwrap_or(0);
    let expected = visible_text(text);

    for max_width in [1, 10, 40, 80, 200] {
        // WordChar rows fit unless a single grapheme is wider than the row.
        let wrapped = wrap_text(text, max_width, WrapMode::WordChar);
        for line in &wrapped {
            let w = visible_width(line);
            assert!(
                w <= max_width.max(widest),
                "Wrapped line exceeds max_width {max_width}: width={w} {line:?}"
            );
        }
        assert_eq!(wrapped.iter().map(|l| visible_text(l)).collect::<String>(), expected);

        // Other modes must never panic or drop text.
        for mode in [WrapMode::Word, WrapMode::Char, WrapMode::None] {
            let wrapped = wrap_text(text, max_width, mode);
            assert_eq!(wrapped.iter().map(|l| visible_text(l)).collect::<String>(), expected);
        }
    }
});
