#![no_main]

use libfuzzer_sys::fuzz_target;
use linebox_core::text_width::{ascii_width, display_width, grapheme_width};
use linebox_text::escape::{Piece, pieces};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // display_width must never panic.
    let width = display_width(text);
    if text.is_empty() {
        assert_eq!(width, 0);
    }

    // Fast path must agree with the general path.
    if let Some(aw) = ascii_width(text) {
        assert_eq!(width, aw, "ASCII width must match display_width for ASCII text");
    }

    // Tokenizing must reproduce the input exactly.
    let parts = pieces(text);
    let joined: String = parts.iter().map(Piece::as_str).collect();
    assert_eq!(joined, text);

    // Escapes are zero width; everything else is measured per grapheme.
    for piece in &parts {
        if let Piece::Grapheme(g) = piece {
            let _ = grapheme_width(g);
        }
    }
});
