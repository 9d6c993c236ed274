#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use linebox_core::geometry::RenderRect;
use linebox_render::mouse::MouseState;
use linebox_render::render_lines::RenderLines;

#[derive(Debug, Arbitrary)]
struct Input {
    lines: Vec<String>,
    x: i32,
    y: i32,
    width: i8,
    height: i8,
}

fuzz_target!(|input: Input| {
    if input.lines.len() > 64 || input.lines.iter().any(|l| l.len() > 512) {
        return;
    }
    let rect = RenderRect::new(input.x, input.y, i32::from(input.width), i32::from(input.height));

    let mut mouse = MouseState::new();
    let result = RenderLines::default().in_rectangle(&input.lines, rect, &mut mouse);

    // Rows never exceed the rectangle and final_y only moves down.
    assert!(result.final_y >= rect.y);
    if rect.has_rows() {
        assert!(i64::from(result.final_y) - i64::from(rect.y) <= i64::from(rect.height));
    } else {
        assert!(result.output.is_empty());
        assert_eq!(result.all_rendered, input.lines.is_empty());
    }

    // Hit testing on every region start must not panic.
    for region in mouse.cell_regions() {
        let _ = mouse.click(region.start.x, region.start.y);
    }
});
