#![forbid(unsafe_code)]

//! Terminal model for render validation.
//!
//! This module provides a minimal terminal emulator that understands the
//! subset of escape sequences the renderer emits, enabling deterministic
//! testing of rendered output without requiring actual terminal I/O.
//!
//! # Scope
//!
//! This is NOT a full VT emulator. It supports only:
//! - Cursor positioning (CUP, CHA, VPA, relative moves)
//! - Erase operations (EL, ED)
//! - OSC 8 hyperlinks
//! - Wide and zero-width characters
//!
//! SGR and every other sequence are parsed and dropped.
//!
//! # Usage
//!
//! ```
//! use linebox_render::terminal_model::TerminalModel;
//!
//! let mut model = TerminalModel::new(80, 24);
//! model.process("\x1b[2;3HHello");
//! assert_eq!(model.cursor(), (7, 1));
//! assert_eq!(model.row_text(1).as_deref(), Some("  Hello"));
//! ```

use linebox_core::text_width::char_width;

/// A single cell in the terminal model grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCell {
    /// Grapheme content (a space when blank, empty for the tail of a wide
    /// character).
    pub content: String,
    /// Hyperlink ID (0 = no link).
    pub link_id: u32,
    /// Second column of a wide character.
    pub continuation: bool,
}

impl Default for ModelCell {
    fn default() -> Self {
        Self {
            content: " ".to_string(),
            link_id: 0,
            continuation: false,
        }
    }
}

/// Parser state for escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Ground,
    Escape,
    Csi,
    Osc,
    OscEscape,
}

/// A minimal terminal model for testing render output.
///
/// Tracks grid contents, cursor position, and hyperlinks.
#[derive(Debug)]
pub struct TerminalModel {
    width: usize,
    height: usize,
    cells: Vec<ModelCell>,
    cursor_x: usize,
    cursor_y: usize,
    current_link_id: u32,
    /// Hyperlink URL registry (link_id -> URL).
    links: Vec<String>,
    parse_state: ParseState,
    /// CSI parameter and intermediate bytes.
    csi_buffer: String,
    /// OSC payload.
    osc_buffer: String,
}

impl TerminalModel {
    /// Create a new terminal model with the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![ModelCell::default(); width * height],
            cursor_x: 0,
            cursor_y: 0,
            current_link_id: 0,
            links: vec![String::new()], // Index 0 is "no link"
            parse_state: ParseState::Ground,
            csi_buffer: String::with_capacity(16),
            osc_buffer: String::with_capacity(256),
        }
    }

    /// Get the terminal width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the terminal height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cursor position as (x, y).
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Get the cell at (x, y). Returns None if out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<&ModelCell> {
        if x < self.width && y < self.height {
            Some(&self.cells[y * self.width + x])
        } else {
            None
        }
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut ModelCell> {
        if x < self.width && y < self.height {
            Some(&mut self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Get a row of cells.
    pub fn row(&self, y: usize) -> Option<&[ModelCell]> {
        if y < self.height {
            let start = y * self.width;
            Some(&self.cells[start..start + self.width])
        } else {
            None
        }
    }

    /// Extract the text content of a row (trimmed of trailing spaces).
    pub fn row_text(&self, y: usize) -> Option<String> {
        self.row(y).map(|cells| {
            let s: String = cells.iter().map(|c| c.content.as_str()).collect();
            s.trim_end().to_string()
        })
    }

    /// Get the URL for a link ID.
    pub fn link_url(&self, link_id: u32) -> Option<&str> {
        self.links.get(link_id as usize).map(String::as_str)
    }

    /// URL of the hyperlink on cell (x, y), if any.
    pub fn link_at(&self, x: usize, y: usize) -> Option<&str> {
        let id = self.cell(x, y)?.link_id;
        if id == 0 { None } else { self.link_url(id) }
    }

    /// Check if a hyperlink is still active after processing.
    pub fn has_dangling_link(&self) -> bool {
        self.current_link_id != 0
    }

    /// Reset the terminal model to initial state.
    pub fn reset(&mut self) {
        self.cells.fill(ModelCell::default());
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.current_link_id = 0;
        self.links.truncate(1);
        self.parse_state = ParseState::Ground;
        self.csi_buffer.clear();
        self.osc_buffer.clear();
    }

    /// Process rendered output, updating the terminal state.
    pub fn process(&mut self, text: &str) {
        for ch in text.chars() {
            match self.parse_state {
                ParseState::Ground => self.ground_state(ch),
                ParseState::Escape => self.escape_state(ch),
                ParseState::Csi => self.csi_state(ch),
                ParseState::Osc => self.osc_state(ch),
                ParseState::OscEscape => self.osc_escape_state(ch),
            }
        }
    }

    fn ground_state(&mut self, ch: char) {
        match ch {
            '\x1b' => self.parse_state = ParseState::Escape,
            '\x00'..='\x1f' | '\x7f' => self.handle_c0(ch),
            _ => self.put_char(ch),
        }
    }

    fn escape_state(&mut self, ch: char) {
        match ch {
            '[' => {
                self.csi_buffer.clear();
                self.parse_state = ParseState::Csi;
            }
            ']' => {
                self.osc_buffer.clear();
                self.parse_state = ParseState::Osc;
            }
            // ESC ESC - stay in escape (malformed, but handle gracefully)
            '\x1b' => {}
            _ => self.parse_state = ParseState::Ground,
        }
    }

    fn csi_state(&mut self, ch: char) {
        match ch {
            '\x20'..='\x3f' => self.csi_buffer.push(ch),
            '\x40'..='\x7e' => {
                self.execute_csi(ch);
                self.parse_state = ParseState::Ground;
            }
            _ => self.parse_state = ParseState::Ground,
        }
    }

    fn osc_state(&mut self, ch: char) {
        match ch {
            '\x07' => {
                self.execute_osc();
                self.parse_state = ParseState::Ground;
            }
            '\x1b' => self.parse_state = ParseState::OscEscape,
            _ => self.osc_buffer.push(ch),
        }
    }

    fn osc_escape_state(&mut self, ch: char) {
        if ch == '\\' {
            self.execute_osc();
            self.parse_state = ParseState::Ground;
        } else {
            // Not ST, put ESC back and continue
            self.osc_buffer.push('\x1b');
            self.osc_buffer.push(ch);
            self.parse_state = ParseState::Osc;
        }
    }

    fn handle_c0(&mut self, ch: char) {
        match ch {
            '\x08' => self.cursor_x = self.cursor_x.saturating_sub(1),
            '\x0a' => {
                if self.cursor_y + 1 < self.height {
                    self.cursor_y += 1;
                }
            }
            '\x0d' => self.cursor_x = 0,
            _ => {}
        }
    }

    fn put_char(&mut self, ch: char) {
        let width = char_width(ch);
        if width == 0 {
            // Combining marks join the previous cell.
            if let Some(x) = self.cursor_x.checked_sub(1) {
                let y = self.cursor_y;
                if let Some(cell) = self.cell_mut(x, y) {
                    cell.content.push(ch);
                }
            }
            return;
        }

        // Pending wrap: the character does not fit on this row.
        if self.cursor_x + width > self.width {
            self.cursor_x = 0;
            if self.cursor_y + 1 < self.height {
                self.cursor_y += 1;
            }
        }

        let (x, y, link_id) = (self.cursor_x, self.cursor_y, self.current_link_id);
        if let Some(cell) = self.cell_mut(x, y) {
            cell.content = ch.to_string();
            cell.link_id = link_id;
            cell.continuation = false;
        }
        for dx in 1..width {
            if let Some(cell) = self.cell_mut(x + dx, y) {
                cell.content.clear();
                cell.link_id = link_id;
                cell.continuation = true;
            }
        }
        self.cursor_x += width;
    }

    /// Numeric CSI parameter `idx`, with `default` for missing or zero.
    fn csi_param(&self, idx: usize, default: usize) -> usize {
        self.csi_buffer
            .split(';')
            .nth(idx)
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(default)
    }

    fn execute_csi(&mut self, final_char: char) {
        let last_row = self.height.saturating_sub(1);
        let last_col = self.width.saturating_sub(1);
        match final_char {
            'H' | 'f' => {
                self.cursor_y = (self.csi_param(0, 1) - 1).min(last_row);
                self.cursor_x = (self.csi_param(1, 1) - 1).min(last_col);
            }
            'A' => self.cursor_y = self.cursor_y.saturating_sub(self.csi_param(0, 1)),
            'B' => self.cursor_y = (self.cursor_y + self.csi_param(0, 1)).min(last_row),
            'C' => self.cursor_x = (self.cursor_x + self.csi_param(0, 1)).min(last_col),
            'D' => self.cursor_x = self.cursor_x.saturating_sub(self.csi_param(0, 1)),
            'G' => self.cursor_x = (self.csi_param(0, 1) - 1).min(last_col),
            'd' => self.cursor_y = (self.csi_param(0, 1) - 1).min(last_row),
            'J' => self.erase_display(self.csi_param(0, 0)),
            'K' => self.erase_line(self.csi_param(0, 0)),
            _ => {} // SGR and everything else - ignored
        }
    }

    fn erase_display(&mut self, mode: usize) {
        match mode {
            0 => {
                self.erase_line(0);
                for y in (self.cursor_y + 1)..self.height {
                    self.erase_row(y, 0, self.width);
                }
            }
            1 => {
                for y in 0..self.cursor_y {
                    self.erase_row(y, 0, self.width);
                }
                self.erase_line(1);
            }
            2 | 3 => self.cells.fill(ModelCell::default()),
            _ => {}
        }
    }

    fn erase_line(&mut self, mode: usize) {
        let y = self.cursor_y;
        match mode {
            0 => self.erase_row(y, self.cursor_x, self.width),
            1 => self.erase_row(y, 0, self.cursor_x + 1),
            2 => self.erase_row(y, 0, self.width),
            _ => {}
        }
    }

    fn erase_row(&mut self, y: usize, from: usize, to: usize) {
        for x in from..to.min(self.width) {
            if let Some(cell) = self.cell_mut(x, y) {
                *cell = ModelCell::default();
            }
        }
    }

    fn execute_osc(&mut self) {
        // Format: OSC 8 ; params ; uri ST
        let Some(rest) = self.osc_buffer.strip_prefix("8;") else {
            return; // Other OSC codes ignored
        };
        let uri = rest.split_once(';').map_or("", |(_, uri)| uri);
        if uri.is_empty() {
            self.current_link_id = 0;
        } else {
            let uri = uri.to_string();
            self.links.push(uri);
            self.current_link_id = u32::try_from(self.links.len() - 1).unwrap_or(u32::MAX);
        }
    }

    /// Dump escape sequences in a human-readable format (for test failure
    /// messages).
    pub fn dump_sequences(text: &str) -> String {
        let mut output = String::with_capacity(text.len() * 2);
        for ch in text.chars() {
            match ch {
                '\x1b' => output.push_str("\\e"),
                '\x07' => output.push_str("\\a"),
                '\x00'..='\x1f' | '\x7f' => output.push_str(&format!("\\x{:02x}", ch as u32)),
                _ => output.push(ch),
            }
        }
        output
    }
}
