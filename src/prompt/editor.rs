//! Line editor state machine for secret entry.
//!
//! The editor owns the buffer, the logical cursor, and the visibility state. Each
//! key is applied to that state and the matching terminal feedback is queued on
//! the output gate; the caller flushes the gate after every key.

use std::ops::RangeFrom;

use unicode_width::UnicodeWidthChar;
use zeroize::Zeroizing;

use crate::core::input::Key;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::prompt::options::PasswordPrompt;

const INITIAL_CAPACITY: usize = 128;
const MAX_RESERVED_CAPACITY: usize = 4096;

/// Terminal state reached by a prompt call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Committed,
    Skipped,
    Interrupted,
    Canceled,
}

pub struct LineEditor<'a> {
    options: &'a PasswordPrompt,
    buffer: Zeroizing<Vec<u8>>,
    cursor: usize,
    visible: bool,
    mask: Option<(String, usize)>,
    output: OutputGate,
}

impl<'a> LineEditor<'a> {
    pub fn new(options: &'a PasswordPrompt) -> Self {
        let capacity = options
            .max_length
            .map_or(INITIAL_CAPACITY, |max| max.min(MAX_RESERVED_CAPACITY));
        // Zero-width and control masks render as nothing.
        let mask = options.mask.and_then(|mask| match mask.width() {
            Some(width) if width > 0 => Some((mask.to_string(), width)),
            _ => None,
        });
        Self {
            options,
            buffer: Zeroizing::new(Vec::with_capacity(capacity)),
            cursor: 0,
            visible: options.starts_visible,
            mask,
            output: OutputGate::new(),
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn output_mut(&mut self) -> &mut OutputGate {
        &mut self.output
    }

    /// Queue the prompt message.
    pub fn begin(&mut self) {
        if !self.options.message.is_empty() {
            self.output
                .push(TerminalCmd::Bytes(raw_mode_text(&self.options.message)));
        }
    }

    /// Apply one key. Returns the resolution once the prompt is finished.
    pub fn handle_key(&mut self, key: Key) -> Option<Resolution> {
        match key {
            Key::Enter => return self.commit(),
            Key::Backspace | Key::Delete => self.erase_before_cursor(),
            Key::Left if self.options.enable_arrows_navigation => self.move_left(),
            Key::Right if self.options.enable_arrows_navigation => self.move_right(),
            Key::ToggleVisibility if self.options.enable_visibility_toggle => {
                self.toggle_visibility();
            }
            Key::Interrupt => return Some(self.abort(Resolution::Interrupted)),
            Key::Cancel => return Some(self.abort(Resolution::Canceled)),
            Key::Char(byte) => self.insert(byte),
            Key::Left | Key::Right | Key::ToggleVisibility | Key::Unknown => {
                tracing::trace!(key = key.label(), "ignored key");
            }
        }
        None
    }

    /// Hand over the collected bytes.
    pub fn into_secret(self) -> Zeroizing<Vec<u8>> {
        self.buffer
    }

    fn commit(&mut self) -> Option<Resolution> {
        if let Some(min) = self.options.min_length {
            if self.buffer.len() < min {
                tracing::trace!("enter ignored below minimum length");
                return None;
            }
        }
        self.output.push(TerminalCmd::NewLine);
        Some(Resolution::Committed)
    }

    fn abort(&mut self, resolution: Resolution) -> Resolution {
        if self.options.skippable {
            return Resolution::Skipped;
        }
        self.output.push(TerminalCmd::NewLine);
        resolution
    }

    fn insert(&mut self, byte: u8) {
        if let Some(max) = self.options.max_length {
            if self.buffer.len() >= max {
                tracing::trace!("input ignored at maximum length");
                return;
            }
        }
        self.reserve_one();
        self.buffer.insert(self.cursor, byte);
        let glyphs = self.render(self.cursor..);
        self.cursor += 1;
        let tail_cells = self.tail_len() * self.cell_width();
        self.output.push(TerminalCmd::Bytes(glyphs));
        self.output.push(TerminalCmd::CursorLeft(tail_cells));
    }

    fn erase_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);

        let width = self.cell_width();
        let tail_cells = self.tail_len() * width;
        if tail_cells == 0 {
            self.output.push(TerminalCmd::EraseBack(width));
            return;
        }
        let tail = self.render(self.cursor..);
        self.output.extend([
            TerminalCmd::CursorLeft(width),
            TerminalCmd::Bytes(tail),
            TerminalCmd::Blank(width),
            TerminalCmd::CursorLeft(tail_cells + width),
        ]);
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.output.push(TerminalCmd::CursorLeft(self.cell_width()));
    }

    fn move_right(&mut self) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        self.cursor += 1;
        self.output.push(TerminalCmd::CursorRight(self.cell_width()));
    }

    fn toggle_visibility(&mut self) {
        let len = self.buffer.len();
        let old_width = self.cell_width();
        self.output.extend([
            TerminalCmd::CursorRight(self.tail_len() * old_width),
            TerminalCmd::EraseBack(len * old_width),
        ]);

        self.visible = !self.visible;
        tracing::trace!(visible = self.visible, "visibility toggled");

        let redrawn = self.render(0..);
        let tail_cells = self.tail_len() * self.cell_width();
        self.output.push(TerminalCmd::Bytes(redrawn));
        self.output.push(TerminalCmd::CursorLeft(tail_cells));
    }

    /// Grow into a fresh zeroizing allocation; the old block is wiped on drop.
    fn reserve_one(&mut self) {
        if self.buffer.len() < self.buffer.capacity() {
            return;
        }
        let mut grown = Zeroizing::new(Vec::with_capacity(self.buffer.capacity().max(1) * 2));
        grown.extend_from_slice(&self.buffer);
        self.buffer = grown;
    }

    fn tail_len(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Terminal cells occupied by one buffered byte in the current mode.
    fn cell_width(&self) -> usize {
        if self.visible {
            1
        } else {
            self.mask.as_ref().map_or(0, |(_, width)| *width)
        }
    }

    fn render(&self, range: RangeFrom<usize>) -> Vec<u8> {
        let bytes = &self.buffer[range];
        if self.visible {
            return bytes.to_vec();
        }
        match &self.mask {
            Some((glyph, _)) => glyph.repeat(bytes.len()).into_bytes(),
            None => Vec::new(),
        }
    }
}

/// Raw mode disables output post-processing, so bare `\n` needs its `\r`.
fn raw_mode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut previous = 0u8;
    for &byte in text.as_bytes() {
        if byte == b'\n' && previous != b'\r' {
            out.push(b'\r');
        }
        out.push(byte);
        previous = byte;
    }
    out
}
