//! Typed terminal output commands and a single output gate.
//!
//! Invariant: the prompt writes to the terminal only through `OutputGate::flush(..)`.

use std::io;

use crate::core::terminal::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Raw bytes to be written to the terminal.
    Bytes(Vec<u8>),

    /// Move the cursor `n` cells left/right. Zero cells emit nothing.
    CursorLeft(usize),
    CursorRight(usize),

    /// `\b \b` per cell: blank the `n` cells left of the cursor and end on the first.
    EraseBack(usize),
    /// `n` spaces.
    Blank(usize),

    /// `\r\n`.
    NewLine,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(data) => out.extend_from_slice(data),
            Self::CursorLeft(n) => encode_cursor_move(out, *n, b'D'),
            Self::CursorRight(n) => encode_cursor_move(out, *n, b'C'),
            Self::EraseBack(n) => {
                for _ in 0..*n {
                    out.extend_from_slice(b"\x08 \x08");
                }
            }
            Self::Blank(n) => out.resize(out.len() + n, b' '),
            Self::NewLine => out.extend_from_slice(b"\r\n"),
        }
    }
}

fn encode_cursor_move(out: &mut Vec<u8>, cells: usize, direction: u8) {
    match cells {
        0 => {}
        1 => out.extend_from_slice(&[0x1b, b'[', direction]),
        n => {
            out.extend_from_slice(b"\x1b[");
            out.extend_from_slice(n.to_string().as_bytes());
            out.push(direction);
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Encode and drop buffered commands without writing them.
    pub fn take_bytes(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        for cmd in self.cmds.drain(..) {
            cmd.encode(&mut out);
        }
        out
    }

    /// Flush buffered commands to the terminal as one write.
    ///
    /// This is the single write gate: `Terminal::write(..)` must not be called
    /// from anywhere else.
    ///
    /// # Errors
    /// Propagates the terminal write failure.
    pub fn flush<T: Terminal>(&mut self, term: &mut T) -> io::Result<()> {
        let out = self.take_bytes();
        if out.is_empty() {
            return Ok(());
        }
        term.write(&out)
    }
}
