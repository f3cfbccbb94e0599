//! Key decoding for the raw input byte stream.
//!
//! Bytes are fed one at a time; escape sequences are tracked incrementally so a
//! sequence split across reads still decodes as one key.

pub const ENTER: u8 = 0x0d;
pub const BACKSPACE: u8 = 0x08;
pub const DEL: u8 = 0x7f;
pub const CTRL_C: u8 = 0x03;
pub const CTRL_R: u8 = 0x12;
pub const ESC: u8 = 0x1b;

/// Longest pending escape sequence kept before it is discarded.
const MAX_SEQUENCE_LEN: usize = 16;

/// One logical key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    ToggleVisibility,
    Interrupt,
    Cancel,
    Char(u8),
    Unknown,
}

impl Key {
    fn from_byte(byte: u8) -> Self {
        match byte {
            ENTER => Self::Enter,
            BACKSPACE | DEL => Self::Backspace,
            CTRL_R => Self::ToggleVisibility,
            CTRL_C => Self::Interrupt,
            0x20..=0x7e | 0x80..=0xff => Self::Char(byte),
            _ => Self::Unknown,
        }
    }

    fn from_sequence(seq: &[u8]) -> Self {
        match seq {
            b"\x1b[D" | b"\x1bOD" => Self::Left,
            b"\x1b[C" | b"\x1bOC" => Self::Right,
            b"\x1b[3~" => Self::Delete,
            _ => Self::Unknown,
        }
    }

    /// Short label for logs. Never includes the byte value of `Char`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Left => "left",
            Self::Right => "right",
            Self::ToggleVisibility => "toggle-visibility",
            Self::Interrupt => "interrupt",
            Self::Cancel => "cancel",
            Self::Char(_) => "char",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug)]
enum SequenceStatus {
    Complete,
    Incomplete,
}

/// Incremental key decoder with partial escape-sequence state.
///
/// A control byte never continues an escape sequence. It resolves the pending
/// bytes (a lone ESC as [`Key::Cancel`], anything longer as [`Key::Unknown`]) and
/// then decodes as its own key, which [`KeyDecoder::take_ready`] hands out.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
    ready: Option<Key>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an escape sequence has started but not completed.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed one byte; returns a key once one is complete.
    ///
    /// Drain [`KeyDecoder::take_ready`] before the next push.
    pub fn push(&mut self, byte: u8) -> Option<Key> {
        if self.pending.is_empty() {
            if byte == ESC {
                self.pending.push(byte);
                return None;
            }
            return Some(Key::from_byte(byte));
        }

        if is_control(byte) {
            let resolved = self.flush();
            if byte == ESC {
                self.pending.push(byte);
            } else {
                self.ready = Some(Key::from_byte(byte));
            }
            return resolved;
        }

        self.pending.push(byte);
        match is_complete_sequence(&self.pending) {
            SequenceStatus::Complete => {
                let key = Key::from_sequence(&self.pending);
                self.pending.clear();
                Some(key)
            }
            SequenceStatus::Incomplete if self.pending.len() >= MAX_SEQUENCE_LEN => {
                self.pending.clear();
                Some(Key::Unknown)
            }
            SequenceStatus::Incomplete => None,
        }
    }

    /// Resolve pending state after the continuation timeout expired.
    ///
    /// A lone ESC becomes [`Key::Cancel`]; any other partial sequence is discarded.
    pub fn flush(&mut self) -> Option<Key> {
        if self.pending.is_empty() {
            return None;
        }
        let key = if self.pending == [ESC] {
            Key::Cancel
        } else {
            Key::Unknown
        };
        self.pending.clear();
        Some(key)
    }

    /// A key decoded from the control byte that ended the last pending sequence.
    pub fn take_ready(&mut self) -> Option<Key> {
        self.ready.take()
    }
}

fn is_control(byte: u8) -> bool {
    byte < 0x20 || byte == DEL
}

fn is_complete_sequence(data: &[u8]) -> SequenceStatus {
    match data {
        [ESC] | [ESC, b'['] | [ESC, b'O'] => SequenceStatus::Incomplete,
        [ESC, b'[', .., last] => is_complete_csi_sequence(*last),
        // SS3 carries exactly one final byte; anything else after ESC is an Alt chord.
        _ => SequenceStatus::Complete,
    }
}

fn is_complete_csi_sequence(last: u8) -> SequenceStatus {
    match last {
        // Parameter and intermediate bytes.
        0x20..=0x3f => SequenceStatus::Incomplete,
        // Final byte, or a malformed byte that ends the sequence as unknown.
        _ => SequenceStatus::Complete,
    }
}
