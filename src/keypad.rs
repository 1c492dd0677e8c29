use crate::error::{Chip8Error, Result};

pub const KEY_COUNT: usize = 16;

/// Latched state of the sixteen hex keys, written by the host and read by
/// the skip-if-key and wait-for-key instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey(key))?;
        *slot = pressed;
        Ok(())
    }

    /// keys are addressed by the low nibble of a register, so any byte is
    /// a valid query
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize]
    }

    /// the highest-numbered key held down, if any
    pub fn pressed_key(&self) -> Option<u8> {
        self.keys.iter().rposition(|&k| k).map(|k| k as u8)
    }
}
