use crate::{Chip8Error, Result};

pub const KEY_COUNT: usize = 16;

/// One latch per hex key. A latch holds for a single cycle: the host sets it,
/// the next cycle reads it, and the cycle clears every latch when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    latches: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn press(&mut self, key: usize) -> Result<()> {
        let latch = self
            .latches
            .get_mut(key)
            .ok_or(Chip8Error::KeyIndexOutOfRange { index: key })?;
        *latch = true;
        Ok(())
    }

    pub fn is_key_down(&self, key: u8) -> Result<bool> {
        self.latches
            .get(key as usize)
            .copied()
            .ok_or(Chip8Error::KeyIndexOutOfRange {
                index: key as usize,
            })
    }

    /// Lowest pressed key, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.latches.iter().position(|&down| down).map(|key| key as u8)
    }

    pub fn release_all(&mut self) {
        self.latches = [false; KEY_COUNT];
    }
}
