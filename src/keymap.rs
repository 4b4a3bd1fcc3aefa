use std::time::{Duration, Instant};

use chip8vm_core::KEY_COUNT;

/// Keyboard layout, in hex key order: the left-hand 4x4 block read left to
/// right, top to bottom.
pub const KEYMAP: [char; KEY_COUNT] = [
    '1', '2', '3', '4', //
    'q', 'w', 'e', 'r', //
    'a', 's', 'd', 'f', //
    'z', 'x', 'c', 'v', //
];

/// How long a key stays down after the terminal reports a press. Terminals
/// send presses and auto-repeats but no releases.
pub const HOLD_TIME: Duration = Duration::from_millis(120);

pub fn key_for(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    KEYMAP.iter().position(|&mapped| mapped == c)
}

/// Keys the user is holding, re-asserted on every cycle until they expire.
#[derive(Debug, Default)]
pub struct HeldKeys {
    held_until: [Option<Instant>; KEY_COUNT],
}

impl HeldKeys {
    pub fn press(&mut self, key: usize, now: Instant) {
        if let Some(slot) = self.held_until.get_mut(key) {
            *slot = Some(now + HOLD_TIME);
        }
    }

    /// Keys still held at `now`. Expired keys are dropped.
    pub fn active(&mut self, now: Instant) -> Vec<usize> {
        let mut keys = vec![];
        for (key, slot) in self.held_until.iter_mut().enumerate() {
            match slot {
                Some(until) if *until > now => keys.push(key),
                Some(_) => *slot = None,
                None => {}
            }
        }
        keys
    }

    pub fn release_all(&mut self) {
        self.held_until = [None; KEY_COUNT];
    }
}
