// Minimal core that latches its input slots once per frame

use crate::bridge::{ButtonMask, CoreAdapter};

/// A stand-in emulation core
///
/// `apply_input` writes the core's input slots; `run_frame` latches them the
/// way a game polls its controller port once per frame. The latched values are
/// what the "game" saw.
#[derive(Debug, Clone)]
pub struct LatchCore {
    slots: Vec<ButtonMask>,
    latched: Vec<ButtonMask>,
    frames: u64,
    applies: u64,
}

impl LatchCore {
    /// Create a core with `players` input slots
    pub fn new(players: usize) -> Self {
        Self {
            slots: vec![ButtonMask::empty(); players],
            latched: vec![ButtonMask::empty(); players],
            frames: 0,
            applies: 0,
        }
    }

    /// Current content of a player's input slot
    pub fn slot(&self, player: usize) -> Option<ButtonMask> {
        self.slots.get(player).copied()
    }

    /// Input the last executed frame saw for a player
    pub fn latched(&self, player: usize) -> Option<ButtonMask> {
        self.latched.get(player).copied()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn apply_count(&self) -> u64 {
        self.applies
    }
}

impl CoreAdapter for LatchCore {
    fn apply_input(&mut self, player: usize, mask: ButtonMask) {
        if let Some(slot) = self.slots.get_mut(player) {
            *slot = mask;
            self.applies += 1;
        }
    }

    fn run_frame(&mut self) {
        for (player, (latched, slot)) in self.latched.iter_mut().zip(&self.slots).enumerate() {
            if *latched != *slot {
                log::trace!("Frame {}: player {player} input {slot}", self.frames);
            }
            *latched = *slot;
        }
        self.frames += 1;
    }
}
