// Per-player button register

use super::mask::ButtonMask;

/// Buttons currently held on one controller port
///
/// Mutators report whether the register changed. The bridge forwards the
/// register to the core either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInputState {
    held: ButtonMask,
}

impl PlayerInputState {
    /// Create an empty register
    pub const fn new() -> Self {
        Self {
            held: ButtonMask::empty(),
        }
    }

    /// Get the buttons currently held
    pub fn held(&self) -> ButtonMask {
        self.held
    }

    /// Check if every button in `mask` is held
    pub fn is_pressed(&self, mask: impl Into<ButtonMask>) -> bool {
        let mask = mask.into();
        !mask.is_empty() && self.held.contains(mask)
    }

    /// Register a press. `mask` must already be truncated to the core's buttons.
    pub(crate) fn press(&mut self, mask: ButtonMask) -> bool {
        let before = self.held;
        self.held |= mask;
        self.held != before
    }

    /// Register a release
    pub(crate) fn release(&mut self, mask: ButtonMask) -> bool {
        let before = self.held;
        self.held.remove(mask);
        self.held != before
    }

    /// Release everything
    pub(crate) fn reset(&mut self) -> bool {
        let changed = !self.held.is_empty();
        self.held = ButtonMask::empty();
        changed
    }
}
