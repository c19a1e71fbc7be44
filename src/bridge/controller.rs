// Per-player controller handle over a bridge

use super::input_bridge::InputBridge;
use super::mask::ButtonMask;
use super::system::System;
use super::InputError;
use bitflags::Flags;

/// A controller plugged into one port of one core
///
/// Thin wrapper that turns a core's button flags into bridge calls. Dropping the
/// controller releases everything it still holds on its port.
pub struct DirectController<'a, S: System> {
    name: String,
    player: usize,
    bridge: &'a InputBridge<S>,
}

impl<S: System> DirectController<'static, S> {
    /// Create a controller on the process-wide bridge
    pub fn new(name: impl Into<String>, player: usize) -> Result<Self, InputError> {
        Self::on_bridge(InputBridge::shared(), name, player)
    }
}

impl<'a, S: System> DirectController<'a, S> {
    /// Create a controller on a specific bridge
    pub fn on_bridge(
        bridge: &'a InputBridge<S>,
        name: impl Into<String>,
        player: usize,
    ) -> Result<Self, InputError> {
        let max = S::player_count();
        if player >= max {
            return Err(InputError::PlayerOutOfRange {
                system: S::NAME,
                player,
                max,
            });
        }

        Ok(Self {
            name: name.into(),
            player,
            bridge,
        })
    }

    /// Get the controller name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the port this controller drives
    pub fn player(&self) -> usize {
        self.player
    }

    /// Hold `buttons` as a single event (one button, or e.g. a diagonal)
    pub fn press(&self, buttons: S::Buttons) {
        self.bridge.press_button(buttons, self.player);
    }

    pub fn release(&self, buttons: S::Buttons) {
        self.bridge.release_button(buttons, self.player);
    }

    /// Release every directional button
    pub fn release_dpad(&self) {
        self.bridge.release_button(S::DPAD, self.player);
    }

    /// Release every button on this controller's port
    pub fn release_all(&self) {
        self.bridge
            .release_button(<S::Buttons as Flags>::all(), self.player);
    }

    /// Check if all of `buttons` are held on this controller's port
    pub fn is_pressed(&self, buttons: S::Buttons) -> bool {
        let buttons: ButtonMask = buttons.into();
        !buttons.is_empty()
            && self
                .bridge
                .player_state(self.player)
                .is_some_and(|held| held.contains(buttons))
    }

    /// Get the buttons held on this controller's port
    pub fn held(&self) -> S::Buttons {
        self.bridge
            .player_state(self.player)
            .unwrap_or_default()
            .truncate_to()
    }

    /// Release every button of every port (session boundary)
    pub fn reset(&self) {
        self.bridge.reset_all_inputs();
    }
}

impl<S: System> Drop for DirectController<'_, S> {
    fn drop(&mut self) {
        self.release_all();
    }
}
