// Direct input bridge
//
// This module injects button events from any thread straight into an emulation
// core's input slot, bypassing the unified controller layer.
//
// ## Architecture
//
// - `mask`: Raw button bits, the core-agnostic form of each core's flags
// - `player`: Per-player button register
// - `system`: Per-core parameterisation, button names and the external core contract
// - `input_bridge`: The per-core singleton that owns the registers and forwards them
// - `controller`: Per-player handle for UI code
// - `config`: Input source to button remapping
//
// ## Usage Example
//
// ```rust
// use core_input_bridge::bridge::{InputBridge, SessionStart};
// use core_input_bridge::systems::{Snes, SnesButtons};
//
// let bridge = InputBridge::<Snes>::shared();
// bridge.attach_core(core, SessionStart::Fresh);
//
// // From any thread
// bridge.press_button(SnesButtons::START, 0);
// bridge.release_button(SnesButtons::START, 0);
//
// // On session teardown
// bridge.reset_all_inputs();
// bridge.detach_core();
// ```

pub mod config;
pub mod controller;
pub mod input_bridge;
pub mod mask;
pub mod player;
pub mod system;

// Re-export commonly used types
pub use config::InputConfig;
pub use controller::DirectController;
pub use input_bridge::{InputBridge, SessionStart};
pub use mask::ButtonMask;
pub use player::PlayerInputState;
pub use system::{button_names, lock_recover, parse_buttons, CoreAdapter, SharedCore, System};

/// Errors from the configuration side of the bridge
///
/// Press, release and reset never fail; these come from parsing names and
/// building controllers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Unknown system: {0}")]
    UnknownSystem(String),

    #[error("Unknown button: {0}")]
    UnknownButton(String),

    #[error("Button {button} does not belong to {expected}")]
    WrongSystem { button: String, expected: String },

    #[error("Malformed binding on line {line}: {text}")]
    MalformedBinding { line: usize, text: String },

    #[error("Player {player} out of range for {system} ({max} players)")]
    PlayerOutOfRange {
        system: &'static str,
        player: usize,
        max: usize,
    },
}
