// Genesis input layout

use crate::bridge::{ButtonMask, InputBridge, PlayerInputState, System};
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    /// Six-button Genesis pad
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GenesisButtons: u32 {
        const UP = 0x001;
        const DOWN = 0x002;
        const LEFT = 0x004;
        const RIGHT = 0x008;
        const B = 0x010;
        const C = 0x020;
        const A = 0x040;
        const START = 0x080;
        const Z = 0x100;
        const Y = 0x200;
        const X = 0x400;
        const MODE = 0x800;
    }
}

impl From<GenesisButtons> for ButtonMask {
    fn from(buttons: GenesisButtons) -> Self {
        ButtonMask::from_bits_retain(buttons.bits())
    }
}

/// Sega Genesis / Mega Drive, two six-button pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Genesis;

static BRIDGE: OnceLock<InputBridge<Genesis>> = OnceLock::new();

impl System for Genesis {
    const NAME: &'static str = "genesis";
    const DPAD: GenesisButtons = GenesisButtons::UP
        .union(GenesisButtons::DOWN)
        .union(GenesisButtons::LEFT)
        .union(GenesisButtons::RIGHT);
    type Buttons = GenesisButtons;
    type Registers = [PlayerInputState; 2];

    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
        &BRIDGE
    }
}
