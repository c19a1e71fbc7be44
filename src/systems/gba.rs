// GBA input layout

use crate::bridge::{ButtonMask, InputBridge, PlayerInputState, System};
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    /// Game Boy Advance keypad, KEYINPUT bit order
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GbaButtons: u32 {
        const A = 0x001;
        const B = 0x002;
        const SELECT = 0x004;
        const START = 0x008;
        const RIGHT = 0x010;
        const LEFT = 0x020;
        const UP = 0x040;
        const DOWN = 0x080;
        const R = 0x100;
        const L = 0x200;
    }
}

impl From<GbaButtons> for ButtonMask {
    fn from(buttons: GbaButtons) -> Self {
        ButtonMask::from_bits_retain(buttons.bits())
    }
}

/// Game Boy Advance, single built-in controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gba;

static BRIDGE: OnceLock<InputBridge<Gba>> = OnceLock::new();

impl System for Gba {
    const NAME: &'static str = "gba";
    const DPAD: GbaButtons = GbaButtons::UP
        .union(GbaButtons::DOWN)
        .union(GbaButtons::LEFT)
        .union(GbaButtons::RIGHT);
    type Buttons = GbaButtons;
    type Registers = [PlayerInputState; 1];

    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
        &BRIDGE
    }
}
