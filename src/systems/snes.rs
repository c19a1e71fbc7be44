// SNES input layout

use crate::bridge::{ButtonMask, InputBridge, PlayerInputState, System};
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    /// SNES pad
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SnesButtons: u32 {
        const UP = 0x001;
        const DOWN = 0x002;
        const LEFT = 0x004;
        const RIGHT = 0x008;
        const A = 0x010;
        const B = 0x020;
        const X = 0x040;
        const Y = 0x080;
        const L = 0x100;
        const R = 0x200;
        const START = 0x400;
        const SELECT = 0x800;
    }
}

impl From<SnesButtons> for ButtonMask {
    fn from(buttons: SnesButtons) -> Self {
        ButtonMask::from_bits_retain(buttons.bits())
    }
}

/// Super Nintendo, two standard pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snes;

static BRIDGE: OnceLock<InputBridge<Snes>> = OnceLock::new();

impl System for Snes {
    const NAME: &'static str = "snes";
    const DPAD: SnesButtons = SnesButtons::UP
        .union(SnesButtons::DOWN)
        .union(SnesButtons::LEFT)
        .union(SnesButtons::RIGHT);
    type Buttons = SnesButtons;
    type Registers = [PlayerInputState; 2];

    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
        &BRIDGE
    }
}
