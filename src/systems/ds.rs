// DS input layout

use crate::bridge::{ButtonMask, InputBridge, PlayerInputState, System};
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    /// Nintendo DS buttons: the GBA keypad plus X and Y
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DsButtons: u32 {
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
        const X = 0x400;
        const Y = 0x800;
    }
}

impl From<DsButtons> for ButtonMask {
    fn from(buttons: DsButtons) -> Self {
        ButtonMask::from_bits_retain(buttons.bits())
    }
}

/// Nintendo DS, single built-in controller (touch screen not routed here)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ds;

static BRIDGE: OnceLock<InputBridge<Ds>> = OnceLock::new();

impl System for Ds {
    const NAME: &'static str = "ds";
    const DPAD: DsButtons = DsButtons::UP
        .union(DsButtons::DOWN)
        .union(DsButtons::LEFT)
        .union(DsButtons::RIGHT);
    type Buttons = DsButtons;
    type Registers = [PlayerInputState; 1];

    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
        &BRIDGE
    }
}
