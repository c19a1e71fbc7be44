// NES input layout

use crate::bridge::{ButtonMask, InputBridge, PlayerInputState, System};
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    /// Standard NES pad, bit order of the console's shift register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NesButtons: u32 {
        const A = 0x01;
        const B = 0x02;
        const SELECT = 0x04;
        const START = 0x08;
        const UP = 0x10;
        const DOWN = 0x20;
        const LEFT = 0x40;
        const RIGHT = 0x80;
    }
}

impl From<NesButtons> for ButtonMask {
    fn from(buttons: NesButtons) -> Self {
        ButtonMask::from_bits_retain(buttons.bits())
    }
}

/// Nintendo Entertainment System, two standard pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nes;

static BRIDGE: OnceLock<InputBridge<Nes>> = OnceLock::new();

impl System for Nes {
    const NAME: &'static str = "nes";
    const DPAD: NesButtons = NesButtons::UP
        .union(NesButtons::DOWN)
        .union(NesButtons::LEFT)
        .union(NesButtons::RIGHT);
    type Buttons = NesButtons;
    type Registers = [PlayerInputState; 2];

    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
        &BRIDGE
    }
}
