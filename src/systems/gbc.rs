// GBC input layout

use crate::bridge::{ButtonMask, InputBridge, PlayerInputState, System};
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    /// Game Boy joypad, same order as the P1 register lines
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GbcButtons: u32 {
        const A = 0x01;
        const B = 0x02;
        const SELECT = 0x04;
        const START = 0x08;
        const RIGHT = 0x10;
        const LEFT = 0x20;
        const UP = 0x40;
        const DOWN = 0x80;
    }
}

impl From<GbcButtons> for ButtonMask {
    fn from(buttons: GbcButtons) -> Self {
        ButtonMask::from_bits_retain(buttons.bits())
    }
}

/// Game Boy / Game Boy Color, single built-in controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gbc;

static BRIDGE: OnceLock<InputBridge<Gbc>> = OnceLock::new();

impl System for Gbc {
    const NAME: &'static str = "gbc";
    const DPAD: GbcButtons = GbcButtons::UP
        .union(GbcButtons::DOWN)
        .union(GbcButtons::LEFT)
        .union(GbcButtons::RIGHT);
    type Buttons = GbcButtons;
    type Registers = [PlayerInputState; 1];

    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
        &BRIDGE
    }
}
