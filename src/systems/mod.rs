// Supported emulation cores
//
// Each core is a unit type implementing `System` plus a bitflags type carrying
// the core's native button layout. `SystemId` picks one of them at runtime.

use crate::bridge::{ButtonMask, InputBridge, InputError, SessionStart, SharedCore, System};
use std::fmt;
use std::str::FromStr;

mod ds;
mod gba;
mod gbc;
mod genesis;
mod nes;
mod snes;

pub use ds::{Ds, DsButtons};
pub use gba::{Gba, GbaButtons};
pub use gbc::{Gbc, GbcButtons};
pub use genesis::{Genesis, GenesisButtons};
pub use nes::{Nes, NesButtons};
pub use snes::{Snes, SnesButtons};

/// Runtime selector for one of the supported cores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemId {
    Nes,
    Snes,
    Gbc,
    Gba,
    Ds,
    Genesis,
}

/// Run `$body` with `$bridge` bound to the shared bridge of `$id`'s core
macro_rules! with_bridge {
    ($id:expr, $bridge:ident => $body:expr) => {
        match $id {
            SystemId::Nes => {
                let $bridge = InputBridge::<Nes>::shared();
                $body
            }
            SystemId::Snes => {
                let $bridge = InputBridge::<Snes>::shared();
                $body
            }
            SystemId::Gbc => {
                let $bridge = InputBridge::<Gbc>::shared();
                $body
            }
            SystemId::Gba => {
                let $bridge = InputBridge::<Gba>::shared();
                $body
            }
            SystemId::Ds => {
                let $bridge = InputBridge::<Ds>::shared();
                $body
            }
            SystemId::Genesis => {
                let $bridge = InputBridge::<Genesis>::shared();
                $body
            }
        }
    };
}

impl SystemId {
    /// Every supported core
    pub const ALL: [SystemId; 6] = [
        SystemId::Nes,
        SystemId::Snes,
        SystemId::Gbc,
        SystemId::Gba,
        SystemId::Ds,
        SystemId::Genesis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SystemId::Nes => Nes::NAME,
            SystemId::Snes => Snes::NAME,
            SystemId::Gbc => Gbc::NAME,
            SystemId::Gba => Gba::NAME,
            SystemId::Ds => Ds::NAME,
            SystemId::Genesis => Genesis::NAME,
        }
    }

    pub fn valid_mask(self) -> ButtonMask {
        match self {
            SystemId::Nes => Nes::valid_mask(),
            SystemId::Snes => Snes::valid_mask(),
            SystemId::Gbc => Gbc::valid_mask(),
            SystemId::Gba => Gba::valid_mask(),
            SystemId::Ds => Ds::valid_mask(),
            SystemId::Genesis => Genesis::valid_mask(),
        }
    }

    pub fn player_count(self) -> usize {
        match self {
            SystemId::Nes => Nes::player_count(),
            SystemId::Snes => Snes::player_count(),
            SystemId::Gbc => Gbc::player_count(),
            SystemId::Gba => Gba::player_count(),
            SystemId::Ds => Ds::player_count(),
            SystemId::Genesis => Genesis::player_count(),
        }
    }

    pub fn press_button(self, mask: impl Into<ButtonMask>, player: usize) {
        let mask = mask.into();
        with_bridge!(self, bridge => bridge.press_button(mask, player))
    }

    pub fn release_button(self, mask: impl Into<ButtonMask>, player: usize) {
        let mask = mask.into();
        with_bridge!(self, bridge => bridge.release_button(mask, player))
    }

    pub fn reset_all_inputs(self) {
        with_bridge!(self, bridge => bridge.reset_all_inputs())
    }

    pub fn attach_core(self, core: SharedCore, start: SessionStart) -> Option<SharedCore> {
        with_bridge!(self, bridge => bridge.attach_core(core, start))
    }

    pub fn detach_core(self) -> Option<SharedCore> {
        with_bridge!(self, bridge => bridge.detach_core())
    }

    pub fn player_state(self, player: usize) -> Option<ButtonMask> {
        with_bridge!(self, bridge => bridge.player_state(player))
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemId {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        SystemId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| InputError::UnknownSystem(name.to_string()))
    }
}

/// Release every button on every core (app-level session teardown)
pub fn reset_all_bridges() {
    for id in SystemId::ALL {
        id.reset_all_inputs();
    }
}
