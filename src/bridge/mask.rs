// Raw button bits passed between the bridge and a core

use bitflags::{bitflags, Flags};
use std::fmt;

bitflags! {
    /// Button bits in some core's native layout
    ///
    /// This is the core-agnostic form handed to a core's input slot. Each core
    /// names its own bits with a flags type (e.g. `NesButtons`) that converts
    /// into this one; the bridge truncates incoming masks to those flags before
    /// storing them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u32 {
        const _ = !0;
    }
}

impl ButtonMask {
    /// Re-read as a core's flags, dropping every bit the core does not define
    pub fn truncate_to<F: Flags<Bits = u32>>(self) -> F {
        F::from_bits_truncate(self.bits())
    }
}

impl Default for ButtonMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<u32> for ButtonMask {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

impl From<ButtonMask> for u32 {
    fn from(mask: ButtonMask) -> Self {
        mask.bits()
    }
}

impl fmt::Display for ButtonMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.bits())
    }
}
