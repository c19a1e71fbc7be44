// Per-core parameterisation of the bridge and the external core contract

use super::input_bridge::InputBridge;
use super::mask::ButtonMask;
use super::player::PlayerInputState;
use super::InputError;
use bitflags::Flags;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// One supported emulation core
///
/// Fixes the button layout, the number of controller ports and the
/// process-wide bridge slot. Each core is a unit type implementing this trait.
pub trait System: Sized + Send + Sync + 'static {
    /// Short lowercase name, also the button identifier prefix
    const NAME: &'static str;

    /// The core's buttons in native bit order. `all()` is the valid range;
    /// anything else is dropped.
    type Buttons: Flags<Bits = u32>
        + Copy
        + Eq
        + Hash
        + fmt::Debug
        + Into<ButtonMask>
        + Send
        + Sync
        + 'static;

    /// The directional pad buttons
    const DPAD: Self::Buttons;

    /// One register per controller port. Fixed size, so events never allocate.
    type Registers: AsRef<[PlayerInputState]>
        + AsMut<[PlayerInputState]>
        + Default
        + Copy
        + fmt::Debug
        + Send;

    /// Storage for the process-wide bridge. Use [`InputBridge::shared`] instead.
    #[doc(hidden)]
    fn bridge_cell() -> &'static OnceLock<InputBridge<Self>>;

    /// Number of controller ports
    fn player_count() -> usize {
        <Self::Registers as Default>::default().as_ref().len()
    }

    /// Every bit the core understands
    fn valid_mask() -> ButtonMask {
        <Self::Buttons as Flags>::all().into()
    }
}

/// Parse `"<system>.<name>"` identifiers, several joined with `|`, into one set
///
/// The system prefix and the button name are matched case-insensitively.
pub fn parse_buttons<S: System>(text: &str) -> Result<S::Buttons, InputError> {
    let mut bits = 0;
    for part in text.split('|') {
        let part = part.trim();
        let unknown = || InputError::UnknownButton(part.to_string());
        let (system, name) = part.split_once('.').ok_or_else(unknown)?;

        if !system.eq_ignore_ascii_case(S::NAME) {
            return Err(InputError::WrongSystem {
                button: part.to_string(),
                expected: S::NAME.to_string(),
            });
        }

        let button =
            <S::Buttons as Flags>::from_name(&name.to_ascii_uppercase()).ok_or_else(unknown)?;
        bits |= button.bits();
    }
    Ok(<S::Buttons as Flags>::from_bits_retain(bits))
}

/// Format a set of buttons the way [`parse_buttons`] reads them (`nes.a|nes.start`)
pub fn button_names<S: System>(buttons: S::Buttons) -> String {
    buttons
        .iter_names()
        .map(|(name, _)| format!("{}.{}", S::NAME, name.to_ascii_lowercase()))
        .collect::<Vec<_>>()
        .join("|")
}

/// An opaque emulation engine, seen from the input side
///
/// The engine runs its own frame loop on a dedicated thread and reads its
/// input slot once per frame. Both calls happen under the engine's own lock
/// (see [`SharedCore`]).
pub trait CoreAdapter: Send {
    /// Store the full held state for `player` in the engine's input slot
    fn apply_input(&mut self, player: usize, mask: ButtonMask);

    /// Execute one emulated frame
    fn run_frame(&mut self);
}

/// A core behind its own lock. The bridge always takes its own lock first.
pub type SharedCore = Arc<Mutex<dyn CoreAdapter>>;

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Input registers stay meaningful after a panic elsewhere, and the input
/// path must never turn into a panic itself.
pub fn lock_recover<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Recovering poisoned input lock");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{Ds, DsButtons, Nes, NesButtons, Snes, SnesButtons};

    #[test]
    fn test_parse_single_button() {
        assert_eq!(parse_buttons::<Nes>("nes.start"), Ok(NesButtons::START));
        assert_eq!(parse_buttons::<Ds>("DS.Y"), Ok(DsButtons::Y));
    }

    #[test]
    fn test_parse_chord() {
        assert_eq!(
            parse_buttons::<Snes>("snes.a | snes.b"),
            Ok(SnesButtons::A | SnesButtons::B)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_buttons::<Nes>("select"),
            Err(InputError::UnknownButton("select".to_string()))
        );
        assert_eq!(
            parse_buttons::<Nes>("nes.turbo"),
            Err(InputError::UnknownButton("nes.turbo".to_string()))
        );
        assert!(matches!(
            parse_buttons::<Ds>("gba.l"),
            Err(InputError::WrongSystem { .. })
        ));
    }

    #[test]
    fn test_button_names() {
        assert_eq!(button_names::<Nes>(NesButtons::B), "nes.b");
        assert_eq!(
            button_names::<Snes>(SnesButtons::START | SnesButtons::UP),
            "snes.up|snes.start"
        );
        assert_eq!(button_names::<Nes>(NesButtons::empty()), "");
    }

    #[test]
    fn test_valid_mask_and_player_count() {
        assert_eq!(Nes::valid_mask().bits(), 0xFF);
        assert_eq!(Nes::player_count(), 2);
        assert_eq!(Ds::player_count(), 1);
    }
}
