// Per-core input bridge - authoritative button state and forwarding into the core

use super::mask::ButtonMask;
use super::player::PlayerInputState;
use super::system::{lock_recover, SharedCore, System};
use std::sync::{Arc, Mutex, MutexGuard};

/// How an attached core picks up the bridge's registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    /// Re-apply the last known state (buttons held across a core swap stay held)
    Resume,
    /// Release everything before the first forward
    Fresh,
}

/// Thread-safe input state holder for one emulation core
///
/// Every press, release and reset mutates the register and forwards it into
/// the attached core inside one critical section, so the core's execution
/// thread never sees a half-applied event. Lock order is always bridge lock,
/// then core lock.
///
/// Out-of-range players and bits outside [`System::Buttons`] are ignored,
/// never reported: these calls sit on a hot input path.
pub struct InputBridge<S: System> {
    state: Mutex<BridgeState<S>>,
}

struct BridgeState<S: System> {
    players: S::Registers,
    core: Option<SharedCore>,
}

impl<S: System> BridgeState<S> {
    /// Push one player's register into the core's input slot.
    /// Skipped while no core is attached; the register itself is kept.
    fn forward(&self, player: usize, held: ButtonMask) {
        if let Some(core) = &self.core {
            lock_recover(core).apply_input(player, held);
        }
    }

    fn forward_all(&self) {
        let Some(core) = &self.core else {
            return;
        };
        let mut core = lock_recover(core);
        for (player, register) in self.players.as_ref().iter().enumerate() {
            core.apply_input(player, register.held());
        }
    }
}

impl<S: System> InputBridge<S> {
    /// Create a bridge that is not the process-wide instance
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BridgeState {
                players: Default::default(),
                core: None,
            }),
        }
    }

    /// Get the process-wide bridge for this core, creating it on first use
    pub fn shared() -> &'static Self {
        S::bridge_cell().get_or_init(|| {
            log::debug!("Creating {} input bridge", S::NAME);
            Self::new()
        })
    }

    /// Number of controller ports
    pub fn player_count(&self) -> usize {
        S::player_count()
    }

    /// Hold the buttons in `mask` for `player` and forward the result
    pub fn press_button(&self, mask: impl Into<ButtonMask>, player: usize) {
        let mask = mask.into();
        let accepted: ButtonMask = mask.truncate_to::<S::Buttons>().into();
        if accepted != mask {
            log::trace!(
                "{}: ignoring invalid bits {} in press",
                S::NAME,
                mask.difference(accepted)
            );
        }

        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(register) = state.players.as_mut().get_mut(player) else {
            log::trace!("{}: ignoring press for player {player}", S::NAME);
            return;
        };
        register.press(accepted);
        let held = register.held();
        state.forward(player, held);
    }

    /// Release the buttons in `mask` for `player` and forward the result
    pub fn release_button(&self, mask: impl Into<ButtonMask>, player: usize) {
        let mask = mask.into();

        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(register) = state.players.as_mut().get_mut(player) else {
            log::trace!("{}: ignoring release for player {player}", S::NAME);
            return;
        };
        register.release(mask);
        let held = register.held();
        state.forward(player, held);
    }

    /// Release every button of every player and forward the empty state
    pub fn reset_all_inputs(&self) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let mut released = false;
        for register in state.players.as_mut() {
            released |= register.reset();
        }
        state.forward_all();

        if released {
            log::debug!("{}: released all held buttons", S::NAME);
        }
    }

    /// Install the core that receives forwarded input
    ///
    /// Every player's register is forwarded before this returns, so the
    /// core starts from the bridge's state. Returns the core that was
    /// attached before, if any.
    pub fn attach_core(&self, core: SharedCore, start: SessionStart) -> Option<SharedCore> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if start == SessionStart::Fresh {
            for register in state.players.as_mut() {
                register.reset();
            }
        }
        let previous = state.core.replace(core);
        state.forward_all();

        log::info!("{}: core attached ({start:?})", S::NAME);
        previous
    }

    /// Stop forwarding. Registers are kept for the next attach.
    pub fn detach_core(&self) -> Option<SharedCore> {
        let core = self.lock().core.take();
        if core.is_some() {
            log::info!("{}: core detached", S::NAME);
        }
        core
    }

    /// Check if a core is currently receiving input
    pub fn is_core_attached(&self) -> bool {
        self.lock().core.is_some()
    }

    /// Check if `core` is the attached core
    pub fn is_attached_to(&self, core: &SharedCore) -> bool {
        self.lock()
            .core
            .as_ref()
            .is_some_and(|attached| Arc::ptr_eq(attached, core))
    }

    /// Get the buttons held by `player`, or `None` for an unsupported port
    pub fn player_state(&self, player: usize) -> Option<ButtonMask> {
        self.lock()
            .players
            .as_ref()
            .get(player)
            .map(PlayerInputState::held)
    }

    /// Copy every player's register
    pub fn snapshot(&self) -> S::Registers {
        self.lock().players
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState<S>> {
        lock_recover(&self.state)
    }
}

impl<S: System> Default for InputBridge<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::CoreAdapter;
    use crate::host::LatchCore;
    use crate::systems::{Nes, NesButtons, Snes, SnesButtons};
    use bitflags::bitflags;
    use std::sync::OnceLock;
    use std::thread;

    bitflags! {
        /// Test controller with seven valid bits
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct SevenButtons: u32 {
            const UP = 0x01;
            const DOWN = 0x02;
            const LEFT = 0x04;
            const RIGHT = 0x08;
            const A = 0x10;
            const B = 0x20;
            const START = 0x40;
        }
    }

    impl From<SevenButtons> for ButtonMask {
        fn from(buttons: SevenButtons) -> Self {
            ButtonMask::from_bits_retain(buttons.bits())
        }
    }

    struct SevenBit;

    static SEVEN_BIT_BRIDGE: OnceLock<InputBridge<SevenBit>> = OnceLock::new();

    impl System for SevenBit {
        const NAME: &'static str = "seven";
        const DPAD: SevenButtons = SevenButtons::UP.union(SevenButtons::DOWN);
        type Buttons = SevenButtons;
        type Registers = [PlayerInputState; 1];

        fn bridge_cell() -> &'static OnceLock<InputBridge<Self>> {
            &SEVEN_BIT_BRIDGE
        }
    }

    /// Core that records what every frame saw on port 0
    #[derive(Default)]
    struct RecordingCore {
        slot: ButtonMask,
        seen: Vec<ButtonMask>,
    }

    impl CoreAdapter for RecordingCore {
        fn apply_input(&mut self, player: usize, mask: ButtonMask) {
            if player == 0 {
                self.slot = mask;
            }
        }

        fn run_frame(&mut self) {
            self.seen.push(self.slot);
        }
    }

    fn attached_latch(players: usize) -> (Arc<Mutex<LatchCore>>, SharedCore) {
        let latch = Arc::new(Mutex::new(LatchCore::new(players)));
        let core: SharedCore = latch.clone();
        (latch, core)
    }

    fn mask(bits: u32) -> ButtonMask {
        ButtonMask::from_bits_retain(bits)
    }

    fn held(bridge: &InputBridge<impl System>, player: usize) -> u32 {
        bridge.player_state(player).unwrap().bits()
    }

    #[test]
    fn test_bridge_creation() {
        let bridge = InputBridge::<Nes>::new();
        assert_eq!(bridge.player_count(), 2);
        assert_eq!(held(&bridge, 0), 0);
        assert_eq!(held(&bridge, 1), 0);
        assert!(bridge.player_state(2).is_none());
        assert!(!bridge.is_core_attached());
    }

    #[test]
    fn test_press_then_release_restores_state() {
        let bridge = InputBridge::<Snes>::new();
        bridge.press_button(SnesButtons::L, 0);
        let before = bridge.player_state(0);

        for bits in [0x001, 0x0F0, 0x0FF, 0x800] {
            bridge.press_button(mask(bits), 0);
            bridge.release_button(mask(bits), 0);
            assert_eq!(bridge.player_state(0), before);
        }
    }

    #[test]
    fn test_press_is_idempotent() {
        let bridge = InputBridge::<Nes>::new();
        bridge.press_button(mask(0x09), 1);
        let once = bridge.snapshot();
        bridge.press_button(mask(0x09), 1);
        assert_eq!(bridge.snapshot(), once);
    }

    #[test]
    fn test_disjoint_presses_commute() {
        let first = InputBridge::<Nes>::new();
        first.press_button(NesButtons::A, 0);
        first.press_button(NesButtons::LEFT, 0);

        let second = InputBridge::<Nes>::new();
        second.press_button(NesButtons::LEFT, 0);
        second.press_button(NesButtons::A, 0);

        assert_eq!(held(&first, 0), 0x41);
        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn test_out_of_range_player_is_ignored() {
        let (latch, core) = attached_latch(2);
        let bridge = InputBridge::<Nes>::new();
        bridge.attach_core(core, SessionStart::Resume);
        bridge.press_button(mask(0x01), 0);
        let applies = latch.lock().unwrap().apply_count();
        let before = bridge.snapshot();

        bridge.press_button(mask(0xFF), 2);
        bridge.release_button(mask(0x01), 7);
        bridge.press_button(mask(0x02), usize::MAX);

        assert_eq!(bridge.snapshot(), before);
        assert_eq!(latch.lock().unwrap().apply_count(), applies);
    }

    #[test]
    fn test_invalid_high_bit_is_dropped() {
        let bridge = InputBridge::<SevenBit>::new();
        bridge.press_button(mask(0xFF), 0);
        assert_eq!(held(&bridge, 0), 0x7F);
        assert_eq!(
            bridge.player_state(0).unwrap().truncate_to::<SevenButtons>(),
            SevenButtons::all()
        );
    }

    #[test]
    fn test_invalid_bits_never_reach_core() {
        let (latch, core) = attached_latch(2);
        let bridge = InputBridge::<Snes>::new();
        bridge.attach_core(core, SessionStart::Resume);

        bridge.press_button(mask(0xF_F000 | 0x010), 1);
        assert_eq!(held(&bridge, 1), 0x010);
        assert_eq!(latch.lock().unwrap().slot(1), Some(mask(0x010)));
    }

    #[test]
    fn test_press_release_reset_sequence() {
        let bridge = InputBridge::<Nes>::new();
        bridge.press_button(mask(0x01), 0);
        bridge.press_button(mask(0x02), 0);
        bridge.release_button(mask(0x01), 0);
        assert_eq!(held(&bridge, 0), 0x02);

        bridge.reset_all_inputs();
        assert_eq!(held(&bridge, 0), 0x00);
    }

    #[test]
    fn test_reset_clears_every_player() {
        let (latch, core) = attached_latch(2);
        let bridge = InputBridge::<Nes>::new();
        bridge.attach_core(core, SessionStart::Resume);
        bridge.press_button(mask(0xFF), 0);
        bridge.press_button(mask(0x30), 1);

        bridge.reset_all_inputs();

        assert_eq!(held(&bridge, 0), 0);
        assert_eq!(held(&bridge, 1), 0);
        let latch = latch.lock().unwrap();
        assert_eq!(latch.slot(0), Some(ButtonMask::empty()));
        assert_eq!(latch.slot(1), Some(ButtonMask::empty()));
    }

    #[test]
    fn test_reset_without_core() {
        let bridge = InputBridge::<Nes>::new();
        bridge.press_button(mask(0x10), 0);
        bridge.reset_all_inputs();
        assert_eq!(held(&bridge, 0), 0);
        assert!(!bridge.is_core_attached());
    }

    #[test]
    fn test_forward_reaches_core_slot() {
        let (latch, core) = attached_latch(2);
        let bridge = InputBridge::<Nes>::new();
        bridge.attach_core(core, SessionStart::Resume);

        bridge.press_button(NesButtons::START | NesButtons::B, 1);
        assert_eq!(latch.lock().unwrap().slot(1), Some(mask(0x0A)));

        bridge.release_button(NesButtons::START, 1);
        assert_eq!(latch.lock().unwrap().slot(1), Some(mask(0x02)));
    }

    #[test]
    fn test_state_kept_while_detached() {
        let (_, first) = attached_latch(2);
        let bridge = InputBridge::<Nes>::new();
        bridge.attach_core(first, SessionStart::Resume);
        bridge.detach_core();
        assert!(!bridge.is_core_attached());

        bridge.press_button(NesButtons::RIGHT, 0);
        assert_eq!(held(&bridge, 0), 0x80);

        let (latch, second) = attached_latch(2);
        bridge.attach_core(second, SessionStart::Resume);
        assert_eq!(latch.lock().unwrap().slot(0), Some(mask(0x80)));
    }

    #[test]
    fn test_fresh_attach_clears_state() {
        let bridge = InputBridge::<Nes>::new();
        bridge.press_button(NesButtons::UP, 0);

        let (latch, core) = attached_latch(2);
        bridge.attach_core(core, SessionStart::Fresh);

        assert_eq!(held(&bridge, 0), 0);
        assert_eq!(latch.lock().unwrap().slot(0), Some(ButtonMask::empty()));
    }

    #[test]
    fn test_attach_returns_previous_core() {
        let (_, first) = attached_latch(2);
        let (_, second) = attached_latch(2);
        let bridge = InputBridge::<Nes>::new();

        assert!(bridge.attach_core(first.clone(), SessionStart::Resume).is_none());
        let previous = bridge.attach_core(second.clone(), SessionStart::Resume);
        assert!(previous.is_some_and(|core| Arc::ptr_eq(&core, &first)));
        assert!(bridge.is_attached_to(&second));
        assert!(!bridge.is_attached_to(&first));
    }

    #[test]
    fn test_shared_is_single_instance() {
        let addresses: Vec<usize> = (0..8)
            .map(|_| thread::spawn(|| InputBridge::<SevenBit>::shared() as *const _ as usize))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(std::ptr::eq(
            InputBridge::<SevenBit>::shared(),
            InputBridge::<SevenBit>::shared()
        ));
    }

    #[test]
    fn test_concurrent_disjoint_bits_converge() {
        const ROUNDS: usize = 500;
        let (latch, core) = attached_latch(2);
        let bridge = Arc::new(InputBridge::<Snes>::new());
        bridge.attach_core(core, SessionStart::Resume);

        // Thread `bit` ends on a press for even bits and a release for odd bits
        let handles: Vec<_> = (0..12u32)
            .map(|bit| {
                let bridge = Arc::clone(&bridge);
                thread::spawn(move || {
                    let mask = 1u32 << bit;
                    for _ in 0..ROUNDS {
                        bridge.press_button(mask, 0);
                        bridge.release_button(mask, 0);
                    }
                    if bit % 2 == 0 {
                        bridge.press_button(mask, 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(held(&bridge, 0), 0x555);
        assert_eq!(held(&bridge, 1), 0);
        assert_eq!(latch.lock().unwrap().slot(0), Some(mask(0x555)));
    }

    #[test]
    fn test_core_thread_never_sees_partial_event() {
        const EVENTS: usize = 2_000;
        const FRAMES: usize = 2_000;
        let chord = NesButtons::A | NesButtons::RIGHT;

        let recorder = Arc::new(Mutex::new(RecordingCore::default()));
        let core: SharedCore = recorder.clone();
        let bridge = Arc::new(InputBridge::<Nes>::new());
        bridge.attach_core(core.clone(), SessionStart::Resume);

        let writer = {
            let bridge = Arc::clone(&bridge);
            thread::spawn(move || {
                for _ in 0..EVENTS {
                    // Both chord bits plus one bit the core does not define
                    bridge.press_button(mask(0x1_0000) | ButtonMask::from(chord), 0);
                    bridge.release_button(chord, 0);
                }
            })
        };
        let frames = thread::spawn(move || {
            for _ in 0..FRAMES {
                core.lock().unwrap().run_frame();
                thread::yield_now();
            }
        });
        writer.join().unwrap();
        frames.join().unwrap();

        let recorder = recorder.lock().unwrap();
        assert_eq!(recorder.seen.len(), FRAMES);
        let chord = ButtonMask::from(chord);
        for (frame, seen) in recorder.seen.iter().enumerate() {
            assert!(
                *seen == ButtonMask::empty() || *seen == chord,
                "frame {frame} saw {seen}"
            );
        }
        assert_eq!(recorder.slot, ButtonMask::empty());
    }
}
