//! Low-latency input injection into emulation cores.
//!
//! Each supported core gets one process-wide [`bridge::InputBridge`] that owns
//! the held-button registers for every controller port and forwards them into
//! the core's input slot before its next frame.

pub mod bridge;
pub mod host;
pub mod systems;

pub use bridge::{ButtonMask, InputBridge, InputError, SessionStart};
pub use systems::SystemId;
