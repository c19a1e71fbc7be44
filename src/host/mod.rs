// Execution side: frame pacing and a reference core, used by the demo and tests

pub mod core_thread;
pub mod frame_loop;
pub mod latch_core;

pub use core_thread::CoreThread;
pub use frame_loop::FrameLoop;
pub use latch_core::LatchCore;
