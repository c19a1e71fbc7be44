// Dedicated emulation thread driving one core

use super::frame_loop::FrameLoop;
use crate::bridge::{lock_recover, SharedCore};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Upper bound on one sleep so `stop` is noticed quickly
const MAX_IDLE: Duration = Duration::from_millis(4);

/// Flags shared between the handle and the thread
#[derive(Debug)]
struct Control {
    running: AtomicBool,
    paused: AtomicBool,
}

/// Handle to a thread that executes a core's frames at a fixed rate
///
/// Each due frame is executed with the core's lock held, which is the only
/// point where the core reads its input slots.
pub struct CoreThread {
    name: String,
    control: Arc<Control>,
    handle: Option<JoinHandle<u64>>,
}

impl CoreThread {
    /// Spawn the emulation thread for `core`
    pub fn spawn(name: impl Into<String>, core: SharedCore) -> io::Result<Self> {
        let name = name.into();
        let control = Arc::new(Control {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        });

        let thread_control = Arc::clone(&control);
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(core, &thread_control))?;

        log::info!("Core thread '{name}' started");
        Ok(Self {
            name,
            control,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop executing frames until `resume`
    pub fn pause(&self) {
        self.control.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.control.paused.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.control.paused.load(Ordering::Acquire)
    }

    /// Stop the thread and wait for it. Returns the number of frames executed.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        self.control.running.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return 0;
        };

        match handle.join() {
            Ok(frames) => {
                log::info!("Core thread '{}' stopped after {frames} frames", self.name);
                frames
            }
            Err(_) => {
                log::warn!("Core thread '{}' panicked", self.name);
                0
            }
        }
    }
}

impl Drop for CoreThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(core: SharedCore, control: &Control) -> u64 {
    let mut frame_loop = FrameLoop::new();
    let mut frames = 0u64;

    while control.running.load(Ordering::Acquire) {
        let paused = control.paused.load(Ordering::Acquire);
        if paused != frame_loop.is_paused() {
            if paused {
                frame_loop.pause();
            } else {
                frame_loop.resume();
            }
        }

        for _ in 0..frame_loop.tick() {
            lock_recover(&core).run_frame();
            frames += 1;
        }

        thread::sleep(frame_loop.time_to_next_frame().min(MAX_IDLE));
    }

    log::debug!(
        "Frame loop woke {} times for {} due frames",
        frame_loop.tick_count(),
        frame_loop.frames_due()
    );
    frames
}
