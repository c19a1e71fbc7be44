/// Frame pacing for an emulation thread
///
/// Implements a fixed timestep loop: the core executes exactly one frame per
/// tick regardless of how often the thread wakes up, with a cap on catch-up
/// so a stalled thread does not burst through dozens of frames.
use std::time::{Duration, Instant};

/// Target emulation rate (60 frames per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of frames executed per wake-up
const MAX_CATCH_UP_FRAMES: u32 = 5;

/// Frame loop timing state
pub struct FrameLoop {
    /// Accumulated time not yet spent on frames
    accumulator: Duration,

    /// Time of last wake-up
    last_tick_time: Instant,

    /// Whether emulation is paused
    paused: bool,

    /// Number of wake-ups
    tick_count: u64,

    /// Total frames due so far
    frames_due: u64,
}

impl FrameLoop {
    /// Create a new frame loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_tick_time: Instant::now(),
            paused: false,
            tick_count: 0,
            frames_due: 0,
        }
    }

    /// Begin a new wake-up, returns the number of frames to execute
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick_time);
        self.last_tick_time = now;
        self.tick_count += 1;

        // If paused, don't accumulate time for frames
        if self.paused {
            return 0;
        }

        self.accumulator += elapsed;

        let mut frames = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && frames < MAX_CATCH_UP_FRAMES {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            frames += 1;
        }

        // Drop whatever could not be caught up
        if frames == MAX_CATCH_UP_FRAMES && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!("Frame loop fell behind by {:?}", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        self.frames_due += frames as u64;
        frames
    }

    /// Time until the next frame is due
    pub fn time_to_next_frame(&self) -> Duration {
        FIXED_TIMESTEP_DURATION.saturating_sub(self.accumulator)
    }

    /// Get the fixed timestep (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get total number of wake-ups
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get total number of frames handed out by `tick`
    pub fn frames_due(&self) -> u64 {
        self.frames_due
    }

    /// Check if emulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause emulation
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Emulation paused");
        }
    }

    /// Resume emulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a frame burst
            self.accumulator = Duration::ZERO;
            log::info!("Emulation resumed");
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
