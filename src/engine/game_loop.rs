/// Frame clock for the simulation
///
/// Converts host frame durations into a whole number of fixed simulation
/// ticks. The simulation itself never looks at wall time: every timer in the
/// core counts ticks, so a test can step it deterministically.
use std::time::{Duration, Instant};

/// Simulation ticks per second
pub const TICKS_PER_SECOND: u32 = 60;

/// Length of one simulation tick
pub const FIXED_TIMESTEP: Duration = Duration::from_micros(16_667);

/// Maximum number of ticks run for a single host frame to prevent spiral of death
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Convert a duration in milliseconds to whole ticks (rounded down)
pub const fn ticks_from_millis(millis: u32) -> u32 {
    millis * TICKS_PER_SECOND / 1000
}

/// Fixed-step accumulator driven by the host's frame callback
#[derive(Debug)]
pub struct GameLoop {
    /// Accumulated time not yet consumed by ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Frames seen
    frame_count: u64,

    /// Ticks handed out
    tick_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Begin a new host frame using the wall clock, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of host time, returns the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP;
            ticks += 1;
        }

        // Time we could not catch up on is dropped rather than replayed later
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP {
            log::debug!(
                "Frame clock behind by {:?}, dropping backlog",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a burst of catch-up ticks
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
