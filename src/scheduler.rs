use std::time::Duration;

use crate::config::{MAX_TICK_RATE, MIN_TICK_RATE};

/// Fixed-timestep driver: turns frame timestamps into a whole number of ticks.
///
/// Elapsed frame time is banked in an accumulator and spent one tick interval at a
/// time, so the simulation runs at `tick_rate` whatever the display refresh rate is.
pub struct Scheduler {
    tick_rate: u32,
    tick_interval: Duration,
    accumulator: Duration,
    last_frame: Option<Duration>,
    running: bool,
}

impl Scheduler {
    /// Create a paused scheduler
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.clamp(MIN_TICK_RATE, MAX_TICK_RATE);
        Self {
            tick_rate,
            tick_interval: interval_for(tick_rate),
            accumulator: Duration::ZERO,
            last_frame: None,
            running: false,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Change the tick rate, clamped to `MIN_TICK_RATE..=MAX_TICK_RATE`.
    /// Time already banked is kept as is.
    pub fn set_tick_rate(&mut self, tick_rate: u32) {
        self.tick_rate = tick_rate.clamp(MIN_TICK_RATE, MAX_TICK_RATE);
        self.tick_interval = interval_for(self.tick_rate);
        log::debug!("Tick rate set to {}/s", self.tick_rate);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start or resume. Only timing state is reset; the next frame sees no elapsed time.
    pub fn start(&mut self) {
        self.running = true;
        self.last_frame = None;
        self.accumulator = Duration::ZERO;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Flip between running and paused; returns the new state
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
        self.running
    }

    /// Account for a frame at time `now` and call `step` once per whole tick interval
    /// that has accumulated. Returns how many ticks ran.
    pub fn frame(&mut self, now: Duration, mut step: impl FnMut()) -> u32 {
        if !self.running {
            return 0;
        }

        let last = *self.last_frame.get_or_insert(now);
        self.accumulator += now.saturating_sub(last);
        self.last_frame = Some(now);

        let mut ticks = 0;
        while self.accumulator >= self.tick_interval {
            step();
            self.accumulator -= self.tick_interval;
            ticks += 1;
        }
        ticks
    }
}

fn interval_for(tick_rate: u32) -> Duration {
    Duration::from_secs(1) / tick_rate
}
