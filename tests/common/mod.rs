//! Shared test infrastructure for button-toggle integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use button_toggle::{DigitalInput, DigitalOutput, Timebase};
use core::cell::Cell;

// ============================================================================
// Simulated Clock
// ============================================================================

/// Millisecond clock shared by the simulated timebase and scripted lines
pub struct SimClock {
    now_ms: Cell<u32>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0),
        }
    }

    pub fn now(&self) -> u32 {
        self.now_ms.get()
    }

    pub fn advance(&self, duration_ms: u32) {
        self.now_ms.set(self.now_ms.get() + duration_ms);
    }
}

// ============================================================================
// Mock Timebase
// ============================================================================

/// Timebase that advances the simulated clock instead of blocking
pub struct SimTimebase<'c> {
    clock: &'c SimClock,
    sleeps: heapless::Vec<u32, 64>,
    sleep_count: usize,
}

impl<'c> SimTimebase<'c> {
    pub fn new(clock: &'c SimClock) -> Self {
        Self {
            clock,
            sleeps: heapless::Vec::new(),
            sleep_count: 0,
        }
    }

    /// First 64 sleep durations, in call order
    pub fn sleeps(&self) -> &[u32] {
        &self.sleeps
    }

    pub fn sleep_count(&self) -> usize {
        self.sleep_count
    }
}

impl Timebase for SimTimebase<'_> {
    fn sleep_ms(&mut self, duration_ms: u32) {
        self.clock.advance(duration_ms);
        self.sleep_count += 1;
        let _ = self.sleeps.push(duration_ms);
    }
}

// ============================================================================
// Mock Button
// ============================================================================

/// Active-low button whose level follows a script over simulated time
///
/// The line reads low while `start <= now < end` for any scripted press.
pub struct ScriptedButton<'c> {
    clock: &'c SimClock,
    presses: heapless::Vec<(u32, u32), 8>,
    reads: usize,
}

impl<'c> ScriptedButton<'c> {
    /// A button that is never pressed
    pub fn idle(clock: &'c SimClock) -> Self {
        Self {
            clock,
            presses: heapless::Vec::new(),
            reads: 0,
        }
    }

    /// A button held low from `start` until `end` (exclusive)
    pub fn pressed_between(clock: &'c SimClock, start: u32, end: u32) -> Self {
        Self::idle(clock).and_pressed_between(start, end)
    }

    pub fn and_pressed_between(mut self, start: u32, end: u32) -> Self {
        self.presses.push((start, end)).unwrap();
        self
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl DigitalInput for ScriptedButton<'_> {
    fn is_high(&mut self) -> bool {
        self.reads += 1;
        let now = self.clock.now();
        !self
            .presses
            .iter()
            .any(|&(start, end)| start <= now && now < end)
    }
}

// ============================================================================
// Mock Output
// ============================================================================

/// Output line that records every level written to it
pub struct RecordingOutput {
    high: bool,
    history: heapless::Vec<bool, 32>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self {
            high: false,
            history: heapless::Vec::new(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }
}

impl DigitalOutput for RecordingOutput {
    fn set_level(&mut self, high: bool) {
        self.high = high;
        let _ = self.history.push(high);
    }
}

/// Four idle outputs
pub fn outputs4() -> [RecordingOutput; 4] {
    core::array::from_fn(|_| RecordingOutput::new())
}
