//! Interrupt-driven millisecond timebase.
//!
//! A [`TickCounter`] lives in a `static` and is advanced by a 1 ms periodic
//! interrupt (SysTick on Cortex-M) calling [`TickCounter::tick`]. A
//! [`TickTimebase`] arms the counter's countdown and spins until the handler
//! has drained it.
//!
//! ```ignore
//! static TICKS: TickCounter = TickCounter::new();
//!
//! #[exception]
//! fn SysTick() {
//!     TICKS.tick();
//! }
//!
//! let timebase = TickTimebase::new(&TICKS);
//! ```

use crate::time::Timebase;
use core::cell::Cell;
use critical_section::Mutex;

/// Largest value the 24-bit SysTick reload register accepts.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Tick source configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickConfigError {
    /// A 1 ms period at this core clock does not fit the reload register.
    ReloadOutOfRange {
        /// Core clock in Hz
        core_hz: u32,
    },
}

impl core::fmt::Display for TickConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TickConfigError::ReloadOutOfRange { core_hz } => {
                write!(
                    f,
                    "cannot derive a 1 ms tick from a {} Hz core clock",
                    core_hz
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TickConfigError {}

/// Computes the SysTick reload value for a 1 ms tick.
///
/// # Errors
/// * `ReloadOutOfRange` - The clock is below 1 kHz or the period exceeds 24 bits
pub const fn systick_reload(core_hz: u32) -> Result<u32, TickConfigError> {
    let ticks = core_hz / 1_000;
    if ticks == 0 || ticks - 1 > SYSTICK_MAX_RELOAD {
        return Err(TickConfigError::ReloadOutOfRange { core_hz });
    }
    Ok(ticks - 1)
}

/// Millisecond counter shared between the tick interrupt and the foreground.
///
/// Holds a countdown consumed by [`TickTimebase::sleep_ms`] and a wrapping
/// uptime. Both are only ever touched inside a critical section.
pub struct TickCounter {
    remaining: Mutex<Cell<u32>>,
    uptime: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// Creates a counter with no countdown armed and zero uptime.
    pub const fn new() -> Self {
        Self {
            remaining: Mutex::new(Cell::new(0)),
            uptime: Mutex::new(Cell::new(0)),
        }
    }

    /// Advances the counter by one millisecond.
    ///
    /// Call this from the 1 ms tick interrupt handler. Decrements the countdown
    /// if it is nonzero.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let remaining = self.remaining.borrow(cs);
            let current = remaining.get();
            if current > 0 {
                remaining.set(current - 1);
            }

            let uptime = self.uptime.borrow(cs);
            uptime.set(uptime.get().wrapping_add(1));
        });
    }

    /// Milliseconds since the counter started ticking. Wraps after ~49.7 days.
    pub fn uptime_ms(&self) -> u32 {
        critical_section::with(|cs| self.uptime.borrow(cs).get())
    }

    pub(crate) fn arm(&self, duration_ms: u32) {
        critical_section::with(|cs| self.remaining.borrow(cs).set(duration_ms));
    }

    pub(crate) fn remaining(&self) -> u32 {
        critical_section::with(|cs| self.remaining.borrow(cs).get())
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Timebase that waits on a [`TickCounter`].
///
/// If the tick interrupt never fires, `sleep_ms` never returns.
#[derive(Clone, Copy)]
pub struct TickTimebase<'t> {
    counter: &'t TickCounter,
}

impl<'t> TickTimebase<'t> {
    /// Creates a timebase bound to a tick counter.
    pub const fn new(counter: &'t TickCounter) -> Self {
        Self { counter }
    }

    /// Milliseconds since the underlying counter started ticking.
    pub fn uptime_ms(&self) -> u32 {
        self.counter.uptime_ms()
    }
}

impl Timebase for TickTimebase<'_> {
    fn sleep_ms(&mut self, duration_ms: u32) {
        self.counter.arm(duration_ms);
        while self.counter.remaining() != 0 {
            core::hint::spin_loop();
        }
    }
}
