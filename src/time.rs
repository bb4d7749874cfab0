//! Millisecond timebase abstraction.
//!
//! The debounce engine only needs to block for a number of milliseconds. Two
//! realizations are provided: [`TickTimebase`](crate::tick::TickTimebase),
//! driven by a 1 ms tick interrupt, and [`BusyLoopTimebase`], a calibrated
//! spin. Any `embedded-hal` delay can be used through [`HalDelay`].

use embedded_hal::delay::DelayNs;

/// Trait for abstracting blocking millisecond delays.
pub trait Timebase {
    /// Blocks for at least `duration_ms` milliseconds.
    ///
    /// Cannot fail. Only one caller may be sleeping on a given timebase at a time.
    fn sleep_ms(&mut self, duration_ms: u32);
}

impl<T: Timebase + ?Sized> Timebase for &mut T {
    #[inline]
    fn sleep_ms(&mut self, duration_ms: u32) {
        (**self).sleep_ms(duration_ms)
    }
}

/// Reference calibration: spin iterations per millisecond at 168 MHz.
pub const SPINS_PER_MS_AT_168MHZ: u32 = 32_000;

const REFERENCE_CORE_HZ: u32 = 168_000_000;

/// Busy-loop timebase with an empirically calibrated inner spin.
///
/// Accuracy depends on the core clock, flash wait states and optimization level.
/// Not suitable where precise timing matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyLoopTimebase {
    spins_per_ms: u32,
}

impl BusyLoopTimebase {
    /// Creates a timebase spinning `spins_per_ms` iterations per millisecond.
    pub const fn new(spins_per_ms: u32) -> Self {
        Self { spins_per_ms }
    }

    /// Scales the reference calibration to another core clock.
    ///
    /// Never returns a zero iteration count.
    pub const fn for_core_clock(core_hz: u32) -> Self {
        let spins = (SPINS_PER_MS_AT_168MHZ as u64 * core_hz as u64) / REFERENCE_CORE_HZ as u64;
        let spins = if spins == 0 {
            1
        } else if spins > u32::MAX as u64 {
            u32::MAX
        } else {
            spins as u32
        };
        Self::new(spins)
    }

    /// Returns the calibrated iterations per millisecond.
    pub const fn spins_per_ms(&self) -> u32 {
        self.spins_per_ms
    }
}

impl Default for BusyLoopTimebase {
    fn default() -> Self {
        Self::new(SPINS_PER_MS_AT_168MHZ)
    }
}

impl Timebase for BusyLoopTimebase {
    fn sleep_ms(&mut self, duration_ms: u32) {
        for _ in 0..duration_ms {
            for _ in 0..self.spins_per_ms {
                core::hint::spin_loop();
            }
        }
    }
}

/// Wraps an `embedded-hal` delay provider as a [`Timebase`].
#[derive(Debug)]
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> Timebase for HalDelay<D> {
    fn sleep_ms(&mut self, duration_ms: u32) {
        self.0.delay_ms(duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_reference_calibration() {
        assert_eq!(BusyLoopTimebase::default().spins_per_ms(), 32_000);
        assert_eq!(
            BusyLoopTimebase::for_core_clock(168_000_000).spins_per_ms(),
            32_000
        );
    }

    #[test]
    fn calibration_scales_with_core_clock() {
        assert_eq!(BusyLoopTimebase::for_core_clock(84_000_000).spins_per_ms(), 16_000);
        assert_eq!(BusyLoopTimebase::for_core_clock(16_000_000).spins_per_ms(), 3_047);
    }

    #[test]
    fn calibration_never_drops_to_zero() {
        assert_eq!(BusyLoopTimebase::for_core_clock(0).spins_per_ms(), 1);
        assert_eq!(BusyLoopTimebase::for_core_clock(1_000).spins_per_ms(), 1);
    }

    #[test]
    fn busy_loop_returns() {
        let mut timebase = BusyLoopTimebase::new(10);
        timebase.sleep_ms(0);
        timebase.sleep_ms(5);
    }

    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn hal_delay_forwards_milliseconds() {
        let mut timebase = HalDelay(CountingDelay { total_ns: 0 });
        timebase.sleep_ms(20);
        timebase.sleep_ms(10);
        assert_eq!(timebase.0.total_ns, 30_000_000);
    }

    #[test]
    fn hal_delay_handles_a_minute_without_overflow() {
        let mut timebase = HalDelay(CountingDelay { total_ns: 0 });
        timebase.sleep_ms(60_000);
        assert_eq!(timebase.0.total_ns, 60_000_000_000);
    }
}
