//! Blocking push-button debouncer.
//!
//! Provides [`Debouncer`], which scans a fixed bank of active-low buttons and
//! reports each physical press exactly once, after the button is released.

use crate::line::{DigitalInput, LineIndex, MAX_LINES};
use crate::time::Timebase;

/// Time a candidate must stay low before the press is confirmed.
pub const SETTLE_MS: u32 = 20;

/// Interval between reads while waiting for release.
pub const RELEASE_POLL_MS: u32 = 10;

/// Scans a bank of active-low buttons and confirms presses.
///
/// Each [`read_button`](Self::read_button) call starts from scratch: no state is
/// carried between calls. The call blocks for as long as a confirmed button is
/// held, with no upper bound.
///
/// # Type Parameters
/// * `P` - Button input implementation type
/// * `T` - Timebase implementation type
/// * `N` - Number of buttons (at most [`MAX_LINES`])
pub struct Debouncer<P: DigitalInput, T: Timebase, const N: usize> {
    buttons: [P; N],
    timebase: T,
}

impl<P: DigitalInput, T: Timebase, const N: usize> Debouncer<P, T, N> {
    /// Creates a debouncer over the given buttons, scanned in array order.
    pub fn new(buttons: [P; N], timebase: T) -> Self {
        const { assert!(N <= MAX_LINES, "at most MAX_LINES buttons are supported") };
        Self { buttons, timebase }
    }

    /// Returns the index of a confirmed press, or `None`.
    ///
    /// 1. Buttons are scanned in index order; the first one reading low is the candidate.
    /// 2. No button low: returns `None` at once without sleeping.
    /// 3. Sleeps [`SETTLE_MS`] and re-reads the candidate only.
    /// 4. Candidate back high: returns `None`. The candidate is dropped, not retried.
    /// 5. Otherwise polls the candidate every [`RELEASE_POLL_MS`] until it reads high,
    ///    then returns its index. A button stuck low blocks here forever.
    pub fn read_button(&mut self) -> Option<LineIndex> {
        let candidate = self.scan()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("button {} low, settling", candidate);

        self.timebase.sleep_ms(SETTLE_MS);
        let button = &mut self.buttons[candidate.0];
        if button.is_high() {
            #[cfg(feature = "defmt")]
            defmt::debug!("button {} rejected as noise", candidate);
            return None;
        }

        loop {
            self.timebase.sleep_ms(RELEASE_POLL_MS);
            if button.is_high() {
                break;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("button {} pressed and released", candidate);

        Some(candidate)
    }

    /// Returns the number of buttons in the bank.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns true if the bank has no buttons.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns a reference to the timebase.
    pub fn timebase(&self) -> &T {
        &self.timebase
    }

    /// Returns a mutable reference to the button at `index`, if any.
    pub fn button_mut(&mut self, index: LineIndex) -> Option<&mut P> {
        self.buttons.get_mut(index.0)
    }

    /// Consumes the debouncer, returning the buttons and the timebase.
    pub fn release(self) -> ([P; N], T) {
        (self.buttons, self.timebase)
    }

    fn scan(&mut self) -> Option<LineIndex> {
        self.buttons
            .iter_mut()
            .position(|button| button.is_low())
            .map(LineIndex)
    }
}
