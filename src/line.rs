//! Digital line abstractions and identifiers.
//!
//! Provides [`LineIndex`] for addressing a line within a bank, the
//! [`DigitalInput`] and [`DigitalOutput`] traits for hardware abstraction,
//! and adapters for `embedded-hal` pins.

use embedded_hal::digital::{InputPin, OutputPin};

/// Maximum number of lines in a button or output bank.
pub const MAX_LINES: usize = 4;

/// Position of a line within its bank.
///
/// Buttons and outputs are addressed by their position in the array they were
/// configured with. Button `i` is paired with output `i` by the toggle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineIndex(pub usize);

impl LineIndex {
    /// Returns the index as a `usize`.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for LineIndex {
    fn from(index: usize) -> Self {
        LineIndex(index)
    }
}

impl From<LineIndex> for usize {
    fn from(index: LineIndex) -> Self {
        index.0
    }
}

/// Trait for reading the electrical level of an input line.
///
/// Implement this for your button hardware. Pull resistors must already be
/// configured. Reads cannot fail; handle hardware errors internally.
pub trait DigitalInput {
    /// Returns `true` if the line is at logic 1.
    fn is_high(&mut self) -> bool;

    /// Returns `true` if the line is at logic 0.
    #[inline]
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Trait for driving an output line.
///
/// Implement this for your LED or buzzer hardware. Writes cannot fail; handle
/// hardware errors internally.
pub trait DigitalOutput {
    /// Drives the line high (`true`) or low (`false`).
    fn set_level(&mut self, high: bool);
}

impl<T: DigitalInput + ?Sized> DigitalInput for &mut T {
    #[inline]
    fn is_high(&mut self) -> bool {
        (**self).is_high()
    }
}

impl<T: DigitalOutput + ?Sized> DigitalOutput for &mut T {
    #[inline]
    fn set_level(&mut self, high: bool) {
        (**self).set_level(high)
    }
}

/// Electrical level that turns an output on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Line driven high when on.
    #[default]
    ActiveHigh,
    /// Line driven low when on (LED sinking current into the pin).
    ActiveLow,
}

impl Polarity {
    /// Returns the line level for the given logical state.
    #[inline]
    pub const fn level(self, on: bool) -> bool {
        match self {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        }
    }
}

/// Wraps an `embedded-hal` input pin as a [`DigitalInput`].
///
/// A failed read is reported as high. With active-low buttons this reads as
/// "released", so a faulty pin never produces a press.
#[derive(Debug)]
pub struct HalInput<P>(pub P);

impl<P: InputPin> DigitalInput for HalInput<P> {
    fn is_high(&mut self) -> bool {
        self.0.is_high().unwrap_or(true)
    }
}

/// Wraps an `embedded-hal` output pin as a [`DigitalOutput`].
///
/// Write errors are dropped.
#[derive(Debug)]
pub struct HalOutput<P>(pub P);

impl<P: OutputPin> DigitalOutput for HalOutput<P> {
    fn set_level(&mut self, high: bool) {
        let _ = if high {
            self.0.set_high()
        } else {
            self.0.set_low()
        };
    }
}
