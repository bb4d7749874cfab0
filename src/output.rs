//! Indexed digital output bank.

use crate::line::{DigitalOutput, LineIndex, MAX_LINES, Polarity};

/// Errors that can occur when addressing an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// The index does not name an output in the bank.
    IndexOutOfRange {
        /// The requested index
        index: LineIndex,
        /// Number of outputs in the bank
        len: usize,
    },
}

impl core::fmt::Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OutputError::IndexOutOfRange { index, len } => {
                write!(
                    f,
                    "output index {} out of range for bank of {}",
                    index.0, len
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutputError {}

/// A fixed bank of LED or buzzer outputs addressed by [`LineIndex`].
///
/// The bank does not remember what it was told; callers own the logical state.
///
/// # Type Parameters
/// * `P` - Output implementation type
/// * `N` - Number of outputs (at most [`MAX_LINES`])
pub struct OutputBank<P: DigitalOutput, const N: usize> {
    outputs: [P; N],
    polarity: Polarity,
}

impl<P: DigitalOutput, const N: usize> OutputBank<P, N> {
    /// Creates an active-high output bank. Line levels are left untouched.
    pub fn new(outputs: [P; N]) -> Self {
        Self::with_polarity(outputs, Polarity::ActiveHigh)
    }

    /// Creates an output bank with the given polarity. Line levels are left untouched.
    pub fn with_polarity(outputs: [P; N], polarity: Polarity) -> Self {
        const { assert!(N <= MAX_LINES, "at most MAX_LINES outputs are supported") };
        Self { outputs, polarity }
    }

    /// Turns the output at `index` on or off.
    ///
    /// An index outside the bank is ignored.
    pub fn set_output(&mut self, index: LineIndex, on: bool) {
        let _ = self.try_set_output(index, on);
    }

    /// Turns the output at `index` on or off, reporting unknown indices.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - No output at `index`; no line is touched
    pub fn try_set_output(&mut self, index: LineIndex, on: bool) -> Result<(), OutputError> {
        let output = self
            .outputs
            .get_mut(index.0)
            .ok_or(OutputError::IndexOutOfRange { index, len: N })?;
        output.set_level(self.polarity.level(on));
        Ok(())
    }

    /// Returns the bank's polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns the number of outputs in the bank.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns true if the bank has no outputs.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns a reference to the output at `index`, if any.
    pub fn output(&self, index: LineIndex) -> Option<&P> {
        self.outputs.get(index.0)
    }

    /// Consumes the bank, returning the outputs.
    pub fn release(self) -> [P; N] {
        self.outputs
    }
}
