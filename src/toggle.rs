//! Button-to-output toggle controller.
//!
//! Provides [`ToggleController`], the polling loop that pairs button `i` with
//! output `i` and flips that output on every confirmed press.

use crate::debounce::Debouncer;
use crate::line::{DigitalInput, DigitalOutput, LineIndex};
use crate::output::OutputBank;
use crate::time::Timebase;

/// Toggles outputs in response to debounced button presses.
///
/// Owns the per-output state array. Neither the debouncer nor the output bank
/// ever see it: on a press the controller inverts the stored state and writes the
/// new value through the bank.
///
/// # Type Parameters
/// * `I` - Button input implementation type
/// * `T` - Timebase implementation type
/// * `O` - Output implementation type
/// * `N` - Number of buttons
/// * `M` - Number of outputs
pub struct ToggleController<I, T, O, const N: usize, const M: usize>
where
    I: DigitalInput,
    T: Timebase,
    O: DigitalOutput,
{
    debouncer: Debouncer<I, T, N>,
    outputs: OutputBank<O, M>,
    states: [bool; M],
}

impl<I, T, O, const N: usize, const M: usize> ToggleController<I, T, O, N, M>
where
    I: DigitalInput,
    T: Timebase,
    O: DigitalOutput,
{
    /// Creates a controller with every output turned off.
    pub fn new(debouncer: Debouncer<I, T, N>, outputs: OutputBank<O, M>) -> Self {
        Self::with_initial_states(debouncer, outputs, [false; M])
    }

    /// Creates a controller and drives each output to its initial state.
    pub fn with_initial_states(
        debouncer: Debouncer<I, T, N>,
        mut outputs: OutputBank<O, M>,
        states: [bool; M],
    ) -> Self {
        for (index, &on) in states.iter().enumerate() {
            outputs.set_output(LineIndex(index), on);
        }

        Self {
            debouncer,
            outputs,
            states,
        }
    }

    /// Runs one debounce cycle and toggles the matching output on a press.
    ///
    /// Blocks while a button is held. Returns the confirmed button index, even
    /// when no output is paired with it.
    pub fn poll(&mut self) -> Option<LineIndex> {
        let index = self.debouncer.read_button()?;

        if let Some(state) = self.states.get_mut(index.0) {
            *state = !*state;
            self.outputs.set_output(index, *state);

            #[cfg(feature = "defmt")]
            defmt::debug!("output {} -> {}", index, *state);
        }

        Some(index)
    }

    /// Polls forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    /// Returns the logical state of every output.
    pub fn states(&self) -> &[bool; M] {
        &self.states
    }

    /// Returns the logical state of the output at `index`, if any.
    pub fn state(&self, index: LineIndex) -> Option<bool> {
        self.states.get(index.0).copied()
    }

    /// Returns a reference to the debouncer.
    pub fn debouncer(&self) -> &Debouncer<I, T, N> {
        &self.debouncer
    }

    /// Returns a reference to the output bank.
    pub fn outputs(&self) -> &OutputBank<O, M> {
        &self.outputs
    }

    /// Consumes the controller, returning the debouncer and the output bank.
    pub fn release(self) -> (Debouncer<I, T, N>, OutputBank<O, M>) {
        (self.debouncer, self.outputs)
    }
}
