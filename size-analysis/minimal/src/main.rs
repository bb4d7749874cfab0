#![no_std]
#![no_main]

use button_toggle::{
    BoardLayout, BusyLoopTimebase, ConfigureLine, Debouncer, DigitalInput, DigitalOutput,
    LineConfig, OutputBank, Polarity, Port, TickCounter, TickTimebase, ToggleController,
};
use cortex_m_rt::entry;
use panic_halt as _;

// ============================================================================
// Minimal Line Implementations
// ============================================================================

/// Zero-size input that reads an opaque level
pub struct MinimalInput;

impl DigitalInput for MinimalInput {
    fn is_high(&mut self) -> bool {
        core::hint::black_box(true)
    }
}

/// Zero-size output for measuring library overhead
pub struct MinimalOutput;

impl DigitalOutput for MinimalOutput {
    fn set_level(&mut self, high: bool) {
        core::hint::black_box(high);
    }
}

/// Configurator that writes nothing
pub struct MinimalConfigurator;

impl ConfigureLine for MinimalConfigurator {
    fn enable_port_clock(&mut self, port: Port) {
        core::hint::black_box(port);
    }

    fn configure_line(&mut self, line: &LineConfig) {
        core::hint::black_box(line);
    }
}

static TICKS: TickCounter = TickCounter::new();

#[cortex_m_rt::exception]
fn SysTick() {
    TICKS.tick();
}

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn exercise_library() {
    BoardLayout::explorer().apply(&mut MinimalConfigurator);

    // Tick-driven controller with four buttons and four LEDs
    let debouncer = Debouncer::new(
        [MinimalInput, MinimalInput, MinimalInput, MinimalInput],
        TickTimebase::new(&TICKS),
    );
    let leds = OutputBank::with_polarity(
        [MinimalOutput, MinimalOutput, MinimalOutput, MinimalOutput],
        Polarity::ActiveLow,
    );
    let mut controller = ToggleController::new(debouncer, leds);
    core::hint::black_box(controller.poll());

    // Busy-loop debouncer on its own
    let mut debouncer = Debouncer::new([MinimalInput], BusyLoopTimebase::default());
    core::hint::black_box(debouncer.read_button());
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    exercise_library();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
