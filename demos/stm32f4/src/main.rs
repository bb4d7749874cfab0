//! Four keys toggle four LEDs on an STM32F407 explorer board.
//!
//! Each key press, confirmed after release, flips the LED with the same index.

#![no_std]
#![no_main]

use button_toggle::{Debouncer, OutputBank, Polarity, TickCounter, TickTimebase, ToggleController};
use cortex_m_rt::entry;
use panic_halt as _;
use rtt_target::{rprintln, rtt_init_print};

mod hardware_setup;

static TICKS: TickCounter = TickCounter::new();

/// SysTick interrupt handler - called every 1ms
#[cortex_m_rt::exception]
fn SysTick() {
    TICKS.tick();
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("=== Button Toggle Demo ===");

    let hw = hardware_setup::init_hardware();
    rprintln!("Hardware initialized successfully");

    let debouncer = Debouncer::new(hw.keys, TickTimebase::new(&TICKS));
    let leds = OutputBank::with_polarity(hw.leds, Polarity::ActiveLow);
    let mut controller = ToggleController::new(debouncer, leds);

    rprintln!("=== System Ready ===");
    rprintln!("Press KEY0..KEY3 to toggle LED0..LED3");

    controller.run()
}
