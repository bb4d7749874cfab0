#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Debouncer`**: Scans up to four active-low buttons and reports one index per press-release cycle
//! - **`OutputBank`**: Drives up to four LED or buzzer lines by index
//! - **`ToggleController`**: Pairs button `i` with output `i` and flips the output on each press
//! - **`Timebase`**: Trait to implement for your millisecond delay
//! - **`TickCounter`** / **`TickTimebase`**: Delay driven by a 1 ms tick interrupt
//! - **`BusyLoopTimebase`**: Delay driven by a calibrated spin
//! - **`DigitalInput`** / **`DigitalOutput`**: Traits to implement for your GPIO lines
//! - **`LineIndex`**: Position of a line within its bank
//! - **`LineConfig`** / **`BoardLayout`**: Startup configuration of every line
//!
//! Debounce timing is fixed: a candidate must stay low for [`SETTLE_MS`], after
//! which the release is polled every [`RELEASE_POLL_MS`].

pub mod config;
pub mod debounce;
pub mod line;
pub mod output;
pub mod tick;
pub mod time;
pub mod toggle;

pub use config::{
    BoardLayout, ConfigError, ConfigureLine, LayoutBuilder, LineConfig, OutputType, PinMode, Port,
    PortSet, Pull, Speed,
};
pub use debounce::{Debouncer, RELEASE_POLL_MS, SETTLE_MS};
pub use line::{DigitalInput, DigitalOutput, HalInput, HalOutput, LineIndex, MAX_LINES, Polarity};
pub use output::{OutputBank, OutputError};
pub use tick::{SYSTICK_MAX_RELOAD, TickConfigError, TickCounter, TickTimebase, systick_reload};
pub use time::{BusyLoopTimebase, HalDelay, SPINS_PER_MS_AT_168MHZ, Timebase};
pub use toggle::ToggleController;
