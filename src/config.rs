//! Startup line configuration.
//!
//! Every button, LED and buzzer line is described by one [`LineConfig`] value
//! and applied through the single [`ConfigureLine`] seam. A [`BoardLayout`]
//! collects the lines of a board, validates them once, and applies them in a
//! fixed order. Writing the actual registers is left to the platform.

use crate::line::MAX_LINES;
use heapless::Vec;

/// GPIO port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
}

impl Port {
    /// All ports in register order.
    pub const ALL: [Port; 9] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
        Port::I,
    ];

    /// Zero-based position of the port (A = 0).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Port letter, as printed on the board.
    pub const fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

/// Output slew rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 2 MHz
    Low,
    /// 25 MHz
    Medium,
    /// 50 MHz
    High,
    /// 100 MHz
    VeryHigh,
}

impl Speed {
    /// Maximum toggle frequency in Hz.
    pub const fn max_hz(self) -> u32 {
        match self {
            Speed::Low => 2_000_000,
            Speed::Medium => 25_000_000,
            Speed::High => 50_000_000,
            Speed::VeryHigh => 100_000_000,
        }
    }
}

/// Output driver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    PushPull,
    OpenDrain,
}

/// Internal pull resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Full electrical configuration of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineConfig {
    pub port: Port,
    pub pin: u8,
    pub mode: PinMode,
    pub speed: Speed,
    pub output_type: OutputType,
    pub pull: Pull,
}

impl LineConfig {
    /// Highest pin number on a port.
    pub const MAX_PIN: u8 = 15;

    /// Button input: high speed, no internal pull (buttons are pulled up externally).
    pub const fn button(port: Port, pin: u8) -> Self {
        Self {
            port,
            pin,
            mode: PinMode::Input,
            speed: Speed::VeryHigh,
            output_type: OutputType::PushPull,
            pull: Pull::None,
        }
    }

    /// LED output: high speed, push-pull, no pull.
    pub const fn led(port: Port, pin: u8) -> Self {
        Self {
            port,
            pin,
            mode: PinMode::Output,
            speed: Speed::VeryHigh,
            output_type: OutputType::PushPull,
            pull: Pull::None,
        }
    }

    /// Buzzer output: 50 MHz, push-pull, no pull.
    pub const fn buzzer(port: Port, pin: u8) -> Self {
        Self {
            port,
            pin,
            mode: PinMode::Output,
            speed: Speed::High,
            output_type: OutputType::PushPull,
            pull: Pull::None,
        }
    }

    /// Overrides the pull resistor.
    pub const fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    /// Overrides the speed.
    pub const fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Overrides the output type.
    pub const fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    /// Single-bit mask of the pin within its port.
    ///
    /// Expects a validated line (pin at most [`MAX_PIN`](Self::MAX_PIN)). Lines
    /// from [`LayoutBuilder`] always are; a hand-built line with a larger pin
    /// panics in debug builds.
    pub const fn pin_mask(&self) -> u16 {
        debug_assert!(self.pin <= Self::MAX_PIN, "pin out of range");
        1 << (self.pin & 0x0F)
    }

    fn same_line(&self, other: &LineConfig) -> bool {
        self.port == other.port && self.pin == other.pin
    }
}

/// Line configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin number above [`LineConfig::MAX_PIN`].
    InvalidPin { port: Port, pin: u8 },

    /// A button was not configured as input, or an output not as output.
    ModeMismatch { port: Port, pin: u8 },

    /// More than [`MAX_LINES`] buttons or outputs, or a second buzzer.
    CapacityExceeded,

    /// The same port and pin was used for two lines.
    DuplicateLine { port: Port, pin: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidPin { port, pin } => {
                write!(f, "pin P{}{} does not exist", port.letter(), pin)
            }
            ConfigError::ModeMismatch { port, pin } => {
                write!(f, "pin P{}{} has the wrong direction for its role", port.letter(), pin)
            }
            ConfigError::CapacityExceeded => {
                write!(f, "board layout capacity exceeded")
            }
            ConfigError::DuplicateLine { port, pin } => {
                write!(f, "pin P{}{} is used more than once", port.letter(), pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Trait for applying line configuration to hardware.
///
/// Implement this for your platform's GPIO and clock registers.
pub trait ConfigureLine {
    /// Enables the peripheral clock of a GPIO port.
    fn enable_port_clock(&mut self, port: Port);

    /// Writes mode, speed, output type and pull for one line.
    fn configure_line(&mut self, line: &LineConfig);
}

/// Set of GPIO ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortSet(u16);

impl PortSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        PortSet(0)
    }

    /// Adds a port to the set.
    pub fn insert(&mut self, port: Port) {
        self.0 |= 1 << port.index();
    }

    /// Returns true if the port is in the set.
    pub const fn contains(&self, port: Port) -> bool {
        self.0 & (1 << port.index()) != 0
    }

    /// Returns the number of ports in the set.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if the set is empty.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the ports in register order.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        let set = *self;
        Port::ALL.into_iter().filter(move |&port| set.contains(port))
    }
}

/// Validated set of lines for a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    buttons: Vec<LineConfig, MAX_LINES>,
    outputs: Vec<LineConfig, MAX_LINES>,
    buzzer: Option<LineConfig>,
}

impl BoardLayout {
    /// Creates a new layout builder.
    pub fn builder() -> LayoutBuilder {
        LayoutBuilder::new()
    }

    /// Pin map of the STM32F407 explorer board.
    ///
    /// Buttons PA0, PE2, PE3, PE4; LEDs PF9, PF10, PE13, PE14; buzzer PF8.
    pub fn explorer() -> Self {
        Self {
            buttons: [
                LineConfig::button(Port::A, 0),
                LineConfig::button(Port::E, 2),
                LineConfig::button(Port::E, 3),
                LineConfig::button(Port::E, 4),
            ]
            .into_iter()
            .collect(),
            outputs: [
                LineConfig::led(Port::F, 9),
                LineConfig::led(Port::F, 10),
                LineConfig::led(Port::E, 13),
                LineConfig::led(Port::E, 14),
            ]
            .into_iter()
            .collect(),
            buzzer: Some(LineConfig::buzzer(Port::F, 8)),
        }
    }

    /// Sets the pull resistor on every button line.
    ///
    /// For boards where the keys rely on the MCU's internal pull-ups.
    pub fn with_button_pull(mut self, pull: Pull) -> Self {
        for button in self.buttons.iter_mut() {
            *button = button.with_pull(pull);
        }
        self
    }

    /// Button lines in scan order.
    pub fn buttons(&self) -> &[LineConfig] {
        &self.buttons
    }

    /// Output lines in index order.
    pub fn outputs(&self) -> &[LineConfig] {
        &self.outputs
    }

    /// Buzzer line, if the board has one.
    pub fn buzzer(&self) -> Option<&LineConfig> {
        self.buzzer.as_ref()
    }

    /// All lines: buttons, then outputs, then the buzzer.
    pub fn lines(&self) -> impl Iterator<Item = &LineConfig> + '_ {
        self.buttons
            .iter()
            .chain(self.outputs.iter())
            .chain(self.buzzer.iter())
    }

    /// Ports used by any line.
    pub fn ports(&self) -> PortSet {
        let mut ports = PortSet::new();
        for line in self.lines() {
            ports.insert(line.port);
        }
        ports
    }

    /// Enables every used port clock once, then configures every line.
    pub fn apply<C: ConfigureLine>(&self, hw: &mut C) {
        for port in self.ports().iter() {
            hw.enable_port_clock(port);
        }
        for line in self.lines() {
            hw.configure_line(line);
        }
    }
}

/// Builder for constructing validated board layouts.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    buttons: Vec<LineConfig, MAX_LINES>,
    outputs: Vec<LineConfig, MAX_LINES>,
    buzzer: Option<LineConfig>,
}

impl LayoutBuilder {
    /// Creates an empty layout builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a button line. Its index is the number of buttons added before it.
    ///
    /// # Errors
    /// * `InvalidPin` - Pin number out of range
    /// * `ModeMismatch` - Line is not an input
    /// * `CapacityExceeded` - Already [`MAX_LINES`] buttons
    pub fn button(mut self, line: LineConfig) -> Result<Self, ConfigError> {
        check_line(&line, PinMode::Input)?;
        self.buttons
            .push(line)
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Adds an output line. Its index is the number of outputs added before it.
    ///
    /// # Errors
    /// * `InvalidPin` - Pin number out of range
    /// * `ModeMismatch` - Line is not an output
    /// * `CapacityExceeded` - Already [`MAX_LINES`] outputs
    pub fn output(mut self, line: LineConfig) -> Result<Self, ConfigError> {
        check_line(&line, PinMode::Output)?;
        self.outputs
            .push(line)
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Sets the buzzer line.
    ///
    /// # Errors
    /// * `InvalidPin` - Pin number out of range
    /// * `ModeMismatch` - Line is not an output
    /// * `CapacityExceeded` - A buzzer was already set
    pub fn buzzer(mut self, line: LineConfig) -> Result<Self, ConfigError> {
        check_line(&line, PinMode::Output)?;
        if self.buzzer.is_some() {
            return Err(ConfigError::CapacityExceeded);
        }
        self.buzzer = Some(line);
        Ok(self)
    }

    /// Builds the layout.
    ///
    /// # Errors
    /// * `DuplicateLine` - Two lines share a port and pin
    pub fn build(self) -> Result<BoardLayout, ConfigError> {
        let layout = BoardLayout {
            buttons: self.buttons,
            outputs: self.outputs,
            buzzer: self.buzzer,
        };

        for (i, line) in layout.lines().enumerate() {
            if layout.lines().skip(i + 1).any(|other| line.same_line(other)) {
                return Err(ConfigError::DuplicateLine {
                    port: line.port,
                    pin: line.pin,
                });
            }
        }

        Ok(layout)
    }
}

fn check_line(line: &LineConfig, mode: PinMode) -> Result<(), ConfigError> {
    if line.pin > LineConfig::MAX_PIN {
        return Err(ConfigError::InvalidPin {
            port: line.port,
            pin: line.pin,
        });
    }
    if line.mode != mode {
        return Err(ConfigError::ModeMismatch {
            port: line.port,
            pin: line.pin,
        });
    }
    Ok(())
}
