use button_toggle::{
    BoardLayout, ConfigureLine, DigitalInput, DigitalOutput, LineConfig, OutputType, PinMode,
    Port, Pull, Speed, systick_reload,
};
use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};
use rtt_target::rprintln;
use stm32f4xx_hal::{
    pac::{self, gpioa::RegisterBlock},
    prelude::*,
    rcc::Clocks,
};

/// Distance between consecutive GPIO port register blocks
const GPIO_PORT_STRIDE: usize = 0x400;

/// Button input (active low)
pub type Key = RegisterLine;

/// LED output (active low, the LED sinks into the pin)
pub type Led = RegisterLine;

/// Container for all initialized hardware peripherals
pub struct HardwareContext {
    pub keys: [Key; 4],
    pub leds: [Led; 4],
}

/// One GPIO line, read through IDR and written through BSRR
pub struct RegisterLine {
    regs: &'static RegisterBlock,
    mask: u32,
}

impl RegisterLine {
    /// Binds a configured line to its port registers
    pub fn new(line: &LineConfig) -> Self {
        Self {
            regs: port_registers(line.port),
            mask: u32::from(line.pin_mask()),
        }
    }
}

impl DigitalInput for RegisterLine {
    fn is_high(&mut self) -> bool {
        self.regs.idr().read().bits() & self.mask != 0
    }
}

impl DigitalOutput for RegisterLine {
    fn set_level(&mut self, high: bool) {
        // BSRR: low half sets, high half resets
        let bits = if high { self.mask } else { self.mask << 16 };
        self.regs.bsrr().write(|w| unsafe { w.bits(bits) });
    }
}

/// Applies [`LineConfig`]s straight to the RCC and GPIO registers
pub struct RegisterConfigurator<'a> {
    rcc: &'a pac::RCC,
}

impl ConfigureLine for RegisterConfigurator<'_> {
    fn enable_port_clock(&mut self, port: Port) {
        // GPIOAEN..GPIOIEN are AHB1ENR bits 0..8
        let bit = 1u32 << port.index();
        self.rcc
            .ahb1enr()
            .modify(|r, w| unsafe { w.bits(r.bits() | bit) });
    }

    fn configure_line(&mut self, line: &LineConfig) {
        let regs = port_registers(line.port);
        let pin = u32::from(line.pin);

        let mode = match line.mode {
            PinMode::Input => 0b00,
            PinMode::Output => 0b01,
        };
        let speed = match line.speed {
            Speed::Low => 0b00,
            Speed::Medium => 0b01,
            Speed::High => 0b10,
            Speed::VeryHigh => 0b11,
        };
        let pull = match line.pull {
            Pull::None => 0b00,
            Pull::Up => 0b01,
            Pull::Down => 0b10,
        };
        let open_drain = match line.output_type {
            OutputType::PushPull => 0,
            OutputType::OpenDrain => 1,
        };

        regs.moder()
            .modify(|r, w| unsafe { w.bits(set_field(r.bits(), pin * 2, 0b11, mode)) });
        regs.otyper()
            .modify(|r, w| unsafe { w.bits(set_field(r.bits(), pin, 0b1, open_drain)) });
        regs.ospeedr()
            .modify(|r, w| unsafe { w.bits(set_field(r.bits(), pin * 2, 0b11, speed)) });
        regs.pupdr()
            .modify(|r, w| unsafe { w.bits(set_field(r.bits(), pin * 2, 0b11, pull)) });
    }
}

fn set_field(bits: u32, shift: u32, width_mask: u32, value: u32) -> u32 {
    (bits & !(width_mask << shift)) | (value << shift)
}

fn port_registers(port: Port) -> &'static RegisterBlock {
    let base = pac::GPIOA::ptr() as usize + usize::from(port.index()) * GPIO_PORT_STRIDE;
    // SAFETY: GPIOA..GPIOI share one register layout at fixed strides
    unsafe { &*(base as *const RegisterBlock) }
}

/// Initialize all hardware peripherals
///
/// - Buttons, LEDs and buzzer as laid out by [`BoardLayout::explorer`], keys
///   with the internal pull-ups enabled
/// - System clock at 168 MHz from the 8 MHz crystal
/// - SysTick at 1 ms, highest priority
pub fn init_hardware() -> HardwareContext {
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    let layout = BoardLayout::explorer().with_button_pull(Pull::Up);
    layout.apply(&mut RegisterConfigurator { rcc: &dp.RCC });
    for line in layout.lines() {
        rprintln!(
            "P{}{}: {:?} {:?} {:?} {:?}",
            line.port.letter(),
            line.pin,
            line.mode,
            line.speed,
            line.output_type,
            line.pull
        );
    }

    let clocks = configure_clock(dp.RCC);
    configure_systick(&clocks, &mut cp.SYST, &mut cp.SCB);

    let keys = core::array::from_fn(|i| RegisterLine::new(&layout.buttons()[i]));
    let leds = core::array::from_fn(|i| RegisterLine::new(&layout.outputs()[i]));

    if let Some(line) = layout.buzzer() {
        RegisterLine::new(line).set_level(false);
        rprintln!("Buzzer held silent");
    }

    HardwareContext { keys, leds }
}

/// Configure the system clock for 168 MHz
fn configure_clock(rcc: pac::RCC) -> Clocks {
    let clocks = rcc
        .constrain()
        .cfgr
        .use_hse(8.MHz())
        .sysclk(168.MHz())
        .freeze();

    rprintln!("System clock configured: {} Hz", clocks.sysclk().raw());

    clocks
}

/// Configure SysTick for 1 ms interrupts
///
/// A core clock that cannot produce a 1 ms tick halts here: without a tick
/// every delay would hang anyway.
fn configure_systick(clocks: &Clocks, syst: &mut SYST, scb: &mut SCB) {
    let reload = match systick_reload(clocks.sysclk().raw()) {
        Ok(reload) => reload,
        Err(err) => {
            rprintln!("SysTick setup failed: {}", err);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(reload);
    syst.clear_current();

    // SAFETY: priority is set before the tick is enabled
    unsafe { scb.set_priority(SystemHandler::SysTick, 0) };

    syst.enable_counter();
    syst.enable_interrupt();

    rprintln!("SysTick configured for 1ms interrupts");
}
