//! i2c-keypad - RP2040 demo firmware
//!
//! Raspberry Pi Pico with an MCP23008 keypad backpack on I2C0:
//! - SDA on GP4, SCL on GP5, expander at 0x20
//! - 4x4 keypad, rows on GP0-3 and columns on GP4-7 of the expander
//!
//! Keys are logged over RTT as they arrive. `*` clears the entry line and
//! `#` submits it.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Duration, Timer};
use heapless::Vec;
use panic_halt as _;
use defmt_rtt as _; // global logger

use i2c_keypad::*;

// ===================================================================
// Demo Configuration
// ===================================================================

const I2C_FREQUENCY_HZ: u32 = 100_000;
const DEBOUNCE_MS: u16 = 20;
const ENTRY_MAX_LEN: usize = 16;
const STATUS_INTERVAL_SECS: u64 = 10;

type DemoKeypad = Keypad<Mcp23008Scanner<I2c<'static, I2C0, Blocking>, Delay>, EmbassyClock>;

// Keys from the keypad task to the main loop
static KEY_CHANNEL: Channel<ThreadModeRawMutex, Symbol, 8> = Channel::new();

// ===================================================================
// Main Application Entry Point
// ===================================================================

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("========================================");
    info!("i2c-keypad v{} - MCP23008 keypad demo", env!("CARGO_PKG_VERSION"));
    info!("Hardware: RP2040 (Raspberry Pi Pico)");
    info!("Expander: MCP23008 at 0x{:02X}", DEFAULT_ADDRESS);
    info!("========================================");

    let p = embassy_rp::init(Default::default());

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let layout = Layout::Keypad4x4;
    let config = match KeypadConfig::from_layout(layout, DEFAULT_ADDRESS) {
        Ok(config) => config.with_debounce_ms(DEBOUNCE_MS),
        Err(e) => {
            error!("Invalid keypad configuration: {:?}", e);
            core::panic!("Keypad configuration failed");
        }
    };
    info!("Keypad: {} ({}x{})", layout.name(), layout.rows(), layout.cols());

    let mut keypad = Keypad::new(bus, Delay, EmbassyClock, config);
    if let Err(e) = keypad.begin() {
        error!("MCP23008 not responding: {:?}", Debug2Format(&e.kind()));
        core::panic!("Keypad initialization failed");
    }

    unwrap!(spawner.spawn(keypad_task(keypad)));
    unwrap!(spawner.spawn(status_task(Output::new(p.PIN_25, Level::Low))));

    info!("Keypad ready, enter digits then '#'");

    let receiver = KEY_CHANNEL.receiver();
    let mut entry: Vec<Symbol, ENTRY_MAX_LEN> = Vec::new();
    let mut uptime_secs = 0u64;
    loop {
        match select(receiver.receive(), Timer::after(Duration::from_secs(STATUS_INTERVAL_SECS))).await {
            Either::First(b'#') => {
                match core::str::from_utf8(&entry) {
                    Ok(text) => info!("Entry: \"{}\"", text),
                    Err(_) => warn!("Entry is not text: {:?}", entry.as_slice()),
                }
                entry.clear();
            }
            Either::First(b'*') => {
                info!("Entry cleared");
                entry.clear();
            }
            Either::First(key) => {
                info!("Key '{}'", key as char);
                if entry.push(key).is_err() {
                    warn!("Entry full, key '{}' ignored", key as char);
                }
            }
            Either::Second(()) => {
                uptime_secs += STATUS_INTERVAL_SECS;
                info!("Status: Uptime {} seconds", uptime_secs);
            }
        }
    }
}

// ===================================================================
// Keypad Task
// ===================================================================

#[embassy_executor::task]
async fn keypad_task(mut keypad: DemoKeypad) {
    info!("Keypad task started");

    let mut delay = Delay;
    let mut last_faults = 0u32;
    let mut last_overflows = 0u32;
    loop {
        if let Ok(key) = keypad.pop_async(0, &mut delay).await {
            KEY_CHANNEL.send(key).await;
        }

        let faults = keypad.bus_faults();
        if faults != last_faults {
            warn!("I2C faults while scanning: {}", faults);
            last_faults = faults;
        }
        let overflows = keypad.overflows();
        if overflows != last_overflows {
            debug!("Keys dropped on full buffer: {}", overflows);
            last_overflows = overflows;
        }
    }
}

// ===================================================================
// Status LED Task
// ===================================================================

#[embassy_executor::task]
async fn status_task(mut status_led: Output<'static>) {
    info!("Status LED task started");

    loop {
        // Heartbeat pattern
        status_led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        status_led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
