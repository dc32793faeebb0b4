//! Songbird control core: host simulation entry point.
//!
//! Runs the real [`TickDispatcher`] against simulated adapters.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SimAudioEngine   LogDisplay   LogDiagnosticsSink            │
//! │  GpioButtons<SimInputPin>   PwmIndicators<SimPwmPin>         │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            TickDispatcher (pure logic)                 │  │
//! │  │  Debounce · FSM · Smoothing · Brightness · Diagnostics │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  MonotonicClock drives poll() in an unbounded loop           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `songbird [CONFIG.json] [--demo] [--fail-init]`.  `SONGBIRD_LOG`
//! takes a tracing filter (default `info`).  `--demo` presses UP, DOWN,
//! DOWN, UP on a fixed script so every mode is visited.  `--fail-init`
//! makes the audio engine refuse to start, showing the error indication.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};
use tracing_subscriber::EnvFilter;

use songbird::adapters::log_display::LogDisplay;
use songbird::adapters::log_sink::LogDiagnosticsSink;
use songbird::adapters::sim_audio::SimAudioEngine;
use songbird::adapters::sim_pins::{SimButtonHandle, SimInputPin, SimPwmPin};
use songbird::adapters::time::MonotonicClock;
use songbird::app::dispatcher::{Ports, TickDispatcher};
use songbird::app::ports::Clock;
use songbird::config::SystemConfig;
use songbird::control::brightness::Indicator;
use songbird::drivers::button::Button;
use songbird::drivers::gpio_buttons::GpioButtons;
use songbird::drivers::indicator::PwmIndicators;
use songbird::error::{InitError, Subsystem};

// ── Demo script ───────────────────────────────────────────────

/// (time since start, button) pairs pressed by `--demo`.
const DEMO_PRESSES: [(u32, Button); 4] = [
    (2_000, Button::Up),
    (6_000, Button::Down),
    (10_000, Button::Down),
    (14_000, Button::Up),
];
/// How long each scripted press is held.
const DEMO_HOLD_MS: u32 = 150;

struct DemoScript {
    started_ms: u32,
    next: usize,
    /// Button currently held and when it was pressed.
    held: Option<(Button, u32)>,
    buttons: [SimButtonHandle; Button::COUNT],
    leds: [Rc<Cell<u16>>; Indicator::COUNT],
}

impl DemoScript {
    fn drive(&mut self, now_ms: u32) {
        if let Some((button, pressed_at)) = self.held {
            if now_ms.wrapping_sub(pressed_at) >= DEMO_HOLD_MS {
                self.buttons[button as usize].release();
                info!("demo: release {} {}", button.name(), self.led_duties());
                self.held = None;
            }
            return;
        }
        if let Some(&(at_ms, button)) = DEMO_PRESSES.get(self.next) {
            if now_ms.wrapping_sub(self.started_ms) >= at_ms {
                self.buttons[button as usize].press();
                info!("demo: press {} {}", button.name(), self.led_duties());
                self.held = Some((button, now_ms));
                self.next += 1;
            }
        }
    }

    fn led_duties(&self) -> String {
        format!(
            "(LED1={} LED2={})",
            self.leds[Indicator::Led1 as usize].get(),
            self.leds[Indicator::Led2 as usize].get()
        )
    }
}

// ── Logging ───────────────────────────────────────────────────

/// Console subscriber on stderr; `log` records are bridged in.
fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_env("SONGBIRD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger: {e}"))
}

// ── Configuration ─────────────────────────────────────────────

/// Load the JSON config at `path`, falling back to defaults on any error.
fn load_config(path: Option<&str>) -> SystemConfig {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return SystemConfig::default();
    };
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Config {path}: {e}, using defaults");
            return SystemConfig::default();
        }
    };
    match SystemConfig::from_json(&text) {
        Ok(config) => {
            info!("Config loaded from {path}");
            config
        }
        Err(e) => {
            warn!("Config {path}: {e}, using defaults");
            SystemConfig::default()
        }
    }
}

fn main() -> Result<()> {
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Songbird v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let demo = args.iter().any(|a| a == "--demo");
    let fail_init = args.iter().any(|a| a == "--fail-init");
    let config_path = args.iter().find(|a| !a.starts_with("--")).map(String::as_str);
    let config = load_config(config_path);

    // ── Adapters ──────────────────────────────────────────────
    let button_pins: [SimInputPin; Button::COUNT] = core::array::from_fn(|_| SimInputPin::new());
    let button_handles = button_pins.each_ref().map(SimInputPin::handle);
    let led_pins = [SimPwmPin::new(), SimPwmPin::new()];
    let led_handles = led_pins.each_ref().map(SimPwmPin::duty_handle);
    let [led1, led2] = led_pins;

    let mut audio = SimAudioEngine::new();
    if fail_init {
        warn!("--fail-init: audio engine will refuse to start");
        audio = audio.fail_init_with(InitError::new(Subsystem::Audio, "simulated codec fault"));
    }

    let ports = Ports {
        audio,
        display: LogDisplay::new(config.level_threshold),
        buttons: GpioButtons::new(button_pins),
        indicators: PwmIndicators::new(led1, led2),
        diagnostics: LogDiagnosticsSink::new(),
    };

    let mut dispatcher = TickDispatcher::new(config, ports).context("invalid configuration")?;

    let clock = MonotonicClock::new();
    let started_ms = clock.now_ms();
    if let Err(e) = dispatcher.start(started_ms) {
        error!("Startup failed: {e}; error indication active");
    }

    let mut script = demo.then(|| DemoScript {
        started_ms,
        next: 0,
        held: None,
        buttons: button_handles,
        leds: led_handles,
    });
    if script.is_some() {
        info!("Demo script armed: UP @2s, DOWN @6s, DOWN @10s, UP @14s");
    }

    // ── Control loop ──────────────────────────────────────────
    loop {
        let now = clock.now_ms();
        if let Some(script) = script.as_mut() {
            script.drive(now);
        }
        dispatcher.poll(now);
        std::thread::sleep(Duration::from_millis(1));
    }
}
