//! Autopower: host simulation entry point.
//!
//! Wires the power controller to simulated peripherals and runs the main
//! loop against the wall clock, replaying a short print: heat up, move,
//! cool down, go idle.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter       LogEventSink   StdClock   JsonConfigFile │
//! │  (Activity + Rail)     (EventSink)    (Clock)    (ConfigPort)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          PowerController (pure logic)                  │    │
//! │  │  NeedEvaluator · cool-down · sequencing                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use embedded_hal::delay::DelayNs;
use log::{LevelFilter, info, warn};
use tracing_subscriber::filter::LevelFilter as TraceLevel;

use autopower::adapters::config_file::JsonConfigFile;
use autopower::adapters::hardware::HardwareAdapter;
use autopower::adapters::log_sink::LogEventSink;
use autopower::adapters::time::StdClock;
use autopower::app::events::PowerEvent;
use autopower::app::ports::{Clock, ConfigPort, EventSink, StepperPort, ThermalPort};
use autopower::config::PowerConfig;
use autopower::drivers::sim_pin::SimPin;
use autopower::power::activity::{DriverAxis, HeaterActivity};
use autopower::power::controller::PowerController;
use autopower::time::{self, Millis};

/// Main-loop period; the controller gates itself to its own poll interval.
const LOOP_PERIOD_MS: u32 = 50;
/// Status line cadence.
const STATUS_PERIOD_MS: u32 = 10_000;

#[derive(Debug, Parser)]
#[command(version, about = "Simulated auto power control run")]
struct Args {
    /// JSON configuration file (defaults are used when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run the simulation.
    #[arg(long, default_value_t = 90)]
    run_secs: u32,
}

// ── Simulated peripherals ─────────────────────────────────────

/// Thermal subsystem stand-in: one hotend, a bed, one part fan.
#[derive(Default)]
struct SimThermal {
    fan: u8,
    hotend: HeaterActivity,
    bed: HeaterActivity,
}

impl SimThermal {
    /// First-order approach toward target (or ambient when off).
    fn settle(heater: &mut HeaterActivity, ambient: f32) {
        let goal = if heater.target_c > 0.0 { heater.target_c } else { ambient };
        heater.current_c += (goal - heater.current_c) * 0.05;
        heater.duty = if heater.target_c > heater.current_c { 127 } else { 0 };
    }
}

impl ThermalPort for SimThermal {
    fn fan_speed(&self, _index: usize) -> u8 {
        self.fan
    }
    fn extruder_fan_speed(&self, _extruder: usize) -> u8 {
        // Hotend auto fan kicks in above 50 °C.
        if self.hotend.current_c >= 50.0 { 255 } else { 0 }
    }
    fn controller_fan_active(&self) -> bool {
        false
    }
    fn chamber_fan_speed(&self) -> u8 {
        0
    }
    fn hotend(&self, _extruder: usize) -> HeaterActivity {
        self.hotend
    }
    fn bed(&self) -> HeaterActivity {
        self.bed
    }
    fn chamber_temp_c(&self) -> f32 {
        25.0
    }
}

/// Stepper subsystem stand-in; counts driver re-initialisations.
#[derive(Default)]
struct SimSteppers {
    restores: u32,
}

impl StepperPort for SimSteppers {
    fn restore_drivers(&mut self) {
        self.restores += 1;
        info!("steppers: driver configuration restored ({})", self.restores);
    }
}

/// Drive the (active-low) EN lines the way the motion planner would.
fn set_drivers_enabled(enable: &[SimPin], on: bool) {
    for pin in enable {
        pin.set(!on);
    }
}

/// Scripted print job, by seconds since start.
fn run_script(elapsed_s: u32, thermal: &mut SimThermal, enable: &[SimPin]) {
    match elapsed_s {
        0..5 => {}
        5..20 => {
            thermal.hotend.target_c = 200.0;
            thermal.bed.target_c = 60.0;
        }
        20..35 => {
            set_drivers_enabled(enable, true);
            thermal.fan = 255;
        }
        _ => {
            set_drivers_enabled(enable, false);
            thermal.fan = 0;
            thermal.hotend.target_c = 0.0;
            thermal.bed.target_c = 0.0;
        }
    }
    SimThermal::settle(&mut thermal.hotend, 25.0);
    SimThermal::settle(&mut thermal.bed, 25.0);
}

/// Install the console subscriber; `log` records from the library are
/// bridged into it.
fn init_logging(level: LevelFilter) {
    let level = match level {
        LevelFilter::Off => TraceLevel::OFF,
        LevelFilter::Error => TraceLevel::ERROR,
        LevelFilter::Warn => TraceLevel::WARN,
        LevelFilter::Info => TraceLevel::INFO,
        LevelFilter::Debug => TraceLevel::DEBUG,
        LevelFilter::Trace => TraceLevel::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    // ── 1. Configuration ──────────────────────────────────────
    let config = match &args.config {
        Some(path) => JsonConfigFile::new(path)
            .load()
            .with_context(|| format!("loading {}", path.display()))?,
        None => PowerConfig::default(),
    };
    init_logging(config.log_level_filter().unwrap_or(LevelFilter::Info));

    info!("autopower-sim v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "poll={}ms cooldown={}s power_up_delay={}ms power_down_delay={}ms",
        config.poll_interval_ms,
        config.cooldown_timeout_secs,
        config.power_up_delay_ms,
        config.power_down_delay_ms
    );

    // ── 2. Hardware ───────────────────────────────────────────
    let axes = [DriverAxis::X, DriverAxis::Y, DriverAxis::Z, DriverAxis::E(0)];
    // Handles share their level with the clones the adapter watches.
    let enable_pins: Vec<SimPin> = axes.iter().map(|_| SimPin::new(true)).collect();
    let thermal = SimThermal {
        hotend: HeaterActivity::idle(25.0),
        bed: HeaterActivity::idle(25.0),
        ..SimThermal::default()
    };

    let mut hw = HardwareAdapter::new(&config, SimPin::new(false), thermal, SimSteppers::default())?;
    for (axis, pin) in axes.into_iter().zip(enable_pins.iter().cloned()) {
        hw.add_enable_line(axis, pin, true)?;
    }

    let mut clock = StdClock::new();
    let mut sink = LogEventSink::new();
    let mut controller = PowerController::new(&config);

    // ── 3. Main loop ──────────────────────────────────────────
    let start: Millis = clock.now_ms();
    let mut next_status = start;
    let run_ms = time::secs_to_ms(args.run_secs);

    info!("entering main loop for {}s", args.run_secs);
    loop {
        let now = clock.now_ms();
        let elapsed = time::elapsed(now, start);
        if elapsed >= run_ms {
            break;
        }

        run_script(elapsed / 1000, hw.thermal_mut(), &enable_pins);

        if controller.check(&mut hw, &mut clock, &mut sink).is_some()
            && controller.is_rail_on() != hw.psu_energized()
        {
            warn!("PSU pin disagrees with controller rail state");
        }

        // Re-read: a transition inside check() may have slept.
        let now = clock.now_ms();
        if time::reached(now, next_status) {
            sink.emit(&PowerEvent::Status(controller.status(now)));
            next_status = next_status.wrapping_add(STATUS_PERIOD_MS);
        }

        clock.delay_ms(LOOP_PERIOD_MS);
    }

    info!(
        "done: rail={} evaluations={} driver_restores={} hotend={:.1}°C",
        controller.rail(),
        controller.evaluations(),
        hw.steppers().restores,
        hw.thermal().hotend.current_c
    );
    Ok(())
}
