//! End-to-end tests: controller → hardware adapter → simulated pins.
//!
//! Unlike `controller_tests`, these go through the real snapshot builder,
//! PSU driver and enable-line drivers, with only the thermal and stepper
//! subsystems mocked.

use crate::mock_hw::{FakeClock, RecordingSink};

use autopower::adapters::config_file::JsonConfigFile;
use autopower::adapters::hardware::HardwareAdapter;
use autopower::adapters::log_sink::LogEventSink;
use autopower::app::commands::PowerCommand;
use autopower::app::events::PowerEvent;
use autopower::app::ports::{EventSink, StepperPort, ThermalPort};
use autopower::drivers::sim_pin::SimPin;
use autopower::power::activity::{DriverAxis, HeaterActivity};
use autopower::power::controller::{PollAction, PowerController};
use autopower::power::need::PowerNeed;

#[derive(Default)]
struct Thermal {
    part_fan: u8,
    hotend: HeaterActivity,
    chamber_c: f32,
}

impl ThermalPort for Thermal {
    fn fan_speed(&self, _index: usize) -> u8 {
        self.part_fan
    }
    fn extruder_fan_speed(&self, _extruder: usize) -> u8 {
        0
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
        HeaterActivity::idle(22.0)
    }
    fn chamber_temp_c(&self) -> f32 {
        self.chamber_c
    }
}

#[derive(Default)]
struct Steppers {
    restores: u32,
}

impl StepperPort for Steppers {
    fn restore_drivers(&mut self) {
        self.restores += 1;
    }
}

struct Bench {
    hw: HardwareAdapter<SimPin, SimPin, Thermal, Steppers>,
    psu: SimPin,
    x_enable: SimPin,
    ctl: PowerController,
    clock: FakeClock,
    sink: RecordingSink,
}

fn bench(json: &str) -> Bench {
    let config = JsonConfigFile::parse(json).unwrap();
    let psu = SimPin::new(false);
    let x_enable = SimPin::new(true);
    let mut hw = HardwareAdapter::new(
        &config,
        psu.clone(),
        Thermal {
            hotend: HeaterActivity::idle(22.0),
            chamber_c: 22.0,
            ..Thermal::default()
        },
        Steppers::default(),
    )
    .unwrap();
    hw.add_enable_line(DriverAxis::X, x_enable.clone(), true).unwrap();
    Bench {
        hw,
        psu,
        x_enable,
        ctl: PowerController::new(&config),
        clock: FakeClock::at(0),
        sink: RecordingSink::new(),
    }
}

impl Bench {
    fn poll_at(&mut self, t: u32) -> Option<PollAction> {
        self.clock.set(t);
        self.ctl.check(&mut self.hw, &mut self.clock, &mut self.sink)
    }
}

#[test]
fn active_low_psu_pin_follows_rail() {
    let mut b = bench(r#"{ "power_up_delay_ms": 0 }"#);
    assert!(b.psu.is_high(), "PS_ON de-asserted at construction");

    b.x_enable.set(false);
    assert_eq!(
        b.poll_at(0),
        Some(PollAction::PowerOn(PowerNeed::Drivers(
            [DriverAxis::X].into_iter().collect()
        )))
    );
    assert!(!b.psu.is_high(), "PS_ON pulled low to energize");
    assert_eq!(b.hw.steppers().restores, 1);

    b.x_enable.set(true);
    b.poll_at(30_000);
    assert!(b.psu.is_high());
    assert!(!b.hw.psu_energized());
}

#[test]
fn active_high_psu_pin_follows_rail() {
    let mut b = bench(r#"{ "rail_active_high": true, "power_up_delay_ms": 0 }"#);
    assert!(!b.psu.is_high());

    b.ctl
        .handle_command(PowerCommand::PowerOn, &mut b.hw, &mut b.clock, &mut b.sink);
    assert!(b.psu.is_high());
}

#[test]
fn disabled_category_does_not_hold_power() {
    let mut b = bench(r#"{ "triggers": { "fans": false } }"#);
    b.hw.thermal_mut().part_fan = 255;
    assert_eq!(b.poll_at(0), Some(PollAction::PowerOff));
    assert!(b.psu.is_high());
}

#[test]
fn fitted_chamber_keeps_power_while_hot() {
    let mut b = bench(
        r#"{
            "power_up_delay_ms": 0,
            "topology": { "heated_chamber": true },
            "triggers": { "chamber_still_hot_c": 40.0 }
        }"#,
    );
    b.hw.thermal_mut().chamber_c = 45.0;
    assert_eq!(
        b.poll_at(0),
        Some(PollAction::PowerOn(PowerNeed::ChamberStillHot))
    );

    b.hw.thermal_mut().chamber_c = 35.0;
    assert_eq!(b.poll_at(30_000), Some(PollAction::PowerOff));
}

#[test]
fn hotend_residual_heat_needs_threshold_configured() {
    let mut b = bench(r#"{ "power_up_delay_ms": 0 }"#);
    b.hw.thermal_mut().hotend = HeaterActivity::idle(180.0);
    assert_eq!(b.poll_at(0), Some(PollAction::PowerOff));

    let mut b = bench(
        r#"{ "power_up_delay_ms": 0, "triggers": { "hotend_still_hot_c": 50.0 } }"#,
    );
    b.hw.thermal_mut().hotend = HeaterActivity::idle(180.0);
    assert_eq!(
        b.poll_at(0),
        Some(PollAction::PowerOn(PowerNeed::HotendStillHot(0)))
    );
}

#[test]
fn status_event_reports_controller_state() {
    let mut b = bench(r#"{ "power_up_delay_ms": 0 }"#);
    b.hw.thermal_mut().hotend.target_c = 200.0;
    b.poll_at(1_000);

    let status = b.ctl.status(6_000);
    assert_eq!(status.last_power_on, Some(1_000));
    assert_eq!(status.since_last_need_ms, Some(5_000));
    assert_eq!(status.cooldown_remaining_ms, 25_000);
    assert_eq!(status.next_poll, Some(3_500));
    assert_eq!(status.evaluations, 1);

    // The log sink accepts every event kind.
    let mut log = LogEventSink::new();
    for event in &b.sink.events {
        log.emit(event);
    }
    log.emit(&PowerEvent::Status(status));
}
