//! Mock hardware for integration tests.
//!
//! Records every rail call so tests can assert on the full sequencing
//! history, and a virtual clock whose delays advance time instantly.
//! Attaching the clock to the mock stamps each call with virtual time.

use std::cell::Cell;
use std::rc::Rc;

use autopower::app::events::PowerEvent;
use autopower::app::ports::{ActivityPort, Clock, EventSink, RailPort};
use autopower::power::activity::{ActivitySnapshot, DriverAxis, HeaterActivity};
use autopower::time::Millis;
use embedded_hal::delay::DelayNs;

// ── Rail call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailCall {
    SetRail(bool),
    RestoreDrivers,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub activity: ActivitySnapshot,
    pub calls: Vec<RailCall>,
    /// Virtual time of each entry in `calls`.
    pub call_times: Vec<Millis>,
    pub reads: u32,
    clock: Option<Rc<Cell<Millis>>>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// One hotend and a bed, all cold and idle.
    pub fn single_hotend() -> Self {
        let mut hw = Self::new();
        hw.activity.hotends.push(HeaterActivity::idle(25.0)).unwrap();
        hw.activity.fan_speeds.push(0).unwrap();
        hw.activity.bed = Some(HeaterActivity::idle(25.0));
        hw
    }

    /// Stamp subsequent rail calls with `clock`'s time.
    pub fn attach_clock(&mut self, clock: &FakeClock) {
        self.clock = Some(Rc::clone(&clock.now));
    }

    /// Virtual time of the first `call`.
    pub fn time_of(&self, call: RailCall) -> Option<Millis> {
        self.calls
            .iter()
            .position(|c| *c == call)
            .map(|i| self.call_times[i])
    }

    fn record(&mut self, call: RailCall) {
        self.calls.push(call);
        self.call_times
            .push(self.clock.as_ref().map_or(0, |now| now.get()));
    }

    pub fn set_hotend_target(&mut self, target_c: f32) {
        self.activity.hotends[0].target_c = target_c;
    }

    pub fn enable_driver(&mut self, axis: DriverAxis) {
        self.activity.drivers_enabled.insert(axis);
    }

    pub fn go_idle(&mut self) {
        let hotends = self.activity.hotends.len();
        let fans = self.activity.fan_speeds.len();
        self.activity = ActivitySnapshot::idle();
        for _ in 0..hotends {
            self.activity.hotends.push(HeaterActivity::idle(25.0)).unwrap();
        }
        for _ in 0..fans {
            self.activity.fan_speeds.push(0).unwrap();
        }
    }

    pub fn rail_writes(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RailCall::SetRail(on) => Some(*on),
                RailCall::RestoreDrivers => None,
            })
            .collect()
    }

    pub fn restores(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == RailCall::RestoreDrivers)
            .count()
    }
}

impl ActivityPort for MockHardware {
    fn read_activity(&mut self) -> ActivitySnapshot {
        self.reads += 1;
        self.activity.clone()
    }
}

impl RailPort for MockHardware {
    fn set_rail(&mut self, energized: bool) {
        self.record(RailCall::SetRail(energized));
    }

    fn restore_drivers(&mut self) {
        self.record(RailCall::RestoreDrivers);
    }
}

// ── FakeClock ─────────────────────────────────────────────────

pub struct FakeClock {
    now: Rc<Cell<Millis>>,
    pub slept_ms: u32,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn at(now: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            slept_ms: 0,
        }
    }

    pub fn set(&mut self, now: Millis) {
        self.now.set(now);
    }

    pub fn advance(&mut self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        let ms = ns.div_ceil(1_000_000);
        self.advance(ms);
        self.slept_ms += ms;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
        self.slept_ms += ms;
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PowerEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_ons(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PowerEvent::PowerOn { .. }))
            .count()
    }

    pub fn power_offs(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PowerEvent::PowerOff { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PowerEvent) {
        self.events.push(event.clone());
    }
}
