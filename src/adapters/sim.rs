//! Simulated DRV8874 bridge for host testing.
//!
//! [`SimBridge::new`] hands out a full [`Pins`] set whose writes land in
//! shared in-memory state, plus a [`ManualClock`] and [`SimDelay`] that
//! move simulated time forward. Every line write is recorded with its
//! timestamp so tests can assert on exact sequences and hold times.
//!
//! The simulated chip latches a fault (nFAULT low) until nSLEEP is driven
//! low, like the real part.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::drivers::Pins;
use crate::error::Line;
use crate::ports::{Clock, FaultInput};

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced millisecond clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Delay that advances a [`ManualClock`] instead of sleeping.
#[derive(Debug)]
pub struct SimDelay {
    clock: ManualClock,
    pending_ns: u64,
    total_ns: u64,
}

impl SimDelay {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            pending_ns: 0,
            total_ns: 0,
        }
    }

    /// Total simulated time spent in delays.
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.pending_ns += u64::from(ns);
        self.clock.advance(self.pending_ns / 1_000_000);
        self.pending_ns %= 1_000_000;
    }
}

// ── Bridge state ──────────────────────────────────────────────

/// One recorded line write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineWrite {
    Duty { line: Line, duty: u16, at_ms: u64 },
    Sleep { high: bool, at_ms: u64 },
}

#[derive(Debug, Default)]
struct BridgeState {
    max_duty: u16,
    en_in1: u16,
    ph_in2: u16,
    sleep_high: bool,
    fault_latched: bool,
    pull_up: Option<bool>,
    fail_sleep: bool,
    /// nSLEEP writes still allowed before they start failing.
    sleep_budget: Option<u32>,
    fail_control: Option<Line>,
    writes: Vec<LineWrite>,
}

/// Error returned by simulated pins when a failure is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl pwm::Error for SimError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

impl digital::Error for SimError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Handle for observing and poking the simulated chip.
#[derive(Debug, Clone)]
pub struct SimBridge {
    state: Rc<RefCell<BridgeState>>,
    clock: ManualClock,
}

/// Pin set produced by [`SimBridge::new`].
pub type SimPins = Pins<SimPwm, SimPwm, SimSleep, SimFault>;

impl SimBridge {
    /// Build a bridge whose PWM channels count `0..=max_duty`.
    pub fn new(max_duty: u16, clock: ManualClock) -> (Self, SimPins) {
        let state = Rc::new(RefCell::new(BridgeState {
            max_duty,
            ..BridgeState::default()
        }));
        let pins = Pins {
            en_in1: SimPwm {
                line: Line::EnIn1,
                state: Rc::clone(&state),
                clock: clock.clone(),
            },
            ph_in2: SimPwm {
                line: Line::PhIn2,
                state: Rc::clone(&state),
                clock: clock.clone(),
            },
            sleep: SimSleep {
                state: Rc::clone(&state),
                clock: clock.clone(),
            },
            fault: SimFault {
                state: Rc::clone(&state),
            },
        };
        (Self { state, clock }, pins)
    }

    /// Current duty on a control line.
    pub fn duty(&self, line: Line) -> u16 {
        let s = self.state.borrow();
        match line {
            Line::EnIn1 => s.en_in1,
            Line::PhIn2 => s.ph_in2,
        }
    }

    pub fn sleep_high(&self) -> bool {
        self.state.borrow().sleep_high
    }

    pub fn pull_up(&self) -> Option<bool> {
        self.state.borrow().pull_up
    }

    /// Latch a chip fault; nFAULT reads low until nSLEEP is pulsed.
    pub fn trip_fault(&self) {
        self.state.borrow_mut().fault_latched = true;
    }

    pub fn fault_latched(&self) -> bool {
        self.state.borrow().fault_latched
    }

    /// Make every nSLEEP write fail. Also clears any budget set by
    /// [`fail_sleep_after`](Self::fail_sleep_after).
    pub fn fail_sleep(&self, fail: bool) {
        let mut s = self.state.borrow_mut();
        s.fail_sleep = fail;
        s.sleep_budget = None;
    }

    /// Let `writes` more nSLEEP writes succeed, then fail the rest.
    pub fn fail_sleep_after(&self, writes: u32) {
        self.state.borrow_mut().sleep_budget = Some(writes);
    }

    /// Make duty writes on `line` fail (`None` clears).
    pub fn fail_control(&self, line: Option<Line>) {
        self.state.borrow_mut().fail_control = line;
    }

    /// All writes recorded so far, oldest first.
    pub fn writes(&self) -> Vec<LineWrite> {
        self.state.borrow().writes.clone()
    }

    /// nSLEEP writes only, as `(high, at_ms)`.
    pub fn sleep_writes(&self) -> Vec<(bool, u64)> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter_map(|w| match *w {
                LineWrite::Sleep { high, at_ms } => Some((high, at_ms)),
                LineWrite::Duty { .. } => None,
            })
            .collect()
    }

    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }
}

// ── Pins ──────────────────────────────────────────────────────

/// Simulated PWM channel on EN/IN1 or PH/IN2.
#[derive(Debug)]
pub struct SimPwm {
    line: Line,
    state: Rc<RefCell<BridgeState>>,
    clock: ManualClock,
}

impl pwm::ErrorType for SimPwm {
    type Error = SimError;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.state.borrow().max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), SimError> {
        let mut s = self.state.borrow_mut();
        if s.fail_control == Some(self.line) {
            return Err(SimError);
        }
        match self.line {
            Line::EnIn1 => s.en_in1 = duty,
            Line::PhIn2 => s.ph_in2 = duty,
        }
        s.writes.push(LineWrite::Duty {
            line: self.line,
            duty,
            at_ms: self.clock.now_ms(),
        });
        Ok(())
    }
}

/// Simulated nSLEEP output.
#[derive(Debug)]
pub struct SimSleep {
    state: Rc<RefCell<BridgeState>>,
    clock: ManualClock,
}

impl SimSleep {
    fn write(&mut self, high: bool) -> Result<(), SimError> {
        let mut s = self.state.borrow_mut();
        if s.fail_sleep {
            return Err(SimError);
        }
        match s.sleep_budget {
            Some(0) => return Err(SimError),
            Some(n) => s.sleep_budget = Some(n - 1),
            None => {}
        }
        s.sleep_high = high;
        if !high {
            s.fault_latched = false;
        }
        s.writes.push(LineWrite::Sleep {
            high,
            at_ms: self.clock.now_ms(),
        });
        Ok(())
    }
}

impl digital::ErrorType for SimSleep {
    type Error = SimError;
}

impl OutputPin for SimSleep {
    fn set_low(&mut self) -> Result<(), SimError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), SimError> {
        self.write(true)
    }
}

/// Simulated nFAULT input.
#[derive(Debug)]
pub struct SimFault {
    state: Rc<RefCell<BridgeState>>,
}

impl SimFault {
    fn level_high(&self) -> bool {
        !self.state.borrow().fault_latched
    }
}

impl digital::ErrorType for SimFault {
    type Error = SimError;
}

impl InputPin for SimFault {
    fn is_high(&mut self) -> Result<bool, SimError> {
        Ok(self.level_high())
    }

    fn is_low(&mut self) -> Result<bool, SimError> {
        Ok(!self.level_high())
    }
}

impl FaultInput for SimFault {
    fn set_pull_up(&mut self, enabled: bool) -> Result<(), SimError> {
        self.state.borrow_mut().pull_up = Some(enabled);
        Ok(())
    }
}
