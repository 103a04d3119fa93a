//! DRV8874 half-bridge motor driver.
//!
//! Direction and speed over two control lines (phase/enable or dual-PWM),
//! slow-decay braking, and nSLEEP-pulse fault recovery.
//!
//! ## Fault recovery
//!
//! A latched fault (overcurrent, thermal, undervoltage) pulls nFAULT low
//! and disables the bridge until nSLEEP is pulsed low. Two disciplines:
//!
//! - [`reset_blocking`](Drv8874::reset_blocking) holds the calling thread
//!   for the whole pulse plus the recovery minimum.
//! - [`reset_non_blocking`](Drv8874::reset_non_blocking) returns
//!   immediately; call it (or [`tick_reset`](Drv8874::tick_reset)) once per
//!   control tick until [`is_resetting`](Drv8874::is_resetting) is false.
//!
//! While a sequence is active, speed and brake requests are dropped.
//!
//! ## Ownership
//!
//! One driver instance owns its four lines. It has no internal locking;
//! a multi-threaded host must serialise calls.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info, warn};

use crate::config::DriverConfig;
use crate::error::{Error, Line, Result};
use crate::events::DriverEvent;
use crate::fsm::{ResetFsm, ResetState, Step};
use crate::ports::{Clock, EventSink, FaultInput};
use crate::translate::{self, DriveSignal, LineOutput};

/// The four lines a DRV8874 is wired to.
pub struct Pins<EN, PH, SLP, FLT> {
    /// EN (phase/enable mode) or IN1 (dual-PWM mode).
    pub en_in1: EN,
    /// PH (phase/enable mode) or IN2 (dual-PWM mode).
    pub ph_in2: PH,
    /// nSLEEP, active-low sleep / fault reset.
    pub sleep: SLP,
    /// nFAULT, open-drain active-low fault indicator.
    pub fault: FLT,
}

/// DRV8874 driver.
///
/// # Type Parameters
///
/// * `EN`, `PH` - PWM channels for the two control lines
/// * `SLP` - nSLEEP output
/// * `FLT` - nFAULT input
/// * `CLK` - monotonic millisecond clock for non-blocking recovery
/// * `S` - event observer; `()` discards events
pub struct Drv8874<EN, PH, SLP, FLT, CLK, S = ()> {
    pins: Pins<EN, PH, SLP, FLT>,
    config: DriverConfig,
    max_pwm: u16,
    clock: CLK,
    sink: S,
    fsm: ResetFsm,
    speed: f32,
}

impl<EN, PH, SLP, FLT, CLK, S> Drv8874<EN, PH, SLP, FLT, CLK, S>
where
    EN: SetDutyCycle,
    PH: SetDutyCycle,
    SLP: OutputPin,
    FLT: FaultInput,
    CLK: Clock,
    S: EventSink,
{
    /// Create a driver. No pin is touched until [`init`](Self::init).
    pub fn new(
        pins: Pins<EN, PH, SLP, FLT>,
        config: DriverConfig,
        clock: CLK,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pins,
            max_pwm: config.max_pwm(),
            fsm: ResetFsm::new(config.min_recovery_ms),
            config,
            clock,
            sink,
            speed: 0.0,
        })
    }

    /// Configure the nFAULT pull-up, drive both control lines off, and
    /// wake the chip.
    pub fn init(&mut self) -> Result<()> {
        let pull_up = self.config.fault_pull_up;
        self.pins
            .fault
            .set_pull_up(pull_up)
            .map_err(|_| Error::FaultLine)?;
        self.apply(DriveSignal::off(self.config.drive_mode))?;
        self.pins.sleep.set_high().map_err(|_| Error::SleepLine)?;

        self.fsm.finish();
        self.speed = 0.0;

        info!(
            "DRV8874 init: mode={:?} invert={} resolution={}bit pull_up={}",
            self.config.drive_mode,
            self.config.invert_direction,
            self.config.pwm_resolution_bits,
            pull_up
        );
        self.sink.emit(&DriverEvent::Initialized {
            fault_pull_up: pull_up,
        });
        Ok(())
    }

    // ── Speed & brake ────────────────────────────────────────────

    /// Command a signed speed in percent.
    ///
    /// Values outside `[-100, 100]` are clamped. Requests made while a
    /// reset sequence is active are dropped, not queued.
    pub fn update_speed(&mut self, speed: f32) -> Result<()> {
        if self.fsm.is_resetting() {
            debug!("DRV8874: speed {} dropped, reset in progress", speed);
            self.sink.emit(&DriverEvent::SpeedDropped { requested: speed });
            return Ok(());
        }

        let applied = translate::cap_speed(speed);
        let signal = translate::translate(
            applied,
            self.config.drive_mode,
            self.config.invert_direction,
            self.max_pwm,
        );
        self.apply(signal)?;
        self.speed = applied;

        if applied == speed {
            self.sink.emit(&DriverEvent::SpeedApplied { speed: applied });
        } else {
            debug!("DRV8874: speed {} capped to {}", speed, applied);
            self.sink.emit(&DriverEvent::SpeedCapped {
                requested: speed,
                applied,
            });
        }
        Ok(())
    }

    /// Brake in slow-decay mode. Ignored while a reset sequence is active.
    ///
    /// [`current_speed`](Self::current_speed) keeps the last commanded
    /// speed; braking is not a speed command.
    pub fn brake(&mut self) -> Result<()> {
        if self.fsm.is_resetting() {
            return Ok(());
        }
        self.apply(translate::brake_signal(self.config.drive_mode))?;
        self.sink.emit(&DriverEvent::Braked);
        Ok(())
    }

    /// Last applied speed, post-capping.
    pub fn current_speed(&self) -> f32 {
        self.speed
    }

    // ── Fault handling ───────────────────────────────────────────

    /// True if nFAULT reads low. No side effects; safe in any state.
    pub fn is_faulted(&mut self) -> Result<bool> {
        InputPin::is_low(&mut self.pins.fault).map_err(|_| Error::FaultLine)
    }

    /// Reset the chip if it is faulted, blocking for the whole sequence.
    ///
    /// `hold_ms` defaults to [`DriverConfig::default_reset_ms`]. Returns
    /// `false` without touching any line if there was nothing to reset.
    /// Do not call from a loop that must stay responsive.
    pub fn reset_blocking<D: DelayNs>(
        &mut self,
        hold_ms: Option<u32>,
        delay: &mut D,
    ) -> Result<bool> {
        if !self.needs_reset()? {
            return Ok(false);
        }
        self.run_blocking(self.hold_ms(hold_ms), delay)?;
        Ok(true)
    }

    /// Start or advance a non-blocking reset if the chip is faulted.
    ///
    /// The first call after a fault drives nSLEEP low and returns. Later
    /// calls advance the sequence by at most one step; the hold duration
    /// latched on the first call is kept. Returns the resulting state.
    pub fn reset_non_blocking(&mut self, hold_ms: Option<u32>) -> Result<ResetState> {
        if self.fsm.is_resetting() {
            return self.tick_reset();
        }
        if !self.needs_reset()? {
            return Ok(self.fsm.state());
        }
        self.begin(self.hold_ms(hold_ms))
    }

    /// Reset regardless of the fault line, blocking.
    pub fn force_reset_blocking<D: DelayNs>(
        &mut self,
        hold_ms: Option<u32>,
        delay: &mut D,
    ) -> Result<()> {
        self.run_blocking(self.hold_ms(hold_ms), delay)
    }

    /// Start a non-blocking reset regardless of the fault line.
    ///
    /// An already running sequence continues unchanged.
    pub fn force_reset_non_blocking(&mut self, hold_ms: Option<u32>) -> Result<ResetState> {
        if self.fsm.is_resetting() {
            return self.tick_reset();
        }
        self.begin(self.hold_ms(hold_ms))
    }

    /// Advance an active non-blocking sequence. No-op in `Normal`.
    ///
    /// If the nSLEEP write for a transition fails, the machine stays in the
    /// phase it was in and the next tick retries.
    pub fn tick_reset(&mut self) -> Result<ResetState> {
        self.transition(ResetFsm::advance)?;
        Ok(self.fsm.state())
    }

    pub fn is_resetting(&self) -> bool {
        self.fsm.is_resetting()
    }

    pub fn reset_state(&self) -> ResetState {
        self.fsm.state()
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Largest duty value at the configured resolution.
    pub fn max_pwm(&self) -> u16 {
        self.max_pwm
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the driver and hand back the pins.
    pub fn release(self) -> Pins<EN, PH, SLP, FLT> {
        self.pins
    }

    // ── Internal ─────────────────────────────────────────────────

    fn hold_ms(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.config.default_reset_ms)
    }

    /// A sequence is already running, or nFAULT is asserted.
    fn needs_reset(&mut self) -> Result<bool> {
        if self.fsm.is_resetting() {
            return Ok(true);
        }
        let faulted = self.is_faulted()?;
        if faulted {
            warn!("DRV8874: fault observed, resetting");
            self.sink.emit(&DriverEvent::FaultObserved);
        }
        Ok(faulted)
    }

    fn begin(&mut self, hold_ms: u32) -> Result<ResetState> {
        self.transition(|fsm, now| fsm.begin(now, hold_ms))?;
        Ok(self.fsm.state())
    }

    /// Run one machine transition and apply its step. The transition is
    /// only kept if the pin write succeeded, so the recorded phase always
    /// matches the nSLEEP level.
    fn transition(&mut self, f: impl FnOnce(&mut ResetFsm, u64) -> Option<Step>) -> Result<()> {
        let before = self.fsm.clone();
        let Some(step) = f(&mut self.fsm, self.clock.now_ms()) else {
            return Ok(());
        };
        if let Err(e) = self.perform(step) {
            self.fsm = before;
            return Err(e);
        }
        Ok(())
    }

    fn perform(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Hold { hold_ms } => {
                self.pins.sleep.set_low().map_err(|_| Error::SleepLine)?;
                info!("DRV8874 reset: nSLEEP low for {} ms", hold_ms);
                self.sink.emit(&DriverEvent::ResetEntered { hold_ms });
            }
            Step::Release => {
                self.pins.sleep.set_high().map_err(|_| Error::SleepLine)?;
                info!(
                    "DRV8874 reset: nSLEEP released, recovering for {} ms",
                    self.config.min_recovery_ms
                );
                self.sink.emit(&DriverEvent::ResetReleased);
            }
            Step::Complete => {
                info!("DRV8874 reset: complete");
                self.sink.emit(&DriverEvent::ResetCompleted);
            }
        }
        Ok(())
    }

    /// Full pulse through the machine, waiting on `delay` between steps.
    ///
    /// A running non-blocking sequence is restarted from phase 1. If the
    /// release write fails the driver stays in phase 1 with nSLEEP low, and
    /// later ticks retry the release.
    fn run_blocking<D: DelayNs>(&mut self, hold_ms: u32, delay: &mut D) -> Result<()> {
        let before = self.fsm.clone();
        self.fsm.finish();
        if let Err(e) = self.begin(hold_ms) {
            self.fsm = before;
            return Err(e);
        }
        delay.delay_ms(hold_ms);
        self.transition(ResetFsm::release)?;
        delay.delay_ms(self.config.min_recovery_ms);
        self.fsm.finish();
        self.perform(Step::Complete)
    }

    fn apply(&mut self, signal: DriveSignal) -> Result<()> {
        drive_line(&mut self.pins.en_in1, signal.en_in1, self.max_pwm)
            .map_err(|()| Error::ControlLine(Line::EnIn1))?;
        drive_line(&mut self.pins.ph_in2, signal.ph_in2, self.max_pwm)
            .map_err(|()| Error::ControlLine(Line::PhIn2))
    }
}

fn drive_line<P: SetDutyCycle>(
    pin: &mut P,
    output: LineOutput,
    max_pwm: u16,
) -> core::result::Result<(), ()> {
    let res = match output {
        LineOutput::Low => pin.set_duty_cycle_fully_off(),
        LineOutput::High => pin.set_duty_cycle_fully_on(),
        LineOutput::Duty(duty) => pin.set_duty_cycle_fraction(duty, max_pwm),
        LineOutput::Keep => Ok(()),
    };
    res.map_err(|_| ())
}
