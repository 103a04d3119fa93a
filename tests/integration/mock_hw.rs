//! Shared fixtures for integration tests.
//!
//! Builds a [`Drv8874`] over the simulated bridge with an
//! [`EventHistory`] sink so tests can assert on both pin writes and the
//! emitted events.

use drv8874::adapters::sim::{ManualClock, SimBridge, SimDelay, SimFault, SimPwm, SimSleep};
use drv8874::diagnostics::EventHistory;
use drv8874::ports::Clock;
use drv8874::{DriverConfig, Drv8874};

/// 8-bit channel, matching the default resolution.
pub const MAX_DUTY: u16 = 255;

pub type SimDriver = Drv8874<SimPwm, SimPwm, SimSleep, SimFault, ManualClock, EventHistory>;

pub struct Rig {
    pub drv: SimDriver,
    pub bridge: SimBridge,
    pub clock: ManualClock,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: DriverConfig) -> Self {
        Self::with_max_duty(config, MAX_DUTY)
    }

    pub fn with_max_duty(config: DriverConfig, max_duty: u16) -> Self {
        let clock = ManualClock::starting_at(1_000);
        let (bridge, pins) = SimBridge::new(max_duty, clock.clone());
        let mut drv = Drv8874::new(pins, config, clock.clone(), EventHistory::new())
            .expect("valid config");
        drv.init().expect("init");
        bridge.clear_writes();
        Self { drv, bridge, clock }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay::new(self.clock.clone())
    }

    pub fn clock_now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn events(&self) -> &EventHistory {
        self.drv.sink()
    }
}
