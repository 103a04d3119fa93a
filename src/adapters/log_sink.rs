//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing driver events through the `log`
//! facade, standing in for the serial debug output a bench setup wants.
//! Whatever logger the host installs decides where the lines end up.

use log::{debug, info, warn};

use crate::events::DriverEvent;
use crate::ports::EventSink;

/// Adapter that logs every [`DriverEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DriverEvent) {
        match event {
            DriverEvent::Initialized { fault_pull_up } => {
                info!("DRV | init | pull_up={}", fault_pull_up);
            }
            DriverEvent::SpeedApplied { speed } => {
                debug!("DRV | speed={:.1}%", speed);
            }
            DriverEvent::SpeedCapped { requested, applied } => {
                debug!("DRV | speed={:.1}% capped to {:.1}%", requested, applied);
            }
            DriverEvent::SpeedDropped { requested } => {
                debug!("DRV | speed={:.1}% dropped (resetting)", requested);
            }
            DriverEvent::Braked => {
                info!("DRV | brake");
            }
            DriverEvent::FaultObserved => {
                warn!("DRV | nFAULT asserted");
            }
            DriverEvent::ResetEntered { hold_ms } => {
                info!("DRV | reset | nSLEEP low {}ms", hold_ms);
            }
            DriverEvent::ResetReleased => {
                info!("DRV | reset | nSLEEP released");
            }
            DriverEvent::ResetCompleted => {
                info!("DRV | reset | complete");
            }
        }
    }
}
