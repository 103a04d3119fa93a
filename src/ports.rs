//! Port traits: the boundary between the driver core and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Drv8874 (driver core)
//! ```
//!
//! Pin access goes through `embedded-hal` 1.0 traits directly
//! (`SetDutyCycle`, `OutputPin`, `InputPin`, `DelayNs`). The traits here
//! cover what `embedded-hal` does not: a monotonic millisecond clock,
//! pull-up control on the fault input, and the observer sink.

use embedded_hal::digital::{ErrorType, InputPin};

use crate::events::DriverEvent;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond time source.
///
/// The value may wrap; the driver only ever looks at differences.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

// ───────────────────────────────────────────────────────────────
// Fault input port
// ───────────────────────────────────────────────────────────────

/// nFAULT input with switchable internal pull-up.
///
/// nFAULT is open-drain; without a pull-up (internal or on the board) it
/// floats and reads as a permanent fault.
pub trait FaultInput: InputPin {
    fn set_pull_up(&mut self, enabled: bool) -> Result<(), <Self as ErrorType>::Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// Observer for [`DriverEvent`]s. Adapters decide where they go
/// (serial log, diagnostics ring, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &DriverEvent);
}

/// No-op sink for builds that want no observer at all.
impl EventSink for () {
    fn emit(&mut self, _event: &DriverEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &DriverEvent) {
        (**self).emit(event);
    }
}
