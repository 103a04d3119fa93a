//! Outbound driver events.
//!
//! [`Drv8874`](crate::drivers::Drv8874) emits these through the
//! [`EventSink`](crate::ports::EventSink) port at well-defined points:
//! speed capping, dropped updates, brake, and every step of the
//! fault-recovery sequence. Adapters decide what to do with them.

/// Structured events emitted by the driver core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverEvent {
    /// `init` completed; pins configured and the chip awake.
    Initialized { fault_pull_up: bool },

    /// A speed request was applied as-is.
    SpeedApplied { speed: f32 },

    /// A speed request was outside `[-100, 100]` and clamped.
    SpeedCapped { requested: f32, applied: f32 },

    /// A speed request arrived mid-reset and was discarded.
    SpeedDropped { requested: f32 },

    /// Brake pattern driven onto the control lines.
    Braked,

    /// The nFAULT line was read low when a reset was requested.
    FaultObserved,

    /// nSLEEP driven low for `hold_ms`.
    ResetEntered { hold_ms: u32 },

    /// nSLEEP released high; recovery wait started.
    ResetReleased,

    /// Recovery finished; speed updates accepted again.
    ResetCompleted,
}
