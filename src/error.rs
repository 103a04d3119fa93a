//! Unified error types for the DRV8874 driver.
//!
//! Policy-level conditions (out-of-range speed, redundant reset requests,
//! speed updates while recovering) are absorbed by the driver and never
//! show up here. What remains is the hardware collaborator refusing a pin
//! operation, and configuration that cannot be represented.
//! All variants are `Copy` so they pass through the control loop without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Control line discriminant
// ---------------------------------------------------------------------------

/// The two motor-control lines. Their role depends on the drive mode:
/// EN/IN1 is the enable (PWM) line in phase/enable mode and PWM input A in
/// dual-PWM mode; PH/IN2 is the phase (direction) line or PWM input B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    EnIn1,
    PhIn2,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnIn1 => write!(f, "EN/IN1"),
            Self::PhIn2 => write!(f, "PH/IN2"),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level driver error
// ---------------------------------------------------------------------------

/// Every fallible driver operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A duty-cycle write on one of the control lines failed.
    ControlLine(Line),
    /// Driving the nSLEEP line failed.
    SleepLine,
    /// Reading or configuring the nFAULT line failed.
    FaultLine,
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControlLine(line) => write!(f, "control line {line}: duty write failed"),
            Self::SleepLine => write!(f, "nSLEEP write failed"),
            Self::FaultLine => write!(f, "nFAULT access failed"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Driver-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
