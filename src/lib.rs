//! DRV8874 motor driver library.
//!
//! Drives a TI DRV8874 half-bridge through `embedded-hal` 1.0 pins:
//! signed speed control in phase/enable or dual-PWM mode, slow-decay
//! braking, and nSLEEP-pulse fault recovery that can run either blocking
//! or one step per control tick.
//!
//! | Module | Purpose |
//! | ------ | ------- |
//! | [`translate`] | Speed → control-line levels (pure) |
//! | [`fsm`] | Fault-recovery state machine (pure) |
//! | [`drivers`] | [`Drv8874`](drivers::Drv8874), the pin-owning driver |
//! | [`ports`] | Clock, fault-input and event-sink traits |
//! | [`adapters`] | Host clock/delay, log sink, simulated bridge |
//! | [`diagnostics`] | Ring buffer of recent driver events |

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unused_must_use)]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod ports;
pub mod translate;

pub use config::{DriveMode, DriverConfig};
pub use drivers::{Drv8874, Pins};
pub use error::{Error, Line, Result};
pub use events::DriverEvent;
pub use fsm::ResetState;
