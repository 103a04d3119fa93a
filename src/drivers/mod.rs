//! Device drivers.

pub mod drv8874;

pub use drv8874::{Drv8874, Pins};
