//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements              | Connects to               |
//! |------------|-------------------------|---------------------------|
//! | `log_sink` | EventSink               | `log` facade              |
//! | `sim`      | SetDutyCycle, OutputPin | In-memory DRV8874 model   |
//! |            | FaultInput, Clock       |                           |
//! |            | DelayNs                 |                           |
//! |            | (feature `sim`)         |                           |
//! | `time`     | Clock, DelayNs          | `std::time`, thread sleep |

pub mod log_sink;
#[cfg(feature = "sim")]
pub mod sim;
#[cfg(feature = "std")]
pub mod time;
