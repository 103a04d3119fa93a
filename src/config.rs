//! Driver configuration parameters
//!
//! Everything that is fixed for the lifetime of a [`Drv8874`](crate::drivers::Drv8874)
//! instance. Values can be persisted by the host (NVS, flash) as a postcard blob.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest supported PWM resolution; duty values are carried as `u16`.
pub const MAX_PWM_RESOLUTION_BITS: u8 = 16;

/// How the two control lines are wired to the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriveMode {
    /// EN/IN1 carries the PWM magnitude, PH/IN2 the direction.
    #[default]
    PhaseEnable,
    /// IN1 and IN2 each carry PWM, one per direction.
    DualPwm,
}

/// Core driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    // --- Wiring ---
    /// Swap the motor's notion of forward and reverse.
    pub invert_direction: bool,
    /// Phase/enable or dual-PWM control scheme.
    pub drive_mode: DriveMode,
    /// PWM resolution in bits; should match the MCU timer resolution.
    pub pwm_resolution_bits: u8,

    // --- Fault recovery ---
    /// Settling time after releasing nSLEEP before normal operation resumes (ms).
    pub min_recovery_ms: u32,
    /// nSLEEP low time used when the caller has no preference (ms).
    pub default_reset_ms: u32,

    // --- Initialisation ---
    /// Enable the MCU's internal pull-up on the open-drain nFAULT line.
    pub fault_pull_up: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            // Wiring
            invert_direction: false,
            drive_mode: DriveMode::PhaseEnable,
            pwm_resolution_bits: 8,

            // Fault recovery
            min_recovery_ms: 10,
            default_reset_ms: 1000,

            // nFAULT is open-drain active-low
            fault_pull_up: true,
        }
    }
}

impl DriverConfig {
    /// Select the drive mode.
    pub fn with_drive_mode(mut self, mode: DriveMode) -> Self {
        self.drive_mode = mode;
        self
    }

    /// Set the direction-inversion flag.
    pub fn with_invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the PWM resolution in bits.
    pub fn with_pwm_resolution(mut self, bits: u8) -> Self {
        self.pwm_resolution_bits = bits;
        self
    }

    /// Largest duty value representable at the configured resolution.
    ///
    /// Only meaningful after [`validate`](Self::validate) has accepted the config.
    pub fn max_pwm(&self) -> u16 {
        let bits = u32::from(self.pwm_resolution_bits.clamp(1, MAX_PWM_RESOLUTION_BITS));
        ((1u32 << bits) - 1) as u16
    }

    /// Reject values the driver cannot represent.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PWM_RESOLUTION_BITS).contains(&self.pwm_resolution_bits) {
            return Err(Error::Config("pwm_resolution_bits must be 1..=16"));
        }
        if self.min_recovery_ms == 0 {
            return Err(Error::Config("min_recovery_ms must be non-zero"));
        }
        Ok(())
    }

    /// Serialise for persistent storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("encode failed"))
    }

    /// Load a stored blob. The decoded config is validated before it is returned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("stored config corrupted"))?;
        config.validate()?;
        Ok(config)
    }
}
