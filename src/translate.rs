//! Drive-signal translation.
//!
//! Maps a signed speed percentage onto the levels the two control lines
//! must take. Pure functions only; [`Drv8874`](crate::drivers::Drv8874)
//! applies the result to the pins.
//!
//! ## DRV8874 truth tables
//!
//! Phase/enable mode (PMODE = 1):
//!
//! | EN  | PH | Motor state                       |
//! |-----|----|-----------------------------------|
//! | 0   | X  | Brake (low-side slow decay)       |
//! | PWM | 1  | Forward at duty                   |
//! | PWM | 0  | Reverse at duty                   |
//!
//! Dual-PWM mode (PMODE = 0):
//!
//! | IN1 | IN2 | Motor state                      |
//! |-----|-----|----------------------------------|
//! | 0   | 0   | Coast                            |
//! | PWM | 0   | Forward at duty                  |
//! | 0   | PWM | Reverse at duty                  |
//! | 1   | 1   | Brake (low-side slow decay)      |

use crate::config::DriveMode;

/// Commanded speed limits in percent.
pub const SPEED_MIN: f32 = -100.0;
pub const SPEED_MAX: f32 = 100.0;

/// What to do with a single control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutput {
    /// Drive the line fully low.
    Low,
    /// Drive the line fully high.
    High,
    /// PWM at the given duty, in `[0, max_pwm]`.
    Duty(u16),
    /// Leave the line as it is.
    Keep,
}

/// Output levels for both control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveSignal {
    pub en_in1: LineOutput,
    pub ph_in2: LineOutput,
}

impl DriveSignal {
    /// The "off" pair for a drive mode.
    pub fn off(mode: DriveMode) -> Self {
        match mode {
            DriveMode::PhaseEnable => Self {
                en_in1: LineOutput::Low,
                ph_in2: LineOutput::Low,
            },
            DriveMode::DualPwm => Self {
                en_in1: LineOutput::Duty(0),
                ph_in2: LineOutput::Duty(0),
            },
        }
    }
}

/// Clamp a requested speed into `[-100.0, 100.0]`.
///
/// Out-of-range input is clamped, never rejected. NaN carries no usable
/// direction or magnitude and is treated as a stop request.
pub fn cap_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return 0.0;
    }
    speed.clamp(SPEED_MIN, SPEED_MAX)
}

/// Map a magnitude in `[0, 100]` linearly onto `[0, max_pwm]`, truncating.
pub fn pwm_value(magnitude: f32, max_pwm: u16) -> u16 {
    let magnitude = if magnitude.is_nan() {
        0.0
    } else {
        magnitude.clamp(0.0, SPEED_MAX)
    };
    let value = magnitude * f32::from(max_pwm) / SPEED_MAX;
    (value as u16).min(max_pwm)
}

/// Translate a speed request into control-line outputs.
///
/// `speed` is capped first, so callers may pass any value.
pub fn translate(speed: f32, mode: DriveMode, invert: bool, max_pwm: u16) -> DriveSignal {
    let speed = cap_speed(speed);
    if speed == 0.0 {
        return DriveSignal::off(mode);
    }

    let forward = speed > 0.0;
    let duty = pwm_value(if forward { speed } else { -speed }, max_pwm);

    match mode {
        DriveMode::PhaseEnable => {
            let phase = if forward != invert {
                LineOutput::High
            } else {
                LineOutput::Low
            };
            DriveSignal {
                en_in1: LineOutput::Duty(duty),
                ph_in2: phase,
            }
        }
        DriveMode::DualPwm => {
            let (mut in1, mut in2) = if forward { (duty, 0) } else { (0, duty) };
            // Inversion swaps the physical lines after assignment.
            if invert {
                core::mem::swap(&mut in1, &mut in2);
            }
            DriveSignal {
                en_in1: LineOutput::Duty(in1),
                ph_in2: LineOutput::Duty(in2),
            }
        }
    }
}

/// Slow-decay brake pattern for a drive mode.
///
/// Phase/enable mode only touches EN (driven low); dual-PWM mode drives
/// both inputs high.
pub fn brake_signal(mode: DriveMode) -> DriveSignal {
    match mode {
        DriveMode::PhaseEnable => DriveSignal {
            en_in1: LineOutput::Low,
            ph_in2: LineOutput::Keep,
        },
        DriveMode::DualPwm => DriveSignal {
            en_in1: LineOutput::High,
            ph_in2: LineOutput::High,
        },
    }
}
