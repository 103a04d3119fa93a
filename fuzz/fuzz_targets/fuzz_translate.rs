//! Fuzz target: `translate`
//!
//! Feeds arbitrary speed bit patterns (NaN, infinities, subnormals),
//! both drive modes, both invert settings and every PWM resolution.
//!
//! Invariants checked:
//! - No panics for any input
//! - Every duty written is within `0..=max_pwm`
//! - Dual-PWM never drives both inputs at once
//!
//! cargo fuzz run fuzz_translate

#![no_main]

use drv8874::DriveMode;
use drv8874::translate::{LineOutput, translate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let speed = f32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let flags = data[4];
    let bits = (data[5] % 16) + 1;
    let max_pwm = ((1u32 << bits) - 1) as u16;

    let mode = if flags & 1 == 0 {
        DriveMode::PhaseEnable
    } else {
        DriveMode::DualPwm
    };
    let invert = flags & 2 != 0;

    let sig = translate(speed, mode, invert, max_pwm);

    for out in [sig.en_in1, sig.ph_in2] {
        if let LineOutput::Duty(d) = out {
            assert!(d <= max_pwm, "duty {d} above max {max_pwm}");
        }
    }

    if mode == DriveMode::DualPwm {
        match (sig.en_in1, sig.ph_in2) {
            (LineOutput::Duty(a), LineOutput::Duty(b)) => {
                assert!(a == 0 || b == 0, "both inputs driven: {a}/{b}");
            }
            other => panic!("dual-PWM produced non-duty output: {other:?}"),
        }
    }
});
