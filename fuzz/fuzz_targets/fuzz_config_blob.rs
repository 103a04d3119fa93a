//! Fuzz target: `DriverConfig::from_bytes`
//!
//! Stored config blobs come from flash and may be torn or stale. Decoding
//! must never panic, and anything it accepts must pass validation and
//! survive a re-encode.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use drv8874::DriverConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = DriverConfig::from_bytes(data) else {
        return;
    };

    assert!(cfg.validate().is_ok(), "accepted an invalid config");
    assert!(cfg.max_pwm() >= 1);

    if let Ok(bytes) = cfg.to_bytes() {
        assert_eq!(DriverConfig::from_bytes(&bytes).ok(), Some(cfg));
    }
});
