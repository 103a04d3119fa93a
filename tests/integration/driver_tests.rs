//! Integration tests for speed, direction and brake output.

use crate::mock_hw::{MAX_DUTY, Rig};

use drv8874::adapters::sim::LineWrite;
use drv8874::{DriveMode, DriverConfig, DriverEvent, Error, Line};

#[test]
fn init_configures_pull_up_and_wakes_chip() {
    let rig = Rig::new(DriverConfig::default());
    assert_eq!(rig.bridge.pull_up(), Some(true));
    assert!(rig.bridge.sleep_high());
    assert_eq!(rig.bridge.duty(Line::EnIn1), 0);
    assert_eq!(rig.bridge.duty(Line::PhIn2), 0);
    assert_eq!(
        rig.events().last(),
        Some(&DriverEvent::Initialized {
            fault_pull_up: true
        })
    );
}

#[test]
fn init_honours_external_pull_up() {
    let cfg = DriverConfig {
        fault_pull_up: false,
        ..DriverConfig::default()
    };
    let rig = Rig::new(cfg);
    assert_eq!(rig.bridge.pull_up(), Some(false));
}

#[test]
fn over_drive_is_capped_to_full_forward() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.drv.update_speed(150.0).unwrap();

    assert_eq!(rig.drv.current_speed(), 100.0);
    assert_eq!(rig.bridge.duty(Line::EnIn1), MAX_DUTY);
    assert_eq!(rig.bridge.duty(Line::PhIn2), MAX_DUTY, "phase high");
    assert_eq!(
        rig.events().last(),
        Some(&DriverEvent::SpeedCapped {
            requested: 150.0,
            applied: 100.0
        })
    );
}

#[test]
fn in_range_speed_is_applied_unchanged() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.drv.update_speed(-25.0).unwrap();

    assert_eq!(rig.drv.current_speed(), -25.0);
    assert_eq!(rig.bridge.duty(Line::PhIn2), 0, "phase low");
    assert_eq!(rig.bridge.duty(Line::EnIn1), 63);
    assert_eq!(
        rig.events().last(),
        Some(&DriverEvent::SpeedApplied { speed: -25.0 })
    );
}

#[test]
fn inverted_phase_enable_flips_direction() {
    let cfg = DriverConfig::default().with_invert_direction(true);
    let mut rig = Rig::new(cfg);
    rig.drv.update_speed(60.0).unwrap();
    assert_eq!(rig.bridge.duty(Line::PhIn2), 0);
    rig.drv.update_speed(-60.0).unwrap();
    assert_eq!(rig.bridge.duty(Line::PhIn2), MAX_DUTY);
}

#[test]
fn dual_pwm_inverted_reverse_lands_on_in1() {
    let cfg = DriverConfig::default()
        .with_drive_mode(DriveMode::DualPwm)
        .with_invert_direction(true);
    let mut rig = Rig::new(cfg);
    rig.drv.update_speed(-50.0).unwrap();

    assert_eq!(rig.bridge.duty(Line::EnIn1), 127);
    assert_eq!(rig.bridge.duty(Line::PhIn2), 0);
}

#[test]
fn zero_speed_turns_both_lines_off() {
    for mode in [DriveMode::PhaseEnable, DriveMode::DualPwm] {
        let mut rig = Rig::new(DriverConfig::default().with_drive_mode(mode));
        rig.drv.update_speed(70.0).unwrap();
        rig.drv.update_speed(0.0).unwrap();
        assert_eq!(rig.bridge.duty(Line::EnIn1), 0, "{mode:?}");
        assert_eq!(rig.bridge.duty(Line::PhIn2), 0, "{mode:?}");
        assert_eq!(rig.drv.current_speed(), 0.0);
    }
}

#[test]
fn resolution_is_scaled_onto_hal_channel() {
    // 10-bit logical resolution on a 16-bit timer.
    let cfg = DriverConfig::default().with_pwm_resolution(10);
    let mut rig = Rig::with_max_duty(cfg, u16::MAX);
    assert_eq!(rig.drv.max_pwm(), 1023);

    rig.drv.update_speed(50.0).unwrap();
    let expected = (511u32 * u32::from(u16::MAX) / 1023) as u16;
    assert_eq!(rig.bridge.duty(Line::EnIn1), expected);

    rig.drv.update_speed(100.0).unwrap();
    assert_eq!(rig.bridge.duty(Line::EnIn1), u16::MAX);
}

#[test]
fn phase_enable_brake_only_touches_enable() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.drv.update_speed(40.0).unwrap();
    rig.bridge.clear_writes();

    rig.drv.brake().unwrap();

    assert_eq!(
        rig.bridge.writes(),
        vec![LineWrite::Duty {
            line: Line::EnIn1,
            duty: 0,
            at_ms: 1_000
        }]
    );
    // Braking is not a speed command.
    assert_eq!(rig.drv.current_speed(), 40.0);
    assert_eq!(rig.events().last(), Some(&DriverEvent::Braked));
}

#[test]
fn dual_pwm_brake_drives_both_high() {
    let mut rig = Rig::new(DriverConfig::default().with_drive_mode(DriveMode::DualPwm));
    rig.drv.update_speed(-40.0).unwrap();
    rig.drv.brake().unwrap();
    assert_eq!(rig.bridge.duty(Line::EnIn1), MAX_DUTY);
    assert_eq!(rig.bridge.duty(Line::PhIn2), MAX_DUTY);
}

#[test]
fn failed_control_write_keeps_previous_speed() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.drv.update_speed(10.0).unwrap();
    rig.bridge.fail_control(Some(Line::PhIn2));

    assert_eq!(
        rig.drv.update_speed(-90.0),
        Err(Error::ControlLine(Line::PhIn2))
    );
    assert_eq!(rig.drv.current_speed(), 10.0);
}

#[test]
fn fault_query_has_no_side_effects() {
    let mut rig = Rig::new(DriverConfig::default());
    assert!(!rig.drv.is_faulted().unwrap());

    rig.bridge.trip_fault();
    assert!(rig.drv.is_faulted().unwrap());
    assert!(rig.drv.is_faulted().unwrap());
    assert!(rig.bridge.writes().is_empty());
    assert!(!rig.drv.is_resetting());
}

#[test]
fn release_returns_pins() {
    let rig = Rig::new(DriverConfig::default());
    let mut pins = rig.drv.release();
    use embedded_hal::digital::OutputPin;
    pins.sleep.set_low().unwrap();
    assert!(!rig.bridge.sleep_high());
}

#[test]
fn log_sink_drives_a_full_cycle() {
    use drv8874::Drv8874;
    use drv8874::adapters::log_sink::LogEventSink;
    use drv8874::adapters::sim::{ManualClock, SimBridge, SimDelay};

    let clock = ManualClock::starting_at(0);
    let (bridge, pins) = SimBridge::new(MAX_DUTY, clock.clone());
    let mut drv = Drv8874::new(
        pins,
        DriverConfig::default(),
        clock.clone(),
        LogEventSink::new(),
    )
    .unwrap();

    drv.init().unwrap();
    drv.update_speed(120.0).unwrap();
    drv.brake().unwrap();
    bridge.trip_fault();
    assert!(drv.reset_blocking(Some(50), &mut SimDelay::new(clock)).unwrap());
    assert!(!bridge.fault_latched());
    assert_eq!(drv.current_speed(), 100.0);
}
