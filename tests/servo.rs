#![allow(missing_docs)]
//! Host-level tests for a single servo controller.

mod common;

use common::{PwmEvent, RecordingDelay, RecordingPwm, StopOnPoll};
use servo_blocks::config::ServoConfig;
use servo_blocks::hub::PinId;
use servo_blocks::servo::ServoController;
use servo_blocks::stop::NeverStop;
use servo_blocks::sweep::{Sweep, SweepOutcome};

fn new_servo() -> (ServoController<RecordingPwm>, RecordingPwm) {
    let pwm = RecordingPwm::default();
    let servo =
        ServoController::new(PinId(15), pwm.clone(), ServoConfig::DEFAULT).expect("servo");
    (servo, pwm)
}

#[test]
fn construction_sets_period_and_starts_centered_and_inactive() {
    let (servo, pwm) = new_servo();
    assert_eq!(pwm.events(), [PwmEvent::Period(20_000)]);
    assert_eq!(servo.angle(), 90.0);
    assert!(!servo.is_active());
    assert_eq!(servo.pin(), PinId(15));
}

#[test]
fn set_angle_stores_clamped_value_and_writes_pulse() {
    let (mut servo, pwm) = new_servo();

    servo.set_angle(-10.0).expect("write");
    assert_eq!(servo.angle(), 0.0);

    servo.set_angle(200.0).expect("write");
    assert_eq!(servo.angle(), 180.0);

    servo.set_angle(45.0).expect("write");
    assert_eq!(servo.angle(), 45.0);
    assert!(servo.is_active());

    assert_eq!(pwm.pulses(), [500, 2_500, 1_000]);
}

#[test]
fn stop_disables_output_and_keeps_angle() {
    let (mut servo, pwm) = new_servo();
    servo.set_angle(30.0).expect("write");

    servo.stop().expect("disable");

    assert_eq!(servo.angle(), 30.0);
    assert!(!servo.is_active());
    assert_eq!(pwm.events().last(), Some(&PwmEvent::Disabled));
    assert_eq!(pwm.pulses(), [angle_pulse(30.0)]);
}

#[test]
fn hold_resumes_pulses_at_last_angle() {
    let (mut servo, pwm) = new_servo();
    servo.set_angle(120.0).expect("write");
    servo.stop().expect("disable");

    servo.hold().expect("write");

    assert!(servo.is_active());
    assert_eq!(
        pwm.events(),
        [
            PwmEvent::Period(20_000),
            PwmEvent::Pulse(angle_pulse(120.0)),
            PwmEvent::Disabled,
            PwmEvent::Pulse(angle_pulse(120.0)),
        ]
    );
}

#[test]
fn center_moves_to_ninety_degrees() {
    let (mut servo, pwm) = new_servo();
    servo.set_angle(10.0).expect("write");
    servo.center().expect("write");
    assert_eq!(servo.angle(), 90.0);
    assert_eq!(pwm.pulses().last(), Some(&1_500));
    assert_eq!(servo.pulse_us(), 1_500);
}

#[test]
fn full_sweep_terminates_inside_range() {
    let (mut servo, pwm) = new_servo();
    let mut delay = RecordingDelay::default();

    let outcome = servo
        .sweep(Sweep::new(0.0, 180.0, 10.0, 1), &mut delay, NeverStop)
        .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Completed { cycles: 1 });
    assert!((0.0..=180.0).contains(&servo.angle()));
    assert_eq!(pwm.pulses().len(), 181);
    assert_eq!(delay.pauses_ms.len(), 181);
    assert!(delay.pauses_ms.iter().all(|ms| *ms == 10));
}

#[test]
fn stop_input_ends_sweep_after_current_step() {
    let (mut servo, pwm) = new_servo();
    let mut delay = RecordingDelay::default();
    let mut stop = StopOnPoll::new(5);

    let outcome = servo
        .sweep(Sweep::new(0.0, 180.0, 1.0, 3), &mut delay, &mut stop)
        .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Stopped { completed_cycles: 0 });
    assert_eq!(stop.polls, 5);
    assert_eq!(pwm.pulses().len(), 5);
    assert_eq!(delay.pauses_ms, [100; 5]);
    assert_eq!(servo.angle(), 4.0);
}

#[test]
fn stop_during_later_cycle_reports_finished_cycles() {
    let (mut servo, _pwm) = new_servo();
    let mut delay = RecordingDelay::default();

    // 0..=10 is 11 steps; the 13th step is on the way back.
    let outcome = servo
        .sweep(Sweep::new(0.0, 10.0, 5.0, 4), &mut delay, StopOnPoll::new(13))
        .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Stopped { completed_cycles: 1 });
    assert_eq!(servo.angle(), 8.0);
}

#[test]
fn stop_seen_after_final_step_still_completes() {
    let (mut servo, pwm) = new_servo();
    let mut delay = RecordingDelay::default();
    let mut stop = StopOnPoll::new(4);

    // 0, 1, 2, 3: the fourth poll follows the last angle.
    let outcome = servo
        .sweep(Sweep::new(0.0, 3.0, 10.0, 1), &mut delay, &mut stop)
        .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Completed { cycles: 1 });
    assert_eq!(stop.polls, 4);
    assert_eq!(pwm.pulses().len(), 4);
    assert_eq!(servo.angle(), 3.0);
}

#[test]
fn async_stop_seen_after_final_step_still_completes() {
    let (mut servo, _pwm) = new_servo();
    let mut delay = RecordingDelay::default();

    let outcome = embassy_futures::block_on(servo.sweep_async(
        Sweep::new(0.0, 3.0, 10.0, 1),
        &mut delay,
        StopOnPoll::new(4),
    ))
    .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Completed { cycles: 1 });
}

#[test]
fn degenerate_sweep_completes_after_one_step() {
    let (mut servo, pwm) = new_servo();
    let mut delay = RecordingDelay::default();

    let outcome = servo
        .sweep(Sweep::new(45.0, 45.0, 5.0, 3), &mut delay, NeverStop)
        .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Completed { cycles: 3 });
    assert_eq!(pwm.pulses(), [1_000]);
    assert_eq!(delay.pauses_ms, [20]);
}

#[test]
fn async_sweep_matches_blocking_sweep() {
    let (mut blocking, blocking_pwm) = new_servo();
    let (mut awaiting, awaiting_pwm) = new_servo();
    let sweep = Sweep::new(30.0, 60.0, 4.0, 2);

    let mut blocking_delay = RecordingDelay::default();
    let blocking_outcome = blocking
        .sweep(sweep, &mut blocking_delay, NeverStop)
        .expect("sweep");

    let mut awaiting_delay = RecordingDelay::default();
    let awaiting_outcome = embassy_futures::block_on(awaiting.sweep_async(
        sweep,
        &mut awaiting_delay,
        NeverStop,
    ))
    .expect("sweep");

    assert_eq!(blocking_outcome, awaiting_outcome);
    assert_eq!(blocking_pwm.events(), awaiting_pwm.events());
    assert_eq!(blocking_delay.pauses_ms, awaiting_delay.pauses_ms);
    assert!(awaiting_delay.pauses_ms.iter().all(|ms| *ms == 25));
}

#[test]
fn async_sweep_honors_stop_input() {
    let (mut servo, pwm) = new_servo();
    let mut delay = RecordingDelay::default();

    let outcome = embassy_futures::block_on(servo.sweep_async(
        Sweep::new(180.0, 0.0, 10.0, 1),
        &mut delay,
        StopOnPoll::new(1),
    ))
    .expect("sweep");

    assert_eq!(outcome, SweepOutcome::Stopped { completed_cycles: 0 });
    assert_eq!(pwm.pulses(), [2_500]);
}

fn angle_pulse(degrees: f32) -> u16 {
    servo_blocks::pulse::angle_to_pulse(degrees)
}
