//! Integration tests for the PatternRunner start/stop/restart contract.
//!
//! The worker runs on a real thread with short real sleeps, so assertions
//! poll with a generous timeout instead of relying on exact timing.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use super::mock_hw::{BLUE, MockPwm, OFF, RED, runner, wait_until};

use reachled::drivers::led_patterns::{RenderMode, RunnerState};
use reachled::error::Error;

const STEP: Duration = Duration::from_millis(5);
const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn stop_on_idle_is_a_noop() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    assert_eq!(r.state(), RunnerState::Idle);
    r.stop().unwrap();
    r.stop().unwrap();
    assert_eq!(r.state(), RunnerState::Idle);
    assert_eq!(r.live_tasks(), 0);
    assert_eq!(pwm.write_count(), 0);
}

#[test]
fn start_runs_one_worker_and_stop_joins_it() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("red,off", STEP, RenderMode::Hold).unwrap();
    assert_eq!(r.live_tasks(), 1);
    assert!(r.is_running());

    assert!(wait_until(TIMEOUT, || pwm.write_count() >= 6));
    r.stop().unwrap();

    assert_eq!(r.live_tasks(), 0);
    assert_eq!(r.state(), RunnerState::Idle);

    let settled = pwm.write_count();
    std::thread::sleep(STEP * 4);
    assert_eq!(pwm.write_count(), settled, "no writes after stop returns");
}

#[test]
fn pattern_renders_colors_in_order() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("red,blue,off", STEP, RenderMode::Hold).unwrap();
    assert!(wait_until(TIMEOUT, || pwm.write_count() >= 7 * 3));
    r.stop().unwrap();

    let frames = pwm.frames();
    let cycle = [RED, BLUE, OFF];
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(*frame, cycle[i % 3], "frame {i}");
    }
}

#[test]
fn restart_replaces_pattern_without_interleaving() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("red", STEP, RenderMode::Hold).unwrap();
    assert!(wait_until(TIMEOUT, || pwm.write_count() >= 3));

    r.start("blue", STEP, RenderMode::Hold).unwrap();
    let boundary = pwm.write_count();
    assert_eq!(r.live_tasks(), 1, "old worker must be joined on restart");
    assert_eq!(r.current_pattern().unwrap().to_string(), "blue");

    assert!(wait_until(TIMEOUT, || pwm.write_count() >= boundary + 9));
    r.stop().unwrap();

    let after = &pwm.writes()[boundary..];
    assert!(!after.is_empty());
    for w in after {
        match w.channel {
            0 => assert_eq!(w.value, 1_000_000, "red channel lit after restart"),
            1 => assert_eq!(w.value, 1_000_000),
            2 => assert_eq!(w.value, 0),
            other => panic!("unexpected channel {other}"),
        }
    }
}

#[test]
fn invalid_pattern_spawns_nothing() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    assert!(matches!(
        r.start("", STEP, RenderMode::Hold),
        Err(Error::InvalidPattern(_))
    ));
    assert!(matches!(
        r.start("red,,blue", STEP, RenderMode::Hold),
        Err(Error::InvalidPattern(_))
    ));
    assert!(matches!(
        r.start("red,bogus", STEP, RenderMode::Pulse),
        Err(Error::UnknownColor(_))
    ));

    assert_eq!(r.state(), RunnerState::Idle);
    assert_eq!(r.live_tasks(), 0);
    assert!(r.current_pattern().is_none());
    assert_eq!(pwm.write_count(), 0);
}

#[test]
fn rejected_restart_keeps_old_pattern_running() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("red", STEP, RenderMode::Hold).unwrap();
    assert!(r.start("nope", STEP, RenderMode::Hold).is_err());

    assert!(r.is_running());
    assert_eq!(r.current_pattern().unwrap().to_string(), "red");
    r.stop().unwrap();
}

#[test]
fn device_error_stops_worker_and_is_reported() {
    let pwm = MockPwm::failing_after(4);
    let mut r = runner(&pwm);

    r.start("red,blue", STEP, RenderMode::Hold).unwrap();
    assert!(wait_until(TIMEOUT, || !r.is_running()));
    assert_eq!(r.live_tasks(), 0);

    let err = r.stop().unwrap_err();
    assert!(err.is_device(), "got {err}");
    // Error already collected; a second stop is a no-op.
    r.stop().unwrap();
}

#[test]
fn worker_panic_is_reraised_by_stop() {
    let pwm = MockPwm::panicking_after(3);
    let mut r = runner(&pwm);

    r.start("red,blue", STEP, RenderMode::Hold).unwrap();
    assert!(wait_until(TIMEOUT, || !r.is_running()));
    assert_eq!(r.live_tasks(), 0);

    let stopped = panic::catch_unwind(AssertUnwindSafe(|| r.stop()));
    assert!(stopped.is_err());
    assert_eq!(r.state(), RunnerState::Idle);
}

#[test]
fn dropping_after_worker_panic_while_unwinding_does_not_abort() {
    let pwm = MockPwm::panicking_after(3);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut r = runner(&pwm);
        r.start("red,blue", STEP, RenderMode::Hold).unwrap();
        assert!(wait_until(TIMEOUT, || !r.is_running()));
        panic!("caller failed with the runner still owning a dead worker");
    }));

    let payload = outcome.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<&str>().copied(),
        Some("caller failed with the runner still owning a dead worker")
    );
    assert_eq!(pwm.write_count(), 3);
}

#[test]
fn dropping_after_worker_panic_only_logs() {
    let pwm = MockPwm::panicking_after(0);
    let mut r = runner(&pwm);
    r.start("green", STEP, RenderMode::Hold).unwrap();
    assert!(wait_until(TIMEOUT, || !r.is_running()));
    drop(r);
    assert_eq!(pwm.write_count(), 0);
}

#[test]
fn pulse_mode_ramps_each_color() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("white", Duration::from_millis(20), RenderMode::Pulse)
        .unwrap();
    assert!(wait_until(TIMEOUT, || pwm.write_count() >= 21 * 3));
    r.stop().unwrap();

    let frames = pwm.frames();
    assert_eq!(frames[0], OFF);
    assert_eq!(frames[10], [0, 0, 0]);
    assert_eq!(frames[20], OFF);
}

#[test]
fn current_pattern_survives_stop() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("cyan,magenta", STEP, RenderMode::Hold).unwrap();
    r.stop().unwrap();
    assert_eq!(
        r.current_pattern().map(ToString::to_string).as_deref(),
        Some("cyan,magenta")
    );
}

#[test]
fn dropping_the_runner_stops_the_worker() {
    let pwm = MockPwm::new();
    {
        let mut r = runner(&pwm);
        r.start("yellow", STEP, RenderMode::Hold).unwrap();
        assert!(wait_until(TIMEOUT, || pwm.write_count() >= 3));
    }
    let settled = pwm.write_count();
    std::thread::sleep(STEP * 4);
    assert_eq!(pwm.write_count(), settled);
}

#[test]
fn foreground_renders_while_idle() {
    let pwm = MockPwm::new();
    let mut r = runner(&pwm);

    r.start("red", STEP, RenderMode::Hold).unwrap();
    r.stop().unwrap();
    let before = pwm.write_count();

    r.renderer().off().unwrap();
    assert_eq!(pwm.write_count(), before + 3);
    assert_eq!(*pwm.frames().last().unwrap(), OFF);
}
