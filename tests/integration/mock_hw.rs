//! Mock PWM device for integration tests.
//!
//! Records every duty-cycle write and every delay so tests can assert on the
//! full command history without touching sysfs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reachled::app::ports::{Delay, PwmDevice};
use reachled::color::ColorTable;
use reachled::drivers::led_patterns::PatternRunner;
use reachled::drivers::pwm::PwmChannelDriver;
use reachled::drivers::renderer::Renderer;
use reachled::error::{Error, Result};

// ── Duty write record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyWrite {
    pub channel: u8,
    pub value: u32,
}

// ── MockPwm ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPwm {
    writes: Mutex<Vec<DutyWrite>>,
    /// Writes allowed before every further write fails.
    fail_after: Option<usize>,
    /// Writes allowed before the next write panics.
    panic_after: Option<usize>,
    attempts: AtomicUsize,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_after(n: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_after: Some(n),
            ..Self::default()
        })
    }

    pub fn panicking_after(n: usize) -> Arc<Self> {
        Arc::new(Self {
            panic_after: Some(n),
            ..Self::default()
        })
    }

    pub fn writes(&self) -> Vec<DutyWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Writes grouped into (R, G, B) frames.
    pub fn frames(&self) -> Vec<[u32; 3]> {
        self.writes()
            .chunks_exact(3)
            .map(|c| {
                assert_eq!(
                    [c[0].channel, c[1].channel, c[2].channel],
                    [0, 1, 2],
                    "channels must be written in R, G, B order"
                );
                [c[0].value, c[1].value, c[2].value]
            })
            .collect()
    }
}

impl PwmDevice for MockPwm {
    fn is_exported(&self, _channel: u8) -> bool {
        true
    }

    fn export(&self, _channel: u8) -> Result<()> {
        Ok(())
    }

    fn enable(&self, _channel: u8) -> Result<()> {
        Ok(())
    }

    fn set_period(&self, _channel: u8, _period: u32) -> Result<()> {
        Ok(())
    }

    fn write_duty_cycle(&self, channel: u8, value: u32) -> Result<()> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.panic_after.is_some_and(|limit| n >= limit) {
            panic!("pwm{channel}: device driver crashed");
        }
        if self.fail_after.is_some_and(|limit| n >= limit) {
            return Err(Error::DeviceIo {
                path: format!("pwm{channel}/duty_cycle").into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        self.writes.lock().unwrap().push(DutyWrite { channel, value });
        Ok(())
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Records requested delays and really sleeps for them, so the pattern
/// worker paces itself like it would on hardware.
#[derive(Default)]
pub struct MockDelay {
    sleeps: Mutex<Vec<Duration>>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Delay for MockDelay {
    fn delay(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        std::thread::sleep(duration);
    }
}

// ── Builders ──────────────────────────────────────────────────

pub type MockRenderer = Renderer<Arc<MockPwm>, Arc<MockDelay>>;

pub fn renderer(pwm: &Arc<MockPwm>, delay: &Arc<MockDelay>) -> MockRenderer {
    Renderer::new(
        PwmChannelDriver::new(Arc::clone(pwm)),
        ColorTable::builtin(),
        Arc::clone(delay),
    )
}

#[allow(dead_code)]
pub fn runner(pwm: &Arc<MockPwm>) -> PatternRunner<Arc<MockPwm>, Arc<MockDelay>> {
    PatternRunner::new(Arc::new(renderer(pwm, &MockDelay::new())))
}

/// Poll `cond` until it holds or `timeout` passes.
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

// ── Frames for builtin colors at full power ───────────────────

pub const OFF: [u32; 3] = [1_000_000, 1_000_000, 1_000_000];
pub const RED: [u32; 3] = [0, 1_000_000, 1_000_000];
pub const BLUE: [u32; 3] = [1_000_000, 1_000_000, 0];
pub const WHITE: [u32; 3] = [0, 0, 0];
