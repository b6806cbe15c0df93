//! Background LED pattern runner.
//!
//! A pattern is a comma-delimited list of color names, e.g.
//! `"red,blue,off"`. The runner renders it color by color, forever, on a
//! dedicated worker thread until told to stop.
//!
//! ## State machine
//!
//! ```text
//!            start(p)                     start(p')  (stop + join, then spawn)
//!   Idle ─────────────▶ Running ──────────────────────────┐
//!    ▲                    │  ▲                            │
//!    │     stop (join)    │  └────────────────────────────┘
//!    └────────────────────┘
//! ```
//!
//! Cancellation is cooperative: the worker checks its flag before every
//! color, so a stop waits at most for the in-flight hold or pulse. At most
//! one worker exists at any time. Dropping the runner stops it; a worker
//! panic is re-raised by [`PatternRunner::stop`] but only logged on drop.
//!
//! ## Rendering modes
//!
//! | Mode  | Per color                                 |
//! |-------|-------------------------------------------|
//! | Hold  | full brightness, then sleep `delay`       |
//! | Pulse | ramp 0 → 100 % → 0 over `delay`           |

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{Delay, PwmDevice};
use crate::color::ColorTable;
use crate::drivers::renderer::{FULL_POWER, Renderer};
use crate::error::{Error, Result};

/// Separator between color names in a pattern string.
pub const PATTERN_DELIMITER: char = ',';

const WORKER_THREAD_NAME: &str = "led-pattern";

// ── Pattern ───────────────────────────────────────────────────

/// Ordered, non-empty list of color names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    colors: Vec<String>,
}

impl Pattern {
    /// Split `s` on [`PATTERN_DELIMITER`]. Empty strings and empty segments
    /// (`"red,,blue"`, `"red,"`) are rejected; names are not trimmed.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidPattern("pattern is empty"));
        }
        let colors: Vec<String> = s.split(PATTERN_DELIMITER).map(str::to_owned).collect();
        if colors.iter().any(String::is_empty) {
            return Err(Error::InvalidPattern("pattern has an empty color segment"));
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Fail with [`Error::UnknownColor`] on the first name missing from
    /// `table`.
    pub fn validate(&self, table: &ColorTable) -> Result<()> {
        match self.colors.iter().find(|c| !table.contains(c)) {
            Some(unknown) => Err(Error::UnknownColor(unknown.clone())),
            None => Ok(()),
        }
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.colors.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATTERN_DELIMITER}")?;
            }
            f.write_str(color)?;
        }
        Ok(())
    }
}

/// Parse a pattern string into its ordered color names.
pub fn parse_pattern(s: &str) -> Result<Vec<String>> {
    Pattern::parse(s).map(|p| p.colors)
}

// ── Runner ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Hold,
    Pulse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
}

/// Counts itself in the runner's live-task counter for as long as it exists.
struct LiveTask(Arc<AtomicUsize>);

impl LiveTask {
    fn register(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveTask {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Worker {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<()>>,
}

pub struct PatternRunner<D, T> {
    renderer: Arc<Renderer<D, T>>,
    worker: Option<Worker>,
    current: Option<Pattern>,
    live: Arc<AtomicUsize>,
}

impl<D, T> PatternRunner<D, T> {
    /// Cancel the worker and wait for it to exit.
    ///
    /// Returns the error the worker died on, if any. A no-op when idle.
    /// A worker panic is re-raised in the caller.
    pub fn stop(&mut self) -> Result<()> {
        match self.join_worker() {
            None => Ok(()),
            Some(Ok(result)) => result,
            Some(Err(panic)) => std::panic::resume_unwind(panic),
        }
    }

    fn join_worker(&mut self) -> Option<thread::Result<Result<()>>> {
        let worker = self.worker.take()?;
        worker.cancel.store(true, Ordering::Release);
        let joined = worker.handle.join();
        if joined.is_ok() {
            info!("pattern: stopped");
        }
        Some(joined)
    }

    /// `Running` while a worker is alive. A worker that exited on a device
    /// error reports `Idle`; its error is returned by the next [`stop`].
    ///
    /// [`stop`]: Self::stop
    pub fn state(&self) -> RunnerState {
        match &self.worker {
            Some(w) if !w.handle.is_finished() => RunnerState::Running,
            _ => RunnerState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunnerState::Running
    }

    /// The most recently started pattern. Kept after `stop` so a caller can
    /// restore it later.
    pub fn current_pattern(&self) -> Option<&Pattern> {
        self.current.as_ref()
    }

    /// Number of pattern worker threads currently alive.
    pub fn live_tasks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn renderer(&self) -> &Arc<Renderer<D, T>> {
        &self.renderer
    }
}

impl<D, T> PatternRunner<D, T>
where
    D: PwmDevice + 'static,
    T: Delay + 'static,
{
    pub fn new(renderer: Arc<Renderer<D, T>>) -> Self {
        Self {
            renderer,
            worker: None,
            current: None,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start rendering `pattern` in the background, replacing any running
    /// pattern.
    ///
    /// The pattern is parsed and checked against the color table first; on
    /// failure the current state is left untouched. A running worker is
    /// stopped and joined before the new one is spawned, so no render of the
    /// old pattern happens after this returns.
    pub fn start(&mut self, pattern: &str, delay: Duration, mode: RenderMode) -> Result<()> {
        let pattern = Pattern::parse(pattern)?;
        pattern.validate(self.renderer.colors())?;

        if let Err(e) = self.stop() {
            warn!("pattern: previous worker failed: {e}");
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let live = LiveTask::register(&self.live);
        let renderer = Arc::clone(&self.renderer);
        let colors = pattern.colors.clone();
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || {
                let _live = live;
                run_pattern(&renderer, &colors, delay, mode, &flag)
            })
            .map_err(Error::TaskSpawn)?;

        info!("pattern: started '{pattern}' ({mode:?}, delay={delay:?})");
        self.worker = Some(Worker { cancel, handle });
        self.current = Some(pattern);
        Ok(())
    }
}

impl<D, T> Drop for PatternRunner<D, T> {
    // Never re-raise here: a second panic while unwinding aborts.
    fn drop(&mut self) {
        match self.join_worker() {
            None | Some(Ok(Ok(()))) => {}
            Some(Ok(Err(e))) => warn!("pattern: worker failed: {e}"),
            Some(Err(_)) => error!("pattern: worker panicked"),
        }
    }
}

fn run_pattern<D: PwmDevice, T: Delay>(
    renderer: &Renderer<D, T>,
    colors: &[String],
    delay: Duration,
    mode: RenderMode,
    cancel: &AtomicBool,
) -> Result<()> {
    while !cancel.load(Ordering::Acquire) {
        for color in colors {
            if cancel.load(Ordering::Acquire) {
                break;
            }
            let rendered = match mode {
                RenderMode::Hold => renderer.hold(color, delay),
                RenderMode::Pulse => renderer.pulse(color, delay, FULL_POWER),
            };
            if let Err(e) = rendered {
                error!("pattern: aborting on '{color}': {e}");
                return Err(e);
            }
        }
    }
    Ok(())
}
