// driver.rs - Animation loop state machine
//
// The host owns the clock and the frame callbacks. The driver only turns a
// stream of host timestamps into clamped step sizes, and tracks whether a
// callback is pending so `stop` can cancel it.

use tracing::trace;

use crate::error::EngineError;

/// Largest step the simulation ever takes, in seconds.
pub const MAX_STEP_DT: f32 = 0.05;

/// Clamp a raw step to `[0, MAX_STEP_DT]`. NaN becomes 0.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt > 0.0 { dt.min(MAX_STEP_DT) } else { 0.0 }
}

/// Host per-frame callback source (`requestAnimationFrame` in a browser).
pub trait FrameScheduler {
    /// Ask for one more frame callback; returns a handle for cancellation.
    fn request(&mut self) -> Result<u32, EngineError>;
    fn cancel(&mut self, handle: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

#[derive(Debug)]
pub struct AnimationDriver<F> {
    scheduler: F,
    state: DriverState,
    /// Host timestamp of the previous frame, milliseconds.
    last_ts: Option<f64>,
    pending: Option<u32>,
}

impl<F: FrameScheduler> AnimationDriver<F> {
    pub fn new(scheduler: F) -> Self {
        Self { scheduler, state: DriverState::Idle, last_ts: None, pending: None }
    }

    /// Idle -> Running. Does nothing when already running. The next frame
    /// is treated as a first frame, so idle time never becomes a step.
    pub fn start(&mut self) -> Result<bool, EngineError> {
        if self.state == DriverState::Running {
            return Ok(false);
        }
        self.pending = Some(self.scheduler.request()?);
        self.state = DriverState::Running;
        self.last_ts = None;
        Ok(true)
    }

    /// Running -> Idle, cancelling the pending callback.
    pub fn stop(&mut self) -> bool {
        if self.state == DriverState::Idle {
            return false;
        }
        self.halt();
        true
    }

    /// Go idle without the caller asking, e.g. after a failed frame.
    pub fn halt(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.state = DriverState::Idle;
    }

    /// Accept a host callback fired at `timestamp` (ms). Returns the step in
    /// seconds, or `None` when idle and the frame must not run.
    pub fn begin_frame(&mut self, timestamp: f64) -> Option<f32> {
        if self.state != DriverState::Running {
            return None;
        }
        self.pending = None;
        let raw = match self.last_ts {
            Some(prev) => ((timestamp - prev) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ts = Some(timestamp);
        let dt = clamp_dt(raw);
        trace!(timestamp, raw, dt, "frame");
        Some(dt)
    }

    /// Request the next callback if still running. A refused request
    /// leaves the driver idle.
    pub fn end_frame(&mut self) -> Result<(), EngineError> {
        if self.state == DriverState::Running && self.pending.is_none() {
            match self.scheduler.request() {
                Ok(handle) => self.pending = Some(handle),
                Err(err) => {
                    self.state = DriverState::Idle;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    pub fn state(&self) -> DriverState { self.state }
    pub fn is_running(&self) -> bool { self.state == DriverState::Running }
    pub fn pending(&self) -> Option<u32> { self.pending }
    pub fn scheduler(&self) -> &F { &self.scheduler }
}

/// Scheduler that only counts requests; the caller pumps frames by hand.
/// Used by offline rendering and tests.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next: u32,
    pub requested: usize,
    pub cancelled: Vec<u32>,
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> Result<u32, EngineError> {
        self.next = self.next.wrapping_add(1);
        self.requested += 1;
        Ok(self.next)
    }

    fn cancel(&mut self, handle: u32) {
        self.cancelled.push(handle);
    }
}
