//! Clock and one-shot timer ports.
//!
//! The browser implementations wrap `Date.now()` and `setTimeout` (through
//! `gloo-timers`). Outside the browser the clock falls back to the system
//! time and scheduled tasks never fire, which keeps SSR free of timers.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

/// Largest delay a browser timeout accepts (`2^31 - 1` ms).
pub const MAX_TIMEOUT_MS: i64 = i32::MAX as i64;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock of the current platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        #[cfg(feature = "hydrate")]
        {
            js_sys::Date::now() as i64
        }
        #[cfg(not(feature = "hydrate"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_millis() as i64)
        }
    }
}

/// Handle to a pending one-shot task. Cancelling or dropping it prevents the
/// task from running.
#[must_use = "dropping a scheduled task cancels it"]
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A handle for a task that will never run.
    pub fn never() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Runs a task once after a delay.
pub trait Scheduler {
    fn schedule(&self, delay_ms: i64, task: Box<dyn FnOnce()>) -> ScheduledTask;
}

/// Clamp a millisecond delay into the range a browser timeout accepts.
pub fn clamp_delay(delay_ms: i64) -> u32 {
    u32::try_from(delay_ms.clamp(0, MAX_TIMEOUT_MS)).unwrap_or(0)
}

/// `setTimeout`-backed scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: i64, task: Box<dyn FnOnce()>) -> ScheduledTask {
        #[cfg(feature = "hydrate")]
        {
            let timeout = gloo_timers::callback::Timeout::new(clamp_delay(delay_ms), task);
            ScheduledTask::new(move || drop(timeout.cancel()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (clamp_delay(delay_ms), task);
            ScheduledTask::never()
        }
    }
}

#[cfg(test)]
pub(crate) use manual::ManualTimers;
