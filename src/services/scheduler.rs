//! Single-shot timer scheduling
//!
//! Timers run on the tokio runtime and post [`AppEvent::TimerElapsed`] back
//! onto the event queue when they fire. A [`ScheduledTimer`] owns its task:
//! dropping or cancelling it aborts the task, so nothing fires after the
//! owner is gone.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::services::events::{AppEvent, EventSink};

/// Timer identity, unique per scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Schedules single-shot timers that report through an [`EventSink`]
#[derive(Debug, Clone)]
pub struct Scheduler {
    sink: EventSink,
    next_id: Arc<AtomicU64>,
}

impl Scheduler {
    /// Create a scheduler posting to `sink`
    pub fn new(sink: EventSink) -> Self {
        Self {
            sink,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Schedule a timer firing once after `delay`
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, delay: Duration) -> ScheduledTimer {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let sink = self.sink.clone();
        // deadline is fixed now, not when the task is first polled
        let deadline = tokio::time::Instant::now() + delay;

        tracing::debug!("Scheduling {} in {:?}", id, delay);
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            sink.emit(AppEvent::TimerElapsed(id));
        });

        ScheduledTimer { id, handle }
    }
}

/// Handle to a pending timer; aborts the timer when dropped
#[derive(Debug)]
pub struct ScheduledTimer {
    id: TimerId,
    handle: JoinHandle<()>,
}

impl ScheduledTimer {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Cancel explicitly (same as dropping)
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScheduledTimer {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::debug!("Cancelling {}", self.id);
            self.handle.abort();
        }
    }
}
