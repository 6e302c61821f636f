//! Render scheduling
//!
//! [`RenderScheduler`] is a frame-clock driven state machine: requests made
//! between two frames collapse into the latest one, and a paint is held back
//! until the minimum spacing since the previous paint has passed. Hosts with
//! their own frame clock call [`RenderScheduler::on_frame`] from it; others
//! use [`FrameLoop`], which drives the scheduler from a tokio interval.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::eq::EqSnapshot;

/// Default minimum spacing between paints
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything one paint needs
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub snapshot: EqSnapshot,
}

/// Handle to a scheduled paint, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

#[derive(Debug)]
pub struct RenderScheduler {
    min_interval: Duration,
    pending: Option<(FrameTicket, RenderRequest)>,
    next_ticket: u64,
    last_paint: Option<Instant>,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl RenderScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            pending: None,
            next_ticket: 0,
            last_paint: None,
        }
    }

    /// Schedule a paint, replacing any paint not yet taken
    pub fn request(&mut self, request: RenderRequest) -> FrameTicket {
        self.next_ticket += 1;
        let ticket = FrameTicket(self.next_ticket);
        if self.pending.replace((ticket, request)).is_some() {
            tracing::trace!("Render request superseded");
        }
        ticket
    }

    /// Cancel the paint scheduled under `ticket`. A superseded ticket no
    /// longer owns anything and cancelling it has no effect.
    pub fn cancel(&mut self, ticket: FrameTicket) -> bool {
        match &self.pending {
            Some((pending, _)) if *pending == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Called once per host frame. Returns the request to paint now, if any.
    pub fn on_frame(&mut self, now: Instant) -> Option<RenderRequest> {
        let too_soon = self
            .last_paint
            .is_some_and(|last| now.saturating_duration_since(last) < self.min_interval);
        if too_soon {
            return None;
        }
        let (_, request) = self.pending.take()?;
        self.last_paint = Some(now);
        Some(request)
    }
}

/// Drives a [`RenderScheduler`] from a tokio interval.
///
/// The task sleeps while nothing is pending. Shutting down, or dropping the
/// handle, cancels the pending paint and stops the task.
pub struct FrameLoop {
    scheduler: Arc<Mutex<RenderScheduler>>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl FrameLoop {
    pub fn spawn<F>(frame_interval: Duration, mut paint: F) -> Self
    where
        F: FnMut(RenderRequest) + Send + 'static,
    {
        let scheduler = Arc::new(Mutex::new(RenderScheduler::new(frame_interval)));
        let wake = Arc::new(Notify::new());

        let task = tokio::spawn({
            let scheduler = scheduler.clone();
            let wake = wake.clone();
            async move {
                let mut interval = tokio::time::interval(frame_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    if !scheduler.lock().has_pending() {
                        wake.notified().await;
                        continue;
                    }
                    interval.tick().await;
                    let now = tokio::time::Instant::now().into_std();
                    let request = scheduler.lock().on_frame(now);
                    if let Some(request) = request {
                        paint(request);
                    }
                }
            }
        });

        Self {
            scheduler,
            wake,
            task,
        }
    }

    pub fn request(&self, request: RenderRequest) -> FrameTicket {
        let ticket = self.scheduler.lock().request(request);
        self.wake.notify_one();
        ticket
    }

    pub fn cancel(&self, ticket: FrameTicket) -> bool {
        self.scheduler.lock().cancel(ticket)
    }

    pub fn shutdown(self) {
        // Drop does the work
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.scheduler.lock().cancel_all();
        self.task.abort();
    }
}
