//! Background polling of job progress with explicit cancellation.
//!
//! Each poll runs on its own thread and owns a [`ProgressTracker`]. Between
//! ticks the thread waits on a cancellation channel instead of sleeping, so
//! [`PollHandle::cancel`] takes effect immediately. Cancellation is also
//! rechecked after every fetch, before anything is published or rescheduled,
//! so a fetch still in flight when the poll is cancelled is discarded.

use crate::error::TransportError;
use crate::models::{JobProgress, JobRef};
use crate::progress::{POLL_INTERVAL, ProgressTracker, ProgressView, TickDecision};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Anything that can report the current progress of a job.
///
/// Implementations must be safe to call repeatedly and must not cache.
pub trait JobStatusSource: Send + Sync {
    fn fetch_progress(&self, job: &JobRef) -> Result<JobProgress, TransportError>;
}

/// Running (or finished) poll of one job.
///
/// Dropping the handle cancels the poll.
#[derive(Debug)]
pub struct PollHandle {
    job: JobRef,
    cancel: Sender<()>,
    thread: Option<JoinHandle<ProgressView>>,
}

impl PollHandle {
    pub fn job(&self) -> JobRef {
        self.job
    }

    /// True once the poll thread has exited (terminal state or cancelled).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Stop polling without waiting for the thread.
    ///
    /// A fetch in flight keeps running in the background, but its answer is
    /// never published.
    pub fn cancel(mut self) {
        let _ = self.cancel.send(());
        self.thread.take();
    }

    /// Stop polling and wait for the thread to exit, including any fetch in
    /// flight.
    pub fn cancel_and_wait(mut self) {
        let _ = self.cancel.send(());
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }

    /// Wait until the job reaches a terminal state and return the final view.
    ///
    /// Returns `None` if the poll thread panicked (e.g. inside `on_update`).
    pub fn join(mut self) -> Option<ProgressView> {
        self.thread.take().and_then(|t| t.join().ok())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.cancel.send(());
        }
    }
}

/// Start polling `job` on a background thread.
///
/// `on_update` receives a view right away (reading as in progress), then one
/// after every tick. The thread stops on `Completed` or `Failed`, or when the
/// handle is cancelled or dropped.
pub fn spawn_poller<F>(
    source: Arc<dyn JobStatusSource>,
    job: JobRef,
    interval: Duration,
    mut on_update: F,
) -> PollHandle
where
    F: FnMut(ProgressView) + Send + 'static,
{
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

    let thread = thread::spawn(move || {
        let mut tracker = ProgressTracker::with_interval(interval);
        tracker.attach(job);
        on_update(tracker.view());

        loop {
            let outcome = source.fetch_progress(&job);

            if cancelled(&cancel_rx) {
                tracker.detach();
                break;
            }

            let decision = tracker.record(job, outcome);
            on_update(tracker.view());

            match decision {
                TickDecision::Stop => break,
                TickDecision::Reschedule(wait) => match cancel_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        tracker.detach();
                        break;
                    }
                },
            }
        }

        log::debug!("poller for {job} exited in {:?}", tracker.state());
        tracker.view()
    });

    PollHandle {
        job,
        cancel: cancel_tx,
        thread: Some(thread),
    }
}

fn cancelled(rx: &Receiver<()>) -> bool {
    !matches!(rx.try_recv(), Err(TryRecvError::Empty))
}

/// Keeps at most one poll alive, keyed by job.
pub struct PollScheduler {
    source: Arc<dyn JobStatusSource>,
    interval: Duration,
    active: Option<PollHandle>,
}

impl PollScheduler {
    pub fn new(source: Arc<dyn JobStatusSource>) -> Self {
        Self::with_interval(source, POLL_INTERVAL)
    }

    pub fn with_interval(source: Arc<dyn JobStatusSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            active: None,
        }
    }

    /// Watch `job`, cancelling the poll of any other job first.
    ///
    /// Attaching the job that is already being polled is a no-op: the running
    /// poll keeps its original callback and `on_update` is dropped unused.
    /// Attaching a job whose poll has finished starts it again. Never waits for
    /// the cancelled poll's thread.
    pub fn attach<F>(&mut self, job: JobRef, on_update: F)
    where
        F: FnMut(ProgressView) + Send + 'static,
    {
        if let Some(active) = &self.active
            && active.job() == job
            && !active.is_finished()
        {
            return;
        }
        self.detach();
        log::info!("polling progress of {job} every {:?}", self.interval);
        self.active = Some(spawn_poller(
            Arc::clone(&self.source),
            job,
            self.interval,
            on_update,
        ));
    }

    /// Cancel the current poll, if any, without blocking on a fetch in flight.
    pub fn detach(&mut self) {
        if let Some(handle) = self.active.take() {
            log::debug!("cancelling poll of {}", handle.job());
            handle.cancel();
        }
    }

    /// Job currently attached, even if its poll already finished.
    pub fn active_job(&self) -> Option<JobRef> {
        self.active.as_ref().map(PollHandle::job)
    }

    pub fn is_polling(&self) -> bool {
        self.active.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Hand over the current handle, e.g. to `join` it.
    pub fn take_handle(&mut self) -> Option<PollHandle> {
        self.active.take()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.detach();
    }
}
