//! Progress state machine for a server-side job.
//!
//! ```text
//! Idle --attach--> Polling --in_progress--> InProgress --completed--> Completed
//!                     |                         |
//!                     +------failed / transport error------> Failed
//! ```
//!
//! The tracker never performs I/O. A driver (see [`crate::poller`]) fetches a
//! snapshot, hands the outcome to [`ProgressTracker::record`] and follows the
//! returned [`TickDecision`].

use crate::error::TransportError;
use crate::models::{JobProgress, JobRef, JobStatus};
use serde::Serialize;
use std::time::Duration;

/// Cadence between status checks while a job is running.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PollState {
    /// No job attached.
    Idle,
    /// Job attached, no snapshot received yet.
    Polling,
    InProgress,
    Completed,
    Failed,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PollState::Completed | PollState::Failed)
    }
}

/// Coarse bucket the UI renders (banner color, icon, messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Processing,
    Completed,
    Failed,
}

/// What the driver should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    Reschedule(Duration),
    Stop,
}

/// Texts shown for each display bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMessages {
    pub processing: String,
    pub completed: String,
    pub failed: String,
    pub processing_description: String,
    pub completed_description: String,
    pub failed_description: String,
}

impl ProgressMessages {
    pub fn tileset_generation() -> Self {
        Self {
            processing: "Generating tileset".into(),
            completed: "Tileset ready".into(),
            failed: "Tileset generation failed".into(),
            processing_description: "Tiles are being generated on the server.".into(),
            completed_description: "The tileset can now be previewed and styled.".into(),
            failed_description: "The server could not generate this tileset.".into(),
        }
    }

    pub fn dataset_ingestion() -> Self {
        Self {
            processing: "Processing dataset".into(),
            completed: "Dataset ready".into(),
            failed: "Dataset processing failed".into(),
            processing_description: "The uploaded file is being ingested.".into(),
            completed_description: "The dataset is ready for tileset generation.".into(),
            failed_description: "The uploaded file could not be processed.".into(),
        }
    }

    pub fn for_job(job: &JobRef) -> Self {
        match job {
            JobRef::DatasetIngestion { .. } => Self::dataset_ingestion(),
            JobRef::TilesetGeneration { .. } => Self::tileset_generation(),
        }
    }

    pub fn title(&self, display: DisplayStatus) -> &str {
        match display {
            DisplayStatus::Processing => self.processing.as_str(),
            DisplayStatus::Completed => self.completed.as_str(),
            DisplayStatus::Failed => self.failed.as_str(),
        }
    }

    /// A server-reported failure and a failed fetch share the failed description.
    pub fn description(&self, display: DisplayStatus) -> &str {
        match display {
            DisplayStatus::Processing => self.processing_description.as_str(),
            DisplayStatus::Completed => self.completed_description.as_str(),
            DisplayStatus::Failed => self.failed_description.as_str(),
        }
    }
}

/// Copyable snapshot of everything a progress indicator needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressView {
    pub job: Option<JobRef>,
    pub state: PollState,
    pub status: JobStatus,
    pub percentage: f64,
    pub display: DisplayStatus,
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    job: Option<JobRef>,
    snapshot: Option<JobProgress>,
    errored: bool,
    interval: Duration,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::with_interval(POLL_INTERVAL)
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            job: None,
            snapshot: None,
            errored: false,
            interval,
        }
    }

    /// Start watching `job`, discarding anything known about a previous job.
    pub fn attach(&mut self, job: JobRef) {
        log::debug!("progress: attached to {job}");
        self.job = Some(job);
        self.snapshot = None;
        self.errored = false;
    }

    pub fn detach(&mut self) {
        if let Some(job) = self.job.take() {
            log::debug!("progress: detached from {job}");
        }
        self.snapshot = None;
        self.errored = false;
    }

    pub fn job(&self) -> Option<JobRef> {
        self.job
    }

    pub fn snapshot(&self) -> Option<&JobProgress> {
        self.snapshot.as_ref()
    }

    /// Fold one fetch outcome for `job` into the state.
    ///
    /// Outcomes for a job other than the attached one are dropped.
    pub fn record(
        &mut self,
        job: JobRef,
        outcome: Result<JobProgress, TransportError>,
    ) -> TickDecision {
        if self.job != Some(job) {
            log::debug!("progress: dropping stale result for {job}");
            return self.next_decision();
        }

        match outcome {
            Ok(progress) => {
                self.snapshot = Some(progress);
            }
            Err(err) => {
                log::warn!("progress: status fetch for {job} failed: {err}");
                self.errored = true;
            }
        }

        let decision = self.next_decision();
        log::debug!(
            "progress: {job} is {:?} at {:.0}% -> {decision:?}",
            self.state(),
            self.percentage()
        );
        decision
    }

    /// Whether another poll should be scheduled from the current state.
    pub fn next_decision(&self) -> TickDecision {
        match self.state() {
            PollState::Idle | PollState::Completed | PollState::Failed => TickDecision::Stop,
            PollState::Polling | PollState::InProgress => TickDecision::Reschedule(self.interval),
        }
    }

    pub fn state(&self) -> PollState {
        if self.job.is_none() {
            return PollState::Idle;
        }
        if self.errored {
            return PollState::Failed;
        }
        match self.snapshot.map(|p| p.status) {
            None => PollState::Polling,
            Some(JobStatus::InProgress) => PollState::InProgress,
            Some(JobStatus::Completed) => PollState::Completed,
            Some(JobStatus::Failed) => PollState::Failed,
        }
    }

    /// Job status as shown to the user; "no snapshot yet" reads as in progress.
    pub fn status(&self) -> JobStatus {
        if self.errored {
            return JobStatus::Failed;
        }
        self.snapshot.map(|p| p.status).unwrap_or_default()
    }

    pub fn percentage(&self) -> f64 {
        self.snapshot
            .map(|p| {
                if p.progress.is_finite() {
                    p.progress.clamp(0.0, 100.0)
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0)
    }

    pub fn display(&self) -> DisplayStatus {
        match self.status() {
            JobStatus::InProgress => DisplayStatus::Processing,
            JobStatus::Completed => DisplayStatus::Completed,
            JobStatus::Failed => DisplayStatus::Failed,
        }
    }

    pub fn title<'a>(&self, messages: &'a ProgressMessages) -> &'a str {
        messages.title(self.display())
    }

    pub fn description<'a>(&self, messages: &'a ProgressMessages) -> &'a str {
        messages.description(self.display())
    }

    pub fn view(&self) -> ProgressView {
        ProgressView {
            job: self.job,
            state: self.state(),
            status: self.status(),
            percentage: self.percentage(),
            display: self.display(),
        }
    }
}
