//! Per-call contexts handed to filters by the host.

use jobprom_core::error::{JobPromError, Result};
use jobprom_core::job::{JobDescriptor, JobState};
use jobprom_core::storage::JobParameterStore;

use crate::obs::DurationTimer;

/// State election input: the job and the state it is about to move into.
pub struct ElectStateContext<'a> {
    pub job_id: String,
    pub job: JobDescriptor,
    pub candidate: JobState,
    pub store: &'a dyn JobParameterStore,
}

impl<'a> ElectStateContext<'a> {
    pub fn new(
        job_id: impl Into<String>,
        job: JobDescriptor,
        candidate: JobState,
        store: &'a dyn JobParameterStore,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job,
            candidate,
            store,
        }
    }
}

/// One job execution. The host creates a fresh context per invocation and
/// hands the same value to the before and after hooks.
pub struct PerformContext<'a> {
    pub job_id: String,
    pub job: JobDescriptor,
    pub store: &'a dyn JobParameterStore,
    duration_timer: Option<DurationTimer>,
}

impl<'a> PerformContext<'a> {
    pub fn new(
        job_id: impl Into<String>,
        job: JobDescriptor,
        store: &'a dyn JobParameterStore,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job,
            store,
            duration_timer: None,
        }
    }

    /// Store the in-flight timer. A context carries at most one.
    pub fn put_timer(&mut self, timer: DurationTimer) -> Result<()> {
        if self.duration_timer.is_some() {
            return Err(JobPromError::TimerAlreadyStarted {
                job_id: self.job_id.clone(),
            });
        }
        self.duration_timer = Some(timer);
        Ok(())
    }

    pub fn take_timer(&mut self) -> Option<DurationTimer> {
        self.duration_timer.take()
    }

    pub fn has_timer(&self) -> bool {
        self.duration_timer.is_some()
    }
}
