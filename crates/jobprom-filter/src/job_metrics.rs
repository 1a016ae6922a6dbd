//! The job metrics filter.
//!
//! Records last-success time on state election and execution duration around
//! the job body. The filter holds only immutable configuration and a handle
//! to the shared registry; the in-flight timer lives in the per-invocation
//! [`PerformContext`], so one filter instance serves any number of concurrent
//! workers.

use std::sync::Arc;

use jobprom_core::error::{JobPromError, Result};

use crate::hooks::{ElectStateContext, ElectStateFilter, PerformContext, ServerFilter};
use crate::naming::{derive_job_name, recurring_job_id};
use crate::obs::JobMetrics;

/// Attachment-time settings, immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobMetricsOptions {
    /// Explicit job name label. `None` derives it from the job signature.
    pub job_name: Option<String>,
    /// Freshness budget in seconds, emitted as the `deadline` label.
    pub deadline: i64,
    /// Duration budget in seconds, emitted as the `timelimit` label.
    pub timelimit: i64,
}

impl JobMetricsOptions {
    pub fn named(job_name: impl Into<String>) -> Self {
        Self {
            job_name: Some(job_name.into()),
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_timelimit(mut self, timelimit: i64) -> Self {
        self.timelimit = timelimit;
        self
    }
}

pub struct JobMetricsFilter {
    metrics: Arc<JobMetrics>,
    opts: JobMetricsOptions,
    deadline_label: String,
    timelimit_label: String,
}

impl JobMetricsFilter {
    pub fn new(metrics: Arc<JobMetrics>, opts: JobMetricsOptions) -> Self {
        Self {
            deadline_label: opts.deadline.to_string(),
            timelimit_label: opts.timelimit.to_string(),
            metrics,
            opts,
        }
    }
}

impl ElectStateFilter for JobMetricsFilter {
    fn on_state_election(&self, ctx: &ElectStateContext<'_>) -> Result<()> {
        if !ctx.candidate.is_succeeded() {
            return Ok(());
        }

        let job_name = derive_job_name(self.opts.job_name.as_deref(), &ctx.job);
        let recurring_id = recurring_job_id(ctx.store, &ctx.job_id);

        let ts = self.metrics.last_success.set_to_current_time(&[
            &*job_name,
            recurring_id.as_str(),
            self.deadline_label.as_str(),
        ])?;
        tracing::debug!(
            job_id=%ctx.job_id,
            job=%job_name,
            recurring=%recurring_id,
            ts,
            "last success recorded"
        );
        Ok(())
    }
}

impl ServerFilter for JobMetricsFilter {
    fn on_performing(&self, ctx: &mut PerformContext<'_>) -> Result<()> {
        let job_name = derive_job_name(self.opts.job_name.as_deref(), &ctx.job);
        let recurring_id = recurring_job_id(ctx.store, &ctx.job_id);

        let (job, recurring) = (&*job_name, recurring_id.as_str());
        let timer = if self.metrics.schema().has_timelimit() {
            self.metrics
                .duration_total
                .start_timer(&[job, recurring, self.timelimit_label.as_str()])?
        } else {
            self.metrics.duration_total.start_timer(&[job, recurring])?
        };
        ctx.put_timer(timer)?;

        tracing::trace!(job_id=%ctx.job_id, job=%job_name, "duration timer started");
        Ok(())
    }

    fn on_performed(&self, ctx: &mut PerformContext<'_>) -> Result<()> {
        let Some(timer) = ctx.take_timer() else {
            tracing::error!(job_id=%ctx.job_id, job=%ctx.job, "after-execution hook without a started timer");
            return Err(JobPromError::TimerMissing {
                job_id: ctx.job_id.clone(),
            });
        };

        // Labels were captured at start; reuse them for the count series.
        let labels = timer.labels().to_vec();
        let elapsed = timer.stop();

        if let Some(count) = &self.metrics.duration_count {
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            count.inc(&labels)?;
        }

        tracing::debug!(job_id=%ctx.job_id, job=%ctx.job, elapsed, "job duration recorded");
        Ok(())
    }
}
