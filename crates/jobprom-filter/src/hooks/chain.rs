use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use jobprom_core::error::{JobPromError, Result};

use crate::config::FiltersConfig;
use crate::job_metrics::JobMetricsFilter;
use crate::obs::JobMetrics;

use super::{ElectStateContext, ElectStateFilter, PerformContext, ServerFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Global,
    /// Job key as rendered by `JobDescriptor`'s `Display` (`Type.Method`).
    Job(String),
}

impl Scope {
    fn applies_to(&self, job_key: &str) -> bool {
        match self {
            Scope::Global => true,
            Scope::Job(k) => k == job_key,
        }
    }
}

/// Registry of lifecycle filters, built once at startup.
#[derive(Default)]
pub struct FilterChain {
    elect: Vec<(Scope, Arc<dyn ElectStateFilter>)>,
    server: Vec<(Scope, Arc<dyn ServerFilter>)>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_elect_state(&mut self, filter: Arc<dyn ElectStateFilter>) {
        self.elect.push((Scope::Global, filter));
    }

    pub fn register_server(&mut self, filter: Arc<dyn ServerFilter>) {
        self.server.push((Scope::Global, filter));
    }

    /// Attach a filter implementing both hook families to every job.
    pub fn attach_global<F>(&mut self, filter: Arc<F>)
    where
        F: ElectStateFilter + ServerFilter + 'static,
    {
        let elect: Arc<dyn ElectStateFilter> = filter.clone();
        self.elect.push((Scope::Global, elect));
        let server: Arc<dyn ServerFilter> = filter;
        self.server.push((Scope::Global, server));
    }

    /// Attach a filter implementing both hook families to one job definition.
    pub fn attach_to_job<F>(&mut self, job_key: impl Into<String>, filter: Arc<F>)
    where
        F: ElectStateFilter + ServerFilter + 'static,
    {
        let job_key = job_key.into();
        let elect: Arc<dyn ElectStateFilter> = filter.clone();
        self.elect.push((Scope::Job(job_key.clone()), elect));
        let server: Arc<dyn ServerFilter> = filter;
        self.server.push((Scope::Job(job_key), server));
    }

    /// Attach one metrics filter per configured job.
    ///
    /// The registry's label schema wins over `metrics.schema` in the config;
    /// a mismatch is logged.
    pub fn from_config(cfg: &FiltersConfig, metrics: Arc<JobMetrics>) -> Result<Self> {
        if cfg.metrics.schema != metrics.schema() {
            tracing::warn!(
                configured = cfg.metrics.schema.as_str(),
                registry = metrics.schema().as_str(),
                "label schema in config differs from registry"
            );
        }

        let mut chain = Self::new();
        for j in &cfg.jobs {
            j.validate()?;
            let filter = Arc::new(JobMetricsFilter::new(Arc::clone(&metrics), j.options()));
            tracing::debug!(job=%j.job, name=?j.name, deadline=j.deadline, timelimit=j.timelimit, "metrics filter attached");
            chain.attach_to_job(j.job.clone(), filter);
        }
        Ok(chain)
    }

    pub fn is_empty(&self) -> bool {
        self.elect.is_empty() && self.server.is_empty()
    }

    /// Run every applicable election filter. Stops at the first error.
    pub fn elect_state(&self, ctx: &ElectStateContext<'_>) -> Result<()> {
        let job_key = ctx.job.to_string();
        for (_, f) in self.elect.iter().filter(|(s, _)| s.applies_to(&job_key)) {
            f.on_state_election(ctx)?;
        }
        Ok(())
    }

    /// Run `body` wrapped by the applicable server filters.
    ///
    /// Before-hooks run in registration order; after-hooks run in reverse for
    /// every filter whose before-hook succeeded, even when the body fails or
    /// panics. A body panic is resumed after the after-hooks have run.
    /// Error precedence: before-hook, then body, then after-hook.
    pub fn perform<F>(&self, ctx: &mut PerformContext<'_>, body: F) -> Result<()>
    where
        F: FnOnce(&PerformContext<'_>) -> Result<()>,
    {
        let job_key = ctx.job.to_string();
        let filters: Vec<&Arc<dyn ServerFilter>> = self
            .server
            .iter()
            .filter(|(s, _)| s.applies_to(&job_key))
            .map(|(_, f)| f)
            .collect();

        let mut entered = 0;
        let mut before_err: Option<JobPromError> = None;
        for f in &filters {
            match f.on_performing(ctx) {
                Ok(()) => entered += 1,
                Err(e) => {
                    before_err = Some(e);
                    break;
                }
            }
        }

        let mut body_panic = None;
        let body_result = match before_err {
            None => {
                let view: &PerformContext<'_> = ctx;
                match panic::catch_unwind(AssertUnwindSafe(|| body(view))) {
                    Ok(res) => res,
                    Err(payload) => {
                        tracing::error!(job_id=%ctx.job_id, job=%job_key, "job body panicked");
                        body_panic = Some(payload);
                        Ok(())
                    }
                }
            }
            Some(_) => Ok(()),
        };
        if let Err(e) = &body_result {
            tracing::debug!(job_id=%ctx.job_id, job=%job_key, err=%e, "job body failed");
        }

        let mut after_err: Option<JobPromError> = None;
        for f in filters[..entered].iter().rev() {
            if let Err(e) = f.on_performed(ctx) {
                if after_err.is_none() {
                    after_err = Some(e);
                }
            }
        }

        if let Some(payload) = body_panic {
            panic::resume_unwind(payload);
        }
        if let Some(e) = before_err {
            return Err(e);
        }
        body_result?;
        match after_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
