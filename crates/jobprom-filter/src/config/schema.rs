use std::collections::HashSet;

use serde::Deserialize;

use jobprom_core::error::{JobPromError, Result};

use crate::job_metrics::JobMetricsOptions;
use crate::obs::LabelSchema;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    pub version: u32,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub jobs: Vec<JobAttachment>,
}

impl FiltersConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(JobPromError::UnsupportedVersion);
        }

        let mut seen = HashSet::new();
        for j in &self.jobs {
            j.validate()?;
            if !seen.insert(j.job.as_str()) {
                return Err(JobPromError::Config(format!(
                    "jobs: duplicate attachment for {}",
                    j.job
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default)]
    pub schema: LabelSchema,
}

/// One filter attachment: which job it wraps and the labels it emits.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobAttachment {
    /// Job key, `Type.Method`.
    pub job: String,

    /// Explicit job name label.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub deadline: i64,

    #[serde(default)]
    pub timelimit: i64,
}

impl JobAttachment {
    pub fn validate(&self) -> Result<()> {
        if self.job.trim().is_empty() {
            return Err(JobPromError::Config("jobs[].job must not be empty".into()));
        }
        if matches!(&self.name, Some(n) if n.is_empty()) {
            return Err(JobPromError::Config(format!(
                "jobs[{}].name must not be empty when set",
                self.job
            )));
        }
        if self.deadline < 0 {
            return Err(JobPromError::Config(format!(
                "jobs[{}].deadline must be >= 0",
                self.job
            )));
        }
        if self.timelimit < 0 {
            return Err(JobPromError::Config(format!(
                "jobs[{}].timelimit must be >= 0",
                self.job
            )));
        }
        Ok(())
    }

    pub fn options(&self) -> JobMetricsOptions {
        JobMetricsOptions {
            job_name: self.name.clone(),
            deadline: self.deadline,
            timelimit: self.timelimit,
        }
    }
}
