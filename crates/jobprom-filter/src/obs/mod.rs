//! Job metric instruments.
//!
//! The three instruments are registered once per [`JobMetrics`] registry.
//! A process builds one registry at startup and shares it by `Arc` with every
//! filter it attaches; names and label schemas are consumed by existing
//! alerting rules and must not change.

pub mod metrics;

use serde::Deserialize;

pub use metrics::{CounterVec, DurationTimer, GaugeVec};

pub const LAST_SUCCESS_METRIC: &str = "hangfire_job_last_success_timestamp_seconds";
pub const DURATION_TOTAL_METRIC: &str = "hangfire_job_duration_seconds_total";
pub const DURATION_COUNT_METRIC: &str = "hangfire_job_duration_seconds_count";

const LAST_SUCCESS_LABELS: &[&str] = &["jobname", "recurringjobid", "deadline"];
const DURATION_LABELS: &[&str] = &["jobname", "recurringjobid"];
const DURATION_TIMELIMIT_LABELS: &[&str] = &["jobname", "recurringjobid", "timelimit"];

/// Which generation of alerting rules the duration metrics are shaped for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum LabelSchema {
    /// Duration total keyed by (`jobname`, `recurringjobid`); no count counter.
    #[default]
    #[serde(rename = "simplified")]
    Simplified,
    /// Duration total and count keyed by (`jobname`, `recurringjobid`, `timelimit`).
    #[serde(rename = "timelimit")]
    TimeLimit,
}

impl LabelSchema {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelSchema::Simplified => "simplified",
            LabelSchema::TimeLimit => "timelimit",
        }
    }

    pub fn has_timelimit(self) -> bool {
        matches!(self, LabelSchema::TimeLimit)
    }
}

/// Registry of the job lifecycle instruments.
#[derive(Debug)]
pub struct JobMetrics {
    schema: LabelSchema,
    pub last_success: GaugeVec,
    pub duration_total: CounterVec,
    /// Present only under [`LabelSchema::TimeLimit`].
    pub duration_count: Option<CounterVec>,
}

impl JobMetrics {
    pub fn new(schema: LabelSchema) -> Self {
        let duration_labels = if schema.has_timelimit() {
            DURATION_TIMELIMIT_LABELS
        } else {
            DURATION_LABELS
        };

        let duration_count = schema.has_timelimit().then(|| {
            CounterVec::new(
                DURATION_COUNT_METRIC,
                "Number of completed job executions",
                DURATION_TIMELIMIT_LABELS,
            )
        });

        Self {
            schema,
            last_success: GaugeVec::new(
                LAST_SUCCESS_METRIC,
                "Unix time of the last successful job run",
                LAST_SUCCESS_LABELS,
            ),
            duration_total: CounterVec::new(
                DURATION_TOTAL_METRIC,
                "Total seconds spent executing the job",
                duration_labels,
            ),
            duration_count,
        }
    }

    pub fn schema(&self) -> LabelSchema {
        self.schema
    }

    /// Render all registered instruments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.last_success.render(&mut out);
        self.duration_total.render(&mut out);
        if let Some(count) = &self.duration_count {
            count.render(&mut out);
        }
        out
    }
}

impl Default for JobMetrics {
    fn default() -> Self {
        Self::new(LabelSchema::default())
    }
}
