//! Metric label derivation for a job.

use std::borrow::Cow;

use jobprom_core::job::{JobDescriptor, RECURRING_JOB_ID_PARAM};
use jobprom_core::storage::JobParameterStore;

/// Job name label: the explicit name verbatim, otherwise
/// `<job>(<param type>, <param type>, ...)`.
///
/// The derived form depends only on the descriptor, so every invocation of
/// one job definition lands in the same series.
pub fn derive_job_name<'a>(explicit: Option<&'a str>, job: &JobDescriptor) -> Cow<'a, str> {
    match explicit {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("{}({})", job, job.parameter_types.join(", "))),
    }
}

/// Recurring job id label, `""` for ad-hoc runs.
///
/// Hosts that persist parameters as JSON store the id as a JSON string; it
/// is decoded when it parses as one, otherwise the raw value is used.
pub fn recurring_job_id(store: &dyn JobParameterStore, job_id: &str) -> String {
    match store.get_job_parameter(job_id, RECURRING_JOB_ID_PARAM) {
        Some(raw) => serde_json::from_str::<String>(&raw).unwrap_or(raw),
        None => String::new(),
    }
}
