//! Job persisted-parameter store contract.
//!
//! Filters only ever read from it; writes belong to the host.

use dashmap::DashMap;

/// Read access to a job's persisted parameters.
pub trait JobParameterStore: Send + Sync {
    /// Returns the raw stored value, or `None` when the parameter is unset.
    fn get_job_parameter(&self, job_id: &str, key: &str) -> Option<String>;
}

/// Thread-safe in-memory parameter store.
///
/// Keys are `(job_id, name)`. Suitable for tests and for hosts that keep
/// job state in process.
#[derive(Default)]
pub struct InMemoryParameterStore {
    params: DashMap<(String, String), String>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self {
            params: DashMap::new(),
        }
    }

    pub fn set(&self, job_id: impl Into<String>, key: impl Into<String>, value: impl Into<String>) {
        let (job_id, key) = (job_id.into(), key.into());
        tracing::trace!(%job_id, %key, "job parameter set");
        self.params.insert((job_id, key), value.into());
    }

    pub fn remove(&self, job_id: &str, key: &str) -> Option<String> {
        self.params
            .remove(&(job_id.to_string(), key.to_string()))
            .map(|(_, v)| v)
    }
}

impl JobParameterStore for InMemoryParameterStore {
    fn get_job_parameter(&self, job_id: &str, key: &str) -> Option<String> {
        self.params
            .get(&(job_id.to_string(), key.to_string()))
            .map(|r| r.value().clone())
    }
}
