//! Job model as seen by lifecycle filters.

use std::fmt;

/// Persisted-parameter key under which recurring jobs store their id.
pub const RECURRING_JOB_ID_PARAM: &str = "RecurringJobId";

/// Reflected signature of a background job.
///
/// The host builds one of these per job definition. Two descriptors built
/// from the same definition compare equal and render identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobDescriptor {
    /// Namespace-qualified type that declares the job method, if any.
    pub type_name: Option<String>,
    /// Job method name.
    pub method: String,
    /// Ordered parameter type names.
    pub parameter_types: Vec<String>,
}

impl JobDescriptor {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            type_name: None,
            method: method.into(),
            parameter_types: Vec::new(),
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_parameters<I, S>(mut self, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_types = parameter_types.into_iter().map(Into::into).collect();
        self
    }
}

/// `Type.Method`, or just `Method` for free functions.
impl fmt::Display for JobDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(t) => write!(f, "{}.{}", t, self.method),
            None => f.write_str(&self.method),
        }
    }
}

/// Job states a host may propose during state election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Enqueued,
    Scheduled,
    Awaiting,
    Processing,
    Succeeded,
    Failed,
    Deleted,
}

impl JobState {
    /// Canonical state name.
    pub fn name(self) -> &'static str {
        match self {
            JobState::Enqueued => "Enqueued",
            JobState::Scheduled => "Scheduled",
            JobState::Awaiting => "Awaiting",
            JobState::Processing => "Processing",
            JobState::Succeeded => "Succeeded",
            JobState::Failed => "Failed",
            JobState::Deleted => "Deleted",
        }
    }

    pub fn is_succeeded(self) -> bool {
        matches!(self, JobState::Succeeded)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
