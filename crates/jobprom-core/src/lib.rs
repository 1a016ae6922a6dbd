//! jobprom core: the job model the metrics filter observes, the parameter
//! store contract, and the shared error type.
//!
//! This crate carries no metrics or runtime dependencies so that host
//! integrations can implement the storage contract without pulling in the
//! filter itself.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths must surface as `JobPromError`/`Result` so the worker
//! processes hosting the filter never crash on instrumentation.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod job;
pub mod storage;

/// Shared result type.
pub use error::{JobPromError, Result};
pub use job::{JobDescriptor, JobState, RECURRING_JOB_ID_PARAM};
pub use storage::{InMemoryParameterStore, JobParameterStore};
