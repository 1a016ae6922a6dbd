//! jobprom filter library entry.
//!
//! This crate wires the metric instruments, label derivation, and the job
//! metrics filter into the hook chain a job host drives. It is intended to
//! be consumed by host integrations, by the `jobprom-check` binary, and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod hooks;
pub mod job_metrics;
pub mod naming;
pub mod obs;

pub use hooks::{ElectStateContext, ElectStateFilter, FilterChain, PerformContext, ServerFilter};
pub use job_metrics::{JobMetricsFilter, JobMetricsOptions};
pub use obs::{JobMetrics, LabelSchema};
