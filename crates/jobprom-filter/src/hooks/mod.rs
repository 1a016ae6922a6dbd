//! Host extension points.
//!
//! The job host calls into these traits at three points of a job's life:
//! state election, right before the job body runs, and right after it
//! returns. [`FilterChain`] is the registry hosts build at startup and drive
//! per invocation.

pub mod chain;
pub mod context;

pub use chain::FilterChain;
pub use context::{ElectStateContext, PerformContext};

use jobprom_core::error::Result;

/// Observer of proposed state transitions.
pub trait ElectStateFilter: Send + Sync {
    fn on_state_election(&self, ctx: &ElectStateContext<'_>) -> Result<()>;
}

/// Observer wrapped around job execution.
///
/// `on_performed` runs in a finally position: once for every successful
/// `on_performing`, whatever the job body returned.
pub trait ServerFilter: Send + Sync {
    fn on_performing(&self, ctx: &mut PerformContext<'_>) -> Result<()>;
    fn on_performed(&self, ctx: &mut PerformContext<'_>) -> Result<()>;
}
