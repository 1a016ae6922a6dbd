//! Top-level facade crate for jobprom.
//!
//! Re-exports the job model and the metrics filter so hosts can depend on a single crate.

pub mod core {
    pub use jobprom_core::*;
}

pub mod filter {
    pub use jobprom_filter::*;
}
