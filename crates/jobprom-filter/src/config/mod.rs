//! Filter attachment config loader (strict parsing).

pub mod schema;

use std::fs;

use jobprom_core::error::{JobPromError, Result};

pub use schema::{FiltersConfig, JobAttachment, MetricsSection};

pub fn load_from_file(path: &str) -> Result<FiltersConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| JobPromError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FiltersConfig> {
    let cfg: FiltersConfig = serde_yaml::from_str(s)
        .map_err(|e| JobPromError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
