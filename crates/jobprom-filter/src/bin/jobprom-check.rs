//! jobprom-check
//!
//! Loads a filter attachment config, builds the registry and hook chain the
//! way a host would at startup, and prints the exposition header of the
//! registered instruments.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use jobprom_filter::{config, FilterChain, JobMetrics};

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("JOBPROM_CONFIG").ok())
        .unwrap_or_else(|| "jobprom.yaml".to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, kind = e.kind().as_str(), "config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let metrics = Arc::new(JobMetrics::new(cfg.metrics.schema));
    let chain = match FilterChain::from_config(&cfg, Arc::clone(&metrics)) {
        Ok(chain) => chain,
        Err(e) => {
            tracing::error!(%path, "filter chain build failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    for j in &cfg.jobs {
        tracing::info!(
            job = %j.job,
            name = j.name.as_deref().unwrap_or("<derived>"),
            deadline = j.deadline,
            timelimit = j.timelimit,
            "attachment"
        );
    }
    tracing::info!(
        %path,
        schema = metrics.schema().as_str(),
        attached = cfg.jobs.len(),
        empty = chain.is_empty(),
        "config ok"
    );

    print!("{}", metrics.render());
    ExitCode::SUCCESS
}
