//! Many workers sharing one filter instance and one registry.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use jobprom_core::{InMemoryParameterStore, JobDescriptor, JobState, RECURRING_JOB_ID_PARAM};
use jobprom_filter::{
    ElectStateContext, FilterChain, JobMetrics, JobMetricsFilter, JobMetricsOptions, LabelSchema,
    PerformContext,
};

const WORKERS: usize = 64;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_invocations_share_series() {
    let metrics = Arc::new(JobMetrics::new(LabelSchema::TimeLimit));
    let mut chain = FilterChain::new();
    chain.attach_global(Arc::new(JobMetricsFilter::new(
        Arc::clone(&metrics),
        JobMetricsOptions::default().with_deadline(60).with_timelimit(10),
    )));
    let chain = Arc::new(chain);

    let store = Arc::new(InMemoryParameterStore::new());
    for i in 0..WORKERS {
        if i % 2 == 0 {
            store.set(i.to_string(), RECURRING_JOB_ID_PARAM, "even");
        }
    }

    let mut handles = Vec::with_capacity(WORKERS);
    for i in 0..WORKERS {
        let chain = Arc::clone(&chain);
        let store = Arc::clone(&store);
        handles.push(tokio::task::spawn_blocking(move || {
            let job = JobDescriptor::new("Sync").with_parameters(["System.Int32"]);
            let job_id = i.to_string();

            let mut ctx = PerformContext::new(&job_id, job.clone(), &*store);
            chain
                .perform(&mut ctx, |_| {
                    std::thread::sleep(Duration::from_millis(10));
                    Ok(())
                })
                .unwrap();

            let elect = ElectStateContext::new(&job_id, job, JobState::Succeeded, &*store);
            chain.elect_state(&elect).unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let count = metrics.duration_count.as_ref().unwrap();
    let half = (WORKERS / 2) as f64;
    assert_eq!(count.get(&["Sync(System.Int32)", "even", "10"]), half);
    assert_eq!(count.get(&["Sync(System.Int32)", "", "10"]), half);
    assert_eq!(count.series_count(), 2);

    let total = metrics.duration_total.get(&["Sync(System.Int32)", "even", "10"]);
    assert!(total >= half * 0.01, "total={total}");

    assert_eq!(metrics.last_success.series_count(), 2);
}
