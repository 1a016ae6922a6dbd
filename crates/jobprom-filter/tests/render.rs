#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use jobprom_core::error::ErrorKind;
use jobprom_filter::{JobMetrics, LabelSchema};

#[test]
fn simplified_schema_exposition() {
    let m = JobMetrics::new(LabelSchema::Simplified);
    m.last_success
        .set(&["SendInvoice()", "", "3600"], 1700000000.0)
        .unwrap();
    m.duration_total.add(&["SendInvoice()", ""], 2.5).unwrap();

    let out = m.render();
    assert!(out.contains("# TYPE hangfire_job_last_success_timestamp_seconds gauge"));
    assert!(out.contains(
        r#"hangfire_job_last_success_timestamp_seconds{jobname="SendInvoice()",recurringjobid="",deadline="3600"} 1700000000"#
    ));
    assert!(out.contains("# TYPE hangfire_job_duration_seconds_total counter"));
    assert!(out.contains(
        r#"hangfire_job_duration_seconds_total{jobname="SendInvoice()",recurringjobid=""} 2.5"#
    ));
    assert!(!out.contains("hangfire_job_duration_seconds_count"));
}

#[test]
fn timelimit_schema_registers_count() {
    let m = JobMetrics::new(LabelSchema::TimeLimit);
    m.duration_count
        .as_ref()
        .unwrap()
        .inc(&["job", "r", "600"])
        .unwrap();

    let out = m.render();
    assert!(out.contains("# TYPE hangfire_job_duration_seconds_count counter"));
    assert!(out.contains(
        r#"hangfire_job_duration_seconds_count{jobname="job",recurringjobid="r",timelimit="600"} 1"#
    ));
}

#[test]
fn label_values_are_escaped() {
    let m = JobMetrics::new(LabelSchema::Simplified);
    m.duration_total.add(&["say \"hi\"", ""], 1.0).unwrap();
    assert!(m.render().contains(r#"jobname="say \"hi\"""#));
}

#[test]
fn wrong_label_count_is_rejected() {
    let m = JobMetrics::new(LabelSchema::Simplified);
    let err = m.duration_total.inc(&["only-one"]).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::LabelMismatch);
    assert_eq!(m.duration_total.series_count(), 0);
}

#[test]
fn counters_ignore_negative_deltas() {
    let m = JobMetrics::new(LabelSchema::Simplified);
    m.duration_total.add(&["a", ""], 3.0).unwrap();
    m.duration_total.add(&["a", ""], -1.0).unwrap();
    assert_eq!(m.duration_total.get(&["a", ""]), 3.0);
}
