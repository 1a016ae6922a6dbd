//! Minimal labeled metrics client.
//!
//! Counter and gauge vectors keyed by an ordered tuple of label values and
//! backed by `DashMap`. Each series is an `f64` stored as bits in an atomic, so
//! concurrent updates to one series never take a lock. Label names are fixed
//! at registration; values are positional.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

use jobprom_core::error::{JobPromError, Result};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// `f64` cell with atomic set/add.
#[derive(Debug, Default)]
pub(crate) struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    fn add(&self, v: f64) {
        // fetch_update only fails if the closure returns None.
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + v).to_bits())
            });
    }
}

/// Registration data shared by every instrument type.
#[derive(Debug)]
struct Desc {
    name: &'static str,
    help: &'static str,
    label_names: &'static [&'static str],
}

impl Desc {
    fn key(&self, labels: &[&str]) -> Result<Vec<String>> {
        if labels.len() != self.label_names.len() {
            return Err(JobPromError::LabelMismatch {
                metric: self.name,
                expected: self.label_names.len(),
                got: labels.len(),
            });
        }
        Ok(labels.iter().map(|v| v.to_string()).collect())
    }

    fn render(
        &self,
        kind: &str,
        series: &DashMap<Vec<String>, Arc<AtomicF64>>,
        out: &mut String,
    ) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} {}", self.name, kind);

        let mut lines: Vec<String> = series
            .iter()
            .map(|r| {
                let label_str = self
                    .label_names
                    .iter()
                    .zip(r.key().iter())
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}{{{}}} {}", self.name, label_str, r.value().load())
            })
            .collect();
        lines.sort();
        for l in lines {
            let _ = writeln!(out, "{l}");
        }
    }
}

/// Monotonically increasing counter with labels.
#[derive(Debug)]
pub struct CounterVec {
    desc: Desc,
    map: DashMap<Vec<String>, Arc<AtomicF64>>,
}

impl CounterVec {
    pub fn new(
        name: &'static str,
        help: &'static str,
        label_names: &'static [&'static str],
    ) -> Self {
        Self {
            desc: Desc {
                name,
                help,
                label_names,
            },
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.desc.label_names
    }

    fn series(&self, labels: &[&str]) -> Result<Arc<AtomicF64>> {
        let key = self.desc.key(labels)?;
        let cell = self.map.entry(key).or_insert_with(Arc::default);
        Ok(Arc::clone(cell.value()))
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[&str]) -> Result<()> {
        self.add(labels, 1.0)
    }

    /// Increment by an arbitrary value. Negative or NaN deltas are ignored.
    pub fn add(&self, labels: &[&str], v: f64) -> Result<()> {
        let cell = self.series(labels)?;
        if v >= 0.0 {
            cell.add(v);
        }
        Ok(())
    }

    /// Start a timer that adds its elapsed seconds to this series on `stop`.
    pub fn start_timer(&self, labels: &[&str]) -> Result<DurationTimer> {
        let cell = self.series(labels)?;
        Ok(DurationTimer {
            cell,
            labels: labels.iter().map(|v| v.to_string()).collect(),
            started: Instant::now(),
        })
    }

    /// Current value; `0.0` for a series never touched.
    pub fn get(&self, labels: &[&str]) -> f64 {
        self.desc
            .key(labels)
            .ok()
            .and_then(|k| self.map.get(&k).map(|r| r.value().load()))
            .unwrap_or(0.0)
    }

    /// Number of distinct label combinations seen.
    pub fn series_count(&self) -> usize {
        self.map.len()
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, out: &mut String) {
        self.desc.render("counter", &self.map, out);
    }
}

/// Gauge with labels.
#[derive(Debug)]
pub struct GaugeVec {
    desc: Desc,
    map: DashMap<Vec<String>, Arc<AtomicF64>>,
}

impl GaugeVec {
    pub fn new(
        name: &'static str,
        help: &'static str,
        label_names: &'static [&'static str],
    ) -> Self {
        Self {
            desc: Desc {
                name,
                help,
                label_names,
            },
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.desc.label_names
    }

    pub fn set(&self, labels: &[&str], v: f64) -> Result<()> {
        let key = self.desc.key(labels)?;
        self.map.entry(key).or_insert_with(Arc::default).value().store(v);
        Ok(())
    }

    /// Set to the current Unix time in seconds. Returns the value written.
    pub fn set_to_current_time(&self, labels: &[&str]) -> Result<f64> {
        let now = unix_now_secs();
        self.set(labels, now)?;
        Ok(now)
    }

    /// Current value, or `None` for a series never set.
    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        let key = self.desc.key(labels).ok()?;
        self.map.get(&key).map(|r| r.value().load())
    }

    pub fn series_count(&self) -> usize {
        self.map.len()
    }

    /// Render in Prometheus text exposition format.
    pub(crate) fn render(&self, out: &mut String) {
        self.desc.render("gauge", &self.map, out);
    }
}

/// In-flight duration measurement against one counter series.
///
/// Created by [`CounterVec::start_timer`]. `stop` consumes the handle, so a
/// timer can be released at most once.
#[must_use = "a duration timer records nothing until stopped"]
#[derive(Debug)]
pub struct DurationTimer {
    cell: Arc<AtomicF64>,
    labels: Vec<String>,
    started: Instant,
}

impl DurationTimer {
    /// Label values captured at start.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Add the elapsed seconds to the counter and return them.
    pub fn stop(self) -> f64 {
        let elapsed = self.elapsed_secs();
        self.cell.add(elapsed);
        elapsed
    }
}

/// Wall-clock Unix time in fractional seconds. A clock before the epoch reads as 0.
pub fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
