//! ---
//! drc_section: "03-persistence-logging"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Metrics collection and export utilities."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use prometheus::{
    self, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Shared registry type used across the workspace.
pub type SharedRegistry = Arc<Registry>;

/// Produce a new shared registry.
pub fn new_registry() -> SharedRegistry {
    Arc::new(Registry::new())
}

/// Write the gathered registry to a node-exporter textfile.
///
/// The control step is one-shot, so there is nothing long-lived to scrape;
/// cron-invoked collectors pick the file up instead.
pub fn write_textfile(registry: &SharedRegistry, path: &Path) -> Result<()> {
    let families = registry.gather();
    let encoder = TextEncoder::new();
    let body = encoder
        .encode_to_string(&families)
        .context("failed to encode metrics")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create metrics directory {}", parent.display()))?;
    }
    std::fs::write(path, body)
        .with_context(|| format!("failed to write metrics textfile {}", path.display()))?;
    Ok(())
}

/// Metrics published by the failover control step.
#[derive(Clone)]
pub struct StepMetrics {
    registry: SharedRegistry,
    steps_total: IntCounterVec,
    failovers_total: IntCounterVec,
    notify_failures_total: IntCounter,
    step_duration_seconds: Histogram,
}

impl StepMetrics {
    /// Register the step metric family against the provided registry.
    pub fn new(registry: SharedRegistry) -> Result<Self> {
        let steps_total = IntCounterVec::new(
            Opts::new(
                "r_drc_steps_total",
                "Control steps executed, labelled by terminal outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(steps_total.clone()))?;

        let failovers_total = IntCounterVec::new(
            Opts::new(
                "r_drc_failovers_total",
                "Standby activations issued by the control step",
            ),
            &["standby", "region"],
        )?;
        registry.register(Box::new(failovers_total.clone()))?;

        let notify_failures_total = IntCounter::with_opts(Opts::new(
            "r_drc_notify_failures_total",
            "Notification publishes that failed",
        ))?;
        registry.register(Box::new(notify_failures_total.clone()))?;

        let histogram_opts = HistogramOpts::new(
            "r_drc_step_duration_seconds",
            "Wall-clock duration of one control step",
        )
        .buckets(prometheus::exponential_buckets(0.001, 2.0, 16)?);
        let step_duration_seconds = Histogram::with_opts(histogram_opts)?;
        registry.register(Box::new(step_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            steps_total,
            failovers_total,
            notify_failures_total,
            step_duration_seconds,
        })
    }

    /// Expose the underlying shared registry for convenience.
    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// Record one finished step with its terminal outcome label.
    pub fn observe_step(&self, outcome: &str, duration: Duration) {
        self.steps_total.with_label_values(&[outcome]).inc();
        self.step_duration_seconds.observe(duration.as_secs_f64());
    }

    /// Count a standby activation.
    pub fn record_failover(&self, standby: &str, region: &str) {
        self.failovers_total
            .with_label_values(&[standby, region])
            .inc();
    }

    /// Count a failed notification publish.
    pub fn record_notify_failure(&self) {
        self.notify_failures_total.inc();
    }
}

impl std::fmt::Debug for StepMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counters_are_registered_and_incremented() {
        let registry = new_registry();
        let metrics = StepMetrics::new(registry.clone()).unwrap();
        metrics.observe_step("failover", Duration::from_millis(12));
        metrics.record_failover("app-standby", "eu-west-1");

        let families = registry.gather();
        let steps = families
            .iter()
            .find(|fam| fam.get_name() == "r_drc_steps_total")
            .expect("steps counter registered");
        assert_eq!(steps.get_metric()[0].get_counter().get_value(), 1.0);
    }

    #[test]
    fn textfile_export_writes_prometheus_exposition() {
        let registry = new_registry();
        let metrics = StepMetrics::new(registry.clone()).unwrap();
        metrics.observe_step("healthy", Duration::from_millis(3));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r-drcd.prom");
        write_textfile(&registry, &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("r_drc_steps_total"));
    }
}
