//! Timed Stage Wrapper - per-stage wall-clock measurement
//!
//! Wraps any processing stage so each invocation emits exactly one
//! [`TimingSample`] into the shared [`MetricsCollector`]. The wrapper is a
//! pure pass-through for data: it never transforms, drops, or reorders what
//! the inner stage returns. Durations come from `std::time::Instant`, a
//! monotonic clock, so system-clock adjustments cannot produce negative
//! samples.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::metrics::MetricsCollector;

/// One wall-clock measurement of a stage's logical unit of work
#[derive(Debug, Clone, Serialize)]
pub struct TimingSample {
    pub label: String,
    pub elapsed_seconds: f64,
}

/// Composition adapter: stage in, instrumented stage out.
///
/// Instantiated once per pipeline leg with a distinct label derived from the
/// configured metrics namespace. The inner stage is any `FnMut(I) -> O`;
/// calling through the wrapper times the call and records one sample.
pub struct TimedStage<S> {
    label: String,
    collector: Arc<MetricsCollector>,
    inner: S,
}

impl<S> TimedStage<S> {
    /// Wrap `inner`, labeling its samples `{namespace}/{stage}`
    pub fn new(namespace: &str, stage: &str, collector: Arc<MetricsCollector>, inner: S) -> Self {
        Self {
            label: format!("{}/{}", namespace, stage),
            collector,
            inner,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the inner stage on one unit of work, emitting one sample
    pub fn call<I, O>(&mut self, input: I) -> O
    where
        S: FnMut(I) -> O,
    {
        let start = Instant::now();
        let output = (self.inner)(input);
        self.collector.record(TimingSample {
            label: self.label.clone(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
        });
        output
    }
}
