//! Metrics Aggregator/Reporter
//!
//! Collects [`TimingSample`]s from any number of concurrently running stage
//! wrappers and, at run completion, forwards them as raw per-sample rows to
//! an external sink. Collection is lock-free (`crossbeam_queue::SegQueue`,
//! append-only, no cross-sample ordering guarantee); the only blocking I/O
//! in the harness is the final `flush`, which may fail without invalidating
//! the timing data already gathered.

use chrono::Utc;
use crossbeam_queue::SegQueue;
use serde::Serialize;

use crate::error::HarnessError;
use crate::sink::MetricsSink;
use crate::timing::TimingSample;

/// One row handed to the external metrics store.
///
/// `runtime` is the single required float column of the sink schema; the
/// timestamp and stage label ride along for storage-engine addressing.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsRow {
    pub ts_micros: i64,
    pub label: String,
    pub runtime: f64,
}

/// Append-only timing sample aggregator, safe to share across stage threads
#[derive(Default)]
pub struct MetricsCollector {
    samples: SegQueue<TimingSample>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample. Lock-free, callable from any stage thread.
    pub fn record(&self, sample: TimingSample) {
        self.samples.push(sample);
    }

    /// Remove and return every collected sample
    pub fn drain(&self) -> Vec<TimingSample> {
        let mut out = Vec::with_capacity(self.samples.len());
        while let Some(s) = self.samples.pop() {
            out.push(s);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forward all collected samples to the sink as raw per-sample rows.
    ///
    /// No sink configured: logs a warning and returns `Ok(0)` - the run
    /// proceeds, persistence is merely skipped. A rejected send surfaces as
    /// `MetricsSendFailure` and the samples are requeued so the caller can
    /// retry or inspect them; the pipeline's data-correctness result is
    /// unaffected either way.
    pub async fn flush(&self, sink: Option<&dyn MetricsSink>) -> Result<usize, HarnessError> {
        let samples = self.drain();

        let Some(sink) = sink else {
            tracing::warn!(
                samples = samples.len(),
                "No metrics destination configured. Metrics will not be collected"
            );
            return Ok(0);
        };

        let base_ts = Utc::now().timestamp_micros();
        let rows: Vec<MetricsRow> = samples
            .iter()
            .enumerate()
            .map(|(i, s)| MetricsRow {
                // Offset per row: the store keys rows by timestamp
                ts_micros: base_ts + i as i64,
                label: s.label.clone(),
                runtime: s.elapsed_seconds,
            })
            .collect();

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                payload = %serde_json::to_string(&rows).unwrap_or_default(),
                "Metrics rows prepared"
            );
        }

        if let Err(e) = sink.send(&rows).await {
            for s in samples {
                self.samples.push(s);
            }
            return Err(HarnessError::MetricsSendFailure(e));
        }

        tracing::info!(rows = rows.len(), "Flushed timing samples to metrics sink");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSink {
        sent: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl MetricsSink for MockSink {
        async fn send(&self, rows: &[MetricsRow]) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("sink rejected batch");
            }
            self.sent.fetch_add(rows.len(), Ordering::SeqCst);
            Ok(())
        }
    }

    fn sample(label: &str) -> TimingSample {
        TimingSample {
            label: label.to_string(),
            elapsed_seconds: 0.25,
        }
    }

    #[test]
    fn test_concurrent_record_loses_nothing() {
        let collector = Arc::new(MetricsCollector::new());
        let mut handles = Vec::new();
        for t in 0..4 {
            let c = collector.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..250 {
                    c.record(sample(&format!("stage-{}", t)));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(collector.len(), 1000);
    }

    #[tokio::test]
    async fn test_flush_without_sink_is_noop() {
        let collector = MetricsCollector::new();
        collector.record(sample("a"));

        // Must not raise; persistence is skipped, not failed
        let flushed = collector.flush(None).await.expect("no-op flush");
        assert_eq!(flushed, 0);
    }

    #[tokio::test]
    async fn test_flush_sends_raw_rows() {
        let collector = MetricsCollector::new();
        collector.record(sample("a"));
        collector.record(sample("b"));

        let sink = MockSink {
            sent: AtomicUsize::new(0),
            fail: false,
        };
        let flushed = collector.flush(Some(&sink)).await.unwrap();
        assert_eq!(flushed, 2);
        assert_eq!(sink.sent.load(Ordering::SeqCst), 2);
        assert!(collector.is_empty());
    }

    #[tokio::test]
    async fn test_flush_failure_surfaces_and_requeues() {
        let collector = MetricsCollector::new();
        collector.record(sample("a"));

        let sink = MockSink {
            sent: AtomicUsize::new(0),
            fail: true,
        };
        let err = collector.flush(Some(&sink)).await.unwrap_err();
        assert!(matches!(err, HarnessError::MetricsSendFailure(_)));
        // Samples survive the failed send
        assert_eq!(collector.len(), 1);
    }
}
