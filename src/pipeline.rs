//! Load Test Pipeline - generation, timing, join, consume
//!
//! Wires the harness end to end:
//!
//! ```text
//! ┌─────────────┐  bundles   ┌───────────────┐  tagged pc1
//! │ Synthetic   │ ─────────▶ │ TimedStage    │ ──────────────┐
//! │ Source pc1  │  (workers) │ read/pc1      │               ▼
//! └─────────────┘            └───────────────┘        ┌──────────────┐   ┌───────────────┐
//! ┌─────────────┐  bundles   ┌───────────────┐        │ CoGroupByKey │ ─▶│ TimedStage    │
//! │ Synthetic   │ ─────────▶ │ TimedStage    │ ──────▶│   (join)     │   │ ungroup (run) │
//! │ Source pc2  │  (workers) │ read/pc2      │        └──────────────┘   └───────────────┘
//! └─────────────┘            └───────────────┘
//! ```
//!
//! Generation is the only parallel section: splits are pure functions of
//! (config, range), so a small worker pool drains a lock-free task queue with
//! no shared mutable state and no ordering requirement between workers. The
//! join itself runs as a single logical operator.

use std::ops::Range;
use std::sync::Arc;
use std::thread;

use crossbeam_queue::{ArrayQueue, SegQueue};

use crate::cogroup::{CoGroupByKey, ungroup};
use crate::config::AppConfig;
use crate::error::HarnessError;
use crate::metrics::MetricsCollector;
use crate::record::{Bundle, Tag, TaggedRecord};
use crate::synth::source::SyntheticSource;
use crate::timing::TimedStage;

/// Fallback metrics namespace when no destination table is configured
const DEFAULT_NAMESPACE: &str = "co_gbk";

// ============================================================
// RUN SUMMARY
// ============================================================

/// Result of one load-test run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub pc1_records: u64,
    pub pc2_records: u64,
    pub distinct_keys: u64,
    /// Elements emitted after ungrouping; must equal pc1 + pc2 record counts
    pub output_elements: u64,
}

// ============================================================
// PARALLEL SPLIT GENERATION
// ============================================================

/// Materialize a source's planned splits across a worker pool.
///
/// Bundles come back in plan order regardless of which worker produced them,
/// so the output is indistinguishable from a sequential `source.generate()`.
pub fn generate_bundles_parallel(source: &SyntheticSource, workers: usize) -> Vec<Bundle> {
    let splits = source.plan_splits();
    if splits.is_empty() {
        return Vec::new();
    }

    let tasks: ArrayQueue<(usize, Range<u64>)> = ArrayQueue::new(splits.len());
    for task in splits.into_iter().enumerate() {
        // Queue sized to the plan, push cannot fail
        let _ = tasks.push(task);
    }
    let num_tasks = tasks.len();
    let produced: SegQueue<(usize, Bundle)> = SegQueue::new();

    let pool_size = workers.max(1).min(num_tasks);
    thread::scope(|s| {
        for _ in 0..pool_size {
            s.spawn(|| {
                while let Some((ordinal, range)) = tasks.pop() {
                    produced.push((ordinal, source.generate_range(range)));
                }
            });
        }
    });

    let mut slots: Vec<Option<Bundle>> = (0..num_tasks).map(|_| None).collect();
    while let Some((ordinal, bundle)) = produced.pop() {
        slots[ordinal] = Some(bundle);
    }
    // Every ordinal was pushed exactly once
    slots.into_iter().flatten().collect()
}

// ============================================================
// LOAD TEST RUNNER
// ============================================================

/// Run the full co-group-by-key load test.
///
/// Each input leg is timed per bundle; the final ungroup is timed once per
/// run. Timing samples land in `collector` and are flushed by the caller
/// after the run completes.
pub fn run_load_test(
    config: &AppConfig,
    collector: Arc<MetricsCollector>,
) -> Result<RunSummary, HarnessError> {
    let namespace = config
        .metrics
        .table
        .clone()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let pc1_source = SyntheticSource::new(config.input.clone())?;
    let pc2_source = SyntheticSource::new(config.co_input.clone())?;

    let pc1_bundles = generate_bundles_parallel(&pc1_source, config.workers);
    let pc2_bundles = generate_bundles_parallel(&pc2_source, config.workers);
    tracing::info!(
        pc1_bundles = pc1_bundles.len(),
        pc2_bundles = pc2_bundles.len(),
        "Synthetic bundles generated"
    );

    let mut engine = CoGroupByKey::new();
    let mut pc1_records = 0u64;
    let mut pc2_records = 0u64;

    for (tag, bundles, counter) in [
        (Tag::Pc1, pc1_bundles, &mut pc1_records),
        (Tag::Pc2, pc2_bundles, &mut pc2_records),
    ] {
        let mut read_stage = TimedStage::new(
            &namespace,
            &format!("read/{}", tag),
            collector.clone(),
            |bundle: Bundle| -> Vec<TaggedRecord> {
                bundle
                    .records
                    .into_iter()
                    .map(|r| TaggedRecord::new(tag, r))
                    .collect()
            },
        );

        // One timing sample per bundle on the input legs
        for bundle in bundles {
            let tagged = read_stage.call(bundle);
            *counter += tagged.len() as u64;
            engine.extend(tagged);
        }
    }

    let distinct_keys = engine.num_keys() as u64;

    // Final leg: one sample for the whole grouped consume
    let mut consume_stage = TimedStage::new(
        &namespace,
        "ungroup",
        collector.clone(),
        |engine: CoGroupByKey| ungroup(engine.into_entries()).count() as u64,
    );
    let output_elements = consume_stage.call(engine);

    let summary = RunSummary {
        pc1_records,
        pc2_records,
        distinct_keys,
        output_elements,
    };
    tracing::info!(
        pc1 = summary.pc1_records,
        pc2 = summary.pc2_records,
        keys = summary.distinct_keys,
        output = summary.output_elements,
        "Load test run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BundleSizeDistribution, DEFAULT_STREAM_SEED, GeneratorConfig, MetricsConfig,
    };

    fn generator(num_records: u64, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            num_records,
            key_size_bytes: 2,
            value_size_bytes: 2,
            bundle_size_distribution: BundleSizeDistribution::Const { param: 2 },
            force_num_initial_bundles: 0,
            seed,
        }
    }

    fn app_config(input: GeneratorConfig, co_input: GeneratorConfig) -> AppConfig {
        AppConfig {
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            log_file: "test.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
            enable_tracing: false,
            workers: 2,
            input,
            co_input,
            metrics: MetricsConfig::default(),
        }
    }

    #[test]
    fn test_parallel_generation_matches_sequential() {
        let source = SyntheticSource::new(generator(50, DEFAULT_STREAM_SEED)).unwrap();
        let sequential: Vec<_> = source
            .generate()
            .into_iter()
            .flat_map(|b| b.records)
            .collect();

        for workers in [1, 2, 8] {
            let parallel: Vec<_> = generate_bundles_parallel(&source, workers)
                .into_iter()
                .flat_map(|b| b.records)
                .collect();
            assert_eq!(parallel, sequential, "workers={}", workers);
        }
    }

    #[test]
    fn test_output_count_invariant() {
        let cfg = app_config(
            generator(4, DEFAULT_STREAM_SEED),
            generator(4, DEFAULT_STREAM_SEED),
        );
        let collector = Arc::new(MetricsCollector::new());
        let summary = run_load_test(&cfg, collector.clone()).unwrap();

        // 4 + 4 input records -> exactly 8 downstream elements
        assert_eq!(summary.pc1_records, 4);
        assert_eq!(summary.pc2_records, 4);
        assert_eq!(summary.output_elements, 8);

        // 2 bundles per leg + 1 final = 5 samples
        assert_eq!(collector.len(), 5);
    }

    #[test]
    fn test_empty_run() {
        let cfg = app_config(
            generator(0, DEFAULT_STREAM_SEED),
            generator(0, DEFAULT_STREAM_SEED),
        );
        let collector = Arc::new(MetricsCollector::new());
        let summary = run_load_test(&cfg, collector).unwrap();
        assert_eq!(summary.output_elements, 0);
        assert_eq!(summary.distinct_keys, 0);
    }
}
