//! cogroup_bench - Co-Group-By-Key load test harness
//!
//! Benchmarks a two-stream grouping-by-key join under synthetic,
//! reproducible load.
//!
//! # Modules
//!
//! - [`config`] - App + generator + metrics-destination configuration
//! - [`error`] - Harness error kinds
//! - [`record`] - Record, Bundle, Tag, and grouped-entry types
//! - [`synth`] - Deterministic splittable synthetic source
//! - [`timing`] - Timed stage wrapper
//! - [`cogroup`] - Co-group-by-key engine + ungroup consumer
//! - [`metrics`] - Lock-free timing sample aggregator
//! - [`sink`] - External metrics store client
//! - [`pipeline`] - End-to-end load test runner
//! - [`logging`] - Tracing setup

pub mod cogroup;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod synth;
pub mod timing;

// Convenient re-exports at crate root
pub use cogroup::{CoGroupByKey, ungroup};
pub use config::{AppConfig, BundleSizeDistribution, GeneratorConfig, MetricsConfig};
pub use error::HarnessError;
pub use metrics::{MetricsCollector, MetricsRow};
pub use pipeline::{RunSummary, generate_bundles_parallel, run_load_test};
pub use record::{Bundle, GroupedEntry, GroupedValues, Record, Tag, TaggedRecord};
pub use sink::{MetricsSink, TdMetricsSink};
pub use synth::source::SyntheticSource;
pub use timing::{TimedStage, TimingSample};
