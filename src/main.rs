//! cogroup_bench - Co-Group-By-Key load test entry point
//!
//! Bootstrap order:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐
//! │  Config  │───▶│ Pipeline │───▶│ CoGroupBy │───▶│  Flush   │
//! │  (YAML)  │    │ (timed)  │    │ Key+Count │    │ (metrics)│
//! └──────────┘    └──────────┘    └───────────┘    └──────────┘
//! ```
//!
//! A missing or partial metrics destination never fails the run: the join
//! executes and its correctness summary is logged either way; only
//! persistence is skipped.

use std::sync::Arc;

use cogroup_bench::config::AppConfig;
use cogroup_bench::error::HarnessError;
use cogroup_bench::logging::init_logging;
use cogroup_bench::metrics::MetricsCollector;
use cogroup_bench::pipeline::run_load_test;
use cogroup_bench::sink::{MetricsSink, TdMetricsSink};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

async fn connect_sink(config: &AppConfig) -> Result<TdMetricsSink, HarnessError> {
    let Some((dsn, database, table)) = config.metrics.destination() else {
        return Err(HarnessError::MetricsSinkUnavailable(
            "one or more destination parameters are empty".to_string(),
        ));
    };
    TdMetricsSink::connect(dsn, database, table)
        .await
        .map_err(|e| HarnessError::MetricsSinkUnavailable(e.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        env = %env,
        "cogroup_bench starting"
    );

    // Connect the sink up front so schema problems surface before the run,
    // but degrade to "metrics disabled" instead of aborting
    let sink: Option<TdMetricsSink> = match connect_sink(&config).await {
        Ok(sink) => Some(sink),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics will not be collected");
            None
        }
    };

    let collector = Arc::new(MetricsCollector::new());

    let start = std::time::Instant::now();
    let summary = run_load_test(&config, collector.clone())?;
    tracing::info!(
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Pipeline finished"
    );

    let expected = summary.pc1_records + summary.pc2_records;
    if summary.output_elements != expected {
        anyhow::bail!(
            "Output element count {} does not match input record total {}",
            summary.output_elements,
            expected
        );
    }

    collector
        .flush(sink.as_ref().map(|s| s as &dyn MetricsSink))
        .await?;

    Ok(())
}
