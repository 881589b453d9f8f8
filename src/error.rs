use thiserror::Error;

/// Harness-level errors.
///
/// Only `InvalidConfig` is fatal before processing starts. The two metrics
/// variants never invalidate the join result: a missing sink downgrades to
/// "metrics disabled", and a failed send is surfaced to the caller after the
/// pipeline has already completed.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("Metrics sink unavailable: {0}")]
    MetricsSinkUnavailable(String),

    #[error("Metrics send failed: {0}")]
    MetricsSendFailure(#[source] anyhow::Error),
}
