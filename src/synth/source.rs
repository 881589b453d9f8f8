//! Synthetic record source with a pure split contract
//!
//! Deterministically manufactures key/value records and partitions them into
//! bundles. Any contiguous slice of the logical index space can be
//! materialized independently - `generate_range(start, end)` is a pure
//! function of the config and the endpoints - so an execution layer may fan
//! splits out across workers and concatenate the results without ever
//! materializing the whole stream in one place.

use std::ops::Range;

use crate::config::{BundleSizeDistribution, GeneratorConfig};
use crate::error::HarnessError;
use crate::record::{Bundle, Record};
use crate::synth::lcg::{Lcg48, derive_record_seed};

/// Deterministic synthetic key/value source
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    config: GeneratorConfig,
}

impl SyntheticSource {
    /// Build a source, rejecting configs the generator cannot honor
    pub fn new(config: GeneratorConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn num_records(&self) -> u64 {
        self.config.num_records
    }

    /// Materialize the record at one logical index.
    ///
    /// Each record gets its own PRNG seeded from (stream seed, index), so
    /// records can be produced in any order or on any worker and still come
    /// out byte-identical.
    pub fn record_at(&self, index: u64) -> Record {
        let mut rng = Lcg48::new(derive_record_seed(self.config.seed, index));
        let mut key = vec![0u8; self.config.key_size_bytes];
        let mut value = vec![0u8; self.config.value_size_bytes];
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut value);
        Record { key, value }
    }

    /// Materialize a contiguous index range `[start, end)` as one bundle.
    ///
    /// Pure: no state is shared with any other range, and concatenating
    /// disjoint ranges in index order reproduces a full sequential run.
    pub fn generate_range(&self, range: Range<u64>) -> Bundle {
        debug_assert!(range.end <= self.config.num_records);
        let records: Vec<Record> = range.map(|i| self.record_at(i)).collect();
        let per_record = (self.config.key_size_bytes + self.config.value_size_bytes) as u64;
        Bundle {
            size_estimate_bytes: records.len() as u64 * per_record,
            records,
        }
    }

    /// Plan bundle boundaries over the logical index space.
    ///
    /// `force_num_initial_bundles = B > 0` overrides the distribution: records
    /// are redistributed evenly (+-1) across exactly B bundles. Otherwise the
    /// `const` distribution yields fixed-size bundles with the remainder in
    /// the last one; `param == 0` collapses to one bundle holding everything.
    /// Zero records plan as zero bundles (unless a bundle count is forced, in
    /// which case the forced count wins and every bundle is empty).
    pub fn plan_splits(&self) -> Vec<Range<u64>> {
        let n = self.config.num_records;
        let forced = self.config.force_num_initial_bundles;

        if forced > 0 {
            // b*n/B boundaries: consecutive diffs are floor/ceil of n/B,
            // which keeps all bundle sizes within 1 of each other
            return (0..forced)
                .map(|b| {
                    let start = (b as u128 * n as u128 / forced as u128) as u64;
                    let end = ((b + 1) as u128 * n as u128 / forced as u128) as u64;
                    start..end
                })
                .collect();
        }

        if n == 0 {
            return Vec::new();
        }

        match self.config.bundle_size_distribution {
            BundleSizeDistribution::Const { param: 0 } => vec![0..n],
            BundleSizeDistribution::Const { param } => {
                let mut splits = Vec::with_capacity(n.div_ceil(param) as usize);
                let mut start = 0;
                while start < n {
                    let end = (start + param).min(n);
                    splits.push(start..end);
                    start = end;
                }
                splits
            }
        }
    }

    /// Materialize the whole stream as its planned bundles
    pub fn generate(&self) -> Vec<Bundle> {
        self.plan_splits()
            .into_iter()
            .map(|r| self.generate_range(r))
            .collect()
    }
}
