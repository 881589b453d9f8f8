//! Synthetic Source Module
//!
//! Deterministic test data generation for the co-group load pipeline.
//!
//! # Components
//!
//! - [`lcg`] - Explicit-state LCG PRNG with per-record seed derivation
//! - [`source`] - Splittable bundle generator

pub mod lcg;
pub mod source;
