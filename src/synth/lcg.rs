//! Explicit-state LCG PRNG for synthetic record payloads
//!
//! The generator's determinism contract requires every record to be a pure
//! function of (stream seed, record index): parallel splits must reproduce
//! the exact bytes of a sequential run with no shared random state. A small
//! 48-bit linear congruential generator with the state held in the struct
//! gives exactly that - each record gets its own `Lcg48` derived from the
//! record's index, so splits never race on a global source.

/// 48-bit linear congruential generator with explicit state
#[derive(Debug, Clone)]
pub struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    const MULTIPLIER: u64 = 0x5DEECE66D;
    const ADDEND: u64 = 0xB;
    const MASK: u64 = (1 << 48) - 1;

    /// Create a generator from a seed.
    ///
    /// The seed is XORed with the multiplier so that small consecutive seeds
    /// (record indices!) do not produce correlated leading outputs.
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ Self::MULTIPLIER) & Self::MASK,
        }
    }

    /// Advance the LCG and return the top `bits` bits of the new state
    fn next(&mut self, bits: u32) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::ADDEND)
            & Self::MASK;
        (self.state >> (48 - bits)) as u32
    }

    /// Fill `buf` with pseudo-random bytes
    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(4) {
            let word = self.next(32).to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

/// Derive the per-record seed from the stream seed and the record's logical
/// index.
///
/// Same multiply-and-fold mixing idiom used for session seeds elsewhere in
/// the benchmark family; the constants only need to decorrelate neighboring
/// indices, not be cryptographic.
pub fn derive_record_seed(stream_seed: u64, index: u64) -> u64 {
    let mut hash: u64 = 1;
    hash = 31u64
        .wrapping_mul(hash)
        .wrapping_add(stream_seed.wrapping_mul(0x9E3779B97F4A7C15));
    hash = 31u64
        .wrapping_mul(hash)
        .wrapping_add(index.wrapping_mul(10037).wrapping_add(198267));
    hash
}
