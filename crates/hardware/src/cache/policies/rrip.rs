//! Re-Reference Interval Prediction (RRIP) Replacement Policies.
//!
//! Each line carries a re-reference prediction value (RRPV) of `rrpv_bits`
//! bits. Zero predicts a near-immediate re-reference; the maximum predicts a
//! distant one. Hits reset the RRPV to zero. The victim is the lowest way at
//! the maximum RRPV; if no way is there, every line in the set is aged by one
//! until one is.
//!
//! - **SRRIP** inserts with a long interval (`max - 1`).
//! - **BRRIP** inserts with a distant interval (`max`), and with a long
//!   interval only with probability `btp`, which makes it scan-resistant.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ReplacementPolicy;
use crate::common::error::ConfigError;
use crate::config::check_rrpv_bits;

/// RRIP policy state.
#[derive(Debug, Clone)]
pub struct RripPolicy {
    /// RRPV per line, `ways` entries per set.
    rrpv: Vec<u8>,
    ways: usize,
    max: u8,
    /// Probability of a long-interval insertion; `None` for SRRIP.
    btp: Option<f64>,
    rng: StdRng,
}

impl RripPolicy {
    /// Creates a static RRIP policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RrpvBits` unless `rrpv_bits` is in `1..=8`.
    pub fn srrip(sets: usize, ways: usize, rrpv_bits: u32) -> Result<Self, ConfigError> {
        Self::build(sets, ways, rrpv_bits, None, 0)
    }

    /// Creates a bimodal RRIP policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RrpvBits` unless `rrpv_bits` is in `1..=8`.
    pub fn brrip(
        sets: usize,
        ways: usize,
        rrpv_bits: u32,
        btp: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(sets, ways, rrpv_bits, Some(btp), seed)
    }

    fn build(
        sets: usize,
        ways: usize,
        rrpv_bits: u32,
        btp: Option<f64>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        check_rrpv_bits(rrpv_bits)?;
        let max = u8::MAX >> (8 - rrpv_bits);
        Ok(Self {
            rrpv: vec![max; sets * ways],
            ways,
            max,
            btp,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Current RRPV of `way` in `set`.
    pub fn rrpv(&self, set: usize, way: usize) -> u8 {
        self.rrpv[set * self.ways + way]
    }

    /// Largest RRPV (distant re-reference).
    pub const fn max_rrpv(&self) -> u8 {
        self.max
    }

    fn insertion_rrpv(&mut self) -> u8 {
        let long = self.max.saturating_sub(1);
        match self.btp {
            None => long,
            Some(btp) if btp > 0.0 && self.rng.random::<f64>() < btp => long,
            Some(_) => self.max,
        }
    }
}

impl ReplacementPolicy for RripPolicy {
    fn on_access(&mut self, set: usize, way: usize) {
        self.rrpv[set * self.ways + way] = 0;
    }

    fn on_insert(&mut self, set: usize, way: usize) {
        let value = self.insertion_rrpv();
        self.rrpv[set * self.ways + way] = value;
    }

    fn select_victim(&mut self, set: usize) -> usize {
        let max = self.max;
        let lines = &mut self.rrpv[set * self.ways..(set + 1) * self.ways];
        loop {
            if let Some(way) = lines.iter().position(|&v| v >= max) {
                return way;
            }
            for v in lines.iter_mut() {
                *v += 1;
            }
        }
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        self.rrpv[set * self.ways + way] = self.max;
    }

    fn name(&self) -> &'static str {
        if self.btp.is_some() { "brrip" } else { "srrip" }
    }
}
