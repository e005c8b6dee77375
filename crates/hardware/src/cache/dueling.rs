//! Set Dueling.
//!
//! Set dueling runs two replacement policies side by side in one cache. A few
//! "leader" sets are pinned to policy A, a disjoint few to policy B, and every
//! other set "follows" whichever team is currently winning. The contest is
//! scored by a saturating selection counter (PSEL) that moves only on misses
//! in leader sets.
//!
//! # Leader placement
//!
//! Sets are grouped into constituencies of `constituency_size` consecutive
//! sets. Each constituency shuffles its offsets with a generator seeded from
//! `(seed, constituency index)`, takes the first `leader_sets_per_constituency`
//! offsets for team A and the next as many for team B. Placement is therefore
//! a pure function of the configuration: the same seed always yields the same
//! leaders. `num_leader_sets` caps the leaders per team across the cache;
//! constituencies past the cap hold only followers.
//!
//! # Follower routing
//!
//! With the default polarity (`MissBIncrements`) a team-B leader miss
//! increments PSEL and a team-A leader miss decrements it, so followers run
//! policy A while `PSEL >= midpoint` and policy B otherwise. The inverted
//! polarity swaps both the update and the comparison, so followers always run
//! the team whose leaders miss less.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::common::error::ConfigError;
use crate::config::{DuelingConfig, PselPolarity};
use crate::stats::DuelingStats;

/// One side of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Team {
    /// The first contestant (`policy_a`).
    A,
    /// The second contestant (`policy_b`).
    B,
}

impl Team {
    const fn slot(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Static role of a set in the duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetRole {
    /// Always runs the given team's policy and scores PSEL on misses.
    Leader(Team),
    /// Runs the current winner's policy and never touches PSEL.
    Follower,
}

/// Saturating policy-selection counter.
///
/// Ranges over `[0, 2^bits - 1]` and starts at the midpoint `2^(bits - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Psel {
    value: u32,
    max: u32,
    midpoint: u32,
}

impl Psel {
    /// Widest supported counter.
    pub const MAX_BITS: u32 = 16;

    /// Creates a counter of `bits` bits at its midpoint.
    ///
    /// Returns `None` unless `bits` is in `1..=MAX_BITS`.
    pub const fn new(bits: u32) -> Option<Self> {
        if bits == 0 || bits > Self::MAX_BITS {
            return None;
        }
        let max = (1_u32 << bits) - 1;
        let midpoint = 1_u32 << (bits - 1);
        Some(Self {
            value: midpoint,
            max,
            midpoint,
        })
    }

    /// Current value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Largest representable value.
    #[inline]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reset value and decision threshold.
    #[inline]
    pub const fn midpoint(&self) -> u32 {
        self.midpoint
    }

    /// True when the counter is at or above the midpoint.
    #[inline]
    pub const fn is_upper(&self) -> bool {
        self.value >= self.midpoint
    }

    /// Adds one, saturating at `max`.
    pub const fn increment(&mut self) {
        if self.value < self.max {
            self.value += 1;
        }
    }

    /// Subtracts one, saturating at zero.
    pub const fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Returns the counter to its midpoint.
    pub const fn reset(&mut self) {
        self.value = self.midpoint;
    }
}

/// Assigns a role to every set of a `num_sets`-set cache.
///
/// The configuration is assumed valid (`DuelingConfig::validate`).
pub fn assign_leaders(num_sets: usize, config: &DuelingConfig) -> Vec<SetRole> {
    let mut roles = vec![SetRole::Follower; num_sets];
    let mut per_team = 0_usize;
    for (index, constituency) in roles.chunks_mut(config.constituency_size).enumerate() {
        let take = config
            .leader_sets_per_constituency
            .min(config.num_leader_sets.saturating_sub(per_team));
        let Some(both) = take.checked_mul(2) else {
            break;
        };
        if take == 0 || constituency.len() < both {
            break;
        }
        let mut rng = StdRng::seed_from_u64(constituency_seed(config.seed, index));
        let mut offsets: Vec<usize> = (0..constituency.len()).collect();
        offsets.shuffle(&mut rng);
        for &offset in &offsets[..take] {
            constituency[offset] = SetRole::Leader(Team::A);
        }
        for &offset in &offsets[take..both] {
            constituency[offset] = SetRole::Leader(Team::B);
        }
        per_team += take;
    }
    roles
}

fn constituency_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Set-dueling selector: static leader roles plus live PSEL.
#[derive(Debug, Clone)]
pub struct DuelingSelector {
    roles: Vec<SetRole>,
    psel: Psel,
    polarity: PselPolarity,
    winner: Team,
    leader_misses: [u64; 2],
    follower_accesses: [u64; 2],
    flips: u64,
}

impl DuelingSelector {
    /// Builds a selector for a cache of `num_sets` sets.
    ///
    /// # Errors
    ///
    /// Returns the first constraint of `config` that `num_sets` violates.
    pub fn new(num_sets: usize, config: &DuelingConfig) -> Result<Self, ConfigError> {
        config.validate(num_sets)?;
        let roles = assign_leaders(num_sets, config);
        let psel = Psel::new(config.psel_bits).ok_or(ConfigError::PselBits(config.psel_bits))?;
        let mut selector = Self {
            roles,
            psel,
            polarity: config.polarity,
            winner: Team::A,
            leader_misses: [0; 2],
            follower_accesses: [0; 2],
            flips: 0,
        };
        selector.winner = selector.compute_winner();
        tracing::debug!(
            num_sets,
            leaders_a = selector.leader_sets(Team::A).len(),
            leaders_b = selector.leader_sets(Team::B).len(),
            psel_bits = config.psel_bits,
            seed = config.seed,
            "set dueling configured"
        );
        Ok(selector)
    }

    /// Static role of `set`: leader for A, leader for B, or follower.
    ///
    /// `None` when `set` is not a set of this cache.
    #[inline]
    pub fn policy_for_set(&self, set: usize) -> Option<SetRole> {
        self.roles.get(set).copied()
    }

    /// Team whose policy `set` runs right now, or `None` for an unknown set.
    #[inline]
    pub fn resolve(&self, set: usize) -> Option<Team> {
        self.roles.get(set).map(|role| match *role {
            SetRole::Leader(team) => team,
            SetRole::Follower => self.winner,
        })
    }

    /// Team followers currently run.
    #[inline]
    pub const fn winner(&self) -> Team {
        self.winner
    }

    /// Selection counter.
    #[inline]
    pub const fn psel(&self) -> &Psel {
        &self.psel
    }

    /// PSEL update polarity.
    pub const fn polarity(&self) -> PselPolarity {
        self.polarity
    }

    /// Ascending indices of the leader sets of `team`.
    pub fn leader_sets(&self, team: Team) -> Vec<usize> {
        self.roles
            .iter()
            .enumerate()
            .filter(|&(_, role)| *role == SetRole::Leader(team))
            .map(|(set, _)| set)
            .collect()
    }

    /// Counts an access to `set` against the team it resolves to, if it is a follower.
    /// Unknown sets are ignored.
    pub fn record_access(&mut self, set: usize) {
        if self.roles.get(set) == Some(&SetRole::Follower) {
            self.follower_accesses[self.winner.slot()] += 1;
        }
    }

    /// Scores a miss in `set`.
    ///
    /// Leader misses move PSEL according to the polarity; follower misses
    /// and unknown sets are ignored.
    pub fn record_miss(&mut self, set: usize) {
        let Some(&SetRole::Leader(team)) = self.roles.get(set) else {
            return;
        };
        self.leader_misses[team.slot()] += 1;
        match (self.polarity, team) {
            (PselPolarity::MissBIncrements, Team::B) | (PselPolarity::MissAIncrements, Team::A) => {
                self.psel.increment();
            }
            (PselPolarity::MissBIncrements, Team::A) | (PselPolarity::MissAIncrements, Team::B) => {
                self.psel.decrement();
            }
        }
        let winner = self.compute_winner();
        if winner != self.winner {
            self.flips += 1;
            tracing::debug!(
                from = ?self.winner,
                to = ?winner,
                psel = self.psel.value(),
                "dueling winner changed"
            );
            self.winner = winner;
        }
    }

    const fn compute_winner(&self) -> Team {
        match (self.polarity, self.psel.is_upper()) {
            (PselPolarity::MissBIncrements, true) | (PselPolarity::MissAIncrements, false) => Team::A,
            (PselPolarity::MissBIncrements, false) | (PselPolarity::MissAIncrements, true) => Team::B,
        }
    }

    /// Snapshot of the duel counters.
    pub const fn stats(&self) -> DuelingStats {
        DuelingStats {
            leader_a_misses: self.leader_misses[0],
            leader_b_misses: self.leader_misses[1],
            follower_a_accesses: self.follower_accesses[0],
            follower_b_accesses: self.follower_accesses[1],
            psel: self.psel.value(),
            psel_max: self.psel.max(),
            winner: self.winner,
            winner_flips: self.flips,
        }
    }

    /// Clears the duel counters. PSEL and the current winner are state, not statistics, and are kept.
    pub const fn reset_stats(&mut self) {
        self.leader_misses = [0; 2];
        self.follower_accesses = [0; 2];
        self.flips = 0;
    }
}
