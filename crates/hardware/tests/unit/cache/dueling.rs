//! Set Dueling Tests.
//!
//! Covers leader-set placement, the saturating PSEL counter, and how follower
//! sets are routed to the winning policy under both polarities.

use duelsim_core::cache::dueling::{DuelingSelector, Psel, SetRole, Team, assign_leaders};
use duelsim_core::common::ConfigError;
use duelsim_core::config::{DuelingConfig, PolicyConfig, PselPolarity};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn selector(num_sets: usize, config: &DuelingConfig) -> DuelingSelector {
    DuelingSelector::new(num_sets, config).unwrap_or_else(|e| panic!("{e}"))
}

/// 64 sets in one constituency with a 4-bit PSEL (midpoint 8, max 15).
fn small(polarity: PselPolarity) -> DuelingSelector {
    selector(
        64,
        &DuelingConfig {
            psel_bits: 4,
            polarity,
            ..DuelingConfig::default()
        },
    )
}

fn first_follower(sel: &DuelingSelector) -> usize {
    (0..64)
        .find(|&s| sel.policy_for_set(s) == Some(SetRole::Follower))
        .unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Leader placement
// ══════════════════════════════════════════════════════════

/// The same seed always produces the same leaders; another seed moves them.
#[test]
fn leader_sets_are_a_function_of_the_seed() {
    let config = |seed| DuelingConfig {
        constituency_size: 64,
        team_size: 4,
        seed,
        ..DuelingConfig::default()
    };
    let first = selector(256, &config(1));
    let again = selector(256, &config(1));
    let other = selector(256, &config(2));

    for team in [Team::A, Team::B] {
        assert_eq!(first.leader_sets(team), again.leader_sets(team));
    }
    assert_ne!(
        (first.leader_sets(Team::A), first.leader_sets(Team::B)),
        (other.leader_sets(Team::A), other.leader_sets(Team::B))
    );
}

#[test]
fn each_constituency_gets_its_own_leaders() {
    let sel = selector(256, &DuelingConfig::default());
    let a = sel.leader_sets(Team::A);
    let b = sel.leader_sets(Team::B);
    assert_eq!((a.len(), b.len()), (8, 8));
    for constituency in 0..4 {
        let range = constituency * 64..(constituency + 1) * 64;
        assert_eq!(a.iter().filter(|s| range.contains(*s)).count(), 2);
        assert_eq!(b.iter().filter(|s| range.contains(*s)).count(), 2);
    }
    assert!(a.iter().all(|s| !b.contains(s)));
}

#[test]
fn leader_cap_leaves_later_constituencies_as_followers() {
    let config = DuelingConfig {
        constituency_size: 16,
        num_leader_sets: 4,
        ..DuelingConfig::default()
    };
    let roles = assign_leaders(128, &config);
    let leaders: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r != SetRole::Follower)
        .map(|(s, _)| s)
        .collect();
    assert_eq!(leaders.len(), 8);
    assert!(leaders.iter().all(|&s| s < 32));
}

// ══════════════════════════════════════════════════════════
// 2. PSEL
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1, 1, 1)]
#[case(4, 8, 15)]
#[case(10, 512, 1023)]
#[case(16, 32_768, 65_535)]
fn psel_starts_at_midpoint(#[case] bits: u32, #[case] midpoint: u32, #[case] max: u32) {
    let psel = Psel::new(bits).unwrap();
    assert_eq!((psel.value(), psel.midpoint(), psel.max()), (midpoint, midpoint, max));
    assert!(psel.is_upper());
}

#[rstest]
#[case(0)]
#[case(17)]
#[case(32)]
#[case(u32::MAX)]
fn psel_rejects_unsupported_widths(#[case] bits: u32) {
    assert_eq!(Psel::new(bits), None);
}

// ══════════════════════════════════════════════════════════
// 3. Follower routing
// ══════════════════════════════════════════════════════════

#[test]
fn b_leader_misses_favour_a() {
    let mut sel = small(PselPolarity::MissBIncrements);
    let a0 = sel.leader_sets(Team::A)[0];
    let b0 = sel.leader_sets(Team::B)[0];
    let f = first_follower(&sel);

    assert_eq!(sel.resolve(f), Some(Team::A));
    sel.record_miss(b0);
    assert_eq!((sel.psel().value(), sel.resolve(f)), (9, Some(Team::A)));

    sel.record_miss(a0);
    sel.record_miss(a0);
    assert_eq!((sel.psel().value(), sel.resolve(f)), (7, Some(Team::B)));

    // Leaders are pinned regardless of PSEL.
    assert_eq!(sel.resolve(a0), Some(Team::A));
    assert_eq!(sel.resolve(b0), Some(Team::B));
    assert_eq!(sel.stats().winner_flips, 1);
}

#[test]
fn inverted_polarity_still_follows_fewer_misses() {
    let mut sel = small(PselPolarity::MissAIncrements);
    let a0 = sel.leader_sets(Team::A)[0];
    let f = first_follower(&sel);

    sel.record_miss(a0);
    assert_eq!(sel.psel().value(), 9);
    assert_eq!(sel.resolve(f), Some(Team::B));
    assert_eq!(sel.polarity(), PselPolarity::MissAIncrements);
}

#[test]
fn follower_misses_leave_psel_alone() {
    let mut sel = small(PselPolarity::MissBIncrements);
    let f = first_follower(&sel);
    for _ in 0..100 {
        sel.record_miss(f);
    }
    assert_eq!(sel.psel().value(), 8);
    let stats = sel.stats();
    assert_eq!((stats.leader_a_misses, stats.leader_b_misses), (0, 0));
}

#[test]
fn follower_accesses_are_credited_to_the_winner() {
    let mut sel = small(PselPolarity::MissBIncrements);
    let a0 = sel.leader_sets(Team::A)[0];
    let f = first_follower(&sel);

    sel.record_access(f);
    sel.record_access(a0);
    sel.record_miss(a0);
    sel.record_access(f);

    let stats = sel.stats();
    assert_eq!((stats.follower_a_accesses, stats.follower_b_accesses), (1, 1));

    sel.reset_stats();
    let stats = sel.stats();
    assert_eq!((stats.follower_a_accesses, stats.winner_flips), (0, 0));
    assert_eq!(stats.psel, 7);
}

#[test]
fn unknown_sets_have_no_role() {
    let mut sel = small(PselPolarity::MissBIncrements);
    assert_eq!(sel.policy_for_set(64), None);
    assert_eq!(sel.resolve(64), None);
    assert_eq!(sel.resolve(usize::MAX), None);

    let before = sel.stats();
    sel.record_access(64);
    sel.record_miss(64);
    assert_eq!(sel.stats(), before);
}

// ══════════════════════════════════════════════════════════
// 4. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(DuelingConfig { psel_bits: 0, ..DuelingConfig::default() }, ConfigError::PselBits(0))]
#[case(DuelingConfig { psel_bits: 17, ..DuelingConfig::default() }, ConfigError::PselBits(17))]
#[case(
    DuelingConfig { leader_sets_per_constituency: 40, ..DuelingConfig::default() },
    ConfigError::LeadersDoNotFit { per_team: 40, needed: 80, constituency_size: 64 }
)]
#[case(
    DuelingConfig { constituency_size: 128, ..DuelingConfig::default() },
    ConfigError::ConstituencyTooLarge { constituency_size: 128, num_sets: 64 }
)]
#[case(
    DuelingConfig { constituency_size: 48, ..DuelingConfig::default() },
    ConfigError::ConstituencyDoesNotDivide { constituency_size: 48, num_sets: 64 }
)]
#[case(
    DuelingConfig { policy_a: PolicyConfig::lru_vs_lip(), ..DuelingConfig::default() },
    ConfigError::NestedDueling
)]
#[case(DuelingConfig { team_size: 0, ..DuelingConfig::default() }, ConfigError::Zero { field: "team_size" })]
#[case(
    DuelingConfig { leader_sets_per_constituency: usize::MAX / 2 + 1, ..DuelingConfig::default() },
    ConfigError::LeadersDoNotFit { per_team: usize::MAX / 2 + 1, needed: usize::MAX, constituency_size: 64 }
)]
#[case(
    DuelingConfig { leader_sets_per_constituency: usize::MAX, ..DuelingConfig::default() },
    ConfigError::LeadersDoNotFit { per_team: usize::MAX, needed: usize::MAX, constituency_size: 64 }
)]
fn invalid_duels_are_rejected(#[case] config: DuelingConfig, #[case] expected: ConfigError) {
    assert_eq!(DuelingSelector::new(64, &config).unwrap_err(), expected);
}

// ══════════════════════════════════════════════════════════
// 5. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    /// PSEL tracks a clamped counter and never leaves `[0, max]`.
    #[test]
    fn psel_stays_in_bounds(bits in 1_u32..=12, ups in prop::collection::vec(any::<bool>(), 0..512)) {
        let mut psel = Psel::new(bits).unwrap();
        let mut model = i64::from(psel.midpoint());
        for up in ups {
            if up {
                psel.increment();
                model = (model + 1).min(i64::from(psel.max()));
            } else {
                psel.decrement();
                model = (model - 1).max(0);
            }
            prop_assert!(psel.value() <= psel.max());
            prop_assert_eq!(i64::from(psel.value()), model);
        }
    }

    /// Followers run A exactly when PSEL is at or above the midpoint.
    #[test]
    fn followers_track_psel(misses in prop::collection::vec(any::<bool>(), 0..256)) {
        let mut sel = small(PselPolarity::MissBIncrements);
        let a0 = sel.leader_sets(Team::A)[0];
        let b0 = sel.leader_sets(Team::B)[0];
        let f = first_follower(&sel);
        for miss_in_b in misses {
            sel.record_miss(if miss_in_b { b0 } else { a0 });
            let expected = if sel.psel().value() >= sel.psel().midpoint() { Team::A } else { Team::B };
            prop_assert_eq!(sel.resolve(f), Some(expected));
            prop_assert_eq!(sel.winner(), expected);
        }
    }

    /// Leader placement never overlaps and never exceeds the per-team cap.
    #[test]
    fn leader_placement_is_disjoint(seed in any::<u64>(), per in 1_usize..=8, cap in 1_usize..=32) {
        let config = DuelingConfig {
            constituency_size: 16,
            leader_sets_per_constituency: per,
            num_leader_sets: cap,
            seed,
            ..DuelingConfig::default()
        };
        let roles = assign_leaders(128, &config);
        let count = |t| roles.iter().filter(|r| **r == SetRole::Leader(t)).count();
        prop_assert_eq!(count(Team::A), count(Team::B));
        prop_assert!(count(Team::A) <= cap);
        prop_assert_eq!(roles, assign_leaders(128, &config));
    }
}
