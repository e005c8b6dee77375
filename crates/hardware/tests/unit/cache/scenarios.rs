//! Replacement Scenarios.
//!
//! End-to-end access patterns whose outcome is known in advance: plain LRU
//! eviction order, LIP keeping a working set alive under a stream, and a
//! dueling cache switching policies when the access pattern changes.

use duelsim_core::cache::dueling::{SetRole, Team};
use duelsim_core::config::PolicyConfig;
use pretty_assertions::assert_eq;

use crate::common::{TestCache, dueling};

/// Three tags in one set of a 2-way LRU cache: the first is evicted.
#[test]
fn lru_evicts_oldest_tag() {
    let mut t = TestCache::new(1024, 64, 2, PolicyConfig::Lru);
    let _ = t.touch(1, 0);
    let _ = t.touch(2, 0);
    let outcome = t.touch(3, 0);

    assert_eq!(outcome.evicted().map(|e| e.tag), Some(1));
    assert!(!t.holds(1, 0));
    assert!(t.holds(2, 0) && t.holds(3, 0));
}

/// Set exercised by the single-set stream scenarios.
const STREAM_SET: usize = 5;

/// With LIP a stream only recycles the LRU way: after displacing one
/// working-set line, each new streamed tag evicts the previous one.
#[test]
fn lip_keeps_working_set_under_stream() {
    // 8 sets, 2 ways, as in `lru_evicts_oldest_tag`.
    let mut t = TestCache::new(1024, 64, 2, PolicyConfig::Lip);
    for _ in 0..4 {
        let _ = t.touch(1, STREAM_SET);
        let _ = t.touch(2, STREAM_SET);
    }

    let first = t.touch(100, STREAM_SET);
    assert_eq!(first.evicted().map(|e| e.tag), Some(1));

    for tag in 101..150 {
        let outcome = t.touch(tag, STREAM_SET);
        assert_eq!(outcome.evicted().map(|e| e.tag), Some(tag - 1));
        assert!(t.holds(2, STREAM_SET), "working-set line lost at tag {tag}");
    }
    assert!((0..8).filter(|&s| s != STREAM_SET).all(|s| !t.holds(2, s)));
}

/// Same stream under LRU flushes the working set.
#[test]
fn lru_loses_working_set_under_stream() {
    let mut t = TestCache::new(1024, 64, 2, PolicyConfig::Lru);
    let _ = t.touch(1, STREAM_SET);
    let _ = t.touch(2, STREAM_SET);
    for tag in 100..102 {
        let _ = t.touch(tag, STREAM_SET);
    }
    assert!(!t.holds(1, STREAM_SET) && !t.holds(2, STREAM_SET));
}

/// LRU vs LIP duel across a change of pattern.
///
/// Phase 1 cycles five tags through every 4-way set: LRU misses on every
/// access while LIP keeps three tags resident, so team B (LIP) takes over.
/// Phase 2 alternates fresh tag pairs `x, y, x, y`: LRU hits the second
/// touch of each while LIP keeps evicting the pair from its single LRU slot,
/// so team A (LRU) takes back the followers.
#[test]
fn dueling_follows_the_better_policy_across_phases() {
    const PSEL_BITS: u32 = 6;
    // 64 sets, one constituency, two leaders per team.
    let mut t = TestCache::new(
        16 * 1024,
        64,
        4,
        dueling(PolicyConfig::Lru, PolicyConfig::Lip, 64, PSEL_BITS),
    );
    let midpoint = 1_u32 << (PSEL_BITS - 1);

    for _ in 0..20 {
        for tag in 0..5 {
            t.sweep(tag);
        }
    }
    let duel = t.cache.stats().dueling.unwrap();
    assert_eq!(duel.winner, Team::B);
    assert!(duel.psel < midpoint);
    assert!(duel.leader_a_misses > duel.leader_b_misses);
    let follower = (0..64)
        .find(|&s| t.cache.role_of_set(s) == Some(SetRole::Follower))
        .unwrap();
    assert_eq!(t.cache.team_for_set(follower), Some(Team::B));

    t.cache.reset_stats();
    let mut flipped_at = None;
    for pair in 0..40_u64 {
        let (x, y) = (100 + 2 * pair, 101 + 2 * pair);
        for tag in [x, y, x, y] {
            t.sweep(tag);
        }
        if flipped_at.is_none() && t.cache.selector().unwrap().winner() == Team::A {
            flipped_at = Some(pair);
        }
    }

    let duel = t.cache.stats().dueling.unwrap();
    assert_eq!(duel.winner, Team::A);
    assert_eq!(duel.psel, duel.psel_max);
    assert!(duel.winner_flips >= 1);
    assert!(duel.leader_b_misses > duel.leader_a_misses);
    let pairs = flipped_at.unwrap();
    assert!(pairs < 16, "winner flipped only after {pairs} pairs");
    assert_eq!(t.cache.team_for_set(follower), Some(Team::A));
}

/// A dueling cache beats plain LRU on a pattern LRU thrashes on.
#[test]
fn dueling_beats_lru_on_a_cyclic_pattern() {
    let run = |policy| {
        let mut t = TestCache::new(16 * 1024, 64, 4, policy);
        for _ in 0..20 {
            for tag in 0..5 {
                t.sweep(tag);
            }
        }
        t.cache.stats().misses
    };
    let lru = run(PolicyConfig::Lru);
    let duel = run(dueling(PolicyConfig::Lru, PolicyConfig::Lip, 64, 6));
    assert_eq!(lru, 20 * 5 * 64);
    assert!(duel * 4 < lru * 3, "dueling {duel} vs lru {lru}");
}
