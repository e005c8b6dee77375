//! Statistics Tests.
//!
//! Verifies rate arithmetic, sectioned report rendering, and the JSON shape
//! of `CacheStats`.

use duelsim_core::cache::dueling::Team;
use duelsim_core::config::PolicyConfig;
use duelsim_core::stats::{CacheStats, DuelingStats, STATS_SECTIONS};
use pretty_assertions::assert_eq;

use crate::common::{TestCache, dueling};

fn duel_stats() -> DuelingStats {
    DuelingStats {
        leader_a_misses: 10,
        leader_b_misses: 4,
        follower_a_accesses: 25,
        follower_b_accesses: 75,
        psel: 500,
        psel_max: 1023,
        winner: Team::B,
        winner_flips: 3,
    }
}

#[test]
fn rates_are_zero_without_accesses() {
    let stats = CacheStats::default();
    assert_eq!(stats.hit_rate(), 0.0);
    assert_eq!(stats.miss_rate(), 0.0);
}

#[test]
fn rates_split_accesses() {
    let stats = CacheStats {
        accesses: 8,
        hits: 6,
        misses: 2,
        ..CacheStats::default()
    };
    assert_eq!(stats.hit_rate(), 0.75);
    assert_eq!(stats.miss_rate(), 0.25);
}

#[test]
fn report_includes_every_section_by_default() {
    let stats = CacheStats {
        accesses: 4,
        hits: 1,
        misses: 3,
        dueling: Some(duel_stats()),
        ..CacheStats::default()
    };
    let report = stats.render_sections(&[]);
    assert!(report.contains("hit_rate                 25.00%"));
    assert!(report.contains("SET DUELING"));
    assert!(report.contains("follower.b.accesses    75 (75.00%)"));
    assert!(report.contains("psel                   500 / 1023"));
    assert!(report.contains("winner                 B"));
}

#[test]
fn report_honours_section_filter() {
    let stats = CacheStats {
        dueling: Some(duel_stats()),
        ..CacheStats::default()
    };
    let summary = stats.render_sections(&["summary".to_owned()]);
    assert!(summary.contains("accesses"));
    assert!(!summary.contains("SET DUELING"));

    let duel = stats.render_sections(&["dueling".to_owned()]);
    assert!(duel.contains("SET DUELING"));
    assert!(!duel.contains("hit_rate"));
    assert_eq!(STATS_SECTIONS, &["summary", "dueling"]);
}

#[test]
fn non_dueling_report_skips_duel_section() {
    let report = CacheStats::default().render_sections(&[]);
    assert!(!report.contains("SET DUELING"));
}

#[test]
fn stats_serialize_to_json() {
    let mut t = TestCache::new(
        16 * 1024,
        64,
        4,
        dueling(PolicyConfig::Lru, PolicyConfig::Lip, 64, 10),
    );
    t.sweep(1);
    t.sweep(1);

    let value = serde_json::to_value(t.cache.stats()).unwrap();
    assert_eq!(value["accesses"], 128);
    assert_eq!(value["hits"], 64);
    assert_eq!(value["compulsory_misses"], 64);
    assert_eq!(value["dueling"]["psel_max"], 1023);
    assert_eq!(value["dueling"]["winner"], "A");

    let single = TestCache::new(1024, 64, 2, PolicyConfig::Lru);
    let value = serde_json::to_value(single.cache.stats()).unwrap();
    assert!(value["dueling"].is_null());
}
