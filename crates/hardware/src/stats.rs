//! Cache statistics collection and reporting.
//!
//! This module tracks the counters a driver reports at the end of a run. It provides:
//! 1. **Access outcomes:** Accesses, hits, misses, and how each miss was filled.
//! 2. **Dueling:** Per-team leader misses, follower routing, final PSEL and winner flips.
//! 3. **Reporting:** A sectioned plain-text report and `serde` serialization for JSON export.

use serde::Serialize;

use crate::cache::dueling::Team;

/// Counters for one cache model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Accesses serviced (hits plus misses; rejected accesses are not counted).
    pub accesses: u64,
    /// Accesses that found their line resident.
    pub hits: u64,
    /// Accesses that had to fill a line.
    pub misses: u64,
    /// Misses filled into a free (invalid) way.
    pub compulsory_misses: u64,
    /// Misses that evicted a valid line.
    pub evictions: u64,
    /// Lines removed by `invalidate` or `flush`.
    pub invalidations: u64,
    /// Set-dueling counters, present only when the cache duels two policies.
    pub dueling: Option<DuelingStats>,
}

/// Set-dueling counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DuelingStats {
    /// Misses in team A leader sets.
    pub leader_a_misses: u64,
    /// Misses in team B leader sets.
    pub leader_b_misses: u64,
    /// Follower-set accesses serviced while team A was winning.
    pub follower_a_accesses: u64,
    /// Follower-set accesses serviced while team B was winning.
    pub follower_b_accesses: u64,
    /// PSEL value at the time of the snapshot.
    pub psel: u32,
    /// Largest PSEL value.
    pub psel_max: u32,
    /// Team followers run at the time of the snapshot.
    pub winner: Team,
    /// Number of times the follower policy changed.
    pub winner_flips: u64,
}

impl CacheStats {
    /// Fraction of accesses that hit, or 0 with no accesses.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// Fraction of accesses that missed, or 0 with no accesses.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"dueling"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "dueling"];

impl CacheStats {
    /// Renders the requested sections as a report.
    ///
    /// Each element of `sections` should be one of `"summary"` or `"dueling"`.
    /// An empty slice renders every section. The dueling section is skipped
    /// when the cache does not duel.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();
        let rule = "----------------------------------------------------------\n";

        out.push_str("==========================================================\n");
        out.push_str("CACHE REPLACEMENT STATISTICS\n");
        out.push_str("==========================================================\n");
        if want("summary") {
            out.push_str(&format!("accesses                 {}\n", self.accesses));
            out.push_str(&format!("hits                     {}\n", self.hits));
            out.push_str(&format!("misses                   {}\n", self.misses));
            out.push_str(&format!("  misses.compulsory      {}\n", self.compulsory_misses));
            out.push_str(&format!("  misses.eviction        {}\n", self.evictions));
            out.push_str(&format!("invalidations            {}\n", self.invalidations));
            out.push_str(&format!("hit_rate                 {:.2}%\n", self.hit_rate() * 100.0));
            out.push_str(&format!("miss_rate                {:.2}%\n", self.miss_rate() * 100.0));
            out.push_str(rule);
        }
        if let Some(d) = self.dueling.filter(|_| want("dueling")) {
            let followers = d.follower_a_accesses + d.follower_b_accesses;
            let share_a = if followers == 0 {
                0.0
            } else {
                d.follower_a_accesses as f64 / followers as f64 * 100.0
            };
            out.push_str("SET DUELING\n");
            out.push_str(&format!("  leader.a.misses        {}\n", d.leader_a_misses));
            out.push_str(&format!("  leader.b.misses        {}\n", d.leader_b_misses));
            out.push_str(&format!(
                "  follower.a.accesses    {} ({:.2}%)\n",
                d.follower_a_accesses, share_a
            ));
            out.push_str(&format!(
                "  follower.b.accesses    {} ({:.2}%)\n",
                d.follower_b_accesses,
                if followers == 0 { 0.0 } else { 100.0 - share_a }
            ));
            out.push_str(&format!("  psel                   {} / {}\n", d.psel, d.psel_max));
            out.push_str(&format!("  winner                 {:?}\n", d.winner));
            out.push_str(&format!("  winner.flips           {}\n", d.winner_flips));
            out.push_str(rule);
        }
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
