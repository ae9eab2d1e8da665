use std::cmp::Ordering;
use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::match_dataset::{MatchRecord, Phase};
use crate::standings::{VenueFilter, pct, round2};

/// Which side a team's history leans toward for a given threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lean {
    Under,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderOverRow {
    pub team: String,
    pub played: u32,
    pub under_count: u32,
    pub over_count: u32,
    pub under_pct: f64,
    pub over_pct: f64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goals_per_match: f64,
    /// `None` when the two percentages tie exactly.
    pub recommended: Option<Lean>,
}

#[derive(Debug, Default, Clone)]
struct UnderOverAcc {
    played: u32,
    under: u32,
    over: u32,
    goals_for: i64,
    goals_against: i64,
}

impl UnderOverAcc {
    fn absorb(&mut self, goals_for: i64, goals_against: i64, threshold: f64) {
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        // Strict less-than: real thresholds are half-integers, so the
        // boundary never lands on a total, but the rule is defined anyway.
        if ((goals_for + goals_against) as f64) < threshold {
            self.under += 1;
        } else {
            self.over += 1;
        }
    }
}

/// Per-team under/over counts for one threshold. Ordered by over
/// percentage descending only; callers wanting "best side first" re-sort
/// on `max(under_pct, over_pct)` themselves.
pub fn compute_under_over(
    matches: &[MatchRecord],
    threshold: f64,
    venue: VenueFilter,
    time: Phase,
) -> Vec<UnderOverRow> {
    let mut accs: HashMap<&str, UnderOverAcc> = HashMap::new();

    for m in matches {
        let Some((home_goals, away_goals)) = m.phase_goals(time) else {
            continue;
        };
        if venue != VenueFilter::AwayOnly {
            accs.entry(m.home_team.as_str())
                .or_default()
                .absorb(home_goals, away_goals, threshold);
        }
        if venue != VenueFilter::HomeOnly {
            accs.entry(m.away_team.as_str())
                .or_default()
                .absorb(away_goals, home_goals, threshold);
        }
    }

    let mut rows: Vec<UnderOverRow> = accs
        .into_iter()
        .map(|(team, acc)| {
            let under_pct = pct(acc.under, acc.played);
            let over_pct = pct(acc.over, acc.played);
            let recommended = match under_pct.partial_cmp(&over_pct) {
                Some(Ordering::Greater) => Some(Lean::Under),
                Some(Ordering::Less) => Some(Lean::Over),
                _ => None,
            };
            UnderOverRow {
                team: team.to_string(),
                played: acc.played,
                under_count: acc.under,
                over_count: acc.over,
                under_pct,
                over_pct,
                goals_for: acc.goals_for,
                goals_against: acc.goals_against,
                goals_per_match: round2(
                    (acc.goals_for + acc.goals_against) as f64 / acc.played as f64,
                ),
                recommended,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.over_pct
            .partial_cmp(&a.over_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });
    rows
}

/// One table per threshold over the same immutable slice. Each threshold
/// is independent, so the fan-out is embarrassingly parallel.
pub fn under_over_sweep(
    matches: &[MatchRecord],
    thresholds: &[f64],
    venue: VenueFilter,
    time: Phase,
) -> Vec<(f64, Vec<UnderOverRow>)> {
    thresholds
        .par_iter()
        .map(|&threshold| (threshold, compute_under_over(matches, threshold, venue, time)))
        .collect()
}

/// The 0.5 ..= 8.5 half-goal lines the reports page offers.
pub fn standard_thresholds() -> Vec<f64> {
    (0..9).map(|n| n as f64 + 0.5).collect()
}

#[cfg(test)]
mod tests {
    use super::standard_thresholds;

    #[test]
    fn standard_thresholds_are_half_goal_lines() {
        let lines = standard_thresholds();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], 0.5);
        assert_eq!(lines[8], 8.5);
        assert!(lines.iter().all(|t| t.fract() == 0.5));
    }
}
