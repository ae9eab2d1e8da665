use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::match_dataset::{MatchOutcome, MatchRecord, Phase};

pub const POINTS_WIN: i64 = 3;
pub const POINTS_DRAW: i64 = 1;

/// Restricts which of a team's appearances count. Applied per team, not as
/// a filter on the match list, because one list serves every team in the
/// same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VenueFilter {
    All,
    HomeOnly,
    AwayOnly,
}

/// One ranked line of a standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: i64,
    pub win_pct: f64,
    pub draw_pct: f64,
    pub loss_pct: f64,
    pub rank: u32,
}

#[derive(Debug, Default, Clone)]
struct TeamAcc {
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: i64,
    goals_against: i64,
}

impl TeamAcc {
    fn absorb(&mut self, goals_for: i64, goals_against: i64, won: Option<bool>) {
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        match won {
            Some(true) => self.wins += 1,
            Some(false) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    fn into_row(self, team: &str) -> TeamRow {
        TeamRow {
            team: team.to_string(),
            played: self.played,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: self.goals_for - self.goals_against,
            points: self.wins as i64 * POINTS_WIN + self.draws as i64 * POINTS_DRAW,
            win_pct: pct(self.wins, self.played),
            draw_pct: pct(self.draws, self.played),
            loss_pct: pct(self.losses, self.played),
            rank: 0,
        }
    }
}

/// Full ranked table: baseline pass, then (when requested) the
/// direct-encounter exclusion pass over the top/bottom teams of that
/// baseline. Teams left with zero qualifying matches never appear.
pub fn compute_standings(
    matches: &[MatchRecord],
    mode: Phase,
    venue: VenueFilter,
    exclude_top: usize,
    exclude_bottom: usize,
) -> Vec<TeamRow> {
    let baseline = baseline_rank(matches, mode, venue);
    if exclude_top == 0 && exclude_bottom == 0 {
        return baseline;
    }

    let mut excluded: HashSet<&str> = HashSet::new();
    for row in baseline.iter().take(exclude_top) {
        excluded.insert(row.team.as_str());
    }
    let tail_start = baseline.len().saturating_sub(exclude_bottom);
    for row in baseline.iter().skip(tail_start) {
        excluded.insert(row.team.as_str());
    }

    recompute_excluding(matches, mode, venue, &excluded)
}

/// The unfiltered ranking that decides who counts as "top N" / "bottom N".
pub fn baseline_rank(matches: &[MatchRecord], mode: Phase, venue: VenueFilter) -> Vec<TeamRow> {
    recompute_excluding(matches, mode, venue, &HashSet::new())
}

/// Rebuild every non-excluded team's aggregate with all matches against the
/// excluded opponents removed. The excluded teams' own rows are dropped and
/// the survivors re-ranked from 1 with no gaps.
pub fn recompute_excluding(
    matches: &[MatchRecord],
    mode: Phase,
    venue: VenueFilter,
    excluded: &HashSet<&str>,
) -> Vec<TeamRow> {
    let mut accs: HashMap<&str, TeamAcc> = HashMap::new();

    for m in matches {
        let Some((home_goals, away_goals)) = m.phase_goals(mode) else {
            continue;
        };
        // phase_goals succeeded, so an outcome always derives.
        let Some(outcome) = m.phase_outcome(mode) else {
            continue;
        };

        let home = m.home_team.as_str();
        let away = m.away_team.as_str();
        let home_excluded = excluded.contains(home);
        let away_excluded = excluded.contains(away);

        if venue != VenueFilter::AwayOnly && !home_excluded && !away_excluded {
            let won = match outcome {
                MatchOutcome::HomeWin => Some(true),
                MatchOutcome::AwayWin => Some(false),
                MatchOutcome::Draw => None,
            };
            accs.entry(home)
                .or_default()
                .absorb(home_goals, away_goals, won);
        }
        if venue != VenueFilter::HomeOnly && !away_excluded && !home_excluded {
            let won = match outcome {
                MatchOutcome::AwayWin => Some(true),
                MatchOutcome::HomeWin => Some(false),
                MatchOutcome::Draw => None,
            };
            accs.entry(away)
                .or_default()
                .absorb(away_goals, home_goals, won);
        }
    }

    let mut rows: Vec<TeamRow> = accs
        .into_iter()
        .map(|(team, acc)| acc.into_row(team))
        .collect();
    sort_and_rank(&mut rows);
    rows
}

/// Which percentage column orders a "best of" table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentMetric {
    Wins,
    Draws,
    Losses,
}

/// Full-time table reordered by one percentage column, highest first.
pub fn best_standings(
    matches: &[MatchRecord],
    metric: PercentMetric,
    exclude_top: usize,
    exclude_bottom: usize,
) -> Vec<TeamRow> {
    let mut rows = compute_standings(
        matches,
        Phase::FullTime,
        VenueFilter::All,
        exclude_top,
        exclude_bottom,
    );
    rows.sort_by(|a, b| {
        let (pa, pb) = match metric {
            PercentMetric::Wins => (a.win_pct, b.win_pct),
            PercentMetric::Draws => (a.draw_pct, b.draw_pct),
            PercentMetric::Losses => (a.loss_pct, b.loss_pct),
        };
        pb.partial_cmp(&pa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });
    assign_ranks(&mut rows);
    rows
}

fn sort_and_rank(rows: &mut Vec<TeamRow>) {
    // Points, goal difference, goals scored, then name. The last two keys
    // make the order total; ranks are strictly positional, never shared.
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.team.cmp(&b.team))
    });
    assign_ranks(rows);
}

fn assign_ranks(rows: &mut [TeamRow]) {
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx as u32 + 1;
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn pct(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 * 100.0 / total as f64)
    }
}
