use crate::match_dataset::{MatchOutcome, MatchRecord, Phase};

/// A team's most recent matches, newest first. Rows without a parseable
/// date sort behind every dated one.
pub fn last_matches<'a>(
    matches: &'a [MatchRecord],
    team: &str,
    limit: usize,
) -> Vec<&'a MatchRecord> {
    let mut rows: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| m.home_team == team || m.away_team == team)
        .collect();
    sort_newest_first(&mut rows);
    rows.truncate(limit);
    rows
}

/// The most recent direct encounters between two teams, either venue.
pub fn head_to_head<'a>(
    matches: &'a [MatchRecord],
    team_a: &str,
    team_b: &str,
    limit: usize,
) -> Vec<&'a MatchRecord> {
    let mut rows: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| {
            (m.home_team == team_a && m.away_team == team_b)
                || (m.home_team == team_b && m.away_team == team_a)
        })
        .collect();
    sort_newest_first(&mut rows);
    rows.truncate(limit);
    rows
}

/// "WDLWW"-style string from the team's full-time view, newest first.
/// Matches with no determinable full-time outcome are skipped.
pub fn form_string(matches: &[MatchRecord], team: &str, limit: usize) -> String {
    let mut out = String::new();
    for m in last_matches(matches, team, matches.len()) {
        if out.len() >= limit {
            break;
        }
        let Some(outcome) = m.phase_outcome(Phase::FullTime) else {
            continue;
        };
        let ch = match outcome {
            MatchOutcome::Draw => 'D',
            MatchOutcome::HomeWin => {
                if m.home_team == team {
                    'W'
                } else {
                    'L'
                }
            }
            MatchOutcome::AwayWin => {
                if m.away_team == team {
                    'W'
                } else {
                    'L'
                }
            }
        };
        out.push(ch);
    }
    out
}

fn sort_newest_first(rows: &mut [&MatchRecord]) {
    // `None < Some(_)`, so descending order pushes undated rows last.
    // The sort is stable, preserving store order among same-day matches.
    rows.sort_by(|a, b| b.date.cmp(&a.date));
}
