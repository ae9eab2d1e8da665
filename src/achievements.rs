use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::standings::{POINTS_WIN, TeamRow};

/// Season outcome labels, assigned from fixed table slices: rank 1 is
/// champion, 1-4 Champions League, 5-6 Europa League, 7 Conference
/// League, the last three go down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Achievement {
    Champion,
    ChampionsLeague,
    EuropaLeague,
    ConferenceLeague,
    Relegated,
}

impl Achievement {
    pub fn label(self) -> &'static str {
        match self {
            Self::Champion => "Champion",
            Self::ChampionsLeague => "Champions League",
            Self::EuropaLeague => "Europa League",
            Self::ConferenceLeague => "Conference League",
            Self::Relegated => "Relegated",
        }
    }
}

const CHAMPIONS_LEAGUE_END: usize = 4;
const EUROPA_LEAGUE_END: usize = 6;
const CONFERENCE_LEAGUE_END: usize = 7;
const RELEGATION_SPOTS: usize = 3;

/// Label teams with the outcomes they hold. With `matches_remaining == 0`
/// the current position is final and decides alone; otherwise a label is
/// only granted once it is mathematically clinched, so an undecided team
/// gets nothing even while sitting inside the zone.
pub fn detect_achievements(
    standings: &[TeamRow],
    matches_remaining: u32,
) -> HashMap<String, Achievement> {
    if standings.is_empty() {
        return HashMap::new();
    }
    if matches_remaining == 0 {
        assign_by_position(standings)
    } else {
        clinched_achievements(standings, matches_remaining)
    }
}

fn assign_by_position(standings: &[TeamRow]) -> HashMap<String, Achievement> {
    let mut out = HashMap::new();
    let n = standings.len();

    out.insert(standings[0].team.clone(), Achievement::Champion);
    for row in standings.iter().take(CHAMPIONS_LEAGUE_END.min(n)) {
        out.entry(row.team.clone())
            .or_insert(Achievement::ChampionsLeague);
    }
    for row in &standings[CHAMPIONS_LEAGUE_END.min(n)..EUROPA_LEAGUE_END.min(n)] {
        out.entry(row.team.clone())
            .or_insert(Achievement::EuropaLeague);
    }
    for row in &standings[EUROPA_LEAGUE_END.min(n)..CONFERENCE_LEAGUE_END.min(n)] {
        out.entry(row.team.clone())
            .or_insert(Achievement::ConferenceLeague);
    }
    for row in &standings[n.saturating_sub(RELEGATION_SPOTS)..] {
        out.entry(row.team.clone()).or_insert(Achievement::Relegated);
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct CeilingRow<'a> {
    team: &'a str,
    /// Points already banked; the team finishes with at least these.
    points: i64,
    /// Best case: every remaining match won.
    ceiling: i64,
}

/// A challenger overtakes only by finishing strictly above, so its best
/// case has to beat the incumbent's banked points. A tie at the boundary
/// is not an overtake and the label still clinches.
fn can_overtake(challenger: &CeilingRow<'_>, incumbent: &CeilingRow<'_>) -> bool {
    challenger.ceiling > incumbent.points
}

/// Clinching by ceiling comparison. Teams are ranked by their ceilings;
/// a zone label is granted only when no team beyond the zone boundary can
/// still overtake the candidate, and relegation only when a full sweep of
/// the remaining matches could not lift the team past anyone outside the
/// bottom three.
fn clinched_achievements(
    standings: &[TeamRow],
    matches_remaining: u32,
) -> HashMap<String, Achievement> {
    let bonus = matches_remaining as i64 * POINTS_WIN;
    // Stable sort keeps the standings order among ceiling ties.
    let mut rows: Vec<CeilingRow> = standings
        .iter()
        .map(|row| CeilingRow {
            team: row.team.as_str(),
            points: row.points,
            ceiling: row.points + bonus,
        })
        .collect();
    rows.sort_by(|a, b| b.ceiling.cmp(&a.ceiling));

    let n = rows.len();
    let mut out: HashMap<String, Achievement> = HashMap::new();

    let leader = rows[0];
    if !rows[1..].iter().any(|rival| can_overtake(rival, &leader)) {
        out.insert(leader.team.to_string(), Achievement::Champion);
    }

    assign_clinched_zone(
        &mut out,
        &rows,
        0..CHAMPIONS_LEAGUE_END.min(n),
        CHAMPIONS_LEAGUE_END,
        Achievement::ChampionsLeague,
    );
    assign_clinched_zone(
        &mut out,
        &rows,
        CHAMPIONS_LEAGUE_END.min(n)..EUROPA_LEAGUE_END.min(n),
        EUROPA_LEAGUE_END,
        Achievement::EuropaLeague,
    );
    assign_clinched_zone(
        &mut out,
        &rows,
        EUROPA_LEAGUE_END.min(n)..CONFERENCE_LEAGUE_END.min(n),
        CONFERENCE_LEAGUE_END,
        Achievement::ConferenceLeague,
    );

    // Overtaking a fellow bottom-three side is no escape; only the teams
    // above the cutoff count.
    let cutoff = n.saturating_sub(RELEGATION_SPOTS);
    for idx in cutoff..n {
        let row = rows[idx];
        if out.contains_key(row.team) {
            continue;
        }
        let escapes = rows[..cutoff].iter().any(|safe| can_overtake(&row, safe));
        if !escapes {
            out.insert(row.team.to_string(), Achievement::Relegated);
        }
    }

    out
}

fn assign_clinched_zone(
    out: &mut HashMap<String, Achievement>,
    rows: &[CeilingRow<'_>],
    zone: Range<usize>,
    boundary: usize,
    label: Achievement,
) {
    let behind = rows.get(boundary..).unwrap_or(&[]);
    for candidate in &rows[zone] {
        if out.contains_key(candidate.team) {
            continue;
        }
        let overtaken = behind.iter().any(|rival| can_overtake(rival, candidate));
        if !overtaken {
            out.insert(candidate.team.to_string(), label);
        }
    }
}
