use chrono::NaiveDate;

use calcio_stats::match_dataset::{MatchOutcome, MatchRecord};
use calcio_stats::team_form::{form_string, head_to_head, last_matches};

fn played(home: &str, away: &str, ft: (i64, i64), day: Option<u32>) -> MatchRecord {
    MatchRecord {
        division: "D1".to_string(),
        season: "2024-2025".to_string(),
        date: day.and_then(|d| NaiveDate::from_ymd_opt(2025, 4, d)),
        home_team: home.to_string(),
        away_team: away.to_string(),
        ft_home_goals: Some(ft.0),
        ft_away_goals: Some(ft.1),
        ft_result: Some(MatchOutcome::from_goals(ft.0, ft.1)),
        ht_home_goals: Some(0),
        ht_away_goals: Some(0),
        ht_result: Some(MatchOutcome::Draw),
    }
}

#[test]
fn form_string_reads_newest_first() {
    let matches = vec![
        played("Roma", "Lazio", (0, 2), Some(1)),  // loss
        played("Milan", "Roma", (1, 1), Some(8)),  // draw
        played("Roma", "Inter", (3, 0), Some(15)), // win
    ];
    assert_eq!(form_string(&matches, "Roma", 5), "WDL");
    assert_eq!(form_string(&matches, "Roma", 2), "WD");
    assert_eq!(form_string(&matches, "Lazio", 5), "W");
    assert_eq!(form_string(&matches, "Unknown", 5), "");
}

#[test]
fn form_string_skips_rows_with_no_outcome() {
    let mut unplayed = played("Roma", "Lazio", (0, 0), Some(22));
    unplayed.ft_home_goals = None;
    unplayed.ft_away_goals = None;
    unplayed.ft_result = None;

    let matches = vec![played("Roma", "Inter", (2, 1), Some(15)), unplayed];
    assert_eq!(form_string(&matches, "Roma", 5), "W");
}

#[test]
fn last_matches_orders_and_limits() {
    let matches = vec![
        played("Roma", "Lazio", (1, 0), Some(1)),
        played("Roma", "Milan", (1, 0), None), // undated sorts last
        played("Inter", "Roma", (1, 0), Some(20)),
        played("Roma", "Napoli", (1, 0), Some(10)),
    ];

    let recent = last_matches(&matches, "Roma", 3);
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].away_team, "Roma"); // day 20
    assert_eq!(recent[1].away_team, "Napoli"); // day 10
    assert_eq!(recent[2].away_team, "Lazio"); // day 1

    let all = last_matches(&matches, "Roma", 10);
    assert_eq!(all.len(), 4);
    assert_eq!(all[3].away_team, "Milan");
}

#[test]
fn head_to_head_covers_both_venues() {
    let matches = vec![
        played("Roma", "Lazio", (2, 0), Some(1)),
        played("Lazio", "Roma", (1, 1), Some(15)),
        played("Roma", "Inter", (0, 3), Some(8)),
    ];

    let derby = head_to_head(&matches, "Roma", "Lazio", 5);
    assert_eq!(derby.len(), 2);
    assert_eq!(derby[0].home_team, "Lazio");
    assert_eq!(derby[1].home_team, "Roma");

    let capped = head_to_head(&matches, "Lazio", "Roma", 1);
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].home_team, "Lazio");
}
