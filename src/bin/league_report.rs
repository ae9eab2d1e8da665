use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use calcio_stats::achievements::{self, Achievement};
use calcio_stats::match_dataset::{self, Phase};
use calcio_stats::standings::{self, TeamRow, VenueFilter};
use calcio_stats::team_form;
use calcio_stats::under_over::{self, UnderOverRow};

const FORM_LENGTH: usize = 5;

#[derive(Debug, Serialize)]
struct LeagueReport {
    season: String,
    division: Option<String>,
    standings: Vec<TeamRow>,
    achievements: HashMap<String, Achievement>,
    form: HashMap<String, String>,
    home_table: Vec<TeamRow>,
    away_table: Vec<TeamRow>,
    under_over: Vec<UnderOverRow>,
    threshold: f64,
}

fn main() -> Result<()> {
    let args = Args::parse()?;

    let conn = match_dataset::open_db(&args.db_path)?;
    let season = match args.season {
        Some(season) => season,
        None => {
            let seasons = match_dataset::available_seasons(&conn)?;
            seasons
                .last()
                .cloned()
                .ok_or_else(|| anyhow!("no seasons in {}", args.db_path.display()))?
        }
    };
    let matches = match_dataset::load_matches(&conn, Some(&season), args.division.as_deref())?;
    if matches.is_empty() {
        return Err(anyhow!("no matches stored for season {season}"));
    }

    let table = standings::compute_standings(&matches, Phase::FullTime, VenueFilter::All, 0, 0);
    let achievements = achievements::detect_achievements(&table, args.remaining);
    let form: HashMap<String, String> = table
        .iter()
        .map(|row| {
            (
                row.team.clone(),
                team_form::form_string(&matches, &row.team, FORM_LENGTH),
            )
        })
        .collect();
    let home_table =
        standings::compute_standings(&matches, Phase::FullTime, VenueFilter::HomeOnly, 0, 0);
    let away_table =
        standings::compute_standings(&matches, Phase::FullTime, VenueFilter::AwayOnly, 0, 0);
    let uo_table =
        under_over::compute_under_over(&matches, args.threshold, VenueFilter::All, Phase::FullTime);

    let report = LeagueReport {
        season,
        division: args.division,
        standings: table,
        achievements,
        form,
        home_table,
        away_table,
        under_over: uo_table,
        threshold: args.threshold,
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &LeagueReport) {
    println!(
        "Season {}{}  ({} teams)",
        report.season,
        report
            .division
            .as_deref()
            .map(|d| format!(" [{d}]"))
            .unwrap_or_default(),
        report.standings.len()
    );

    println!(
        "\n{:>3} {:<22} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}  {:<6} {}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Form", "Outcome"
    );
    for row in &report.standings {
        let form = report.form.get(&row.team).map(String::as_str).unwrap_or("");
        let outcome = report
            .achievements
            .get(&row.team)
            .map(|a| a.label())
            .unwrap_or("");
        println!(
            "{:>3} {:<22} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}  {:<6} {}",
            row.rank,
            row.team,
            row.played,
            row.wins,
            row.draws,
            row.losses,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points,
            form,
            outcome
        );
    }

    print_venue_table("Home only", &report.home_table);
    print_venue_table("Away only", &report.away_table);

    println!("\nUnder/Over {:.1}", report.threshold);
    println!(
        "{:<22} {:>3} {:>3} {:>3} {:>7} {:>7} {:>5}  {}",
        "Team", "P", "U", "O", "U%", "O%", "G/P", "Play"
    );
    for row in &report.under_over {
        let lean = match row.recommended {
            Some(under_over::Lean::Under) => "U",
            Some(under_over::Lean::Over) => "O",
            None => "-",
        };
        println!(
            "{:<22} {:>3} {:>3} {:>3} {:>6.2}% {:>6.2}% {:>5.2}  {}",
            row.team,
            row.played,
            row.under_count,
            row.over_count,
            row.under_pct,
            row.over_pct,
            row.goals_per_match,
            lean
        );
    }
}

fn print_venue_table(title: &str, rows: &[TeamRow]) {
    println!("\n{title}");
    for row in rows {
        println!(
            "{:>3} {:<22} {:>3} {:>4} pts (gd {:+})",
            row.rank, row.team, row.played, row.points, row.goal_difference
        );
    }
}

#[derive(Debug)]
struct Args {
    db_path: PathBuf,
    season: Option<String>,
    division: Option<String>,
    threshold: f64,
    remaining: u32,
    json: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let raw = std::env::args().skip(1).collect::<Vec<_>>();
        let mut db_path: Option<PathBuf> = None;
        let mut season = None;
        let mut division = None;
        let mut threshold = 2.5f64;
        let mut remaining = 0u32;
        let mut json = false;

        let mut idx = 0usize;
        while idx < raw.len() {
            match raw[idx].as_str() {
                "--season" => {
                    season = Some(take_value(&raw, &mut idx, "--season")?);
                }
                "--division" => {
                    division = Some(take_value(&raw, &mut idx, "--division")?);
                }
                "--threshold" => {
                    threshold = take_value(&raw, &mut idx, "--threshold")?
                        .parse::<f64>()
                        .context("--threshold expects a number")?;
                }
                "--remaining" => {
                    remaining = take_value(&raw, &mut idx, "--remaining")?
                        .parse::<u32>()
                        .context("--remaining expects a match count")?;
                }
                "--json" => json = true,
                other if db_path.is_none() && !other.starts_with("--") => {
                    db_path = Some(PathBuf::from(other));
                }
                other => return Err(anyhow!("unknown argument {other}")),
            }
            idx += 1;
        }

        Ok(Self {
            db_path: db_path.ok_or_else(|| {
                anyhow!("usage: league_report <db_path> [--season S] [--division D] [--threshold T] [--remaining N] [--json]")
            })?,
            season,
            division,
            threshold,
            remaining,
            json,
        })
    }
}

fn take_value(raw: &[String], idx: &mut usize, flag: &str) -> Result<String> {
    *idx += 1;
    raw.get(*idx)
        .cloned()
        .ok_or_else(|| anyhow!("{flag} expects a value"))
}
