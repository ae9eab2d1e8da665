use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

/// Outcome of a match (or of one half), seen from the home side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchOutcome {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "H" => Some(Self::HomeWin),
            "D" => Some(Self::Draw),
            "A" => Some(Self::AwayWin),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::HomeWin => "H",
            Self::Draw => "D",
            Self::AwayWin => "A",
        }
    }

    pub fn from_goals(home: i64, away: i64) -> Self {
        if home > away {
            Self::HomeWin
        } else if home < away {
            Self::AwayWin
        } else {
            Self::Draw
        }
    }
}

/// Which portion of the match goal counts are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    FullTime,
    FirstHalf,
    SecondHalf,
}

/// One played match as handed to the computation layer. Goal fields are
/// `None` where the source data could not be parsed; such rows are
/// skipped by any aggregation that needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub division: String,
    pub season: String,
    pub date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    pub ft_home_goals: Option<i64>,
    pub ft_away_goals: Option<i64>,
    pub ft_result: Option<MatchOutcome>,
    pub ht_home_goals: Option<i64>,
    pub ht_away_goals: Option<i64>,
    pub ht_result: Option<MatchOutcome>,
}

impl MatchRecord {
    /// Home/away goals for the requested phase. Second-half figures are
    /// derived by subtraction and need both full-time and half-time goals.
    pub fn phase_goals(&self, phase: Phase) -> Option<(i64, i64)> {
        match phase {
            Phase::FullTime => Some((self.ft_home_goals?, self.ft_away_goals?)),
            Phase::FirstHalf => Some((self.ht_home_goals?, self.ht_away_goals?)),
            Phase::SecondHalf => {
                let home = self.ft_home_goals? - self.ht_home_goals?;
                let away = self.ft_away_goals? - self.ht_away_goals?;
                Some((home, away))
            }
        }
    }

    /// Outcome for the phase. Full-time and first-half trust the stored
    /// result when one exists; the second half is always derived from the
    /// goal difference since no stored field covers it.
    pub fn phase_outcome(&self, phase: Phase) -> Option<MatchOutcome> {
        let stored = match phase {
            Phase::FullTime => self.ft_result,
            Phase::FirstHalf => self.ht_result,
            Phase::SecondHalf => None,
        };
        stored.or_else(|| {
            self.phase_goals(phase)
                .map(|(home, away)| MatchOutcome::from_goals(home, away))
        })
    }
}

/// Dates arrive as text from the importer; the two formats below cover
/// the normalized exports plus raw day-first spreadsheet dates.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    // Datetime strings keep the date in the first ten bytes.
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            div TEXT NOT NULL,
            season TEXT NOT NULL,
            date TEXT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            ft_home_goals INTEGER NULL,
            ft_away_goals INTEGER NULL,
            ft_result TEXT NULL,
            ht_home_goals INTEGER NULL,
            ht_away_goals INTEGER NULL,
            ht_result TEXT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(home_team, away_team, date)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(season);
        CREATE INDEX IF NOT EXISTS idx_matches_div ON matches(div);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn upsert_matches(conn: &mut Connection, rows: &[MatchRecord]) -> Result<usize> {
    let tx = conn.transaction().context("begin upsert transaction")?;
    let mut written = 0usize;
    for row in rows {
        tx.execute(
            r#"
            INSERT INTO matches (
                div, season, date, home_team, away_team,
                ft_home_goals, ft_away_goals, ft_result,
                ht_home_goals, ht_away_goals, ht_result, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(home_team, away_team, date) DO UPDATE SET
                div = excluded.div,
                season = excluded.season,
                ft_home_goals = excluded.ft_home_goals,
                ft_away_goals = excluded.ft_away_goals,
                ft_result = excluded.ft_result,
                ht_home_goals = excluded.ht_home_goals,
                ht_away_goals = excluded.ht_away_goals,
                ht_result = excluded.ht_result,
                updated_at = excluded.updated_at
            "#,
            params![
                row.division,
                row.season,
                row.date.map(|d| d.format("%Y-%m-%d").to_string()),
                row.home_team,
                row.away_team,
                row.ft_home_goals,
                row.ft_away_goals,
                row.ft_result.map(MatchOutcome::code),
                row.ht_home_goals,
                row.ht_away_goals,
                row.ht_result.map(MatchOutcome::code),
                Utc::now().to_rfc3339(),
            ],
        )
        .context("upsert match")?;
        written += 1;
    }
    tx.commit().context("commit upsert transaction")?;
    Ok(written)
}

/// Load matches for one season and/or division. This is the only filtering
/// the store performs; everything finer-grained happens in the computation
/// layer over the returned slice.
pub fn load_matches(
    conn: &Connection,
    season: Option<&str>,
    division: Option<&str>,
) -> Result<Vec<MatchRecord>> {
    let mut sql = String::from(
        r#"
        SELECT div, season, date, home_team, away_team,
               ft_home_goals, ft_away_goals, ft_result,
               ht_home_goals, ht_away_goals, ht_result
        FROM matches
        WHERE 1 = 1
        "#,
    );
    let mut args: Vec<String> = Vec::new();
    if let Some(season) = season {
        sql.push_str(&format!(" AND season = ?{}", args.len() + 1));
        args.push(season.to_string());
    }
    if let Some(division) = division {
        sql.push_str(&format!(" AND div = ?{}", args.len() + 1));
        args.push(division.to_string());
    }
    // ISO dates sort lexically, so text ordering is chronological here.
    sql.push_str(" ORDER BY date ASC, id ASC");

    let mut stmt = conn.prepare(&sql).context("prepare load matches query")?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), |row| {
            Ok(MatchRecord {
                division: row.get(0)?,
                season: row.get(1)?,
                date: row
                    .get::<_, Option<String>>(2)?
                    .as_deref()
                    .and_then(parse_match_date),
                home_team: row.get(3)?,
                away_team: row.get(4)?,
                ft_home_goals: row.get(5)?,
                ft_away_goals: row.get(6)?,
                ft_result: row
                    .get::<_, Option<String>>(7)?
                    .as_deref()
                    .and_then(MatchOutcome::from_code),
                ht_home_goals: row.get(8)?,
                ht_away_goals: row.get(9)?,
                ht_result: row
                    .get::<_, Option<String>>(10)?
                    .as_deref()
                    .and_then(MatchOutcome::from_code),
            })
        })
        .context("query load matches")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

pub fn available_seasons(conn: &Connection) -> Result<Vec<String>> {
    list_distinct(conn, "SELECT DISTINCT season FROM matches ORDER BY season ASC")
}

pub fn available_divisions(conn: &Connection) -> Result<Vec<String>> {
    list_distinct(conn, "SELECT DISTINCT div FROM matches ORDER BY div ASC")
}

fn list_distinct(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql).context("prepare distinct query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query distinct values")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode distinct value")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{MatchOutcome, parse_match_date};

    #[test]
    fn parse_match_date_accepts_common_formats() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_match_date("2024-03-09"), expected);
        assert_eq!(parse_match_date("09/03/2024"), expected);
        assert_eq!(parse_match_date("2024-03-09T15:00:00Z"), expected);
        assert_eq!(parse_match_date(""), None);
        assert_eq!(parse_match_date("not a date"), None);
    }

    #[test]
    fn outcome_codes_round_trip() {
        for code in ["H", "D", "A"] {
            let outcome = MatchOutcome::from_code(code).expect("known code");
            assert_eq!(outcome.code(), code);
        }
        assert_eq!(MatchOutcome::from_code("X"), None);
    }
}
