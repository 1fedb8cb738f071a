//! Loader use case: turns a raw JSON corpus into validated game records.
//!
//! Two input shapes are accepted: a bare array of games, or an object with a
//! `games` array. Each game may use the stage-artifact field names
//! (`homeTeam`, `spreads.home.close`, ...) or the flat names found in raw
//! line archives (`home_team`, `home_close_spread`, `close_over_under`, ...).

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::entities::game_record::{GameRecord, Line, Spreads, Winner};
use crate::domain::error::{DomainError, RecordError};
use crate::domain::values::points::round1;
use crate::domain::values::team::TeamCode;

/// Largest final score the loader accepts.
const MAX_SCORE: u32 = u16::MAX as u32;

/// Result of a load: the valid games plus what was dropped and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    pub total_records: usize,
    pub games: Vec<GameRecord>,
    pub malformed: Vec<RecordError>,
    pub analytics: CorpusAnalytics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusAnalytics {
    pub total_games: usize,
    pub seasons: Vec<i32>,
    pub teams: Vec<TeamCode>,
    pub avg_total_points: f64,
    pub avg_margin: f64,
    pub avg_closing_spread: f64,
    pub avg_closing_total: f64,
    pub home_win_pct: f64,
    pub by_season: Vec<SeasonBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonBreakdown {
    pub season: i32,
    pub games: usize,
    pub avg_total_points: f64,
    pub home_win_pct: f64,
}

#[derive(Default)]
pub struct LoadGamesUseCase;

impl LoadGamesUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Validate every record. Malformed records are dropped and reported;
    /// an empty corpus or a duplicate game id fails the whole load.
    pub fn execute(&self, raw: &Value) -> Result<LoadOutcome, DomainError> {
        let records = records(raw)?;
        if records.is_empty() {
            return Err(DomainError::EmptyInput("input contains no game records".into()));
        }

        let mut games = Vec::with_capacity(records.len());
        let mut malformed = Vec::new();
        let mut seen = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            match parse_game(record) {
                Ok(game) => {
                    if !seen.insert(game.game_id.clone()) {
                        return Err(DomainError::DuplicateGameId(game.game_id));
                    }
                    games.push(game);
                }
                Err(reason) => {
                    warn!(index, reason = %reason, "dropping malformed game record");
                    malformed.push(RecordError::Malformed { index, reason });
                }
            }
        }

        if games.is_empty() {
            return Err(DomainError::EmptyInput(format!(
                "none of the {} records are valid games",
                records.len()
            )));
        }

        let analytics = CorpusAnalytics::from_games(&games);
        info!(
            total = records.len(),
            loaded = games.len(),
            dropped = malformed.len(),
            seasons = analytics.seasons.len(),
            "game corpus loaded"
        );

        Ok(LoadOutcome {
            total_records: records.len(),
            games,
            malformed,
            analytics,
        })
    }
}

fn records(raw: &Value) -> Result<&Vec<Value>, DomainError> {
    match raw {
        Value::Array(items) => Ok(items),
        Value::Object(map) => map
            .get("games")
            .and_then(Value::as_array)
            .ok_or_else(|| DomainError::InvalidInput("expected an array or an object with a 'games' array".into())),
        _ => Err(DomainError::InvalidInput("expected an array of games".into())),
    }
}

/// First present, non-null value among the given paths. A path is a list of
/// nested keys.
fn lookup<'a>(record: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let mut current = record;
        for key in *path {
            current = current.get(*key)?;
        }
        (!current.is_null()).then_some(current)
    })
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn required_number(record: &Value, field: &str, paths: &[&[&str]]) -> Result<f64, String> {
    let value = lookup(record, paths).ok_or_else(|| format!("missing {field}"))?;
    number(value).ok_or_else(|| format!("non-numeric {field}: {value}"))
}

/// Absent or null lines are fine; a present line that is not a number is not.
fn optional_number(record: &Value, field: &str, paths: &[&[&str]]) -> Result<Option<f64>, String> {
    match lookup(record, paths) {
        None => Ok(None),
        Some(value) => number(value)
            .map(Some)
            .ok_or_else(|| format!("non-numeric {field}: {value}")),
    }
}

fn score(record: &Value, field: &str, paths: &[&[&str]]) -> Result<u32, String> {
    let n = required_number(record, field, paths)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(format!("{field} must be a non-negative integer, got {n}"));
    }
    if n > MAX_SCORE as f64 {
        return Err(format!("{field} {n} is above {MAX_SCORE}"));
    }
    Ok(n as u32)
}

fn team(record: &Value, field: &str, paths: &[&[&str]]) -> Result<TeamCode, String> {
    let value = lookup(record, paths).ok_or_else(|| format!("missing {field}"))?;
    let name = value.as_str().ok_or_else(|| format!("{field} is not a string"))?;
    TeamCode::standardize(name).ok_or_else(|| format!("unknown team '{name}'"))
}

/// `YYYYMMDD` as an integer or string, or an ISO date (time part ignored).
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = match value {
        Value::Number(n) => n.as_i64()?.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.len() == 8 && text.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(&text, "%Y%m%d").ok();
    }
    let day = text.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Season a game belongs to when the record does not say: January and
/// February games close out the previous year's season.
fn season_of(date: NaiveDate) -> i32 {
    if date.month() <= 2 {
        date.year() - 1
    } else {
        date.year()
    }
}

fn parse_game(record: &Value) -> Result<GameRecord, String> {
    if !record.is_object() {
        return Err("record is not an object".into());
    }

    let date_value = lookup(record, &[&["date"], &["gameDate"], &["game_date"]]).ok_or("missing date")?;
    let date = parse_date(date_value).ok_or_else(|| format!("unparseable date: {date_value}"))?;

    let season = match lookup(record, &[&["season"]]) {
        Some(v) => {
            let n = number(v).ok_or_else(|| format!("non-numeric season: {v}"))?;
            if n.fract() != 0.0 {
                return Err(format!("season must be an integer, got {n}"));
            }
            n as i32
        }
        None => season_of(date),
    };

    let home_team = team(record, "home team", &[&["homeTeam"], &["home_team"]])?;
    let away_team = team(record, "away team", &[&["awayTeam"], &["away_team"]])?;
    if home_team == away_team {
        return Err(format!("home and away are both {home_team}"));
    }

    let home_score = score(record, "home score", &[&["homeScore"], &["home_score"], &["home_final"]])?;
    let away_score = score(record, "away score", &[&["awayScore"], &["away_score"], &["away_final"]])?;

    let home_spread = Line {
        open: optional_number(
            record,
            "home opening spread",
            &[&["spreads", "home", "open"], &["spread", "open"], &["home_open_spread"]],
        )?,
        close: optional_number(
            record,
            "home closing spread",
            &[&["spreads", "home", "close"], &["spread", "close"], &["home_close_spread"]],
        )?,
    };
    let away_open = optional_number(
        record,
        "away opening spread",
        &[&["spreads", "away", "open"], &["away_open_spread"]],
    )?;
    let away_close = optional_number(
        record,
        "away closing spread",
        &[&["spreads", "away", "close"], &["away_close_spread"]],
    )?;
    let away_spread = Line {
        open: away_open.or(home_spread.open.map(|s| -s)),
        close: away_close.or(home_spread.close.map(|s| -s)),
    };

    let totals = Line {
        open: optional_number(
            record,
            "opening total",
            &[&["totals", "open"], &["total", "open"], &["open_over_under"]],
        )?,
        close: optional_number(
            record,
            "closing total",
            &[&["totals", "close"], &["total", "close"], &["close_over_under"]],
        )?,
    };
    for (label, value) in [("opening total", totals.open), ("closing total", totals.close)] {
        if let Some(v) = value.filter(|v| *v <= 0.0) {
            return Err(format!("{label} must be positive, got {v}"));
        }
    }

    Ok(GameRecord::new(
        season,
        date,
        home_team,
        away_team,
        home_score,
        away_score,
        Spreads {
            home: home_spread,
            away: away_spread,
        },
        totals,
    ))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        round1(sum / count as f64)
    }
}

fn home_win_pct<'a>(games: impl Iterator<Item = &'a GameRecord>) -> f64 {
    let (wins, count) = games.fold((0usize, 0usize), |(w, c), g| {
        (w + usize::from(g.winner == Winner::Home), c + 1)
    });
    if count == 0 {
        0.0
    } else {
        round1(wins as f64 / count as f64 * 100.0)
    }
}

impl CorpusAnalytics {
    pub fn from_games(games: &[GameRecord]) -> Self {
        let seasons: BTreeSet<i32> = games.iter().map(|g| g.season).collect();
        let teams: BTreeSet<TeamCode> = games
            .iter()
            .flat_map(|g| [g.home_team.clone(), g.away_team.clone()])
            .collect();

        let mut per_season: BTreeMap<i32, Vec<&GameRecord>> = BTreeMap::new();
        for game in games {
            per_season.entry(game.season).or_default().push(game);
        }
        let by_season = per_season
            .into_iter()
            .map(|(season, list)| SeasonBreakdown {
                season,
                games: list.len(),
                avg_total_points: mean(list.iter().map(|g| g.total_points as f64)),
                home_win_pct: home_win_pct(list.iter().copied()),
            })
            .collect();

        Self {
            total_games: games.len(),
            seasons: seasons.into_iter().collect(),
            teams: teams.into_iter().collect(),
            avg_total_points: mean(games.iter().map(|g| g.total_points as f64)),
            avg_margin: mean(games.iter().map(|g| g.margin.unsigned_abs() as f64)),
            avg_closing_spread: mean(games.iter().filter_map(|g| g.closing_spread()).map(f64::abs)),
            avg_closing_total: mean(games.iter().filter_map(|g| g.closing_total())),
            home_win_pct: home_win_pct(games.iter()),
            by_season,
        }
    }
}
