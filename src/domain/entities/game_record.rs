use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::values::team::TeamCode;

/// Opening and closing number for one market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub open: Option<f64>,
    pub close: Option<f64>,
}

impl Line {
    pub fn movement(&self) -> Option<f64> {
        match (self.open, self.close) {
            (Some(open), Some(close)) => Some(close - open),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spreads {
    /// Home perspective: negative means the home side is favoured.
    pub home: Line,
    pub away: Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Home,
    Away,
    Tie,
}

/// One historical game with its final score and market lines.
/// Created once by the loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    pub season: i32,
    pub date: NaiveDate,
    pub home_team: TeamCode,
    pub away_team: TeamCode,
    pub home_score: u32,
    pub away_score: u32,
    pub spreads: Spreads,
    pub totals: Line,
    pub total_points: u32,
    pub margin: i32,
    pub winner: Winner,
}

impl GameRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        season: i32,
        date: NaiveDate,
        home_team: TeamCode,
        away_team: TeamCode,
        home_score: u32,
        away_score: u32,
        spreads: Spreads,
        totals: Line,
    ) -> Self {
        let margin = i32::try_from(i64::from(home_score) - i64::from(away_score))
            .unwrap_or(if home_score > away_score { i32::MAX } else { i32::MIN });
        let winner = match margin {
            m if m > 0 => Winner::Home,
            m if m < 0 => Winner::Away,
            _ => Winner::Tie,
        };
        Self {
            game_id: Self::make_id(season, date, &away_team, &home_team),
            season,
            date,
            home_team,
            away_team,
            home_score,
            away_score,
            spreads,
            totals,
            total_points: home_score.saturating_add(away_score),
            margin,
            winner,
        }
    }

    /// `{season}_{YYYYMMDD}_{away}_{home}`
    pub fn make_id(season: i32, date: NaiveDate, away: &TeamCode, home: &TeamCode) -> String {
        format!("{season}_{}_{away}_{home}", date.format("%Y%m%d"))
    }

    pub fn closing_spread(&self) -> Option<f64> {
        self.spreads.home.close
    }

    pub fn closing_total(&self) -> Option<f64> {
        self.totals.close
    }

    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields() {
        let game = GameRecord::new(
            2019,
            NaiveDate::from_ymd_opt(2019, 11, 17).unwrap(),
            TeamCode::standardize("GB").unwrap(),
            TeamCode::standardize("CHI").unwrap(),
            24,
            17,
            Spreads {
                home: Line {
                    open: Some(-3.0),
                    close: Some(-4.5),
                },
                away: Line {
                    open: Some(3.0),
                    close: Some(4.5),
                },
            },
            Line {
                open: Some(44.0),
                close: Some(42.5),
            },
        );
        assert_eq!(game.game_id, "2019_20191117_CHI_GB");
        assert_eq!(game.total_points, 41);
        assert_eq!(game.margin, 7);
        assert_eq!(game.winner, Winner::Home);
        assert_eq!(game.matchup(), "CHI @ GB");
        assert_eq!(game.spreads.home.movement(), Some(-1.5));
        assert_eq!(game.closing_total(), Some(42.5));
    }

    #[test]
    fn test_derived_fields_do_not_overflow() {
        let line = Line { open: None, close: None };
        let game = GameRecord::new(
            2019,
            NaiveDate::from_ymd_opt(2019, 11, 17).unwrap(),
            TeamCode::standardize("GB").unwrap(),
            TeamCode::standardize("CHI").unwrap(),
            u32::MAX,
            0,
            Spreads { home: line, away: line },
            line,
        );
        assert_eq!(game.total_points, u32::MAX);
        assert_eq!(game.margin, i32::MAX);
        assert_eq!(game.winner, Winner::Home);
    }
}
