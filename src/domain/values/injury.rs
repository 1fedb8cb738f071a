//! Injury impact scoring.
//!
//! Each reported injury scores `positionWeight × statusMultiplier`. A team's
//! reports aggregate into a [`TeamInjuryImpact`], and both teams together
//! produce the game-level spread/total deltas.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::values::points::round1;
use crate::domain::values::team::TeamCode;

/// Weight for positions outside the table.
const DEFAULT_POSITION_WEIGHT: f64 = 3.0;

const POSITION_WEIGHTS: &[(&str, f64)] = &[
    ("QB", 10.0),
    ("LT", 8.0),
    ("CB", 7.5),
    ("RB", 7.5),
    ("WR", 7.0),
    ("DE", 7.0),
    ("C", 6.5),
    ("RT", 6.5),
    ("LB", 6.5),
    ("DT", 6.0),
    ("S", 6.0),
    ("LG", 6.0),
    ("TE", 5.5),
    ("RG", 5.5),
    ("K", 4.0),
    ("P", 2.0),
];

pub const QUARTERBACK: &str = "QB";

/// Every position in the weight table, heaviest first.
pub fn known_positions() -> impl Iterator<Item = &'static str> {
    POSITION_WEIGHTS.iter().map(|(p, _)| *p)
}

pub fn position_weight(position: &str) -> f64 {
    POSITION_WEIGHTS
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(position.trim()))
        .map(|(_, w)| *w)
        .unwrap_or(DEFAULT_POSITION_WEIGHT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryStatus {
    Probable,
    Questionable,
    Doubtful,
    Out,
    #[serde(rename = "IR")]
    InjuredReserve,
    #[serde(other)]
    Unknown,
}

impl InjuryStatus {
    pub fn multiplier(&self) -> f64 {
        match self {
            InjuryStatus::Out | InjuryStatus::InjuredReserve => 1.0,
            InjuryStatus::Doubtful => 0.8,
            InjuryStatus::Questionable => 0.5,
            InjuryStatus::Probable => 0.2,
            InjuryStatus::Unknown => 0.3,
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjuryStatus::Probable => write!(f, "Probable"),
            InjuryStatus::Questionable => write!(f, "Questionable"),
            InjuryStatus::Doubtful => write!(f, "Doubtful"),
            InjuryStatus::Out => write!(f, "Out"),
            InjuryStatus::InjuredReserve => write!(f, "IR"),
            InjuryStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

pub fn injury_impact(position: &str, status: InjuryStatus) -> f64 {
    round1(position_weight(position) * status.multiplier())
}

/// A player injury as reported by an injury provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInjury {
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub status: InjuryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injury_type: Option<String>,
    pub is_starter: bool,
}

/// A reported injury with its computed impact score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryReport {
    #[serde(flatten)]
    pub injury: PlayerInjury,
    pub impact_score: f64,
}

impl InjuryReport {
    pub fn new(injury: PlayerInjury) -> Self {
        let impact_score = injury_impact(&injury.position, injury.status);
        Self {
            injury,
            impact_score,
        }
    }

    pub fn is_quarterback(&self) -> bool {
        self.injury.position.eq_ignore_ascii_case(QUARTERBACK)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryPolicy {
    /// Reports at or above this score are key injuries.
    pub key_injury_threshold: f64,
    /// Spread points per point of net (home − away) impact.
    pub spread_per_point: f64,
    /// Total points per point of combined impact (negative: injuries suppress scoring).
    pub total_per_point: f64,
    /// Combined impact above which a game is flagged high-impact.
    pub high_impact_threshold: f64,
    /// Team strength points lost per point of team impact.
    pub strength_per_point: f64,
}

impl Default for InjuryPolicy {
    fn default() -> Self {
        Self {
            key_injury_threshold: 4.0,
            spread_per_point: 0.3,
            total_per_point: -0.2,
            high_impact_threshold: 15.0,
            strength_per_point: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInjuryImpact {
    pub team: TeamCode,
    pub injuries: Vec<InjuryReport>,
    pub total_impact: f64,
    pub key_injuries: Vec<InjuryReport>,
    pub injury_count: usize,
    pub starter_injuries: usize,
    pub strength_adjustment: f64,
    /// False when the provider could not supply this team's report.
    pub data_complete: bool,
}

impl TeamInjuryImpact {
    pub fn aggregate(team: TeamCode, injuries: Vec<PlayerInjury>, policy: &InjuryPolicy) -> Self {
        let reports: Vec<InjuryReport> = injuries.into_iter().map(InjuryReport::new).collect();
        let total_impact = round1(reports.iter().map(|r| r.impact_score).sum());
        let key_injuries = reports
            .iter()
            .filter(|r| r.impact_score >= policy.key_injury_threshold)
            .cloned()
            .collect();
        let starter_injuries = reports.iter().filter(|r| r.injury.is_starter).count();

        Self {
            team,
            injury_count: reports.len(),
            injuries: reports,
            total_impact,
            key_injuries,
            starter_injuries,
            strength_adjustment: if total_impact == 0.0 {
                0.0
            } else {
                round1(-total_impact * policy.strength_per_point)
            },
            data_complete: true,
        }
    }

    /// Zero-impact marker for a team whose report could not be fetched.
    pub fn unavailable(team: TeamCode) -> Self {
        Self {
            team,
            injuries: Vec::new(),
            total_impact: 0.0,
            key_injuries: Vec::new(),
            injury_count: 0,
            starter_injuries: 0,
            strength_adjustment: 0.0,
            data_complete: false,
        }
    }

    pub fn has_key_qb_injury(&self) -> bool {
        self.key_injuries.iter().any(InjuryReport::is_quarterback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInjuryImpact {
    pub estimated_spread_impact: f64,
    pub estimated_total_impact: f64,
    pub high_impact_game: bool,
    pub combined_impact: f64,
}

/// Injury annotation attached to a game by the injury stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryAdjustment {
    pub home: TeamInjuryImpact,
    pub away: TeamInjuryImpact,
    pub game_impact: GameInjuryImpact,
}

impl InjuryAdjustment {
    pub fn combine(home: TeamInjuryImpact, away: TeamInjuryImpact, policy: &InjuryPolicy) -> Self {
        let combined = round1(home.total_impact + away.total_impact);
        let net = home.total_impact - away.total_impact;
        let game_impact = GameInjuryImpact {
            estimated_spread_impact: if net == 0.0 { 0.0 } else { round1(net * policy.spread_per_point) },
            estimated_total_impact: if combined == 0.0 {
                0.0
            } else {
                round1(combined * policy.total_per_point)
            },
            high_impact_game: combined > policy.high_impact_threshold,
            combined_impact: combined,
        };
        Self {
            home,
            away,
            game_impact,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.home.data_complete && self.away.data_complete
    }

    pub fn has_key_qb_injury(&self) -> bool {
        self.home.has_key_qb_injury() || self.away.has_key_qb_injury()
    }

    /// Data-completeness confidence used by the classifier.
    pub fn completeness(&self) -> f64 {
        if !self.is_complete() {
            return 0.5;
        }
        let combined = self.game_impact.combined_impact;
        if combined > 10.0 {
            0.85
        } else if combined > 5.0 {
            0.7
        } else {
            0.5
        }
    }
}
