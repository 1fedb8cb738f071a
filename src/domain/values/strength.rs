//! Team strength, form and matchup advantage.
//!
//! The strength stage is where the headline numbers come from: the matchup
//! advantage becomes the predicted spread, and the two offenses (plus the
//! weather and injury deltas) become the predicted total.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::values::injury::InjuryAdjustment;
use crate::domain::values::points::round1;
use crate::domain::values::team::TeamCode;
use crate::domain::values::weather::WeatherAdjustment;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthRatings {
    pub overall: f64,
    pub offense: f64,
    pub defense: f64,
    pub special_teams: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Most recent results, oldest first (1 = win, 0 = loss).
    pub last5_games: Vec<u8>,
    pub trend: Trend,
    /// Share of recent games won, 0–100.
    pub momentum: f64,
}

impl Form {
    pub fn from_results(results: &[bool]) -> Self {
        let last5_games: Vec<u8> = results
            .iter()
            .rev()
            .take(5)
            .rev()
            .map(|won| u8::from(*won))
            .collect();
        let wins = last5_games.iter().filter(|r| **r == 1).count();
        let momentum = if last5_games.is_empty() {
            0.0
        } else {
            (wins as f64 / last5_games.len() as f64 * 100.0).round()
        };

        let trend = if last5_games.len() < 3 {
            Trend::Neutral
        } else {
            let recent_wins = last5_games.iter().rev().take(3).filter(|r| **r == 1).count();
            if recent_wins >= 2 {
                Trend::Improving
            } else {
                Trend::Declining
            }
        };

        Self {
            last5_games,
            trend,
            momentum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Situational {
    /// Home-field advantage in points.
    pub home_advantage: f64,
    #[serde(default)]
    pub strength_of_schedule: Option<f64>,
}

/// A team's strength snapshot for one season/week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStrength {
    pub team: TeamCode,
    pub season: i32,
    pub week: u32,
    pub strength: StrengthRatings,
    pub form: Form,
    pub situational: Situational,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthPolicy {
    /// Spread points per point of overall-rating differential.
    pub strength_weight: f64,
    /// Spread points per point of momentum differential.
    pub form_weight: f64,
    pub total_offense_weight: f64,
    pub total_base: f64,
    /// |totalAdvantage| above this flags a high-advantage game.
    pub high_advantage_threshold: f64,
    pub base_confidence: f64,
    pub confidence_per_point: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Fold weather and injury deltas into the predicted lines.
    ///
    /// `false` gives the base formula: the total is the offense blend plus
    /// the weather total delta only, and the spread is the matchup advantage.
    pub fold_adjustments: bool,
}

impl Default for StrengthPolicy {
    fn default() -> Self {
        Self {
            strength_weight: 0.1,
            form_weight: 0.02,
            total_offense_weight: 0.6,
            total_base: 20.0,
            high_advantage_threshold: 6.0,
            base_confidence: 0.7,
            confidence_per_point: 0.01,
            min_confidence: 0.55,
            max_confidence: 0.95,
            fold_adjustments: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupAdvantage {
    pub strength_advantage: f64,
    pub home_field_advantage: f64,
    pub form_advantage: f64,
    pub total_advantage: f64,
    pub confidence: f64,
}

impl MatchupAdvantage {
    pub fn compute(home: &TeamStrength, away: &TeamStrength, policy: &StrengthPolicy) -> Self {
        let strength_diff = home.strength.overall - away.strength.overall;
        let home_field = home.situational.home_advantage;
        let form_advantage = (home.form.momentum - away.form.momentum) * policy.form_weight;

        Self {
            strength_advantage: round1(strength_diff),
            home_field_advantage: round1(home_field),
            form_advantage: round1(form_advantage),
            total_advantage: round1(strength_diff * policy.strength_weight + home_field + form_advantage),
            confidence: (policy.base_confidence + strength_diff.abs() * policy.confidence_per_point)
                .clamp(policy.min_confidence, policy.max_confidence),
        }
    }
}

/// Strength annotation attached to a game by the strength stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthAdjustment {
    pub home: TeamStrength,
    pub away: TeamStrength,
    pub matchup: MatchupAdvantage,
    pub predicted_spread: f64,
    pub predicted_total: f64,
    pub high_advantage_game: bool,
}

impl StrengthAdjustment {
    /// Combine both teams' strength with the earlier stages' deltas.
    pub fn assess(
        home: TeamStrength,
        away: TeamStrength,
        weather: Option<&WeatherAdjustment>,
        injuries: Option<&InjuryAdjustment>,
        policy: &StrengthPolicy,
    ) -> Self {
        let matchup = MatchupAdvantage::compute(&home, &away, policy);

        // The advantage is in home-points; spread-convention deltas (negative
        // favours home) are subtracted.
        let mut spread = matchup.total_advantage;
        let mut total = (home.strength.offense + away.strength.offense) * policy.total_offense_weight
            + policy.total_base;

        if let Some(w) = weather {
            total += w.total_delta;
            if policy.fold_adjustments {
                spread -= w.spread_delta;
            }
        }
        if let (Some(i), true) = (injuries, policy.fold_adjustments) {
            spread -= i.game_impact.estimated_spread_impact;
            total += i.game_impact.estimated_total_impact;
        }

        Self {
            high_advantage_game: matchup.total_advantage.abs() > policy.high_advantage_threshold,
            predicted_spread: round1(spread),
            predicted_total: round1(total),
            home,
            away,
            matchup,
        }
    }
}

/// Result of the strength stage for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis", rename_all = "lowercase")]
pub enum StrengthAssessment {
    Available(StrengthAdjustment),
    Unavailable { note: String },
}

impl StrengthAssessment {
    pub fn adjustment(&self) -> Option<&StrengthAdjustment> {
        match self {
            StrengthAssessment::Available(adj) => Some(adj),
            StrengthAssessment::Unavailable { .. } => None,
        }
    }
}
