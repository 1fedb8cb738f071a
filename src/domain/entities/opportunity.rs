use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::values::edge::{BetType, Edge};
use crate::domain::values::team::TeamCode;
use crate::domain::values::tier::{Tier, TierPolicy};

/// Factor strings start with one of these so reports can group them.
pub const WEATHER_FACTOR: &str = "Weather";
pub const QB_INJURY_FACTOR: &str = "QB injury";
pub const STRENGTH_FACTOR: &str = "Team Strength";
pub const QB_WEATHER_SYNERGY: &str = "QB injury + Weather";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketLine {
    pub opening: Option<f64>,
    pub closing: f64,
    pub movement: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseAnalysis {
    pub spread: MarketLine,
    pub total: MarketLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalPrediction {
    pub predicted_spread: f64,
    pub predicted_total: f64,
}

/// Per-stage confidences that fed the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageConfidence {
    pub weather: f64,
    pub injury: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: String,
    pub description: String,
    /// Suggested stake as a fraction of bankroll.
    pub bet_size: f64,
    pub bet_size_range: String,
    #[serde(rename = "expectedROI")]
    pub expected_roi: String,
    pub bet_type: BetType,
    pub edge: f64,
    pub confidence_pct: u32,
}

impl Recommendation {
    /// Fixed lookup by tier.
    pub fn for_tier(tier: Tier, policy: &TierPolicy, edge: &Edge, confidence: f64) -> Self {
        let (action, description, bet_size, bet_size_range, expected_roi) = match policy.rule(tier) {
            Some(rule) => (
                rule.action.clone(),
                rule.description.clone(),
                rule.bet_fraction(),
                rule.bet_size_range.clone(),
                rule.roi_range.clone(),
            ),
            None => (
                "PASS".to_string(),
                "No significant edge detected".to_string(),
                0.0,
                "0% of bankroll".to_string(),
                "0%".to_string(),
            ),
        };
        Self {
            action,
            description,
            bet_size,
            bet_size_range,
            expected_roi,
            bet_type: edge.bet_type,
            edge: edge.max_edge,
            confidence_pct: (confidence * 100.0).round() as u32,
        }
    }
}

/// A classified game. Recomputed on every classifier run; never written back
/// onto the game record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeOpportunity {
    pub game_id: String,
    pub season: i32,
    pub date: NaiveDate,
    pub matchup: String,
    pub home_team: TeamCode,
    pub away_team: TeamCode,
    pub base_analysis: BaseAnalysis,
    pub final_prediction: FinalPrediction,
    pub edge: Edge,
    pub confidence: f64,
    pub stage_confidence: StageConfidence,
    pub tier: Tier,
    pub factors: Vec<String>,
    pub recommendation: Recommendation,
}

impl EdgeOpportunity {
    pub fn has_factor(&self, prefix: &str) -> bool {
        self.factors.iter().any(|f| f.starts_with(prefix))
    }
}
