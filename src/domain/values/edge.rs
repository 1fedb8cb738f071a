use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::values::points::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Spread,
    Total,
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::Spread => write!(f, "spread"),
            BetType::Total => write!(f, "total"),
        }
    }
}

/// Gap between predicted and closing lines, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// predictedSpread − closingSpread (signed).
    pub spread: f64,
    /// predictedTotal − closingTotal (signed).
    pub total: f64,
    #[serde(rename = "type")]
    pub bet_type: BetType,
    pub max_edge: f64,
}

impl Edge {
    /// Ties between |spread| and |total| go to the total.
    pub fn between(predicted_spread: f64, closing_spread: f64, predicted_total: f64, closing_total: f64) -> Self {
        let spread = round1(predicted_spread - closing_spread);
        let total = round1(predicted_total - closing_total);
        let (bet_type, max_edge) = if spread.abs() > total.abs() {
            (BetType::Spread, spread.abs())
        } else {
            (BetType::Total, total.abs())
        };
        Self {
            spread,
            total,
            bet_type,
            max_edge,
        }
    }
}
