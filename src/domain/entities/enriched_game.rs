use serde::{Deserialize, Serialize};

use crate::domain::entities::game_record::GameRecord;
use crate::domain::values::injury::InjuryAdjustment;
use crate::domain::values::strength::{StrengthAdjustment, StrengthAssessment};
use crate::domain::values::weather::WeatherAdjustment;

/// A game record plus whatever the enrichment stages have attached so far.
///
/// Enrichment is append-only: every stage consumes the previous record and
/// returns a new one carrying one more annotation. Earlier annotations are
/// never rewritten. The serialized form keeps the game's identity fields at
/// the top level with `weather`, `injuries` and `teamStrength` alongside, so
/// each stage artifact is readable by the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedGame {
    #[serde(flatten)]
    pub game: GameRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injuries: Option<InjuryAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_strength: Option<StrengthAssessment>,
}

impl From<GameRecord> for EnrichedGame {
    fn from(game: GameRecord) -> Self {
        Self {
            game,
            weather: None,
            injuries: None,
            team_strength: None,
        }
    }
}

impl EnrichedGame {
    pub fn game_id(&self) -> &str {
        &self.game.game_id
    }

    pub fn with_weather(self, weather: WeatherAdjustment) -> Self {
        Self {
            weather: Some(weather),
            ..self
        }
    }

    pub fn with_injuries(self, injuries: InjuryAdjustment) -> Self {
        Self {
            injuries: Some(injuries),
            ..self
        }
    }

    pub fn with_strength(self, assessment: StrengthAssessment) -> Self {
        Self {
            team_strength: Some(assessment),
            ..self
        }
    }

    pub fn strength(&self) -> Option<&StrengthAdjustment> {
        self.team_strength.as_ref().and_then(StrengthAssessment::adjustment)
    }

    pub fn predicted_spread(&self) -> Option<f64> {
        self.strength().map(|s| s.predicted_spread)
    }
}
