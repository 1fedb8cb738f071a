//! Classifier use case: compares each prediction with the market's closing
//! lines and buckets the gap into tiers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::entities::enriched_game::EnrichedGame;
use crate::domain::entities::opportunity::{
    BaseAnalysis, EdgeOpportunity, FinalPrediction, MarketLine, Recommendation, StageConfidence, QB_INJURY_FACTOR,
    QB_WEATHER_SYNERGY, STRENGTH_FACTOR, WEATHER_FACTOR,
};
use crate::domain::error::RecordError;
use crate::domain::values::confidence::ConfidenceWeights;
use crate::domain::values::edge::Edge;
use crate::domain::values::tier::{Tier, TierPolicy};
use crate::domain::values::weather::ImpactLevel;

/// Stage confidence used when a layer is missing entirely.
const MISSING_LAYER_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierPolicy {
    pub weights: ConfidenceWeights,
    /// |strengthAdvantage| above which team strength is listed as a factor.
    pub strength_factor_threshold: f64,
    /// Combined injury impact above which the injury layer counts as extreme.
    pub extreme_injury_impact: f64,
    /// |strengthAdvantage| above which the strength layer counts as extreme.
    pub extreme_strength_advantage: f64,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            weights: ConfidenceWeights::default(),
            strength_factor_threshold: 3.0,
            extreme_injury_impact: 15.0,
            extreme_strength_advantage: 15.0,
        }
    }
}

/// The classifier's artifact: bettable opportunities by tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityBook {
    pub tier1: Vec<EdgeOpportunity>,
    pub tier2: Vec<EdgeOpportunity>,
    pub tier3: Vec<EdgeOpportunity>,
}

impl OpportunityBook {
    pub fn tier(&self, tier: Tier) -> &[EdgeOpportunity] {
        match tier {
            Tier::Tier1 => &self.tier1,
            Tier::Tier2 => &self.tier2,
            Tier::Tier3 => &self.tier3,
            Tier::NoBet => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.tier1.len() + self.tier2.len() + self.tier3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeOpportunity> {
        self.tier1.iter().chain(&self.tier2).chain(&self.tier3)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSummary {
    pub total_input: usize,
    pub classified: usize,
    pub tier1: usize,
    pub tier2: usize,
    pub tier3: usize,
    pub no_bet: usize,
    pub excluded_count: usize,
    pub missing_closing_line: usize,
    pub missing_prediction: usize,
    pub exclusions: Vec<RecordError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub book: OpportunityBook,
    pub no_bet: Vec<EdgeOpportunity>,
    pub summary: ClassificationSummary,
}

pub struct ClassifyUseCase {
    tiers: TierPolicy,
    policy: ClassifierPolicy,
}

impl ClassifyUseCase {
    pub fn new(tiers: TierPolicy, policy: ClassifierPolicy) -> Self {
        Self { tiers, policy }
    }

    /// Classify every game that has a prediction and both closing lines.
    /// Everything else is excluded and counted, never scored as `no_bet`.
    pub fn execute(&self, games: &[EnrichedGame]) -> Classification {
        let mut book = OpportunityBook::default();
        let mut no_bet = Vec::new();
        let mut summary = ClassificationSummary {
            total_input: games.len(),
            ..Default::default()
        };

        for game in games {
            match self.classify_game(game) {
                Ok(opp) => {
                    debug!(game_id = %opp.game_id, tier = %opp.tier, edge = opp.edge.max_edge, "classified");
                    match opp.tier {
                        Tier::Tier1 => book.tier1.push(opp),
                        Tier::Tier2 => book.tier2.push(opp),
                        Tier::Tier3 => book.tier3.push(opp),
                        Tier::NoBet => no_bet.push(opp),
                    }
                }
                Err(exclusion) => {
                    debug!(reason = %exclusion, "excluded from classification");
                    match exclusion {
                        RecordError::MissingPrediction { .. } => summary.missing_prediction += 1,
                        _ => summary.missing_closing_line += 1,
                    }
                    summary.exclusions.push(exclusion);
                }
            }
        }

        for list in [&mut book.tier1, &mut book.tier2, &mut book.tier3, &mut no_bet] {
            list.sort_by(|a, b| b.edge.max_edge.total_cmp(&a.edge.max_edge));
        }

        summary.tier1 = book.tier1.len();
        summary.tier2 = book.tier2.len();
        summary.tier3 = book.tier3.len();
        summary.no_bet = no_bet.len();
        summary.classified = book.len() + no_bet.len();
        summary.excluded_count = summary.exclusions.len();

        info!(
            total = summary.total_input,
            tier1 = summary.tier1,
            tier2 = summary.tier2,
            tier3 = summary.tier3,
            no_bet = summary.no_bet,
            excluded = summary.excluded_count,
            "classification complete"
        );

        Classification { book, no_bet, summary }
    }

    pub fn classify_game(&self, game: &EnrichedGame) -> Result<EdgeOpportunity, RecordError> {
        let record = &game.game;
        let closing_spread = record.closing_spread().ok_or_else(|| RecordError::MissingClosingLine {
            game_id: record.game_id.clone(),
            line: "spread".into(),
        })?;
        let closing_total = record.closing_total().ok_or_else(|| RecordError::MissingClosingLine {
            game_id: record.game_id.clone(),
            line: "total".into(),
        })?;
        let strength = game.strength().ok_or_else(|| RecordError::MissingPrediction {
            game_id: record.game_id.clone(),
        })?;

        let edge = Edge::between(
            strength.predicted_spread,
            closing_spread,
            strength.predicted_total,
            closing_total,
        );

        let stage_confidence = StageConfidence {
            weather: game
                .weather
                .as_ref()
                .map_or(MISSING_LAYER_CONFIDENCE, |w| w.certainty()),
            injury: game
                .injuries
                .as_ref()
                .map_or(MISSING_LAYER_CONFIDENCE, |i| i.completeness()),
            strength: strength.matchup.confidence,
        };
        let confidence = self.confidence(game, &stage_confidence);
        let tier = self.tiers.classify(edge.max_edge, confidence);

        Ok(EdgeOpportunity {
            game_id: record.game_id.clone(),
            season: record.season,
            date: record.date,
            matchup: record.matchup(),
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
            base_analysis: BaseAnalysis {
                spread: MarketLine {
                    opening: record.spreads.home.open,
                    closing: closing_spread,
                    movement: record.spreads.home.movement(),
                },
                total: MarketLine {
                    opening: record.totals.open,
                    closing: closing_total,
                    movement: record.totals.movement(),
                },
            },
            final_prediction: FinalPrediction {
                predicted_spread: strength.predicted_spread,
                predicted_total: strength.predicted_total,
            },
            factors: self.factors(game),
            recommendation: Recommendation::for_tier(tier, &self.tiers, &edge, confidence),
            edge,
            confidence,
            stage_confidence,
            tier,
        })
    }

    /// Combined confidence, rounded to two decimals before tiering.
    fn confidence(&self, game: &EnrichedGame, stages: &StageConfidence) -> f64 {
        let extreme = [
            game.weather
                .as_ref()
                .is_some_and(|w| w.impact_level == ImpactLevel::High),
            game.injuries
                .as_ref()
                .is_some_and(|i| i.game_impact.combined_impact > self.policy.extreme_injury_impact),
            game.strength().is_some_and(|s| {
                s.matchup.strength_advantage.abs() > self.policy.extreme_strength_advantage
            }),
        ]
        .into_iter()
        .filter(|hit| *hit)
        .count();

        let combined = self
            .policy
            .weights
            .combine(stages.weather, stages.injury, stages.strength, extreme);
        (combined.value() * 100.0).round() / 100.0
    }

    /// Contributing factors in fixed order: weather, injury, strength, then
    /// the QB-plus-weather synergy note.
    fn factors(&self, game: &EnrichedGame) -> Vec<String> {
        let mut factors = Vec::new();

        let weather_factor = game
            .weather
            .as_ref()
            .filter(|w| !matches!(w.impact_level, ImpactLevel::None | ImpactLevel::Unknown));
        if let Some(w) = weather_factor {
            let detail: Vec<String> = w.impact_factors.iter().map(ToString::to_string).collect();
            factors.push(format!("{WEATHER_FACTOR}: {} ({})", w.impact_level, detail.join(", ")));
        }

        let qb = game.injuries.as_ref().map(|i| {
            [&i.home, &i.away]
                .into_iter()
                .flat_map(|team| {
                    team.key_injuries
                        .iter()
                        .filter(|r| r.is_quarterback())
                        .map(move |r| format!("{} {}", team.team, r.injury.status))
                })
                .collect::<Vec<_>>()
        });
        let has_qb = match qb {
            Some(list) if !list.is_empty() => {
                factors.push(format!("{QB_INJURY_FACTOR}: {}", list.join(", ")));
                true
            }
            _ => false,
        };

        if let Some(s) = game.strength() {
            let adv = s.matchup.strength_advantage;
            if adv.abs() > self.policy.strength_factor_threshold {
                let stronger = if adv > 0.0 { &s.home.team } else { &s.away.team };
                factors.push(format!(
                    "{STRENGTH_FACTOR}: {:.1} point differential favouring {stronger}",
                    adv.abs()
                ));
            }
        }

        if has_qb && weather_factor.is_some() {
            factors.push(QB_WEATHER_SYNERGY.to_string());
        }
        factors
    }
}
