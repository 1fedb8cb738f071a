//! Weather stage: attaches a [`WeatherAdjustment`] to every game.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::diagnostics::{StageDiagnostics, StageOutput};
use crate::application::with_timeout;
use crate::domain::entities::enriched_game::EnrichedGame;
use crate::domain::ports::weather_provider::WeatherProvider;
use crate::domain::values::team::StadiumTable;
use crate::domain::values::weather::{ImpactLevel, WeatherAdjustment, WeatherFactor, WeatherPolicy};

pub const STAGE: &str = "weather";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    pub total_games: usize,
    /// Moderate or high impact.
    pub significant_weather: usize,
    pub dome_games: usize,
    pub high_wind_games: usize,
    pub freezing_games: usize,
    pub unknown: usize,
    pub impact_distribution: BTreeMap<String, usize>,
}

impl WeatherSummary {
    fn tally(games: &[EnrichedGame]) -> Self {
        let mut summary = Self::default();
        for weather in games.iter().filter_map(|g| g.weather.as_ref()) {
            summary.total_games += 1;
            *summary
                .impact_distribution
                .entry(weather.impact_level.to_string())
                .or_default() += 1;
            if weather.impact_level.is_significant() {
                summary.significant_weather += 1;
            }
            if weather.impact_level == ImpactLevel::Unknown {
                summary.unknown += 1;
            }
            if weather.is_dome {
                summary.dome_games += 1;
            }
            if weather.impact_factors.contains(&WeatherFactor::HighWind) {
                summary.high_wind_games += 1;
            }
            if weather.impact_factors.contains(&WeatherFactor::Freezing) {
                summary.freezing_games += 1;
            }
        }
        summary
    }
}

pub struct WeatherStageUseCase {
    provider: Arc<dyn WeatherProvider>,
    stadiums: Arc<StadiumTable>,
    policy: WeatherPolicy,
    timeout: Duration,
}

impl WeatherStageUseCase {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        stadiums: Arc<StadiumTable>,
        policy: WeatherPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            stadiums,
            policy,
            timeout,
        }
    }

    /// Score every game. A missing stadium or a failed lookup marks that
    /// game `unknown`; the batch always completes.
    pub async fn execute(&self, games: Vec<EnrichedGame>) -> StageOutput<WeatherSummary> {
        let mut diagnostics = StageDiagnostics::new(STAGE);
        let mut enriched = Vec::with_capacity(games.len());

        for game in games {
            let (adjustment, failure) = self.assess(&game).await;
            match failure {
                None => diagnostics.record_ok(),
                Some(reason) => {
                    warn!(game_id = %game.game_id(), reason = %reason, "weather degraded");
                    diagnostics.record_degraded(game.game_id(), reason);
                }
            }
            enriched.push(game.with_weather(adjustment));
        }

        let summary = WeatherSummary::tally(&enriched);
        info!(
            provider = self.provider.name(),
            games = enriched.len(),
            degraded = diagnostics.degraded,
            significant = summary.significant_weather,
            domes = summary.dome_games,
            "weather stage complete"
        );

        StageOutput {
            games: enriched,
            diagnostics,
            summary,
        }
    }

    async fn assess(&self, game: &EnrichedGame) -> (WeatherAdjustment, Option<String>) {
        let record = &game.game;
        let Some(stadium) = self.stadiums.get(&record.home_team) else {
            let note = format!("no stadium on record for {}", record.home_team);
            return (WeatherAdjustment::unknown(false, note.clone()), Some(note));
        };
        let visitor_plays_in_dome = self.stadiums.is_dome(&record.away_team);

        let lookup = self.provider.observe(&record.home_team, stadium, record.date);
        match with_timeout(self.timeout, lookup).await {
            Ok(obs) => {
                let adjustment = WeatherAdjustment::scored(&obs, stadium.is_dome, visitor_plays_in_dome, &self.policy);
                debug!(
                    game_id = %record.game_id,
                    level = %adjustment.impact_level,
                    score = adjustment.impact_score,
                    "weather scored"
                );
                (adjustment, None)
            }
            // A dome game has no weather to miss.
            Err(e) if stadium.is_dome => {
                debug!(game_id = %record.game_id, error = %e, "no reading for dome game");
                (WeatherAdjustment::dome(), None)
            }
            Err(e) => {
                let note = e.to_string();
                (WeatherAdjustment::unknown(false, note.clone()), Some(note))
            }
        }
    }
}
