//! Team-strength stage: matchup advantage and the predicted spread/total.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::diagnostics::{StageDiagnostics, StageOutput};
use crate::application::with_timeout;
use crate::domain::entities::enriched_game::EnrichedGame;
use crate::domain::error::ProviderError;
use crate::domain::ports::strength_provider::StrengthProvider;
use crate::domain::values::points::round1;
use crate::domain::values::schedule::estimate_week;
use crate::domain::values::strength::{StrengthAdjustment, StrengthAssessment, StrengthPolicy, TeamStrength};
use crate::domain::values::team::TeamCode;

pub const STAGE: &str = "strength";

const RANKED_TEAMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRating {
    pub team: TeamCode,
    pub avg_overall: f64,
    pub games: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthSummary {
    pub total_games: usize,
    pub analyzed_games: usize,
    pub high_advantage_games: usize,
    pub avg_home_field_advantage: f64,
    pub strongest_teams: Vec<TeamRating>,
    pub weakest_teams: Vec<TeamRating>,
}

impl StrengthSummary {
    fn tally(games: &[EnrichedGame]) -> Self {
        let mut summary = Self {
            total_games: games.len(),
            ..Default::default()
        };
        let mut ratings: BTreeMap<TeamCode, (f64, usize)> = BTreeMap::new();
        let mut home_field = 0.0;

        for adj in games.iter().filter_map(EnrichedGame::strength) {
            summary.analyzed_games += 1;
            if adj.high_advantage_game {
                summary.high_advantage_games += 1;
            }
            home_field += adj.matchup.home_field_advantage;
            for side in [&adj.home, &adj.away] {
                let entry = ratings.entry(side.team.clone()).or_insert((0.0, 0));
                entry.0 += side.strength.overall;
                entry.1 += 1;
            }
        }
        if summary.analyzed_games > 0 {
            summary.avg_home_field_advantage = round1(home_field / summary.analyzed_games as f64);
        }

        // BTreeMap order plus a stable sort keeps ties alphabetical.
        let mut ranked: Vec<TeamRating> = ratings
            .into_iter()
            .map(|(team, (sum, games))| TeamRating {
                team,
                avg_overall: round1(sum / games as f64),
                games,
            })
            .collect();
        ranked.sort_by(|a, b| b.avg_overall.total_cmp(&a.avg_overall));
        summary.strongest_teams = ranked.iter().take(RANKED_TEAMS).cloned().collect();
        summary.weakest_teams = ranked.iter().rev().take(RANKED_TEAMS).cloned().collect();
        summary
    }
}

pub struct StrengthStageUseCase {
    provider: Arc<dyn StrengthProvider>,
    policy: StrengthPolicy,
    timeout: Duration,
}

impl StrengthStageUseCase {
    pub fn new(provider: Arc<dyn StrengthProvider>, policy: StrengthPolicy, timeout: Duration) -> Self {
        Self {
            provider,
            policy,
            timeout,
        }
    }

    /// Produce the predicted spread and total for every game from both
    /// teams' strength plus whatever weather and injury annotations the game
    /// already carries. Games whose strength cannot be fetched are marked
    /// unavailable and carry no prediction.
    pub async fn execute(&self, games: Vec<EnrichedGame>) -> StageOutput<StrengthSummary> {
        let mut diagnostics = StageDiagnostics::new(STAGE);
        let mut enriched = Vec::with_capacity(games.len());

        for game in games {
            let assessment = match self.fetch_pair(&game).await {
                Ok((home, away)) => {
                    let adj = StrengthAdjustment::assess(
                        home,
                        away,
                        game.weather.as_ref(),
                        game.injuries.as_ref(),
                        &self.policy,
                    );
                    debug!(
                        game_id = %game.game_id(),
                        advantage = adj.matchup.total_advantage,
                        spread = adj.predicted_spread,
                        total = adj.predicted_total,
                        "matchup assessed"
                    );
                    diagnostics.record_ok();
                    StrengthAssessment::Available(adj)
                }
                Err(note) => {
                    warn!(game_id = %game.game_id(), reason = %note, "strength unavailable");
                    diagnostics.record_degraded(game.game_id(), note.clone());
                    StrengthAssessment::Unavailable { note }
                }
            };
            enriched.push(game.with_strength(assessment));
        }

        let summary = StrengthSummary::tally(&enriched);
        info!(
            provider = self.provider.name(),
            games = enriched.len(),
            degraded = diagnostics.degraded,
            high_advantage = summary.high_advantage_games,
            "strength stage complete"
        );

        StageOutput {
            games: enriched,
            diagnostics,
            summary,
        }
    }

    async fn fetch_pair(&self, game: &EnrichedGame) -> Result<(TeamStrength, TeamStrength), String> {
        let week = estimate_week(game.game.date);
        let season = game.game.season;
        let home = self.fetch(&game.game.home_team, season, week).await;
        let away = self.fetch(&game.game.away_team, season, week).await;
        match (home, away) {
            (Ok(h), Ok(a)) => Ok((h, a)),
            (Err(e), Ok(_)) => Err(format!("{}: {e}", game.game.home_team)),
            (Ok(_), Err(e)) => Err(format!("{}: {e}", game.game.away_team)),
            (Err(h), Err(a)) => Err(format!(
                "{}: {h}; {}: {a}",
                game.game.home_team, game.game.away_team
            )),
        }
    }

    async fn fetch(&self, team: &TeamCode, season: i32, week: u32) -> Result<TeamStrength, ProviderError> {
        with_timeout(self.timeout, self.provider.strength(team, season, week)).await
    }
}
