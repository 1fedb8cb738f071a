//! Injury stage: attaches both teams' injury impact to every game.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::application::diagnostics::{StageDiagnostics, StageOutput};
use crate::application::with_timeout;
use crate::domain::entities::enriched_game::EnrichedGame;
use crate::domain::ports::injury_provider::InjuryProvider;
use crate::domain::values::injury::{InjuryAdjustment, InjuryPolicy, TeamInjuryImpact};
use crate::domain::values::schedule::estimate_week;
use crate::domain::values::team::TeamCode;

pub const STAGE: &str = "injuries";

const TOP_POSITIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCount {
    pub position: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjurySummary {
    pub total_games: usize,
    pub games_with_injuries: usize,
    pub total_injuries: usize,
    pub qb_injuries: usize,
    pub high_impact_games: usize,
    pub top_positions: Vec<PositionCount>,
    pub status_distribution: BTreeMap<String, usize>,
}

impl InjurySummary {
    fn tally(games: &[EnrichedGame]) -> Self {
        let mut summary = Self::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for adj in games.iter().filter_map(|g| g.injuries.as_ref()) {
            summary.total_games += 1;
            if adj.game_impact.high_impact_game {
                summary.high_impact_games += 1;
            }
            let reports: Vec<_> = adj.home.injuries.iter().chain(&adj.away.injuries).collect();
            if !reports.is_empty() {
                summary.games_with_injuries += 1;
            }
            for report in reports {
                summary.total_injuries += 1;
                if report.is_quarterback() {
                    summary.qb_injuries += 1;
                }
                *positions.entry(report.injury.position.to_uppercase()).or_default() += 1;
                *summary
                    .status_distribution
                    .entry(report.injury.status.to_string())
                    .or_default() += 1;
            }
        }

        let mut top: Vec<PositionCount> = positions
            .into_iter()
            .map(|(position, count)| PositionCount { position, count })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.position.cmp(&b.position)));
        top.truncate(TOP_POSITIONS);
        summary.top_positions = top;
        summary
    }
}

pub struct InjuryStageUseCase {
    provider: Arc<dyn InjuryProvider>,
    policy: InjuryPolicy,
    timeout: Duration,
}

impl InjuryStageUseCase {
    pub fn new(provider: Arc<dyn InjuryProvider>, policy: InjuryPolicy, timeout: Duration) -> Self {
        Self {
            provider,
            policy,
            timeout,
        }
    }

    /// Fetch and score both teams' reports for every game. A team whose
    /// report cannot be fetched contributes zero impact and is flagged
    /// incomplete.
    pub async fn execute(&self, games: Vec<EnrichedGame>) -> StageOutput<InjurySummary> {
        let mut diagnostics = StageDiagnostics::new(STAGE);
        let mut enriched = Vec::with_capacity(games.len());

        for game in games {
            let week = estimate_week(game.game.date);
            let season = game.game.season;
            let mut failures = Vec::new();

            let home = self
                .team_impact(&game.game.home_team, season, week, &mut failures)
                .await;
            let away = self
                .team_impact(&game.game.away_team, season, week, &mut failures)
                .await;

            if failures.is_empty() {
                diagnostics.record_ok();
            } else {
                let reason = failures.join("; ");
                warn!(game_id = %game.game_id(), reason = %reason, "injuries degraded");
                diagnostics.record_degraded(game.game_id(), reason);
            }

            let adjustment = InjuryAdjustment::combine(home, away, &self.policy);
            enriched.push(game.with_injuries(adjustment));
        }

        let summary = InjurySummary::tally(&enriched);
        info!(
            provider = self.provider.name(),
            games = enriched.len(),
            degraded = diagnostics.degraded,
            injuries = summary.total_injuries,
            high_impact = summary.high_impact_games,
            "injury stage complete"
        );

        StageOutput {
            games: enriched,
            diagnostics,
            summary,
        }
    }

    async fn team_impact(
        &self,
        team: &TeamCode,
        season: i32,
        week: u32,
        failures: &mut Vec<String>,
    ) -> TeamInjuryImpact {
        match with_timeout(self.timeout, self.provider.injuries(team, season, week)).await {
            Ok(injuries) => TeamInjuryImpact::aggregate(team.clone(), injuries, &self.policy),
            Err(e) => {
                failures.push(format!("{team}: {e}"));
                TeamInjuryImpact::unavailable(team.clone())
            }
        }
    }
}
