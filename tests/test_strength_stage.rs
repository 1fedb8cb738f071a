//! Tests for the strength stage: matchup advantage, predicted lines and
//! folding in the weather and injury deltas.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use edgeline::application::strength_stage::StrengthStageUseCase;
use edgeline::domain::entities::enriched_game::EnrichedGame;
use edgeline::domain::values::injury::{InjuryAdjustment, InjuryPolicy, InjuryStatus, TeamInjuryImpact};
use edgeline::domain::values::strength::{StrengthAssessment, StrengthPolicy};
use edgeline::domain::values::weather::{WeatherAdjustment, WeatherPolicy};

fn stage(ratings: RatingTable, policy: StrengthPolicy) -> StrengthStageUseCase {
    StrengthStageUseCase::new(Arc::new(ratings), policy, Duration::from_millis(50))
}

fn ratings() -> RatingTable {
    RatingTable::default().with("KC", 80.0).with("CLE", 60.0)
}

fn kc_hosts_cle() -> EnrichedGame {
    EnrichedGame::from(record(date(2019, 10, 6), "CLE", "KC", Some(-3.0), Some(44.0)))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_bare_matchup_prediction() {
    let output = stage(ratings(), StrengthPolicy::default())
        .execute(vec![kc_hosts_cle()])
        .await;
    let strength = output.games[0].strength().unwrap();

    assert_eq!(strength.matchup.strength_advantage, 20.0);
    assert_eq!(strength.matchup.home_field_advantage, HOME_ADVANTAGE);
    assert_eq!(strength.matchup.form_advantage, 0.0);
    // 20 x 0.1 + 2.5
    assert_eq!(strength.matchup.total_advantage, 4.5);
    assert!(approx(strength.matchup.confidence, 0.9));
    assert_eq!(strength.predicted_spread, 4.5);
    // (20 + 20) x 0.6 + 20
    assert_eq!(strength.predicted_total, 44.0);
    assert!(!strength.high_advantage_game);

    assert_eq!(output.summary.analyzed_games, 1);
    assert_eq!(output.summary.strongest_teams[0].team.as_str(), "KC");
    assert_eq!(output.summary.weakest_teams[0].team.as_str(), "CLE");
}

#[tokio::test]
async fn test_earlier_stage_deltas_fold_into_lines() {
    let injury_policy = InjuryPolicy::default();
    let game = kc_hosts_cle()
        .with_weather(WeatherAdjustment::scored(
            &obs(20.0, 25.0, 0.0),
            false,
            false,
            &WeatherPolicy::default(),
        ))
        .with_injuries(InjuryAdjustment::combine(
            TeamInjuryImpact::aggregate(team("KC"), vec![injury("KC", "QB", InjuryStatus::Out)], &injury_policy),
            TeamInjuryImpact::aggregate(team("CLE"), vec![injury("CLE", "WR", InjuryStatus::Out)], &injury_policy),
            &injury_policy,
        ));

    let output = stage(ratings(), StrengthPolicy::default()).execute(vec![game]).await;
    let strength = output.games[0].strength().unwrap();

    // Injuries: net 3.0 home-side impact moves the spread 0.9 toward CLE.
    assert_eq!(strength.predicted_spread, 3.6);
    // 44.0, weather -3.5, injuries -3.4
    assert_eq!(strength.predicted_total, 37.1);

    // Earlier annotations ride along untouched.
    assert_eq!(output.games[0].weather.as_ref().unwrap().impact_score, 7);
    assert_eq!(output.games[0].injuries.as_ref().unwrap().game_impact.combined_impact, 17.0);
}

#[tokio::test]
async fn test_without_folding_only_weather_moves_the_total() {
    let injury_policy = InjuryPolicy::default();
    let game = kc_hosts_cle()
        .with_weather(WeatherAdjustment::scored(
            &obs(20.0, 25.0, 0.0),
            false,
            true,
            &WeatherPolicy::default(),
        ))
        .with_injuries(InjuryAdjustment::combine(
            TeamInjuryImpact::aggregate(team("KC"), vec![injury("KC", "QB", InjuryStatus::Out)], &injury_policy),
            TeamInjuryImpact::aggregate(team("CLE"), Vec::new(), &injury_policy),
            &injury_policy,
        ));
    let policy = StrengthPolicy {
        fold_adjustments: false,
        ..StrengthPolicy::default()
    };
    let output = stage(ratings(), policy).execute(vec![game]).await;
    let strength = output.games[0].strength().unwrap();

    assert_eq!(output.games[0].weather.as_ref().unwrap().spread_delta, -1.0);
    assert_eq!(strength.predicted_spread, 4.5);
    assert_eq!(strength.predicted_total, 40.5);
}

#[tokio::test]
async fn test_high_advantage_flag() {
    let output = stage(
        RatingTable::default().with("KC", 90.0).with("CLE", 40.0),
        StrengthPolicy::default(),
    )
    .execute(vec![kc_hosts_cle()])
    .await;
    let strength = output.games[0].strength().unwrap();

    // 50 x 0.1 + 2.5
    assert_eq!(strength.matchup.total_advantage, 7.5);
    assert!(strength.high_advantage_game);
    assert!(approx(strength.matchup.confidence, 0.95));
    assert_eq!(output.summary.high_advantage_games, 1);
}

#[tokio::test]
async fn test_missing_rating_leaves_game_without_prediction() {
    let output = stage(RatingTable::default().with("KC", 80.0), StrengthPolicy::default())
        .execute(vec![kc_hosts_cle()])
        .await;

    let game = &output.games[0];
    assert!(game.predicted_spread().is_none());
    match game.team_strength.as_ref().unwrap() {
        StrengthAssessment::Unavailable { note } => assert!(note.starts_with("CLE")),
        other => panic!("expected unavailable, got {other:?}"),
    }
    assert_eq!(output.diagnostics.degraded, 1);
    assert_eq!(output.summary.total_games, 1);
    assert_eq!(output.summary.analyzed_games, 0);
}
