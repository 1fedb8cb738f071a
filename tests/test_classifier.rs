//! Tests for the classifier: edges, confidence, tiers, factors and
//! exclusions.

mod common;

use common::*;
use edgeline::application::classify::{ClassifierPolicy, ClassifyUseCase};
use edgeline::domain::entities::enriched_game::EnrichedGame;
use edgeline::domain::error::RecordError;
use edgeline::domain::values::edge::{BetType, Edge};
use edgeline::domain::values::strength::StrengthAssessment;
use edgeline::domain::values::tier::{Tier, TierPolicy};

fn classifier() -> ClassifyUseCase {
    ClassifyUseCase::new(TierPolicy::default(), ClassifierPolicy::default())
}

#[test]
fn test_edge_and_tier_for_strong_spread_disagreement() {
    let edge = Edge::between(-9.2, -3.0, 44.0, 43.5);
    assert_eq!(edge.spread, -6.2);
    assert_eq!(edge.total, 0.5);
    assert_eq!(edge.bet_type, BetType::Spread);
    assert_eq!(edge.max_edge, 6.2);
    assert_eq!(TierPolicy::default().classify(edge.max_edge, 0.84), Tier::Tier2);
}

#[test]
fn test_tier_boundaries_are_inclusive() {
    let tiers = TierPolicy::default();
    assert_eq!(tiers.classify(7.0, 0.80), Tier::Tier1);
    assert_eq!(tiers.classify(7.0, 0.79), Tier::Tier2);
    assert_eq!(tiers.classify(4.0, 0.65), Tier::Tier2);
    assert_eq!(tiers.classify(2.0, 0.55), Tier::Tier3);
    assert_eq!(tiers.classify(1.9, 0.99), Tier::NoBet);
    assert_eq!(tiers.classify(12.0, 0.50), Tier::NoBet);
}

#[test]
fn test_tier_monotonic_in_edge_and_confidence() {
    let tiers = TierPolicy::default();
    let edges = [0.0, 1.5, 2.0, 3.9, 4.0, 6.9, 7.0, 10.0];
    let confidences = [0.4, 0.55, 0.64, 0.65, 0.79, 0.80, 1.0];
    for (i, edge) in edges.iter().enumerate() {
        for (j, conf) in confidences.iter().enumerate() {
            let tier = tiers.classify(*edge, *conf);
            if let Some(next_edge) = edges.get(i + 1) {
                assert!(tiers.classify(*next_edge, *conf) <= tier);
            }
            if let Some(next_conf) = confidences.get(j + 1) {
                assert!(tiers.classify(*edge, *next_conf) <= tier);
            }
        }
    }
}

#[test]
fn test_confidence_gate_holds_back_large_edge() {
    let opp = classifier().classify_game(&tier2_game()).unwrap();

    assert_eq!(opp.final_prediction.predicted_spread, 4.5);
    assert_eq!(opp.edge.spread, 7.5);
    assert_eq!(opp.edge.total, 0.0);
    assert_eq!(opp.edge.bet_type, BetType::Spread);
    assert_eq!(opp.stage_confidence.weather, 1.0);
    assert_eq!(opp.stage_confidence.injury, 0.5);
    assert_eq!(opp.confidence, 0.79);
    assert_eq!(opp.tier, Tier::Tier2);
    assert_eq!(opp.recommendation.action, "NORMAL BET");
    assert_eq!(opp.recommendation.bet_size, 0.03);
    assert_eq!(opp.recommendation.confidence_pct, 79);
    assert_eq!(
        opp.factors,
        vec!["Team Strength: 20.0 point differential favouring KC".to_string()]
    );
    assert_eq!(opp.base_analysis.spread.closing, -3.0);
    assert_eq!(opp.matchup, "CLE @ KC");
}

#[test]
fn test_extreme_injuries_lift_game_into_tier1() {
    let opp = classifier().classify_game(&tier1_game()).unwrap();

    assert_eq!(opp.final_prediction.predicted_spread, 3.6);
    assert_eq!(opp.final_prediction.predicted_total, 40.6);
    assert_eq!(opp.edge.max_edge, 7.6);
    assert_eq!(opp.stage_confidence.injury, 0.85);
    assert_eq!(opp.confidence, 1.0);
    assert_eq!(opp.tier, Tier::Tier1);
    assert_eq!(opp.recommendation.action, "MAX BET");
    assert_eq!(
        opp.factors,
        vec![
            "QB injury: KC Out".to_string(),
            "Team Strength: 20.0 point differential favouring KC".to_string(),
        ]
    );
}

#[test]
fn test_qb_injury_with_weather_factors() {
    let opp = classifier().classify_game(&qb_weather_game()).unwrap();

    assert_eq!(opp.final_prediction.predicted_total, 38.5);
    assert_eq!(opp.edge.bet_type, BetType::Total);
    assert_eq!(opp.edge.total, -5.5);
    assert_eq!(opp.confidence, 0.88);
    assert_eq!(opp.tier, Tier::Tier2);
    assert_eq!(opp.factors.len(), 4);
    assert_eq!(opp.factors[0], "Weather: high (freezing, high_wind)");
    assert_eq!(opp.factors[1], "QB injury: KC Out");
    assert_eq!(opp.factors[3], "QB injury + Weather");
}

#[test]
fn test_exclusions_are_counted_not_scored() {
    let no_total = EnrichedGame {
        game: record(date(2019, 11, 10), "DAL", "NYG", Some(3.0), None),
        ..tier2_game()
    };
    let no_spread = EnrichedGame {
        game: record(date(2019, 11, 17), "DAL", "NYG", None, Some(44.0)),
        ..tier2_game()
    };
    let no_prediction = tier2_game().with_strength(StrengthAssessment::Unavailable {
        note: "CLE: No data".into(),
    });
    let games = vec![tier1_game(), no_total, no_spread, no_prediction, no_bet_game()];

    let result = classifier().execute(&games);
    let summary = &result.summary;

    assert_eq!(summary.total_input, 5);
    assert_eq!(summary.classified, 2);
    assert_eq!(summary.tier1, 1);
    assert_eq!(summary.no_bet, 1);
    assert_eq!(summary.excluded_count, 3);
    assert_eq!(summary.missing_closing_line, 2);
    assert_eq!(summary.missing_prediction, 1);
    assert_eq!(summary.classified + summary.excluded_count, summary.total_input);
    assert!(summary.exclusions.contains(&RecordError::MissingClosingLine {
        game_id: "2019_20191110_DAL_NYG".into(),
        line: "total".into(),
    }));
    assert!(result.no_bet.iter().all(|o| o.game_id == "2019_20191222_CHI_GB"));
    assert_eq!(result.book.len(), 1);
}

#[test]
fn test_tier_lists_sorted_by_edge() {
    let games = vec![qb_weather_game(), tier2_game(), no_bet_game(), tier1_game()];
    let result = classifier().execute(&games);

    let tier2: Vec<f64> = result.book.tier2.iter().map(|o| o.edge.max_edge).collect();
    assert_eq!(tier2, vec![7.5, 5.5]);
    assert_eq!(result.book.tier1.len(), 1);
    assert!(result.book.tier3.is_empty());
    assert_eq!(result.no_bet[0].edge.max_edge, 0.0);
}

#[test]
fn test_missing_layers_fall_back_to_neutral_confidence() {
    let full = tier2_game();
    let bare = EnrichedGame {
        weather: None,
        injuries: None,
        ..full
    };
    let opp = classifier().classify_game(&bare).unwrap();
    assert_eq!(opp.stage_confidence.weather, 0.5);
    assert_eq!(opp.stage_confidence.injury, 0.5);
    assert!(opp.factors.iter().all(|f| !f.starts_with("Weather")));
}

#[test]
fn test_classification_is_deterministic() {
    let games = vec![tier1_game(), tier2_game(), qb_weather_game(), no_bet_game()];
    let first = classifier().execute(&games);
    let second = classifier().execute(&games);
    assert_eq!(first, second);
}
