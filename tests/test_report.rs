//! Tests for the opportunity report: counts, factor statistics and the ROI
//! projection.

mod common;

use common::*;
use edgeline::application::classify::{ClassifierPolicy, ClassifyUseCase, OpportunityBook};
use edgeline::application::report::{factor_label, ReportUseCase};
use edgeline::domain::values::tier::{Tier, TierPolicy};

fn book() -> OpportunityBook {
    let games = vec![tier1_game(), tier2_game(), qb_weather_game(), no_bet_game()];
    ClassifyUseCase::new(TierPolicy::default(), ClassifierPolicy::default())
        .execute(&games)
        .book
}

fn reporter() -> ReportUseCase {
    ReportUseCase::new(TierPolicy::default())
}

#[test]
fn test_counts_and_bet_types() {
    let report = reporter().execute(&book());

    assert_eq!(report.counts.tier1, 1);
    assert_eq!(report.counts.tier2, 2);
    assert_eq!(report.counts.tier3, 0);
    assert_eq!(report.counts.total, 3);
    assert_eq!(report.bet_type_distribution.get("spread"), Some(&2));
    assert_eq!(report.bet_type_distribution.get("total"), Some(&1));

    let by_type = &report.tier1_edge_by_bet_type;
    assert_eq!(by_type.spread_count, 1);
    assert_eq!(by_type.spread_avg_edge, Some(7.6));
    assert_eq!(by_type.total_count, 0);
    assert_eq!(by_type.total_avg_edge, None);
}

#[test]
fn test_factor_statistics() {
    let report = reporter().execute(&book());

    let labels: Vec<&str> = report
        .tier1_factor_frequency
        .iter()
        .map(|f| f.factor.as_str())
        .collect();
    assert_eq!(labels, vec!["QB injury", "Team Strength"]);
    assert!(report.tier1_factor_frequency.iter().all(|f| f.count == 1));

    assert_eq!(report.qb_injury_with_weather.count, 1);
    assert_eq!(report.qb_injury_with_weather.game_ids, vec!["2019_20191215_CLE_KC".to_string()]);
    assert_eq!(report.qb_injury_with_weather.avg_edge, Some(5.5));

    assert_eq!(report.multi_factor.count, 1);
    assert_eq!(report.multi_factor.avg_confidence, Some(0.88));
}

#[test]
fn test_best_examples_and_months() {
    let report = reporter().execute(&book());

    let best1 = report.best_tier1.as_ref().unwrap();
    assert_eq!(best1.game_id, "2019_20191006_CLE_KC");
    assert_eq!(best1.action, "MAX BET");
    let best2 = report.best_tier2.as_ref().unwrap();
    assert_eq!(best2.edge, 7.5);
    assert_eq!(report.top_tier1.len(), 1);

    assert_eq!(report.tier1_by_month.len(), 1);
    assert_eq!(report.tier1_by_month[0].month, "October");
}

#[test]
fn test_roi_projection() {
    let roi = reporter().roi_projection(&book());

    let tier1 = roi.tiers.iter().find(|t| t.tier == Tier::Tier1).unwrap();
    assert_eq!(tier1.units_wagered, 8.0);
    assert_eq!(tier1.expected_profit_units, 1.6);
    let tier2 = roi.tiers.iter().find(|t| t.tier == Tier::Tier2).unwrap();
    assert_eq!(tier2.units_wagered, 6.0);

    assert_eq!(roi.units_wagered, 14.0);
    assert_eq!(roi.expected_profit_units, 2.3);
    assert_eq!(roi.overall_roi_pct, 16.4);
}

#[test]
fn test_empty_book() {
    let report = reporter().execute(&OpportunityBook::default());
    assert_eq!(report.counts.total, 0);
    assert!(report.best_tier1.is_none());
    assert_eq!(report.roi_projection.overall_roi_pct, 0.0);
    assert!(reporter().render(&report).contains("Opportunities: 0"));
}

#[test]
fn test_render_mentions_best_opportunities() {
    let r = reporter();
    let text = r.render(&r.execute(&book()));

    assert!(text.starts_with("EDGE OPPORTUNITY REPORT"));
    assert!(text.contains("Best tier 1: CLE @ KC"));
    assert!(text.contains("  - QB injury: KC Out"));
    assert!(text.contains("October"));
}

#[test]
fn test_factor_label_groups_by_prefix() {
    assert_eq!(factor_label("QB injury: KC Out, CLE IR"), "QB injury");
    assert_eq!(factor_label("QB injury + Weather"), "QB injury + Weather");
}
