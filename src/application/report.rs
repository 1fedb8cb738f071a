//! Reporter use case: read-only aggregation over a classified opportunity
//! book, rendered as text or serialized as a JSON summary.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::application::classify::OpportunityBook;
use crate::domain::entities::opportunity::{EdgeOpportunity, QB_INJURY_FACTOR, QB_WEATHER_SYNERGY, WEATHER_FACTOR};
use crate::domain::values::edge::BetType;
use crate::domain::values::points::round1;
use crate::domain::values::tier::{Tier, TierPolicy};

const TOP_N: usize = 10;
const MULTI_FACTOR_MIN: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub tier1: usize,
    pub tier2: usize,
    pub tier3: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeByBetType {
    pub spread_count: usize,
    pub spread_avg_edge: Option<f64>,
    pub total_count: usize,
    pub total_avg_edge: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorCount {
    pub factor: String,
    pub count: usize,
}

/// A subset of opportunities sharing some factor pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScenario {
    pub count: usize,
    pub avg_edge: Option<f64>,
    pub avg_confidence: Option<f64>,
    pub game_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityExample {
    pub game_id: String,
    pub date: NaiveDate,
    pub matchup: String,
    pub bet_type: BetType,
    pub edge: f64,
    pub confidence: f64,
    pub action: String,
    pub factors: Vec<String>,
}

impl From<&EdgeOpportunity> for OpportunityExample {
    fn from(opp: &EdgeOpportunity) -> Self {
        Self {
            game_id: opp.game_id.clone(),
            date: opp.date,
            matchup: opp.matchup.clone(),
            bet_type: opp.edge.bet_type,
            edge: opp.edge.max_edge,
            confidence: opp.confidence,
            action: opp.recommendation.action.clone(),
            factors: opp.factors.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRoi {
    pub tier: Tier,
    pub count: usize,
    pub bet_size_units: f64,
    pub avg_roi: f64,
    pub units_wagered: f64,
    pub expected_profit_units: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiProjection {
    pub tiers: Vec<TierRoi>,
    pub units_wagered: f64,
    pub expected_profit_units: f64,
    /// Expected profit over units wagered, as a percentage.
    pub overall_roi_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityReport {
    pub counts: TierCounts,
    pub tier1_edge_by_bet_type: EdgeByBetType,
    pub bet_type_distribution: BTreeMap<String, usize>,
    pub tier1_factor_frequency: Vec<FactorCount>,
    pub qb_injury_with_weather: FactorScenario,
    pub multi_factor: FactorScenario,
    pub top_tier1: Vec<OpportunityExample>,
    pub best_tier1: Option<OpportunityExample>,
    pub best_tier2: Option<OpportunityExample>,
    pub roi_projection: RoiProjection,
    pub tier1_by_month: Vec<MonthCount>,
}

/// Factor strings are "Label: detail"; frequency is counted per label.
pub fn factor_label(factor: &str) -> &str {
    factor.split(':').next().unwrap_or(factor).trim()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

fn scenario<'a>(opps: impl Iterator<Item = &'a EdgeOpportunity>) -> FactorScenario {
    let subset: Vec<&EdgeOpportunity> = opps.collect();
    FactorScenario {
        count: subset.len(),
        avg_edge: mean(subset.iter().map(|o| o.edge.max_edge)).map(round1),
        avg_confidence: mean(subset.iter().map(|o| o.confidence)).map(|c| (c * 100.0).round() / 100.0),
        game_ids: subset.iter().map(|o| o.game_id.clone()).collect(),
    }
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("Unknown")
}

pub struct ReportUseCase {
    tiers: TierPolicy,
}

impl ReportUseCase {
    pub fn new(tiers: TierPolicy) -> Self {
        Self { tiers }
    }

    pub fn execute(&self, book: &OpportunityBook) -> OpportunityReport {
        let tier1 = &book.tier1;

        let mut bet_type_distribution = BTreeMap::new();
        for opp in book.iter() {
            *bet_type_distribution.entry(opp.edge.bet_type.to_string()).or_insert(0) += 1;
        }

        let spread_edges: Vec<f64> = tier1
            .iter()
            .filter(|o| o.edge.bet_type == BetType::Spread)
            .map(|o| o.edge.max_edge)
            .collect();
        let total_edges: Vec<f64> = tier1
            .iter()
            .filter(|o| o.edge.bet_type == BetType::Total)
            .map(|o| o.edge.max_edge)
            .collect();

        let mut top: Vec<&EdgeOpportunity> = tier1.iter().collect();
        top.sort_by(|a, b| by_rank(a, b));

        OpportunityReport {
            counts: TierCounts {
                tier1: book.tier1.len(),
                tier2: book.tier2.len(),
                tier3: book.tier3.len(),
                total: book.len(),
            },
            tier1_edge_by_bet_type: EdgeByBetType {
                spread_count: spread_edges.len(),
                spread_avg_edge: mean(spread_edges.iter().copied()).map(round1),
                total_count: total_edges.len(),
                total_avg_edge: mean(total_edges.iter().copied()).map(round1),
            },
            bet_type_distribution,
            tier1_factor_frequency: factor_frequency(tier1),
            qb_injury_with_weather: scenario(book.iter().filter(|o| {
                o.has_factor(QB_WEATHER_SYNERGY)
                    || (o.has_factor(QB_INJURY_FACTOR) && o.has_factor(WEATHER_FACTOR))
            })),
            multi_factor: scenario(book.iter().filter(|o| o.factors.len() >= MULTI_FACTOR_MIN)),
            top_tier1: top.iter().take(TOP_N).map(|o| OpportunityExample::from(*o)).collect(),
            best_tier1: top.first().map(|o| OpportunityExample::from(*o)),
            best_tier2: best_of(&book.tier2).map(OpportunityExample::from),
            roi_projection: self.roi_projection(book),
            tier1_by_month: by_month(tier1),
        }
    }

    /// `count × units × avgROI` per tier, summed.
    pub fn roi_projection(&self, book: &OpportunityBook) -> RoiProjection {
        let tiers: Vec<TierRoi> = Tier::BETTABLE
            .into_iter()
            .filter_map(|tier| {
                let rule = self.tiers.rule(tier)?;
                let count = book.tier(tier).len();
                let units_wagered = count as f64 * rule.bet_size_units;
                Some(TierRoi {
                    tier,
                    count,
                    bet_size_units: rule.bet_size_units,
                    avg_roi: rule.avg_roi,
                    units_wagered,
                    expected_profit_units: round1(units_wagered * rule.avg_roi),
                })
            })
            .collect();

        let units_wagered: f64 = tiers.iter().map(|t| t.units_wagered).sum();
        let expected_profit_units = round1(tiers.iter().map(|t| t.units_wagered * t.avg_roi).sum());
        let overall_roi_pct = if units_wagered > 0.0 {
            round1(expected_profit_units / units_wagered * 100.0)
        } else {
            0.0
        };

        RoiProjection {
            tiers,
            units_wagered,
            expected_profit_units,
            overall_roi_pct,
        }
    }

    /// Console report.
    pub fn render(&self, report: &OpportunityReport) -> String {
        let mut out = String::new();
        out.push_str("EDGE OPPORTUNITY REPORT\n");
        out.push_str("=======================\n");
        out.push_str(&format!(
            "Opportunities: {} (tier1 {}, tier2 {}, tier3 {})\n",
            report.counts.total, report.counts.tier1, report.counts.tier2, report.counts.tier3
        ));

        if !report.bet_type_distribution.is_empty() {
            let parts: Vec<String> = report
                .bet_type_distribution
                .iter()
                .map(|(kind, count)| format!("{kind} {count}"))
                .collect();
            out.push_str(&format!("Bet types: {}\n", parts.join(", ")));
        }

        let by_type = &report.tier1_edge_by_bet_type;
        out.push_str("\nTier 1 average edge\n");
        out.push_str(&format!("  spread: {} ({} games)\n", fmt_opt(by_type.spread_avg_edge), by_type.spread_count));
        out.push_str(&format!("  total:  {} ({} games)\n", fmt_opt(by_type.total_avg_edge), by_type.total_count));

        if !report.tier1_factor_frequency.is_empty() {
            out.push_str("\nTier 1 factors\n");
            for f in &report.tier1_factor_frequency {
                out.push_str(&format!("  {:<24} {}\n", f.factor, f.count));
            }
        }

        let qb = &report.qb_injury_with_weather;
        out.push_str(&format!(
            "\nQB injury + weather: {} games, avg edge {}\n",
            qb.count,
            fmt_opt(qb.avg_edge)
        ));
        let multi = &report.multi_factor;
        out.push_str(&format!(
            "Multi-factor ({MULTI_FACTOR_MIN}+): {} games, avg edge {}, avg confidence {}\n",
            multi.count,
            fmt_opt(multi.avg_edge),
            fmt_opt(multi.avg_confidence)
        ));

        if !report.top_tier1.is_empty() {
            out.push_str("\nTop tier 1 opportunities\n");
            for (rank, opp) in report.top_tier1.iter().enumerate() {
                out.push_str(&format!(
                    "  {:>2}. {} {:<10} {:<6} edge {:>4.1}  conf {:.0}%\n",
                    rank + 1,
                    opp.date,
                    opp.matchup,
                    opp.bet_type,
                    opp.edge,
                    opp.confidence * 100.0
                ));
            }
        }

        for (label, example) in [("tier 1", &report.best_tier1), ("tier 2", &report.best_tier2)] {
            if let Some(ex) = example {
                out.push_str(&format!(
                    "\nBest {label}: {} on {} ({} {:.1}, {})\n",
                    ex.matchup, ex.date, ex.bet_type, ex.edge, ex.action
                ));
                for factor in &ex.factors {
                    out.push_str(&format!("  - {factor}\n"));
                }
            }
        }

        let roi = &report.roi_projection;
        out.push_str("\nROI projection (units)\n");
        for t in &roi.tiers {
            out.push_str(&format!(
                "  {:<6} {:>4} bets x {:>4.1}u @ {:>4.1}% = {:>7.1}u\n",
                t.tier.to_string(),
                t.count,
                t.bet_size_units,
                t.avg_roi * 100.0,
                t.expected_profit_units
            ));
        }
        out.push_str(&format!(
            "  total: {:.1}u wagered, {:.1}u expected profit ({:.1}% ROI)\n",
            roi.units_wagered, roi.expected_profit_units, roi.overall_roi_pct
        ));

        if !report.tier1_by_month.is_empty() {
            out.push_str("\nTier 1 by month\n");
            for m in &report.tier1_by_month {
                out.push_str(&format!("  {:<10} {}\n", m.month, m.count));
            }
        }
        out
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Best first: larger edge, then higher confidence, then game id.
fn by_rank(a: &EdgeOpportunity, b: &EdgeOpportunity) -> Ordering {
    b.edge
        .max_edge
        .total_cmp(&a.edge.max_edge)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.game_id.cmp(&b.game_id))
}

fn best_of(opps: &[EdgeOpportunity]) -> Option<&EdgeOpportunity> {
    opps.iter().min_by(|a, b| by_rank(a, b))
}

/// Descending by count, ties alphabetical.
fn factor_frequency(opps: &[EdgeOpportunity]) -> Vec<FactorCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for factor in opps.iter().flat_map(|o| &o.factors) {
        *counts.entry(factor_label(factor)).or_default() += 1;
    }
    let mut table: Vec<FactorCount> = counts
        .into_iter()
        .map(|(factor, count)| FactorCount {
            factor: factor.to_string(),
            count,
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.factor.cmp(&b.factor)));
    table
}

fn by_month(opps: &[EdgeOpportunity]) -> Vec<MonthCount> {
    let mut months: BTreeMap<u32, usize> = BTreeMap::new();
    for opp in opps {
        *months.entry(opp.date.month()).or_default() += 1;
    }
    months
        .into_iter()
        .map(|(month, count)| MonthCount {
            month: month_name(month).to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_label() {
        assert_eq!(factor_label("Weather: high (high_wind)"), "Weather");
        assert_eq!(factor_label("QB injury + Weather"), "QB injury + Weather");
        assert_eq!(factor_label("Team Strength: 12.0 point differential favouring KC"), "Team Strength");
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn test_empty_book_report() {
        let reporter = ReportUseCase::new(TierPolicy::default());
        let report = reporter.execute(&OpportunityBook::default());
        assert_eq!(report.counts.total, 0);
        assert_eq!(report.roi_projection.units_wagered, 0.0);
        assert_eq!(report.roi_projection.overall_roi_pct, 0.0);
        assert!(report.best_tier1.is_none());
        assert!(reporter.render(&report).contains("Opportunities: 0"));
    }
}
