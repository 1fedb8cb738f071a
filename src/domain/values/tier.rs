//! Opportunity tiers and the fixed policy table behind them.
//!
//! Thresholds are inclusive, so a game sitting exactly on a boundary lands
//! in the higher tier.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    NoBet,
}

impl Tier {
    pub const BETTABLE: [Tier; 3] = [Tier::Tier1, Tier::Tier2, Tier::Tier3];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Tier1 => write!(f, "tier1"),
            Tier::Tier2 => write!(f, "tier2"),
            Tier::Tier3 => write!(f, "tier3"),
            Tier::NoBet => write!(f, "no_bet"),
        }
    }
}

/// Entry requirements and recommendation for one bettable tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub min_edge: f64,
    pub min_confidence: f64,
    /// Average stake per bet, in units of a 100-unit bankroll.
    pub bet_size_units: f64,
    /// Average return per unit staked (0.20 = 20%).
    pub avg_roi: f64,
    pub action: String,
    pub description: String,
    pub bet_size_range: String,
    pub roi_range: String,
}

impl TierRule {
    pub fn admits(&self, max_edge: f64, confidence: f64) -> bool {
        max_edge >= self.min_edge && confidence >= self.min_confidence
    }

    /// Suggested stake as a fraction of bankroll.
    pub fn bet_fraction(&self) -> f64 {
        self.bet_size_units / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicy {
    pub tier1: TierRule,
    pub tier2: TierRule,
    pub tier3: TierRule,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            tier1: TierRule {
                min_edge: 7.0,
                min_confidence: 0.80,
                bet_size_units: 8.0,
                avg_roi: 0.20,
                action: "MAX BET".into(),
                description: "Rare high-edge opportunity".into(),
                bet_size_range: "5-10% of bankroll".into(),
                roi_range: "15-25%".into(),
            },
            tier2: TierRule {
                min_edge: 4.0,
                min_confidence: 0.65,
                bet_size_units: 3.0,
                avg_roi: 0.12,
                action: "NORMAL BET".into(),
                description: "Good edge opportunity".into(),
                bet_size_range: "2-4% of bankroll".into(),
                roi_range: "8-15%".into(),
            },
            tier3: TierRule {
                min_edge: 2.0,
                min_confidence: 0.55,
                bet_size_units: 1.5,
                avg_roi: 0.06,
                action: "SMALL BET".into(),
                description: "Slight edge opportunity".into(),
                bet_size_range: "1-2% of bankroll".into(),
                roi_range: "3-8%".into(),
            },
        }
    }
}

impl TierPolicy {
    pub fn classify(&self, max_edge: f64, confidence: f64) -> Tier {
        Tier::BETTABLE
            .into_iter()
            .find(|tier| self.rule(*tier).is_some_and(|r| r.admits(max_edge, confidence)))
            .unwrap_or(Tier::NoBet)
    }

    pub fn rule(&self, tier: Tier) -> Option<&TierRule> {
        match tier {
            Tier::Tier1 => Some(&self.tier1),
            Tier::Tier2 => Some(&self.tier2),
            Tier::Tier3 => Some(&self.tier3),
            Tier::NoBet => None,
        }
    }

    /// Thresholds must not loosen going from tier3 up to tier1.
    pub fn validate(&self) -> Result<(), String> {
        let rules = [&self.tier1, &self.tier2, &self.tier3];
        for (name, rule) in ["tier1", "tier2", "tier3"].iter().zip(rules) {
            if rule.min_edge < 0.0 || !(0.0..=1.0).contains(&rule.min_confidence) {
                return Err(format!("{name}: thresholds out of range"));
            }
            if rule.bet_size_units < 0.0 {
                return Err(format!("{name}: negative bet size"));
            }
        }
        if self.tier1.min_edge < self.tier2.min_edge || self.tier2.min_edge < self.tier3.min_edge {
            return Err("tier min_edge must be non-increasing from tier1 to tier3".into());
        }
        if self.tier1.min_confidence < self.tier2.min_confidence
            || self.tier2.min_confidence < self.tier3.min_confidence
        {
            return Err("tier min_confidence must be non-increasing from tier1 to tier3".into());
        }
        Ok(())
    }
}
