//! Weather impact scoring.
//!
//! A game's weather is reduced to an integer impact score (0–10) from fixed
//! temperature, wind and precipitation thresholds, then mapped to an
//! [`ImpactLevel`]. Dome games always score zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::values::points::round1;

const FREEZING_F: f64 = 32.0;
const COLD_F: f64 = 45.0;
const HOT_F: f64 = 85.0;
const HIGH_WIND_MPH: f64 = 20.0;
const MODERATE_WIND_MPH: f64 = 15.0;
const RAIN_IN: f64 = 0.1;

/// A weather reading for one stadium on one game date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub temperature_f: f64,
    pub wind_mph: f64,
    pub precipitation_in: f64,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    None,
    Low,
    Moderate,
    High,
    /// Stadium unknown or provider failure; scoring was skipped.
    Unknown,
}

impl ImpactLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => ImpactLevel::None,
            1..=2 => ImpactLevel::Low,
            3..=4 => ImpactLevel::Moderate,
            _ => ImpactLevel::High,
        }
    }

    pub fn is_scored(&self) -> bool {
        !matches!(self, ImpactLevel::Unknown)
    }

    /// Moderate or high.
    pub fn is_significant(&self) -> bool {
        matches!(self, ImpactLevel::Moderate | ImpactLevel::High)
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactLevel::None => write!(f, "none"),
            ImpactLevel::Low => write!(f, "low"),
            ImpactLevel::Moderate => write!(f, "moderate"),
            ImpactLevel::High => write!(f, "high"),
            ImpactLevel::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherFactor {
    Freezing,
    Cold,
    Hot,
    HighWind,
    ModerateWind,
    Rain,
    DomeGame,
}

impl fmt::Display for WeatherFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherFactor::Freezing => "freezing",
            WeatherFactor::Cold => "cold",
            WeatherFactor::Hot => "hot",
            WeatherFactor::HighWind => "high_wind",
            WeatherFactor::ModerateWind => "moderate_wind",
            WeatherFactor::Rain => "rain",
            WeatherFactor::DomeGame => "dome_game",
        };
        write!(f, "{s}")
    }
}

/// Coefficients turning an impact score into line deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherPolicy {
    /// Points removed from the total per impact-score point.
    pub total_delta_per_point: f64,
    /// Spread penalty (in favour of the home side) for a dome team playing
    /// outdoors in moderate or worse weather.
    pub dome_visitor_spread_delta: f64,
}

impl Default for WeatherPolicy {
    fn default() -> Self {
        Self {
            total_delta_per_point: 0.5,
            dome_visitor_spread_delta: 1.0,
        }
    }
}

/// Score an observation. Returns the score and the factors that produced it.
pub fn score_observation(obs: &WeatherObservation) -> (u8, Vec<WeatherFactor>) {
    let mut score = 0u8;
    let mut factors = Vec::new();

    if obs.temperature_f < FREEZING_F {
        score += 3;
        factors.push(WeatherFactor::Freezing);
    } else if obs.temperature_f < COLD_F {
        score += 2;
        factors.push(WeatherFactor::Cold);
    } else if obs.temperature_f > HOT_F {
        score += 1;
        factors.push(WeatherFactor::Hot);
    }

    if obs.wind_mph > HIGH_WIND_MPH {
        score += 4;
        factors.push(WeatherFactor::HighWind);
    } else if obs.wind_mph > MODERATE_WIND_MPH {
        score += 2;
        factors.push(WeatherFactor::ModerateWind);
    }

    if obs.precipitation_in > RAIN_IN {
        score += 2;
        factors.push(WeatherFactor::Rain);
    }

    (score, factors)
}

/// Weather annotation attached to a game by the weather stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_mph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
    pub is_dome: bool,
    pub impact_level: ImpactLevel,
    pub impact_score: u8,
    #[serde(default)]
    pub impact_factors: Vec<WeatherFactor>,
    pub spread_delta: f64,
    pub total_delta: f64,
    /// Why scoring was skipped, when `impact_level` is unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WeatherAdjustment {
    /// Score an observed game. `visitor_plays_in_dome` marks an away team
    /// whose own stadium is a dome.
    pub fn scored(
        obs: &WeatherObservation,
        is_dome: bool,
        visitor_plays_in_dome: bool,
        policy: &WeatherPolicy,
    ) -> Self {
        let readings = Self {
            temperature_f: Some(obs.temperature_f.round()),
            wind_mph: Some(obs.wind_mph.round()),
            precipitation_in: Some((obs.precipitation_in * 100.0).round() / 100.0),
            humidity_pct: obs.humidity_pct.map(f64::round),
            is_dome,
            impact_level: ImpactLevel::None,
            impact_score: 0,
            impact_factors: vec![WeatherFactor::DomeGame],
            spread_delta: 0.0,
            total_delta: 0.0,
            note: None,
        };
        if is_dome {
            return readings;
        }

        let (score, factors) = score_observation(obs);
        let level = ImpactLevel::from_score(score);
        let spread_delta = if visitor_plays_in_dome && level.is_significant() {
            -policy.dome_visitor_spread_delta
        } else {
            0.0
        };
        let total_delta = if score == 0 {
            0.0
        } else {
            round1(-(score as f64) * policy.total_delta_per_point)
        };

        Self {
            impact_level: level,
            impact_score: score,
            impact_factors: factors,
            spread_delta,
            total_delta,
            ..readings
        }
    }

    /// Dome game with no reading available. Still a scored, zero-impact game.
    pub fn dome() -> Self {
        Self {
            temperature_f: None,
            wind_mph: None,
            precipitation_in: None,
            humidity_pct: None,
            is_dome: true,
            impact_level: ImpactLevel::None,
            impact_score: 0,
            impact_factors: vec![WeatherFactor::DomeGame],
            spread_delta: 0.0,
            total_delta: 0.0,
            note: None,
        }
    }

    /// Marker for a game whose weather could not be scored.
    pub fn unknown(is_dome: bool, note: impl Into<String>) -> Self {
        Self {
            temperature_f: None,
            wind_mph: None,
            precipitation_in: None,
            humidity_pct: None,
            is_dome,
            impact_level: ImpactLevel::Unknown,
            impact_score: 0,
            impact_factors: Vec::new(),
            spread_delta: 0.0,
            total_delta: 0.0,
            note: Some(note.into()),
        }
    }

    /// How much the classifier should trust this layer.
    pub fn certainty(&self) -> f64 {
        match self.impact_level {
            ImpactLevel::Unknown => 0.5,
            ImpactLevel::None => 1.0,
            _ if self.impact_factors.is_empty() => 0.5,
            _ => 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(temperature_f: f64, wind_mph: f64, precipitation_in: f64) -> WeatherObservation {
        WeatherObservation {
            temperature_f,
            wind_mph,
            precipitation_in,
            humidity_pct: None,
        }
    }

    #[test]
    fn test_score_thresholds() {
        assert_eq!(score_observation(&obs(60.0, 5.0, 0.0)).0, 0);
        assert_eq!(score_observation(&obs(31.0, 5.0, 0.0)).0, 3);
        assert_eq!(score_observation(&obs(40.0, 5.0, 0.0)).0, 2);
        assert_eq!(score_observation(&obs(45.0, 5.0, 0.0)).0, 0);
        assert_eq!(score_observation(&obs(90.0, 5.0, 0.0)).0, 1);
        assert_eq!(score_observation(&obs(60.0, 21.0, 0.0)).0, 4);
        assert_eq!(score_observation(&obs(60.0, 20.0, 0.0)).0, 2);
        assert_eq!(score_observation(&obs(60.0, 15.0, 0.0)).0, 0);
        assert_eq!(score_observation(&obs(60.0, 5.0, 0.2)).0, 2);
        assert_eq!(score_observation(&obs(20.0, 30.0, 1.0)).0, 9);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(ImpactLevel::from_score(0), ImpactLevel::None);
        assert_eq!(ImpactLevel::from_score(2), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_score(3), ImpactLevel::Moderate);
        assert_eq!(ImpactLevel::from_score(5), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_score(9), ImpactLevel::High);
    }

    #[test]
    fn test_dome_ignores_readings() {
        let adj = WeatherAdjustment::scored(&obs(60.0, 30.0, 1.0), true, false, &WeatherPolicy::default());
        assert_eq!(adj.impact_level, ImpactLevel::None);
        assert_eq!(adj.impact_score, 0);
        assert_eq!(adj.spread_delta, 0.0);
        assert_eq!(adj.total_delta, 0.0);
        assert_eq!(adj.impact_factors, vec![WeatherFactor::DomeGame]);
        assert_eq!(adj.wind_mph, Some(30.0));
    }

    #[test]
    fn test_total_delta_and_dome_visitor() {
        let policy = WeatherPolicy::default();
        let adj = WeatherAdjustment::scored(&obs(25.0, 22.0, 0.0), false, true, &policy);
        assert_eq!(adj.impact_level, ImpactLevel::High);
        assert_eq!(adj.impact_score, 7);
        assert_eq!(adj.total_delta, -3.5);
        assert_eq!(adj.spread_delta, -1.0);

        let mild = WeatherAdjustment::scored(&obs(40.0, 5.0, 0.0), false, true, &policy);
        assert_eq!(mild.impact_level, ImpactLevel::Low);
        assert_eq!(mild.spread_delta, 0.0);
        assert_eq!(mild.total_delta, -1.0);
    }

    #[test]
    fn test_certainty() {
        let policy = WeatherPolicy::default();
        assert_eq!(WeatherAdjustment::unknown(false, "no stadium").certainty(), 0.5);
        assert_eq!(
            WeatherAdjustment::scored(&obs(60.0, 5.0, 0.0), false, false, &policy).certainty(),
            1.0
        );
        assert_eq!(
            WeatherAdjustment::scored(&obs(20.0, 5.0, 0.0), false, false, &policy).certainty(),
            0.8
        );
    }
}
