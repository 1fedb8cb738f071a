use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Clamp into [0, 1]. NaN collapses to 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Confidence(0.0);
        }
        Confidence(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Relative weight of each stage's confidence in the classifier's score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub weather: f64,
    pub injury: f64,
    pub strength: f64,
    /// Added once per layer showing an extreme reading.
    pub extreme_factor_boost: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            weather: 0.25,
            injury: 0.40,
            strength: 0.20,
            extreme_factor_boost: 0.05,
        }
    }
}

impl ConfidenceWeights {
    /// Weighted mean of the stage confidences plus the extreme-factor boost.
    pub fn combine(&self, weather: f64, injury: f64, strength: f64, extreme_factors: usize) -> Confidence {
        let weight_sum = self.weather + self.injury + self.strength;
        if weight_sum <= 0.0 {
            return Confidence::clamped(0.0);
        }
        let weighted = (weather * self.weather + injury * self.injury + strength * self.strength) / weight_sum;
        Confidence::clamped(weighted + extreme_factors as f64 * self.extreme_factor_boost)
    }
}
