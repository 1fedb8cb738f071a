//! Pipeline configuration.
//!
//! Every policy constant lives here: stage coefficients, the tier table,
//! provider settings and the artifact directory. Values come from the
//! defaults, then an optional TOML file, then `EDGELINE_*` environment
//! variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::classify::ClassifierPolicy;
use crate::domain::error::DomainError;
use crate::domain::values::injury::InjuryPolicy;
use crate::domain::values::strength::StrengthPolicy;
use crate::domain::values::tier::TierPolicy;
use crate::domain::values::weather::WeatherPolicy;

pub const CONFIG_ENV: &str = "EDGELINE_CONFIG";
pub const DATA_DIR_ENV: &str = "EDGELINE_DATA_DIR";
pub const SEED_ENV: &str = "EDGELINE_SEED";
pub const TIMEOUT_ENV: &str = "EDGELINE_PROVIDER_TIMEOUT_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Seeded synthetic data.
    #[default]
    Simulated,
    /// JSON tables under `fixtures_dir`.
    Fixtures,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub kind: ProviderKind,
    pub seed: u64,
    /// Per-call deadline for every provider lookup.
    pub timeout_ms: u64,
    /// Holds `weather.json`, `injuries.json` and `strength.json` when
    /// `kind = "fixtures"`.
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Simulated,
            seed: 2024,
            timeout_ms: 2_000,
            fixtures_dir: None,
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub data_dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub weather: WeatherPolicy,
    pub injury: InjuryPolicy,
    pub strength: StrengthPolicy,
    pub classifier: ClassifierPolicy,
    pub tiers: TierPolicy,
    pub providers: ProvidersConfig,
    pub artifacts: ArtifactsConfig,
}

impl PipelineConfig {
    /// Defaults, then the file named by `path` (or `EDGELINE_CONFIG`), then
    /// environment overrides. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate().map_err(|errors| DomainError::Config(errors.join("; ")))?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("cannot read {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loading config file");
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, DomainError> {
        toml::from_str(text).map_err(|e| DomainError::Config(e.to_string()))
    }

    /// Apply `EDGELINE_*` overrides through `lookup` (the process
    /// environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.artifacts.data_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup(SEED_ENV) {
            self.providers.seed = seed
                .trim()
                .parse()
                .map_err(|_| DomainError::Config(format!("{SEED_ENV} must be an integer, got '{seed}'")))?;
        }
        if let Some(ms) = lookup(TIMEOUT_ENV) {
            self.providers.timeout_ms = ms
                .trim()
                .parse()
                .map_err(|_| DomainError::Config(format!("{TIMEOUT_ENV} must be an integer, got '{ms}'")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.tiers.validate() {
            errors.push(e);
        }
        if self.providers.timeout_ms == 0 {
            errors.push("providers.timeout_ms must be positive".to_string());
        }
        if self.providers.kind == ProviderKind::Fixtures && self.providers.fixtures_dir.is_none() {
            errors.push("providers.fixtures_dir is required when kind = \"fixtures\"".to_string());
        }

        let s = &self.strength;
        if !(0.0..=1.0).contains(&s.min_confidence)
            || !(0.0..=1.0).contains(&s.max_confidence)
            || s.min_confidence > s.max_confidence
        {
            errors.push("strength confidence bounds must satisfy 0 <= min <= max <= 1".to_string());
        }

        let w = &self.classifier.weights;
        if w.weather < 0.0 || w.injury < 0.0 || w.strength < 0.0 {
            errors.push("classifier weights must be non-negative".to_string());
        } else if w.weather + w.injury + w.strength <= 0.0 {
            errors.push("classifier weights must not all be zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
