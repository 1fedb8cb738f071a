pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::application::classify::{Classification, ClassifyUseCase};
use crate::application::diagnostics::StageOutput;
use crate::application::injury_stage::{InjuryStageUseCase, InjurySummary};
use crate::application::load_games::LoadOutcome;
use crate::application::pipeline::{PipelineRun, RunPipelineUseCase, Stage};
use crate::application::report::{OpportunityReport, ReportUseCase};
use crate::application::strength_stage::{StrengthStageUseCase, StrengthSummary};
use crate::application::weather_stage::{WeatherStageUseCase, WeatherSummary};
use crate::config::{PipelineConfig, ProviderKind};
use crate::domain::error::DomainError;
use crate::domain::ports::artifact_store::ArtifactStore;
use crate::domain::ports::injury_provider::InjuryProvider;
use crate::domain::ports::strength_provider::StrengthProvider;
use crate::domain::ports::weather_provider::WeatherProvider;
use crate::domain::values::team::StadiumTable;
use crate::infrastructure::artifacts::json_store::JsonArtifactStore;
use crate::infrastructure::providers::simulated::{
    SimulatedInjuryProvider, SimulatedStrengthProvider, SimulatedWeatherProvider,
};
use crate::infrastructure::providers::static_tables::{
    StaticInjuryProvider, StaticStrengthProvider, StaticWeatherProvider,
};

/// The three data capabilities the enrichment stages depend on.
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub injuries: Arc<dyn InjuryProvider>,
    pub strength: Arc<dyn StrengthProvider>,
}

impl Providers {
    pub fn simulated(seed: u64) -> Self {
        Self {
            weather: Arc::new(SimulatedWeatherProvider::new(seed)),
            injuries: Arc::new(SimulatedInjuryProvider::new(seed)),
            strength: Arc::new(SimulatedStrengthProvider::new(seed)),
        }
    }

    /// Replay tables from `weather.json`, `injuries.json` and
    /// `strength.json` in `dir`.
    pub fn fixtures(dir: &Path) -> Result<Self, DomainError> {
        Ok(Self {
            weather: Arc::new(StaticWeatherProvider::from_file(&dir.join("weather.json"))?),
            injuries: Arc::new(StaticInjuryProvider::from_file(&dir.join("injuries.json"))?),
            strength: Arc::new(StaticStrengthProvider::from_file(&dir.join("strength.json"))?),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, DomainError> {
        match config.providers.kind {
            ProviderKind::Simulated => Ok(Self::simulated(config.providers.seed)),
            ProviderKind::Fixtures => {
                let dir = config
                    .providers
                    .fixtures_dir
                    .as_deref()
                    .ok_or_else(|| DomainError::Config("providers.fixtures_dir is not set".into()))?;
                Self::fixtures(dir)
            }
        }
    }
}

pub struct EdgeLine {
    pipeline: RunPipelineUseCase,
}

impl EdgeLine {
    /// Providers per `config.providers`, artifacts under
    /// `config.artifacts.data_dir`.
    pub fn new(config: PipelineConfig) -> Result<Self, DomainError> {
        let providers = Providers::from_config(&config)?;
        let store: Arc<dyn ArtifactStore> = Arc::new(JsonArtifactStore::new(&config.artifacts.data_dir)?);
        Ok(Self::with_providers(config, providers, store))
    }

    pub fn with_providers(config: PipelineConfig, providers: Providers, store: Arc<dyn ArtifactStore>) -> Self {
        let timeout = config.providers.timeout();
        let stadiums = Arc::new(StadiumTable::nfl());

        let pipeline = RunPipelineUseCase::new(
            store,
            WeatherStageUseCase::new(providers.weather, stadiums, config.weather, timeout),
            InjuryStageUseCase::new(providers.injuries, config.injury, timeout),
            StrengthStageUseCase::new(providers.strength, config.strength, timeout),
            ClassifyUseCase::new(config.tiers.clone(), config.classifier),
            ReportUseCase::new(config.tiers),
        );
        Self { pipeline }
    }

    // Delegating methods
    pub fn load(&self, raw: &Value) -> Result<LoadOutcome, DomainError> {
        self.pipeline.load(raw)
    }

    pub async fn weather(&self) -> Result<StageOutput<WeatherSummary>, DomainError> {
        self.pipeline.weather().await
    }

    pub async fn injuries(&self) -> Result<StageOutput<InjurySummary>, DomainError> {
        self.pipeline.injuries().await
    }

    pub async fn strength(&self) -> Result<StageOutput<StrengthSummary>, DomainError> {
        self.pipeline.strength().await
    }

    pub fn classify(&self) -> Result<Classification, DomainError> {
        self.pipeline.classify()
    }

    pub fn report(&self) -> Result<OpportunityReport, DomainError> {
        self.pipeline.report()
    }

    pub fn render_report(&self, report: &OpportunityReport) -> String {
        self.pipeline.reporter().render(report)
    }

    pub async fn run_stage(&self, stage: Stage, raw: Option<&Value>) -> Result<Value, DomainError> {
        self.pipeline.run_stage(stage, raw).await
    }

    pub async fn run_all(&self, raw: &Value) -> Result<PipelineRun, DomainError> {
        self.pipeline.run_all(raw).await
    }
}
