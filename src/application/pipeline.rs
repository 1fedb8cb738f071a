//! Pipeline orchestration: run one stage from the previous stage's artifact,
//! or the whole chain from a raw corpus.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::application::classify::{Classification, ClassifyUseCase, OpportunityBook};
use crate::application::diagnostics::{RunDiagnostics, StageDiagnostics, StageOutput};
use crate::application::injury_stage::{InjuryStageUseCase, InjurySummary};
use crate::application::load_games::{LoadGamesUseCase, LoadOutcome};
use crate::application::report::{OpportunityReport, ReportUseCase};
use crate::application::strength_stage::{StrengthStageUseCase, StrengthSummary};
use crate::application::weather_stage::{WeatherStageUseCase, WeatherSummary};
use crate::domain::entities::enriched_game::EnrichedGame;
use crate::domain::error::DomainError;
use crate::domain::ports::artifact_store::{Artifact, ArtifactStore};

/// Pipeline stages in execution order, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Load,
    Weather,
    Injuries,
    Strength,
    Classify,
    Report,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Load,
        Stage::Weather,
        Stage::Injuries,
        Stage::Strength,
        Stage::Classify,
        Stage::Report,
    ];

    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Artifact this stage reads; the loader reads caller-supplied input.
    pub fn input(&self) -> Option<Artifact> {
        match self {
            Stage::Load => None,
            Stage::Weather => Some(Artifact::Games),
            Stage::Injuries => Some(Artifact::WeatherEnhanced),
            Stage::Strength => Some(Artifact::InjuryEnhanced),
            Stage::Classify => Some(Artifact::StrengthEnhanced),
            Stage::Report => Some(Artifact::EdgeOpportunities),
        }
    }

    pub fn output(&self) -> Artifact {
        match self {
            Stage::Load => Artifact::Games,
            Stage::Weather => Artifact::WeatherEnhanced,
            Stage::Injuries => Artifact::InjuryEnhanced,
            Stage::Strength => Artifact::StrengthEnhanced,
            Stage::Classify => Artifact::EdgeOpportunities,
            Stage::Report => Artifact::OpportunityReport,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Weather => write!(f, "weather"),
            Stage::Injuries => write!(f, "injuries"),
            Stage::Strength => write!(f, "strength"),
            Stage::Classify => write!(f, "classify"),
            Stage::Report => write!(f, "report"),
        }
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<usize>() {
            return Self::from_number(n).ok_or_else(|| DomainError::InvalidInput(format!("no stage {n} (1-6)")));
        }
        Self::ALL
            .into_iter()
            .find(|stage| stage.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown stage: {s}")))
    }
}

/// Everything a full run produces.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub games: Vec<EnrichedGame>,
    pub classification: Classification,
    pub report: OpportunityReport,
    pub diagnostics: RunDiagnostics,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StageArtifactSummary<'a, S: Serialize> {
    stage: String,
    diagnostics: &'a StageDiagnostics,
    summary: &'a S,
}

pub struct RunPipelineUseCase {
    store: Arc<dyn ArtifactStore>,
    loader: LoadGamesUseCase,
    weather: WeatherStageUseCase,
    injuries: InjuryStageUseCase,
    strength: StrengthStageUseCase,
    classifier: ClassifyUseCase,
    reporter: ReportUseCase,
}

impl RunPipelineUseCase {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        weather: WeatherStageUseCase,
        injuries: InjuryStageUseCase,
        strength: StrengthStageUseCase,
        classifier: ClassifyUseCase,
        reporter: ReportUseCase,
    ) -> Self {
        Self {
            store,
            loader: LoadGamesUseCase::new(),
            weather,
            injuries,
            strength,
            classifier,
            reporter,
        }
    }

    pub fn reporter(&self) -> &ReportUseCase {
        &self.reporter
    }

    pub fn load(&self, raw: &Value) -> Result<LoadOutcome, DomainError> {
        let outcome = self.loader.execute(raw)?;
        self.store
            .write(Artifact::Games, &serde_json::to_value(&outcome.games)?)?;
        Ok(outcome)
    }

    pub async fn weather(&self) -> Result<StageOutput<WeatherSummary>, DomainError> {
        let games = self.read_games(Artifact::Games)?;
        let output = self.weather.execute(games).await;
        self.write_games(Artifact::WeatherEnhanced, &output.games)?;
        Ok(output)
    }

    pub async fn injuries(&self) -> Result<StageOutput<InjurySummary>, DomainError> {
        let games = self.read_games(Artifact::WeatherEnhanced)?;
        let output = self.injuries.execute(games).await;
        self.write_games(Artifact::InjuryEnhanced, &output.games)?;
        Ok(output)
    }

    pub async fn strength(&self) -> Result<StageOutput<StrengthSummary>, DomainError> {
        let games = self.read_games(Artifact::InjuryEnhanced)?;
        let output = self.strength.execute(games).await;
        self.write_games(Artifact::StrengthEnhanced, &output.games)?;
        Ok(output)
    }

    pub fn classify(&self) -> Result<Classification, DomainError> {
        let games = self.read_games(Artifact::StrengthEnhanced)?;
        let classification = self.classifier.execute(&games);
        self.write_classification(&classification)?;
        Ok(classification)
    }

    pub fn report(&self) -> Result<OpportunityReport, DomainError> {
        let book: OpportunityBook = serde_json::from_value(self.store.read(Artifact::EdgeOpportunities)?)?;
        let report = self.reporter.execute(&book);
        self.store
            .write(Artifact::OpportunityReport, &serde_json::to_value(&report)?)?;
        Ok(report)
    }

    /// "Run stage N": executes one stage against the stored artifacts and
    /// returns its summary as JSON. Only the loader takes `raw` input.
    pub async fn run_stage(&self, stage: Stage, raw: Option<&Value>) -> Result<Value, DomainError> {
        info!(stage = %stage, number = stage.number(), "running stage");
        let summary = match stage {
            Stage::Load => {
                let raw = raw.ok_or_else(|| DomainError::InvalidInput("the load stage needs an input corpus".into()))?;
                let outcome = self.load(raw)?;
                json!({
                    "stage": stage.to_string(),
                    "totalRecords": outcome.total_records,
                    "loaded": outcome.games.len(),
                    "malformed": outcome.malformed,
                    "analytics": outcome.analytics,
                })
            }
            Stage::Weather => stage_summary(stage, &self.weather().await?)?,
            Stage::Injuries => stage_summary(stage, &self.injuries().await?)?,
            Stage::Strength => stage_summary(stage, &self.strength().await?)?,
            Stage::Classify => serde_json::to_value(self.classify()?.summary)?,
            Stage::Report => serde_json::to_value(self.report()?)?,
        };
        Ok(summary)
    }

    /// Run every stage in order. Only corpus-wide problems (empty input,
    /// duplicate ids, artifact I/O) fail the run; a duplicate id fails it
    /// before any enrichment stage executes.
    pub async fn run_all(&self, raw: &Value) -> Result<PipelineRun, DomainError> {
        let mut diagnostics = RunDiagnostics::start();
        info!(run_id = %diagnostics.run_id, "pipeline started");

        let loaded = self.load(raw)?;
        diagnostics.total_records = loaded.total_records;
        diagnostics.loaded_records = loaded.games.len();
        diagnostics.malformed = loaded.malformed;

        let games: Vec<EnrichedGame> = loaded.games.into_iter().map(EnrichedGame::from).collect();

        let weather = self.weather.execute(games).await;
        self.write_games(Artifact::WeatherEnhanced, &weather.games)?;
        diagnostics.stages.push(weather.diagnostics);

        let injuries = self.injuries.execute(weather.games).await;
        self.write_games(Artifact::InjuryEnhanced, &injuries.games)?;
        diagnostics.stages.push(injuries.diagnostics);

        let strength = self.strength.execute(injuries.games).await;
        self.write_games(Artifact::StrengthEnhanced, &strength.games)?;
        diagnostics.stages.push(strength.diagnostics);
        let games = strength.games;

        let classification = self.classifier.execute(&games);
        self.write_classification(&classification)?;

        let report = self.reporter.execute(&classification.book);
        self.store
            .write(Artifact::OpportunityReport, &serde_json::to_value(&report)?)?;

        let degraded: HashSet<&str> = diagnostics
            .stages
            .iter()
            .flat_map(|s| s.anomalies.iter().map(|a| a.game_id.as_str()))
            .collect();
        diagnostics.fully_enriched = games.len() - degraded.len();
        diagnostics.classified = classification.summary.classified;
        diagnostics.excluded_from_classification = classification.summary.excluded_count;
        diagnostics.finish();

        self.store
            .write(Artifact::RunSummary, &serde_json::to_value(&diagnostics)?)?;
        info!(
            run_id = %diagnostics.run_id,
            fully_enriched = diagnostics.fully_enriched,
            classified = diagnostics.classified,
            excluded = diagnostics.excluded_from_classification,
            "pipeline finished"
        );

        Ok(PipelineRun {
            games,
            classification,
            report,
            diagnostics,
        })
    }

    /// Reads a stage artifact. The loader's artifact holds bare game
    /// records; later ones hold enriched games. Both deserialize as
    /// [`EnrichedGame`] since the annotations are optional.
    fn read_games(&self, artifact: Artifact) -> Result<Vec<EnrichedGame>, DomainError> {
        if !self.store.exists(artifact) {
            return Err(DomainError::Artifact(format!(
                "{artifact} not found; run the earlier stages first"
            )));
        }
        let value = self.store.read(artifact)?;
        let games: Vec<EnrichedGame> = serde_json::from_value(value)?;
        if games.is_empty() {
            return Err(DomainError::EmptyInput(format!("{artifact} holds no games")));
        }
        Ok(games)
    }

    fn write_games(&self, artifact: Artifact, games: &[EnrichedGame]) -> Result<(), DomainError> {
        self.store.write(artifact, &serde_json::to_value(games)?)
    }

    fn write_classification(&self, classification: &Classification) -> Result<(), DomainError> {
        self.store
            .write(Artifact::EdgeOpportunities, &serde_json::to_value(&classification.book)?)?;
        self.store.write(
            Artifact::Classification,
            &json!({
                "summary": classification.summary,
                "noBet": classification.no_bet,
            }),
        )
    }
}

fn stage_summary<S: Serialize>(stage: Stage, output: &StageOutput<S>) -> Result<Value, DomainError> {
    Ok(serde_json::to_value(StageArtifactSummary {
        stage: stage.to_string(),
        diagnostics: &output.diagnostics,
        summary: &output.summary,
    })?)
}
