use std::fmt;

use crate::domain::error::DomainError;

/// Flat JSON artifacts written between pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Validated game corpus (loader output).
    Games,
    WeatherEnhanced,
    InjuryEnhanced,
    StrengthEnhanced,
    /// `{ tier1, tier2, tier3 }` opportunity lists.
    EdgeOpportunities,
    /// Classification counts and exclusions.
    Classification,
    OpportunityReport,
    RunSummary,
}

impl Artifact {
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Games => "historical-odds-integrated.json",
            Artifact::WeatherEnhanced => "weather-enhanced-games.json",
            Artifact::InjuryEnhanced => "injury-enhanced-games.json",
            Artifact::StrengthEnhanced => "team-strength-enhanced-games.json",
            Artifact::EdgeOpportunities => "edge-opportunities.json",
            Artifact::Classification => "classification-summary.json",
            Artifact::OpportunityReport => "opportunity-report.json",
            Artifact::RunSummary => "run-summary.json",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Write-once storage for stage artifacts.
pub trait ArtifactStore: Send + Sync {
    fn read(&self, artifact: Artifact) -> Result<serde_json::Value, DomainError>;
    fn write(&self, artifact: Artifact, value: &serde_json::Value) -> Result<(), DomainError>;
    fn exists(&self, artifact: Artifact) -> bool;
}
