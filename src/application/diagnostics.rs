//! Run-level diagnostics: what every stage processed, degraded or dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::enriched_game::EnrichedGame;
use crate::domain::error::RecordError;

/// A single record that a stage could not fully enrich.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub game_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDiagnostics {
    pub stage: String,
    pub processed: usize,
    pub enriched: usize,
    pub degraded: usize,
    pub anomalies: Vec<Anomaly>,
}

impl StageDiagnostics {
    pub fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            ..Default::default()
        }
    }

    pub fn record_ok(&mut self) {
        self.processed += 1;
        self.enriched += 1;
    }

    pub fn record_degraded(&mut self, game_id: &str, reason: impl Into<String>) {
        self.processed += 1;
        self.degraded += 1;
        self.anomalies.push(Anomaly {
            game_id: game_id.to_string(),
            reason: reason.into(),
        });
    }
}

/// What every enrichment stage hands back: the new records, the per-record
/// anomalies, and a stage-specific summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOutput<S> {
    pub games: Vec<EnrichedGame>,
    pub diagnostics: StageDiagnostics,
    pub summary: S,
}

/// Summary returned alongside the enriched corpus and the opportunity book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDiagnostics {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_records: usize,
    pub loaded_records: usize,
    pub malformed: Vec<RecordError>,
    pub stages: Vec<StageDiagnostics>,
    /// Games enriched by every stage without degradation.
    pub fully_enriched: usize,
    pub classified: usize,
    pub excluded_from_classification: usize,
}

impl RunDiagnostics {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            total_records: 0,
            loaded_records: 0,
            malformed: Vec::new(),
            stages: Vec::new(),
            fully_enriched: 0,
            classified: 0,
            excluded_from_classification: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn stage(&self, name: &str) -> Option<&StageDiagnostics> {
        self.stages.iter().find(|s| s.stage == name)
    }

    /// Human-readable run summary for the CLI.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Run {}\n", self.run_id));
        out.push_str(&format!("  total records:          {}\n", self.total_records));
        out.push_str(&format!("  loaded:                 {}\n", self.loaded_records));
        out.push_str(&format!("  malformed (dropped):    {}\n", self.malformed.len()));
        for stage in &self.stages {
            out.push_str(&format!(
                "  {:<23} {} enriched, {} degraded\n",
                format!("{}:", stage.stage),
                stage.enriched,
                stage.degraded
            ));
        }
        out.push_str(&format!("  fully enriched:         {}\n", self.fully_enriched));
        out.push_str(&format!("  classified:             {}\n", self.classified));
        out.push_str(&format!(
            "  excluded from classify: {}\n",
            self.excluded_from_classification
        ));
        out
    }
}
