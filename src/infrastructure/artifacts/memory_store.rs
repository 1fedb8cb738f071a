use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::domain::error::DomainError;
use crate::domain::ports::artifact_store::{Artifact, ArtifactStore};

/// Keeps artifacts in memory. Used for library callers that only want the
/// returned values, and in tests.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    artifacts: Mutex<HashMap<Artifact, Value>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn read(&self, artifact: Artifact) -> Result<Value, DomainError> {
        let artifacts = self
            .artifacts
            .lock()
            .map_err(|e| DomainError::Artifact(e.to_string()))?;
        artifacts
            .get(&artifact)
            .cloned()
            .ok_or_else(|| DomainError::Artifact(format!("{artifact} has not been written")))
    }

    fn write(&self, artifact: Artifact, value: &Value) -> Result<(), DomainError> {
        self.artifacts
            .lock()
            .map_err(|e| DomainError::Artifact(e.to_string()))?
            .insert(artifact, value.clone());
        Ok(())
    }

    fn exists(&self, artifact: Artifact) -> bool {
        self.artifacts
            .lock()
            .map(|a| a.contains_key(&artifact))
            .unwrap_or(false)
    }
}
