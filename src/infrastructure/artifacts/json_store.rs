use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::ports::artifact_store::{Artifact, ArtifactStore};

/// Pretty-printed JSON files in one directory, one file per artifact.
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    /// Opens (and creates, if needed) the artifact directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| DomainError::Artifact(format!("cannot create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.dir.join(artifact.file_name())
    }
}

impl ArtifactStore for JsonArtifactStore {
    fn read(&self, artifact: Artifact) -> Result<Value, DomainError> {
        let path = self.path(artifact);
        let text = fs::read_to_string(&path)
            .map_err(|e| DomainError::Artifact(format!("cannot read {}: {e}", path.display())))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes to a temporary file and renames it into place, so a reader
    /// never sees a half-written artifact.
    fn write(&self, artifact: Artifact, value: &Value) -> Result<(), DomainError> {
        let path = self.path(artifact);
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, text).map_err(|e| DomainError::Artifact(format!("cannot write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .map_err(|e| DomainError::Artifact(format!("cannot move {} into place: {e}", path.display())))?;
        debug!(artifact = %artifact, path = %path.display(), "artifact written");
        Ok(())
    }

    fn exists(&self, artifact: Artifact) -> bool {
        self.path(artifact).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path().join("out")).unwrap();
        assert!(!store.exists(Artifact::Games));

        store.write(Artifact::Games, &json!([{ "gameId": "x" }])).unwrap();
        assert!(store.exists(Artifact::Games));
        assert!(dir.path().join("out/historical-odds-integrated.json").is_file());
        assert_eq!(store.read(Artifact::Games).unwrap()[0]["gameId"], "x");
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path()).unwrap();
        assert!(matches!(store.read(Artifact::RunSummary), Err(DomainError::Artifact(_))));
    }
}
