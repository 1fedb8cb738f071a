use async_trait::async_trait;

use crate::domain::error::ProviderError;
use crate::domain::values::strength::TeamStrength;
use crate::domain::values::team::TeamCode;

/// Source of team strength/form snapshots.
#[async_trait]
pub trait StrengthProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn strength(&self, team: &TeamCode, season: i32, week: u32) -> Result<TeamStrength, ProviderError>;
}
