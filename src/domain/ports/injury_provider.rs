use async_trait::async_trait;

use crate::domain::error::ProviderError;
use crate::domain::values::injury::PlayerInjury;
use crate::domain::values::team::TeamCode;

/// Source of a team's injury report for a given week.
///
/// An empty list is a valid answer (no injuries); errors mean the report
/// could not be obtained at all.
#[async_trait]
pub trait InjuryProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn injuries(&self, team: &TeamCode, season: i32, week: u32) -> Result<Vec<PlayerInjury>, ProviderError>;
}
