use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::error::ProviderError;
use crate::domain::values::team::{Stadium, TeamCode};
use crate::domain::values::weather::WeatherObservation;

/// Source of game-day weather. Implementations may call a forecast/archive
/// API or replay recorded observations; the weather stage applies its own
/// timeout around each call.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Observation at `stadium` (home of `home_team`) on `date`.
    async fn observe(
        &self,
        home_team: &TeamCode,
        stadium: &Stadium,
        date: NaiveDate,
    ) -> Result<WeatherObservation, ProviderError>;
}
