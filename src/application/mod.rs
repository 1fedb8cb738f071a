pub mod classify;
pub mod diagnostics;
pub mod injury_stage;
pub mod load_games;
pub mod pipeline;
pub mod report;
pub mod strength_stage;
pub mod weather_stage;

use std::future::Future;
use std::time::Duration;

use crate::domain::error::ProviderError;

/// Await a provider call, turning an elapsed deadline into
/// [`ProviderError::Timeout`].
pub(crate) async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit.as_millis() as u64)),
    }
}
