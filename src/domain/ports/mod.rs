pub mod artifact_store;
pub mod injury_provider;
pub mod strength_provider;
pub mod weather_provider;
