//! Table-backed providers for replaying recorded data.
//!
//! Each provider is built from a JSON fixture:
//!
//! - weather: `[{ "team": "GB", "date": "2019-12-15", "temperatureF": 18, "windMph": 22, "precipitationIn": 0 }]`
//! - injuries: `[{ "team": "KC", "season": 2019, "week": 10, "injuries": [PlayerInjury, ...] }]`
//! - strength: `[TeamStrength, ...]`

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::{DomainError, ProviderError};
use crate::domain::ports::injury_provider::InjuryProvider;
use crate::domain::ports::strength_provider::StrengthProvider;
use crate::domain::ports::weather_provider::WeatherProvider;
use crate::domain::values::injury::PlayerInjury;
use crate::domain::values::strength::TeamStrength;
use crate::domain::values::team::{Stadium, TeamCode};
use crate::domain::values::weather::WeatherObservation;

fn read_fixture(path: &Path) -> Result<Value, DomainError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Artifact(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

fn team_code(raw: &str) -> Result<TeamCode, DomainError> {
    TeamCode::standardize(raw).ok_or_else(|| DomainError::InvalidInput(format!("unknown team '{raw}'")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherRow {
    team: String,
    date: NaiveDate,
    #[serde(flatten)]
    observation: WeatherObservation,
}

pub struct StaticWeatherProvider {
    readings: HashMap<(TeamCode, NaiveDate), WeatherObservation>,
}

impl StaticWeatherProvider {
    pub fn from_json(value: Value) -> Result<Self, DomainError> {
        let rows: Vec<WeatherRow> = serde_json::from_value(value)?;
        let mut readings = HashMap::with_capacity(rows.len());
        for row in rows {
            readings.insert((team_code(&row.team)?, row.date), row.observation);
        }
        Ok(Self { readings })
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        Self::from_json(read_fixture(path)?)
    }
}

#[async_trait]
impl WeatherProvider for StaticWeatherProvider {
    fn name(&self) -> &str {
        "static-weather"
    }

    async fn observe(
        &self,
        home_team: &TeamCode,
        _stadium: &Stadium,
        date: NaiveDate,
    ) -> Result<WeatherObservation, ProviderError> {
        self.readings
            .get(&(home_team.clone(), date))
            .copied()
            .ok_or_else(|| ProviderError::NotFound(format!("no weather for {home_team} on {date}")))
    }
}

#[derive(Deserialize)]
struct InjuryRow {
    team: String,
    season: i32,
    week: u32,
    #[serde(default)]
    injuries: Vec<PlayerInjury>,
}

/// Teams without a row for a week are reported as having no injuries.
pub struct StaticInjuryProvider {
    reports: HashMap<(TeamCode, i32, u32), Vec<PlayerInjury>>,
}

impl StaticInjuryProvider {
    pub fn from_json(value: Value) -> Result<Self, DomainError> {
        let rows: Vec<InjuryRow> = serde_json::from_value(value)?;
        let mut reports: HashMap<(TeamCode, i32, u32), Vec<PlayerInjury>> = HashMap::new();
        for row in rows {
            reports
                .entry((team_code(&row.team)?, row.season, row.week))
                .or_default()
                .extend(row.injuries);
        }
        Ok(Self { reports })
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        Self::from_json(read_fixture(path)?)
    }
}

#[async_trait]
impl InjuryProvider for StaticInjuryProvider {
    fn name(&self) -> &str {
        "static-injuries"
    }

    async fn injuries(&self, team: &TeamCode, season: i32, week: u32) -> Result<Vec<PlayerInjury>, ProviderError> {
        Ok(self
            .reports
            .get(&(team.clone(), season, week))
            .cloned()
            .unwrap_or_default())
    }
}

/// Looks up the snapshot for the requested week, falling back to the most
/// recent earlier week of the same season.
pub struct StaticStrengthProvider {
    snapshots: HashMap<(TeamCode, i32), Vec<TeamStrength>>,
}

impl StaticStrengthProvider {
    pub fn from_json(value: Value) -> Result<Self, DomainError> {
        let rows: Vec<TeamStrength> = serde_json::from_value(value)?;
        let mut snapshots: HashMap<(TeamCode, i32), Vec<TeamStrength>> = HashMap::new();
        for row in rows {
            snapshots.entry((row.team.clone(), row.season)).or_default().push(row);
        }
        for list in snapshots.values_mut() {
            list.sort_by_key(|s| s.week);
        }
        Ok(Self { snapshots })
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        Self::from_json(read_fixture(path)?)
    }
}

#[async_trait]
impl StrengthProvider for StaticStrengthProvider {
    fn name(&self) -> &str {
        "static-strength"
    }

    async fn strength(&self, team: &TeamCode, season: i32, week: u32) -> Result<TeamStrength, ProviderError> {
        self.snapshots
            .get(&(team.clone(), season))
            .and_then(|list| list.iter().rev().find(|s| s.week <= week))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("no strength for {team} in {season} week {week}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team(code: &str) -> TeamCode {
        TeamCode::standardize(code).unwrap()
    }

    #[tokio::test]
    async fn test_weather_lookup_by_team_and_date() {
        let provider = StaticWeatherProvider::from_json(json!([
            { "team": "Packers", "date": "2019-12-15", "temperatureF": 18.0, "windMph": 22.0, "precipitationIn": 0.0 }
        ]))
        .unwrap();
        let stadium = Stadium {
            lat: 44.5,
            lon: -88.1,
            is_dome: false,
        };
        let date = NaiveDate::from_ymd_opt(2019, 12, 15).unwrap();
        let obs = provider.observe(&team("GB"), &stadium, date).await.unwrap();
        assert_eq!(obs.wind_mph, 22.0);

        let other = NaiveDate::from_ymd_opt(2019, 12, 22).unwrap();
        assert!(matches!(
            provider.observe(&team("GB"), &stadium, other).await,
            Err(ProviderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_injury_row_means_healthy() {
        let provider = StaticInjuryProvider::from_json(json!([])).unwrap();
        assert!(provider.injuries(&team("KC"), 2019, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_strength_rows_accept_team_nicknames() {
        let row = |team: &str, week: u32, overall: f64| {
            json!({
                "team": team,
                "season": 2019,
                "week": week,
                "strength": { "overall": overall, "offense": 20.0, "defense": overall, "specialTeams": 50.0 },
                "form": { "last5Games": [], "trend": "neutral", "momentum": 0.0 },
                "situational": { "homeAdvantage": 2.5 },
            })
        };
        let provider = StaticStrengthProvider::from_json(json!([row("Chiefs", 1, 78.0), row("kc", 4, 81.0)])).unwrap();

        let early = provider.strength(&team("KC"), 2019, 3).await.unwrap();
        assert_eq!(early.team.as_str(), "KC");
        assert_eq!(early.strength.overall, 78.0);
        let later = provider.strength(&team("KC"), 2019, 5).await.unwrap();
        assert_eq!(later.strength.overall, 81.0);
    }

    #[test]
    fn test_unknown_team_rejected() {
        let err = StaticInjuryProvider::from_json(json!([{ "team": "Gotham", "season": 2019, "week": 1 }]));
        assert!(err.is_err());
    }
}
