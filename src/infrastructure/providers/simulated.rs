//! Deterministic synthetic providers.
//!
//! Each lookup seeds its own RNG from `(seed, key...)`, so a game's data
//! does not depend on how many other games were looked up before it and
//! repeated runs produce identical corpora.

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::error::ProviderError;
use crate::domain::ports::injury_provider::InjuryProvider;
use crate::domain::ports::strength_provider::StrengthProvider;
use crate::domain::ports::weather_provider::WeatherProvider;
use crate::domain::values::injury::{known_positions, InjuryStatus, PlayerInjury};
use crate::domain::values::points::round1;
use crate::domain::values::schedule::is_winter;
use crate::domain::values::strength::{Form, Situational, StrengthRatings, TeamStrength};
use crate::domain::values::team::{Stadium, TeamCode};
use crate::domain::values::weather::WeatherObservation;

const STRONG_TEAMS: &[&str] = &["NE", "GB", "NO", "PIT", "BAL"];
const WEAK_TEAMS: &[&str] = &["CLE", "JAX", "NYJ", "DET"];
const STRONG_HOME: &[&str] = &["SEA", "KC", "NO", "GB"];
const WEAK_HOME: &[&str] = &["LAC", "LA", "JAX"];

const INJURY_STATUSES: [InjuryStatus; 4] = [
    InjuryStatus::Questionable,
    InjuryStatus::Doubtful,
    InjuryStatus::Out,
    InjuryStatus::InjuredReserve,
];
const INJURY_TYPES: [&str; 7] = ["ankle", "knee", "shoulder", "hamstring", "concussion", "back", "wrist"];

/// FNV-1a over the key parts, mixed with the run seed.
fn rng_for(seed: u64, parts: &[&str]) -> StdRng {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ seed;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0x1f)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    StdRng::seed_from_u64(hash)
}

pub struct SimulatedWeatherProvider {
    seed: u64,
}

impl SimulatedWeatherProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl WeatherProvider for SimulatedWeatherProvider {
    fn name(&self) -> &str {
        "simulated-weather"
    }

    async fn observe(
        &self,
        home_team: &TeamCode,
        stadium: &Stadium,
        date: NaiveDate,
    ) -> Result<WeatherObservation, ProviderError> {
        let mut rng = rng_for(self.seed, &["weather", home_team.as_str(), &date.to_string()]);
        let temperature_f = if is_winter(date) && stadium.is_northern() {
            rng.gen_range(20.0..60.0)
        } else {
            rng.gen_range(60.0..90.0)
        };
        let wind_mph = rng.gen_range(0.0..25.0);
        let precipitation_in = if rng.gen_bool(0.3) {
            rng.gen_range(0.0..0.5)
        } else {
            0.0
        };
        Ok(WeatherObservation {
            temperature_f,
            wind_mph,
            precipitation_in,
            humidity_pct: Some(rng.gen_range(40.0..80.0)),
        })
    }
}

pub struct SimulatedInjuryProvider {
    seed: u64,
}

impl SimulatedInjuryProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl InjuryProvider for SimulatedInjuryProvider {
    fn name(&self) -> &str {
        "simulated-injuries"
    }

    async fn injuries(&self, team: &TeamCode, season: i32, week: u32) -> Result<Vec<PlayerInjury>, ProviderError> {
        let mut rng = rng_for(
            self.seed,
            &["injuries", team.as_str(), &season.to_string(), &week.to_string()],
        );
        let positions: Vec<&str> = known_positions().collect();
        let count = rng.gen_range(0..=3);

        let mut injuries = Vec::with_capacity(count);
        for i in 0..count {
            let position = positions.choose(&mut rng).copied().unwrap_or("QB");
            let status = INJURY_STATUSES.choose(&mut rng).copied().unwrap_or(InjuryStatus::Questionable);
            let injury_type = INJURY_TYPES.choose(&mut rng).map(|t| t.to_string());
            injuries.push(PlayerInjury {
                player_id: format!("{}-{}-{}", team.as_str().to_lowercase(), position.to_lowercase(), i + 1),
                player_name: format!("{team} {position} Player"),
                position: position.to_string(),
                status,
                injury_type,
                is_starter: rng.gen_bool(0.7),
            });
        }
        Ok(injuries)
    }
}

pub struct SimulatedStrengthProvider {
    seed: u64,
}

impl SimulatedStrengthProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl StrengthProvider for SimulatedStrengthProvider {
    fn name(&self) -> &str {
        "simulated-strength"
    }

    async fn strength(&self, team: &TeamCode, season: i32, week: u32) -> Result<TeamStrength, ProviderError> {
        let code = team.as_str();
        // The base rating is per season so a team's level is stable across weeks.
        let mut season_rng = rng_for(self.seed, &["strength-base", code, &season.to_string()]);
        let base = if STRONG_TEAMS.contains(&code) {
            season_rng.gen_range(75.0..90.0)
        } else if WEAK_TEAMS.contains(&code) {
            season_rng.gen_range(35.0..50.0)
        } else {
            season_rng.gen_range(50.0..70.0)
        };

        let mut rng = rng_for(
            self.seed,
            &["strength", code, &season.to_string(), &week.to_string()],
        );
        let overall = round1(base + rng.gen_range(-5.0..5.0));
        let offense = round1(base + rng.gen_range(-5.0..5.0));
        let defense = round1(base + rng.gen_range(-5.0..5.0));
        let special_teams = round1(50.0 + rng.gen_range(-10.0..10.0));

        let results: Vec<bool> = (0..week.min(5)).map(|_| rng.gen_bool(0.5)).collect();

        let home_advantage = if STRONG_HOME.contains(&code) {
            rng.gen_range(3.5..5.0)
        } else if WEAK_HOME.contains(&code) {
            rng.gen_range(1.0..2.0)
        } else {
            rng.gen_range(2.0..3.5)
        };

        Ok(TeamStrength {
            team: team.clone(),
            season,
            week,
            strength: StrengthRatings {
                overall,
                offense,
                defense,
                special_teams,
            },
            form: Form::from_results(&results),
            situational: Situational {
                home_advantage: round1(home_advantage),
                strength_of_schedule: Some((rng.gen_range(0.3..0.7) * 100.0_f64).round() / 100.0),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(code: &str) -> TeamCode {
        TeamCode::standardize(code).unwrap()
    }

    #[tokio::test]
    async fn test_weather_is_deterministic_per_seed() {
        let stadium = Stadium {
            lat: 44.5,
            lon: -88.1,
            is_dome: false,
        };
        let date = NaiveDate::from_ymd_opt(2019, 12, 15).unwrap();
        let a = SimulatedWeatherProvider::new(7).observe(&team("GB"), &stadium, date).await.unwrap();
        let b = SimulatedWeatherProvider::new(7).observe(&team("GB"), &stadium, date).await.unwrap();
        assert_eq!(a, b);
        assert!((20.0..60.0).contains(&a.temperature_f));
        assert!((0.0..25.0).contains(&a.wind_mph));
    }

    #[tokio::test]
    async fn test_injury_counts_in_range() {
        let provider = SimulatedInjuryProvider::new(42);
        for week in 1..=17 {
            let list = provider.injuries(&team("KC"), 2019, week).await.unwrap();
            assert!(list.len() <= 3);
            assert!(list.iter().all(|i| i.status != InjuryStatus::Probable));
        }
    }

    #[tokio::test]
    async fn test_strong_teams_rate_higher() {
        let provider = SimulatedStrengthProvider::new(1);
        let strong = provider.strength(&team("NE"), 2019, 8).await.unwrap();
        let weak = provider.strength(&team("CLE"), 2019, 8).await.unwrap();
        assert!(strong.strength.overall > weak.strength.overall);
        assert_eq!(strong.form.last5_games.len(), 5);
    }
}
