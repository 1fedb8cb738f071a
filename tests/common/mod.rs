//! Shared test helpers: game builders and deterministic provider doubles.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use edgeline::config::PipelineConfig;
use edgeline::domain::entities::enriched_game::EnrichedGame;
use edgeline::domain::entities::game_record::{GameRecord, Line, Spreads};
use edgeline::domain::error::ProviderError;
use edgeline::domain::ports::artifact_store::ArtifactStore;
use edgeline::domain::ports::injury_provider::InjuryProvider;
use edgeline::domain::ports::strength_provider::StrengthProvider;
use edgeline::domain::ports::weather_provider::WeatherProvider;
use edgeline::domain::values::injury::{InjuryAdjustment, InjuryPolicy, InjuryStatus, PlayerInjury, TeamInjuryImpact};
use edgeline::domain::values::strength::{
    Form, Situational, StrengthAdjustment, StrengthAssessment, StrengthPolicy, StrengthRatings, TeamStrength,
};
use edgeline::domain::values::team::{Stadium, TeamCode};
use edgeline::domain::values::weather::{WeatherAdjustment, WeatherObservation, WeatherPolicy};
use edgeline::infrastructure::artifacts::memory_store::InMemoryArtifactStore;
use edgeline::{EdgeLine, Providers};

pub const HOME_ADVANTAGE: f64 = 2.5;

pub fn team(code: &str) -> TeamCode {
    TeamCode::standardize(code).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A raw loader record in the camelCase shape.
pub fn game_json(
    date: &str,
    away: &str,
    home: &str,
    scores: (u32, u32),
    spread_close: Option<f64>,
    total_close: Option<f64>,
) -> Value {
    json!({
        "date": date,
        "homeTeam": home,
        "awayTeam": away,
        "homeScore": scores.0,
        "awayScore": scores.1,
        "spreads": { "home": { "open": spread_close, "close": spread_close } },
        "totals": { "open": total_close, "close": total_close },
    })
}

pub fn record(
    day: NaiveDate,
    away: &str,
    home: &str,
    spread_close: Option<f64>,
    total_close: Option<f64>,
) -> GameRecord {
    GameRecord::new(
        2019,
        day,
        team(home),
        team(away),
        24,
        20,
        Spreads {
            home: Line {
                open: spread_close,
                close: spread_close,
            },
            away: Line {
                open: spread_close.map(|s| -s),
                close: spread_close.map(|s| -s),
            },
        },
        Line {
            open: total_close,
            close: total_close,
        },
    )
}

pub fn obs(temperature_f: f64, wind_mph: f64, precipitation_in: f64) -> WeatherObservation {
    WeatherObservation {
        temperature_f,
        wind_mph,
        precipitation_in,
        humidity_pct: None,
    }
}

/// 65°F, light wind, dry: scores zero.
pub fn mild() -> WeatherObservation {
    obs(65.0, 5.0, 0.0)
}

pub fn injury(team_code: &str, position: &str, status: InjuryStatus) -> PlayerInjury {
    PlayerInjury {
        player_id: format!("{}-{}", team_code.to_lowercase(), position.to_lowercase()),
        player_name: format!("{team_code} {position}"),
        position: position.to_string(),
        status,
        injury_type: None,
        is_starter: true,
    }
}

/// Flat form (no recent games) and a fixed home-field advantage, so the
/// matchup depends only on `overall` and `offense`.
pub fn team_strength(code: &str, overall: f64, offense: f64) -> TeamStrength {
    TeamStrength {
        team: team(code),
        season: 2019,
        week: 1,
        strength: StrengthRatings {
            overall,
            offense,
            defense: overall,
            special_teams: 50.0,
        },
        form: Form::from_results(&[]),
        situational: Situational {
            home_advantage: HOME_ADVANTAGE,
            strength_of_schedule: None,
        },
    }
}

/// A fully enriched game built from domain values rather than providers.
pub fn enriched(
    game: GameRecord,
    weather: WeatherObservation,
    home_injuries: Vec<PlayerInjury>,
    away_injuries: Vec<PlayerInjury>,
    home: TeamStrength,
    away: TeamStrength,
) -> EnrichedGame {
    let injury_policy = InjuryPolicy::default();
    let weather = WeatherAdjustment::scored(&weather, false, false, &WeatherPolicy::default());
    let injuries = InjuryAdjustment::combine(
        TeamInjuryImpact::aggregate(game.home_team.clone(), home_injuries, &injury_policy),
        TeamInjuryImpact::aggregate(game.away_team.clone(), away_injuries, &injury_policy),
        &injury_policy,
    );
    let strength =
        StrengthAdjustment::assess(home, away, Some(&weather), Some(&injuries), &StrengthPolicy::default());
    EnrichedGame::from(game)
        .with_weather(weather)
        .with_injuries(injuries)
        .with_strength(StrengthAssessment::Available(strength))
}

// Provider doubles

pub struct FixedWeather(pub WeatherObservation);

#[async_trait]
impl WeatherProvider for FixedWeather {
    fn name(&self) -> &str {
        "fixed-weather"
    }

    async fn observe(&self, _: &TeamCode, _: &Stadium, _: NaiveDate) -> Result<WeatherObservation, ProviderError> {
        Ok(self.0)
    }
}

pub struct FailingWeather;

#[async_trait]
impl WeatherProvider for FailingWeather {
    fn name(&self) -> &str {
        "failing-weather"
    }

    async fn observe(&self, _: &TeamCode, _: &Stadium, _: NaiveDate) -> Result<WeatherObservation, ProviderError> {
        Err(ProviderError::Unavailable("weather service down".into()))
    }
}

/// Mild weather, counting every lookup.
#[derive(Default)]
pub struct CountingWeather {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl WeatherProvider for CountingWeather {
    fn name(&self) -> &str {
        "counting-weather"
    }

    async fn observe(&self, _: &TeamCode, _: &Stadium, _: NaiveDate) -> Result<WeatherObservation, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(mild())
    }
}

/// Answers only after `delay`.
pub struct SlowWeather(pub Duration);

#[async_trait]
impl WeatherProvider for SlowWeather {
    fn name(&self) -> &str {
        "slow-weather"
    }

    async fn observe(&self, _: &TeamCode, _: &Stadium, _: NaiveDate) -> Result<WeatherObservation, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(mild())
    }
}

/// Per-team injury lists; unlisted teams are healthy. Teams in `failing`
/// return an error instead.
#[derive(Default)]
pub struct InjuryTable {
    pub reports: HashMap<String, Vec<PlayerInjury>>,
    pub failing: Vec<String>,
}

impl InjuryTable {
    pub fn with(mut self, code: &str, injuries: Vec<PlayerInjury>) -> Self {
        self.reports.insert(code.to_string(), injuries);
        self
    }

    pub fn failing_for(mut self, code: &str) -> Self {
        self.failing.push(code.to_string());
        self
    }
}

#[async_trait]
impl InjuryProvider for InjuryTable {
    fn name(&self) -> &str {
        "injury-table"
    }

    async fn injuries(&self, team: &TeamCode, _: i32, _: u32) -> Result<Vec<PlayerInjury>, ProviderError> {
        if self.failing.iter().any(|t| t == team.as_str()) {
            return Err(ProviderError::Unavailable(format!("no report for {team}")));
        }
        Ok(self.reports.get(team.as_str()).cloned().unwrap_or_default())
    }
}

/// Overall ratings by team; offense is fixed at 20 so totals stay near 44.
/// Unlisted teams are not found.
#[derive(Default)]
pub struct RatingTable(pub HashMap<String, f64>);

impl RatingTable {
    pub fn with(mut self, code: &str, overall: f64) -> Self {
        self.0.insert(code.to_string(), overall);
        self
    }
}

#[async_trait]
impl StrengthProvider for RatingTable {
    fn name(&self) -> &str {
        "rating-table"
    }

    async fn strength(&self, team: &TeamCode, _: i32, _: u32) -> Result<TeamStrength, ProviderError> {
        self.0
            .get(team.as_str())
            .map(|overall| team_strength(team.as_str(), *overall, 20.0))
            .ok_or_else(|| ProviderError::NotFound(format!("no rating for {team}")))
    }
}

pub fn providers(
    weather: impl WeatherProvider + 'static,
    injuries: impl InjuryProvider + 'static,
    strength: impl StrengthProvider + 'static,
) -> Providers {
    Providers {
        weather: Arc::new(weather),
        injuries: Arc::new(injuries),
        strength: Arc::new(strength),
    }
}

/// Mild weather, no injuries, and ratings for the teams used across tests.
pub fn calm_providers() -> Providers {
    providers(
        FixedWeather(mild()),
        InjuryTable::default(),
        RatingTable::default()
            .with("KC", 80.0)
            .with("CLE", 60.0)
            .with("GB", 70.0)
            .with("CHI", 68.0)
            .with("DAL", 65.0)
            .with("NYG", 55.0),
    )
}

pub fn setup(providers: Providers) -> (EdgeLine, Arc<InMemoryArtifactStore>) {
    setup_with(PipelineConfig::default(), providers)
}

pub fn setup_with(config: PipelineConfig, providers: Providers) -> (EdgeLine, Arc<InMemoryArtifactStore>) {
    let store = Arc::new(InMemoryArtifactStore::new());
    let shared: Arc<dyn ArtifactStore> = store.clone();
    (EdgeLine::with_providers(config, providers, shared), store)
}

/// Three games across two months:
/// - KC hosts CLE (strong home favourite),
/// - GB hosts CHI (close matchup),
/// - NYG hosts DAL with no closing total (excluded from classification).
pub fn sample_corpus() -> Value {
    json!([
        game_json("2019-10-06", "CLE", "KC", (31, 17), Some(-3.0), Some(44.0)),
        game_json("2019-12-15", "CHI", "GB", (21, 13), Some(-1.0), Some(44.0)),
        game_json("2019-11-10", "DAL", "NYG", (20, 27), Some(3.0), None),
    ])
}

// Hand-computed classifier fixtures. KC rates 80 and CLE 60 (offense 20
// each), so the bare prediction is spread 4.5, total 44.0.

/// Healthy teams in mild weather. Spread edge 7.5 but confidence 0.79, one
/// point short of tier 1.
pub fn tier2_game() -> EnrichedGame {
    enriched(
        record(date(2019, 11, 3), "CLE", "KC", Some(-3.0), Some(44.0)),
        mild(),
        Vec::new(),
        Vec::new(),
        team_strength("KC", 80.0, 20.0),
        team_strength("CLE", 60.0, 20.0),
    )
}

/// KC QB out, CLE WR out: spread 3.6 vs -4.0 (edge 7.6), confidence 1.0.
pub fn tier1_game() -> EnrichedGame {
    enriched(
        record(date(2019, 10, 6), "CLE", "KC", Some(-4.0), Some(41.0)),
        mild(),
        vec![injury("KC", "QB", InjuryStatus::Out)],
        vec![injury("CLE", "WR", InjuryStatus::Out)],
        team_strength("KC", 80.0, 20.0),
        team_strength("CLE", 60.0, 20.0),
    )
}

/// Freezing and windy with the KC QB out: total 38.5 vs 44.0 (edge 5.5),
/// confidence 0.88, four factors.
pub fn qb_weather_game() -> EnrichedGame {
    enriched(
        record(date(2019, 12, 15), "CLE", "KC", Some(-3.0), Some(44.0)),
        obs(20.0, 25.0, 0.0),
        vec![injury("KC", "QB", InjuryStatus::Out)],
        Vec::new(),
        team_strength("KC", 80.0, 20.0),
        team_strength("CLE", 60.0, 20.0),
    )
}

/// GB 70 vs CHI 68 priced exactly at the prediction.
pub fn no_bet_game() -> EnrichedGame {
    enriched(
        record(date(2019, 12, 22), "CHI", "GB", Some(2.7), Some(44.0)),
        mild(),
        Vec::new(),
        Vec::new(),
        team_strength("GB", 70.0, 20.0),
        team_strength("CHI", 68.0, 20.0),
    )
}
