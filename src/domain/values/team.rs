use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Standardised 2–3 letter team code (e.g. "BUF", "SF"). Deserializing
/// standardises the raw name, so fixtures may use nicknames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamCode(String);

/// (code, nickname, full name). Codes follow the modern abbreviations;
/// OAK is kept separate from LV so pre-2020 records keep their own stadium.
const TEAMS: &[(&str, &str, &str)] = &[
    ("ARI", "Cardinals", "Arizona Cardinals"),
    ("ATL", "Falcons", "Atlanta Falcons"),
    ("BAL", "Ravens", "Baltimore Ravens"),
    ("BUF", "Bills", "Buffalo Bills"),
    ("CAR", "Panthers", "Carolina Panthers"),
    ("CHI", "Bears", "Chicago Bears"),
    ("CIN", "Bengals", "Cincinnati Bengals"),
    ("CLE", "Browns", "Cleveland Browns"),
    ("DAL", "Cowboys", "Dallas Cowboys"),
    ("DEN", "Broncos", "Denver Broncos"),
    ("DET", "Lions", "Detroit Lions"),
    ("GB", "Packers", "Green Bay Packers"),
    ("HOU", "Texans", "Houston Texans"),
    ("IND", "Colts", "Indianapolis Colts"),
    ("JAX", "Jaguars", "Jacksonville Jaguars"),
    ("KC", "Chiefs", "Kansas City Chiefs"),
    ("LA", "Rams", "Los Angeles Rams"),
    ("LAC", "Chargers", "Los Angeles Chargers"),
    ("LV", "Raiders", "Las Vegas Raiders"),
    ("MIA", "Dolphins", "Miami Dolphins"),
    ("MIN", "Vikings", "Minnesota Vikings"),
    ("NE", "Patriots", "New England Patriots"),
    ("NO", "Saints", "New Orleans Saints"),
    ("NYG", "Giants", "New York Giants"),
    ("NYJ", "Jets", "New York Jets"),
    ("OAK", "Oakland", "Oakland Raiders"),
    ("PHI", "Eagles", "Philadelphia Eagles"),
    ("PIT", "Steelers", "Pittsburgh Steelers"),
    ("SEA", "Seahawks", "Seattle Seahawks"),
    ("SF", "49ers", "San Francisco 49ers"),
    ("TB", "Buccaneers", "Tampa Bay Buccaneers"),
    ("TEN", "Titans", "Tennessee Titans"),
    ("WAS", "Washington", "Washington Commanders"),
];

/// Legacy spellings found in historical line archives.
const ALIASES: &[(&str, &str)] = &[
    ("fortyniners", "SF"),
    ("sandiego", "LAC"),
    ("st.louis", "LA"),
    ("stlouis", "LA"),
    ("commanders", "WAS"),
    ("redskins", "WAS"),
    ("lar", "LA"),
    ("lvr", "LV"),
    ("wsh", "WAS"),
];

impl TeamCode {
    /// Standardise a raw team name (code, nickname, full name or legacy alias).
    pub fn standardize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();

        for (code, nickname, full) in TEAMS {
            if code.eq_ignore_ascii_case(trimmed)
                || nickname.to_lowercase() == lower
                || full.to_lowercase() == lower
            {
                return Some(TeamCode(code.to_string()));
            }
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, code)| TeamCode(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TeamCode::standardize(s).ok_or_else(|| format!("Unknown team: {s}"))
    }
}

impl TryFrom<String> for TeamCode {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<TeamCode> for String {
    fn from(code: TeamCode) -> Self {
        code.0
    }
}

/// Home stadium location used for weather lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stadium {
    pub lat: f64,
    pub lon: f64,
    pub is_dome: bool,
}

impl Stadium {
    /// Roughly north of the Mason-Dixon line; used for winter temperature bands.
    pub fn is_northern(&self) -> bool {
        self.lat > 40.0
    }
}

/// Static home-stadium table keyed by team code.
#[derive(Debug, Clone, Default)]
pub struct StadiumTable {
    stadiums: HashMap<TeamCode, Stadium>,
}

impl StadiumTable {
    pub fn new(stadiums: HashMap<TeamCode, Stadium>) -> Self {
        Self { stadiums }
    }

    /// Stadium locations for every franchise in the historical archive.
    pub fn nfl() -> Self {
        let rows: &[(&str, f64, f64, bool)] = &[
            ("BUF", 42.7738, -78.7870, false),
            ("MIA", 25.9580, -80.2389, false),
            ("NE", 42.0909, -71.2643, false),
            ("NYJ", 40.8135, -74.0745, false),
            ("BAL", 39.2780, -76.6227, false),
            ("CIN", 39.0955, -84.5161, false),
            ("CLE", 41.5061, -81.6995, false),
            ("PIT", 40.4468, -80.0158, false),
            ("HOU", 29.6847, -95.4107, true),
            ("IND", 39.7601, -86.1639, true),
            ("JAX", 30.3240, -81.6373, false),
            ("TEN", 36.1665, -86.7713, false),
            ("DEN", 39.7439, -105.0201, false),
            ("KC", 39.0489, -94.4839, false),
            ("OAK", 37.7516, -122.2005, false),
            ("LV", 36.0909, -115.1833, true),
            ("LAC", 33.8644, -117.2681, false),
            ("DAL", 32.7473, -97.0945, true),
            ("NYG", 40.8135, -74.0745, false),
            ("PHI", 39.9008, -75.1675, false),
            ("WAS", 38.9076, -76.8645, false),
            ("CHI", 41.8623, -87.6167, false),
            ("DET", 42.3400, -83.0456, true),
            ("GB", 44.5013, -88.0622, false),
            ("MIN", 44.9737, -93.2581, true),
            ("ATL", 33.7573, -84.4003, true),
            ("CAR", 35.2258, -80.8528, false),
            ("NO", 29.9511, -90.0812, true),
            ("TB", 27.9759, -82.5033, false),
            ("ARI", 33.5276, -112.2626, true),
            ("LA", 34.0141, -118.2879, false),
            ("SF", 37.4032, -121.9698, false),
            ("SEA", 47.5952, -122.3316, false),
        ];
        let stadiums = rows
            .iter()
            .map(|(code, lat, lon, is_dome)| {
                (
                    TeamCode(code.to_string()),
                    Stadium {
                        lat: *lat,
                        lon: *lon,
                        is_dome: *is_dome,
                    },
                )
            })
            .collect();
        Self { stadiums }
    }

    pub fn get(&self, team: &TeamCode) -> Option<&Stadium> {
        self.stadiums.get(team)
    }

    pub fn is_dome(&self, team: &TeamCode) -> bool {
        self.get(team).map(|s| s.is_dome).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.stadiums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stadiums.is_empty()
    }
}
