//! Response shapes of the Ergast-compatible results API.
//!
//! Only the fields the statistics engine reads are modelled. Scalars are
//! accepted as strings or numbers, and anything missing falls back to a
//! default rather than failing the whole payload.

use crate::api::error::ApiError;
use crate::models::RaceResultRecord;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level `{"MRData": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MrData {
    #[serde(deserialize_with = "lenient_string")]
    pub limit: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub offset: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub total: Option<String>,
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
}

impl MrData {
    pub fn limit(&self) -> usize {
        parse_count(self.limit.as_deref())
    }

    pub fn offset(&self) -> usize {
        parse_count(self.offset.as_deref())
    }

    pub fn total(&self) -> usize {
        parse_count(self.total.as_deref())
    }

    /// Number of result rows on this page, race or qualifying.
    pub fn result_count(&self) -> usize {
        self.race_table
            .races
            .iter()
            .map(|r| r.results.len() + r.qualifying_results.len())
            .sum()
    }
}

fn parse_count(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RaceTable {
    #[serde(rename = "Races")]
    pub races: Vec<Race>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Race {
    #[serde(deserialize_with = "lenient_string")]
    pub season: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub round: Option<String>,
    #[serde(rename = "raceName")]
    pub race_name: Option<String>,
    #[serde(rename = "Results")]
    pub results: Vec<ResultEntry>,
    #[serde(rename = "QualifyingResults")]
    pub qualifying_results: Vec<QualifyingEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResultEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub points: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub grid: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: DriverRef,
    #[serde(rename = "Constructor")]
    pub constructor: ConstructorRef,
    #[serde(rename = "FastestLap")]
    pub fastest_lap: Option<FastestLapRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FastestLapRef {
    #[serde(deserialize_with = "lenient_string")]
    pub rank: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QualifyingEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: DriverRef,
}

/// One driver's qualifying classification for one race.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingRecord {
    pub driver_id: String,
    pub season: Option<String>,
    pub round: Option<String>,
    pub position: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DriverRef {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "givenName")]
    pub given_name: Option<String>,
    #[serde(rename = "familyName")]
    pub family_name: Option<String>,
}

impl DriverRef {
    fn full_name(&self) -> Option<String> {
        match (self.given_name.as_deref(), self.family_name.as_deref()) {
            (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
            (None, Some(family)) => Some(family.to_string()),
            (Some(given), None) => Some(given.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConstructorRef {
    pub name: String,
}

/// Accept a JSON string or number; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl RaceTable {
    /// Flatten every race's results into one record per driver per race.
    pub fn into_records(self) -> Vec<RaceResultRecord> {
        self.races
            .into_iter()
            .flat_map(|race| {
                let Race {
                    season,
                    round,
                    race_name,
                    results,
                    ..
                } = race;

                results.into_iter().map(move |entry| RaceResultRecord {
                    driver_name: entry.driver.full_name(),
                    driver_id: entry.driver.driver_id,
                    season: season.clone(),
                    round: round.clone(),
                    race_name: race_name.clone(),
                    position: entry.position.unwrap_or_default(),
                    grid: entry.grid,
                    points: entry.points.unwrap_or_default(),
                    status: entry.status.unwrap_or_default(),
                    constructor_name: entry.constructor.name,
                    fastest_lap_rank: entry.fastest_lap.and_then(|lap| lap.rank),
                    qualifying_position: None,
                })
            })
            .collect()
    }

    /// Flatten every race's qualifying classification.
    pub fn into_qualifying(self) -> Vec<QualifyingRecord> {
        self.races
            .into_iter()
            .flat_map(|race| {
                let Race {
                    season,
                    round,
                    qualifying_results,
                    ..
                } = race;

                qualifying_results
                    .into_iter()
                    .map(move |entry| QualifyingRecord {
                        driver_id: entry.driver.driver_id,
                        season: season.clone(),
                        round: round.clone(),
                        position: entry.position.unwrap_or_default(),
                    })
            })
            .collect()
    }
}

/// Parse a results payload.
///
/// Accepts either an API envelope or a bare JSON array of flattened
/// records.
pub fn parse_results_json(content: &str) -> Result<Vec<RaceResultRecord>, ApiError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()));
    }

    let envelope: Envelope =
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(envelope.mr_data.race_table.into_records())
}
