//! Data models for driver statistics.
//!
//! This module contains the core data structures used throughout the
//! application: the flattened per-race result record consumed by the
//! aggregation engine and the summaries it produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One driver's result in one race, flattened from the upstream API.
///
/// Numeric fields are kept as the raw strings the provider sends; the
/// engine parses them leniently (see [`crate::analysis::parse`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceResultRecord {
    /// Opaque driver identifier (e.g. `max_verstappen`).
    pub driver_id: String,
    /// Full display name, when the upstream payload carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Season label (e.g. `2024`).
    #[serde(default)]
    pub season: Option<String>,
    /// Round number within the season.
    #[serde(default)]
    pub round: Option<String>,
    /// Race name (e.g. `Bahrain Grand Prix`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_name: Option<String>,
    /// Finishing classification; a positive integer or a non-numeric marker.
    #[serde(default)]
    pub position: String,
    /// Starting grid slot; `0` or absent means no valid qualifying position.
    #[serde(default)]
    pub grid: Option<String>,
    /// Points awarded, as a decimal string.
    #[serde(default)]
    pub points: String,
    /// Free-text finish status (`Finished`, `+1 Lap`, `Engine`, ...).
    #[serde(default)]
    pub status: String,
    /// Constructor the driver raced for at this event.
    #[serde(default)]
    pub constructor_name: String,
    /// Rank of the driver's fastest lap in the race; `1` is the fastest lap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastest_lap_rank: Option<String>,
    /// Qualifying classification for the same race, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying_position: Option<String>,
}

impl RaceResultRecord {
    /// Returns the season label, treating blank labels as missing.
    pub fn season_label(&self) -> Option<&str> {
        non_blank(self.season.as_deref())
    }

    /// Returns the round label, treating blank labels as missing.
    pub fn round_label(&self) -> Option<&str> {
        non_blank(self.round.as_deref())
    }

    /// Human-readable label for this race, used for the career span.
    pub fn race_label(&self) -> String {
        if let Some(name) = non_blank(self.race_name.as_deref()) {
            return name.to_string();
        }

        match (self.season_label(), self.round_label()) {
            (Some(season), Some(round)) => format!("{} Round {}", season, round),
            (Some(season), None) => season.to_string(),
            _ => String::new(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Statistics for one season of a driver's results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonRollup {
    pub season: String,
    /// Constructor of the first record seen in this season.
    pub team: String,
    pub races: usize,
    pub wins: usize,
    pub podiums: usize,
    pub points: f64,
    pub dnfs: usize,
    pub poles: usize,
    pub fastest_laps: usize,
    pub win_rate: f64,
    pub podium_rate: f64,
    pub retirement_rate: f64,
}

/// First and last race of a driver's career, as seen in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerSpan {
    pub first_race: String,
    pub last_race: String,
    /// Current year minus the first season; varies with the wall clock.
    pub years_active: i32,
}

/// Aggregate statistics for a single driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverStatsSummary {
    /// Driver the summary was computed for.
    pub driver_id: String,
    /// Display name, taken from the first record that carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Constructor of the last record in input order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_team: Option<String>,

    pub total_races: usize,
    pub total_wins: usize,
    pub total_podiums: usize,
    pub total_points: f64,
    pub dnf_count: usize,
    /// Races qualified on pole; only counted when qualifying data is present.
    pub total_poles: usize,
    pub total_fastest_laps: usize,

    /// Percentages on a 0-100 scale.
    pub win_rate: f64,
    pub podium_rate: f64,
    pub retirement_rate: f64,

    pub avg_finish_position: f64,
    pub avg_qualifying_position: f64,
    pub best_finish: u32,
    pub worst_finish: u32,
    pub points_per_race: f64,

    /// Per-season breakdown, latest season first.
    pub season_results: Vec<SeasonRollup>,
    pub career_span: CareerSpan,
}

impl DriverStatsSummary {
    /// Name to show for this driver, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.driver_name.as_deref().unwrap_or(&self.driver_id)
    }
}

/// Race-by-race positional comparison between two drivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl HeadToHeadRecord {
    /// Number of races both drivers took part in.
    pub fn total(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// The same record seen from the other driver's side.
    pub fn inverse(&self) -> Self {
        Self {
            wins: self.losses,
            losses: self.wins,
            draws: self.draws,
        }
    }
}

/// Which driver, if either, has the upper hand on win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advantage {
    #[serde(rename = "Driver 1")]
    Driver1,
    #[serde(rename = "Driver 2")]
    Driver2,
    Even,
}

impl fmt::Display for Advantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advantage::Driver1 => write!(f, "Driver 1"),
            Advantage::Driver2 => write!(f, "Driver 2"),
            Advantage::Even => write!(f, "Even"),
        }
    }
}

/// One side of a [`DriverComparison`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSide {
    pub driver_id: String,
    pub wins: usize,
    pub podiums: usize,
    pub points: f64,
    pub avg_position: f64,
    pub win_rate: f64,
    pub podium_rate: f64,
}

/// Side-by-side comparison of two drivers with a win-rate verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverComparison {
    pub driver1: ComparisonSide,
    pub driver2: ComparisonSide,
    pub advantage: Advantage,
}

/// Recent-form metrics derived from a driver's classified finishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    /// Number of most recent races considered.
    pub window: usize,
    /// Standard deviation of finishing positions (lower is steadier).
    pub consistency: f64,
    /// Average finishing position over the window.
    pub recent_form: f64,
    /// Recent form minus career average; negative means improving.
    pub momentum: f64,
    /// Average places gained from grid to flag.
    pub positions_gained: f64,
    /// Points scored as a percentage of the maximum available.
    pub points_efficiency: f64,
}

/// Statistics and form for one driver in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverReport {
    pub stats: DriverStatsSummary,
    pub form: FormSummary,
}

/// Comparison section of a two-driver report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub comparison: DriverComparison,
    /// Head-to-head from the first driver's perspective.
    pub head_to_head: HeadToHeadRecord,
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the results came from (API URL or input file).
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Season filter, if one was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    /// Number of result records the report was built from.
    pub records: usize,
    /// Time spent fetching and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// The complete statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub drivers: Vec<DriverReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_season_is_missing() {
        let record = RaceResultRecord {
            season: Some("  ".to_string()),
            round: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(record.season_label(), None);
        assert_eq!(record.round_label(), Some("3"));
    }

    #[test]
    fn test_race_label_fallbacks() {
        let mut record = RaceResultRecord {
            season: Some("2024".to_string()),
            round: Some("5".to_string()),
            race_name: Some("Miami Grand Prix".to_string()),
            ..Default::default()
        };
        assert_eq!(record.race_label(), "Miami Grand Prix");

        record.race_name = None;
        assert_eq!(record.race_label(), "2024 Round 5");

        record.season = None;
        assert_eq!(record.race_label(), "");
    }

    #[test]
    fn test_head_to_head_inverse() {
        let record = HeadToHeadRecord {
            wins: 7,
            losses: 3,
            draws: 1,
        };
        let inverse = record.inverse();
        assert_eq!(inverse.wins, 3);
        assert_eq!(inverse.losses, 7);
        assert_eq!(inverse.draws, 1);
        assert_eq!(record.total(), 11);
    }

    #[test]
    fn test_advantage_display_and_serde() {
        assert_eq!(Advantage::Driver1.to_string(), "Driver 1");
        assert_eq!(Advantage::Even.to_string(), "Even");
        assert_eq!(
            serde_json::to_string(&Advantage::Driver2).unwrap(),
            "\"Driver 2\""
        );
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut summary = DriverStatsSummary {
            driver_id: "alonso".to_string(),
            ..Default::default()
        };
        assert_eq!(summary.display_name(), "alonso");

        summary.driver_name = Some("Fernando Alonso".to_string());
        assert_eq!(summary.display_name(), "Fernando Alonso");
    }
}
