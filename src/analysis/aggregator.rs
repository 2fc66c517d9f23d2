//! Driver statistics aggregation.
//!
//! Pure functions folding flattened race results into per-driver summaries,
//! season breakdowns, head-to-head records and two-driver comparisons.
//! Every function is total: empty or malformed input yields zeroed output.

use crate::analysis::parse::{is_finish, is_first, parse_grid, parse_points, parse_position};
use crate::models::{
    Advantage, CareerSpan, ComparisonSide, DriverComparison, DriverStatsSummary, FormSummary,
    HeadToHeadRecord, RaceResultRecord, SeasonRollup,
};
use chrono::{Datelike, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Win-rate margin (percentage points) a driver needs to be given the advantage.
pub const ADVANTAGE_THRESHOLD: f64 = 5.0;

/// Percentage of `count` over `total`, zero when there is nothing to divide by.
fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

fn average(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

/// Counting totals shared by the career summary and season rollups.
#[derive(Debug, Default)]
struct Totals {
    races: usize,
    wins: usize,
    podiums: usize,
    points: f64,
    dnfs: usize,
    poles: usize,
    fastest_laps: usize,
}

impl Totals {
    fn from_records<'a>(records: impl IntoIterator<Item = &'a RaceResultRecord>) -> Self {
        let mut totals = Self::default();

        for record in records {
            let position = parse_position(&record.position);

            totals.races += 1;
            if position.is_win() {
                totals.wins += 1;
            }
            if position.is_podium() {
                totals.podiums += 1;
            }
            if !is_finish(&record.status) {
                totals.dnfs += 1;
            }
            if is_first(record.qualifying_position.as_deref()) {
                totals.poles += 1;
            }
            if is_first(record.fastest_lap_rank.as_deref()) {
                totals.fastest_laps += 1;
            }
            totals.points += parse_points(&record.points);
        }

        totals
    }

    fn points_per_race(&self) -> f64 {
        if self.races == 0 {
            0.0
        } else {
            self.points / self.races as f64
        }
    }
}

fn classified_positions<'a>(records: impl IntoIterator<Item = &'a RaceResultRecord>) -> Vec<u32> {
    records
        .into_iter()
        .filter_map(|r| parse_position(&r.position).classified())
        .collect()
}

/// Calculate statistics for `driver_id` from a result list that may contain
/// other drivers' results.
///
/// `career_span.years_active` is measured against the current year.
pub fn calculate_driver_stats(results: &[RaceResultRecord], driver_id: &str) -> DriverStatsSummary {
    calculate_driver_stats_at(results, driver_id, Utc::now().year())
}

/// Same as [`calculate_driver_stats`] with an explicit current year.
pub fn calculate_driver_stats_at(
    results: &[RaceResultRecord],
    driver_id: &str,
    current_year: i32,
) -> DriverStatsSummary {
    let driver_results: Vec<&RaceResultRecord> =
        results.iter().filter(|r| r.driver_id == driver_id).collect();

    debug!(
        "Aggregating {} of {} results for driver '{}'",
        driver_results.len(),
        results.len(),
        driver_id
    );

    let totals = Totals::from_records(driver_results.iter().copied());
    let positions = classified_positions(driver_results.iter().copied());
    let grids: Vec<u32> = driver_results
        .iter()
        .filter_map(|r| parse_grid(r.grid.as_deref()))
        .collect();

    let driver_name = driver_results
        .iter()
        .filter_map(|r| r.driver_name.as_deref())
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(String::from);

    let current_team = driver_results
        .last()
        .map(|r| r.constructor_name.trim())
        .filter(|team| !team.is_empty())
        .map(String::from);

    DriverStatsSummary {
        driver_id: driver_id.to_string(),
        driver_name,
        current_team,
        total_races: totals.races,
        total_wins: totals.wins,
        total_podiums: totals.podiums,
        total_points: totals.points,
        dnf_count: totals.dnfs,
        total_poles: totals.poles,
        total_fastest_laps: totals.fastest_laps,
        win_rate: rate(totals.wins, totals.races),
        podium_rate: rate(totals.podiums, totals.races),
        retirement_rate: rate(totals.dnfs, totals.races),
        avg_finish_position: average(&positions),
        avg_qualifying_position: average(&grids),
        best_finish: positions.iter().copied().min().unwrap_or(0),
        worst_finish: positions.iter().copied().max().unwrap_or(0),
        points_per_race: totals.points_per_race(),
        season_results: group_by_season(driver_results.iter().copied()),
        career_span: career_span(&driver_results, current_year),
    }
}

fn career_span(records: &[&RaceResultRecord], current_year: i32) -> CareerSpan {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return CareerSpan::default();
    };

    let years_active = first
        .season_label()
        .and_then(|s| s.parse::<i32>().ok())
        .map(|season| (current_year - season).max(0))
        .unwrap_or(0);

    CareerSpan {
        first_race: first.race_label(),
        last_race: last.race_label(),
        years_active,
    }
}

/// Sort key for seasons: numeric labels by value, anything else after them.
fn season_sort_key(season: &str) -> (Option<i64>, &str) {
    (season.parse::<i64>().ok(), season)
}

/// Group results by season label and aggregate each group.
///
/// Records without a season label are left out. The team for a season is
/// the constructor of the first record seen in it. Latest season first.
pub fn group_by_season<'a>(
    records: impl IntoIterator<Item = &'a RaceResultRecord>,
) -> Vec<SeasonRollup> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&RaceResultRecord>> = HashMap::new();

    for record in records {
        let Some(season) = record.season_label() else {
            continue;
        };

        grouped
            .entry(season)
            .or_insert_with(|| {
                order.push(season);
                Vec::new()
            })
            .push(record);
    }

    let mut rollups: Vec<SeasonRollup> = order
        .into_iter()
        .map(|season| {
            let group = &grouped[season];
            let totals = Totals::from_records(group.iter().copied());
            let team = group
                .first()
                .map(|r| r.constructor_name.trim())
                .filter(|team| !team.is_empty())
                .unwrap_or("Unknown");

            SeasonRollup {
                season: season.to_string(),
                team: team.to_string(),
                races: totals.races,
                wins: totals.wins,
                podiums: totals.podiums,
                points: totals.points,
                dnfs: totals.dnfs,
                poles: totals.poles,
                fastest_laps: totals.fastest_laps,
                win_rate: rate(totals.wins, totals.races),
                podium_rate: rate(totals.podiums, totals.races),
                retirement_rate: rate(totals.dnfs, totals.races),
            }
        })
        .collect();

    rollups.sort_by(|a, b| season_sort_key(&b.season).cmp(&season_sort_key(&a.season)));
    rollups
}

/// Compare two drivers race by race, keyed on (season, round).
///
/// Races only one side has a record for are skipped. If a side has several
/// records for the same race the last one counts. Records missing a season
/// or round cannot be paired and are ignored.
pub fn calculate_h2h_record(
    driver_results: &[RaceResultRecord],
    teammate_results: &[RaceResultRecord],
) -> HeadToHeadRecord {
    type Pair<'a> = (Option<&'a RaceResultRecord>, Option<&'a RaceResultRecord>);
    let mut races: HashMap<(&str, &str), Pair<'_>> = HashMap::new();

    for record in driver_results {
        if let Some(key) = race_key(record) {
            races.entry(key).or_default().0 = Some(record);
        }
    }
    for record in teammate_results {
        if let Some(key) = race_key(record) {
            races.entry(key).or_default().1 = Some(record);
        }
    }

    let mut h2h = HeadToHeadRecord::default();

    for pair in races.values() {
        let (Some(driver), Some(teammate)) = pair else {
            continue;
        };

        match parse_position(&driver.position).cmp(&parse_position(&teammate.position)) {
            Ordering::Less => h2h.wins += 1,
            Ordering::Greater => h2h.losses += 1,
            Ordering::Equal => h2h.draws += 1,
        }
    }

    debug!(
        "Head-to-head over {} shared races: {}-{}-{}",
        h2h.total(),
        h2h.wins,
        h2h.losses,
        h2h.draws
    );

    h2h
}

fn race_key(record: &RaceResultRecord) -> Option<(&str, &str)> {
    Some((record.season_label()?, record.round_label()?))
}

/// Compare two drivers' result lists.
///
/// Each side is aggregated for the driver of its first record; an empty
/// list aggregates to zeroed statistics.
pub fn compare_drivers(
    driver1_results: &[RaceResultRecord],
    driver2_results: &[RaceResultRecord],
) -> DriverComparison {
    let side = |results: &[RaceResultRecord]| {
        let driver_id = results.first().map(|r| r.driver_id.as_str()).unwrap_or("");
        comparison_side(&calculate_driver_stats(results, driver_id))
    };

    let driver1 = side(driver1_results);
    let driver2 = side(driver2_results);
    let advantage = advantage_between(driver1.win_rate, driver2.win_rate);

    DriverComparison {
        driver1,
        driver2,
        advantage,
    }
}

fn comparison_side(stats: &DriverStatsSummary) -> ComparisonSide {
    ComparisonSide {
        driver_id: stats.driver_id.clone(),
        wins: stats.total_wins,
        podiums: stats.total_podiums,
        points: stats.total_points,
        avg_position: stats.avg_finish_position,
        win_rate: stats.win_rate,
        podium_rate: stats.podium_rate,
    }
}

/// Verdict on two win rates: a side needs to lead by more than
/// [`ADVANTAGE_THRESHOLD`] points.
pub fn advantage_between(driver1_win_rate: f64, driver2_win_rate: f64) -> Advantage {
    if driver1_win_rate > driver2_win_rate + ADVANTAGE_THRESHOLD {
        Advantage::Driver1
    } else if driver2_win_rate > driver1_win_rate + ADVANTAGE_THRESHOLD {
        Advantage::Driver2
    } else {
        Advantage::Even
    }
}

/// Standard deviation of classified finishing positions.
pub fn consistency_score(records: &[RaceResultRecord]) -> f64 {
    let positions = classified_positions(records);
    if positions.is_empty() {
        return 0.0;
    }

    let mean = average(&positions);
    let variance = positions
        .iter()
        .map(|&p| (f64::from(p) - mean).powi(2))
        .sum::<f64>()
        / positions.len() as f64;

    variance.sqrt()
}

/// Average classified finishing position over the last `window` records.
pub fn recent_form(records: &[RaceResultRecord], window: usize) -> f64 {
    let start = records.len().saturating_sub(window);
    average(&classified_positions(&records[start..]))
}

/// Recent form minus the overall average; negative means the driver is
/// finishing higher up lately. Zero when the window holds no classified
/// finish, since there is no recent form to compare.
pub fn momentum(records: &[RaceResultRecord], window: usize) -> f64 {
    let start = records.len().saturating_sub(window);
    let recent = classified_positions(&records[start..]);
    if recent.is_empty() {
        return 0.0;
    }

    average(&recent) - average(&classified_positions(records))
}

/// Places gained from `previous` to `current`; positive is an improvement.
pub fn position_change(current: u32, previous: u32) -> i64 {
    i64::from(previous) - i64::from(current)
}

/// Points scored as a percentage of the maximum possible.
pub fn points_efficiency(points_scored: f64, max_possible_points: f64) -> f64 {
    if max_possible_points > 0.0 {
        (points_scored / max_possible_points) * 100.0
    } else {
        0.0
    }
}

/// Form metrics for one driver's records.
pub fn form_summary(
    records: &[RaceResultRecord],
    window: usize,
    max_points_per_race: f64,
) -> FormSummary {
    let changes: Vec<i64> = records
        .iter()
        .filter_map(|r| {
            let finish = parse_position(&r.position).classified()?;
            let grid = parse_grid(r.grid.as_deref())?;
            Some(position_change(finish, grid))
        })
        .collect();

    let positions_gained = if changes.is_empty() {
        0.0
    } else {
        changes.iter().sum::<i64>() as f64 / changes.len() as f64
    };

    let totals = Totals::from_records(records);

    FormSummary {
        window,
        consistency: consistency_score(records),
        recent_form: recent_form(records, window),
        momentum: momentum(records, window),
        positions_gained,
        points_efficiency: points_efficiency(
            totals.points,
            totals.races as f64 * max_points_per_race,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_result(driver: &str, season: &str, round: &str, position: &str) -> RaceResultRecord {
        RaceResultRecord {
            driver_id: driver.to_string(),
            driver_name: None,
            season: Some(season.to_string()),
            round: Some(round.to_string()),
            race_name: Some(format!("Race {}", round)),
            position: position.to_string(),
            grid: Some("5".to_string()),
            points: "0".to_string(),
            status: "Finished".to_string(),
            constructor_name: "Ferrari".to_string(),
            fastest_lap_rank: None,
            qualifying_position: None,
        }
    }

    fn with_status(mut record: RaceResultRecord, status: &str) -> RaceResultRecord {
        record.status = status.to_string();
        record
    }

    fn with_points(mut record: RaceResultRecord, points: &str) -> RaceResultRecord {
        record.points = points.to_string();
        record
    }

    /// `wins` winning races followed by 5th places, `races` in total.
    fn season_of(driver: &str, races: usize, wins: usize) -> Vec<RaceResultRecord> {
        (1..=races)
            .map(|round| {
                let position = if round <= wins { "1" } else { "5" };
                create_test_result(driver, "2024", &round.to_string(), position)
            })
            .collect()
    }

    #[test]
    fn test_empty_input_is_zeroed() {
        let stats = calculate_driver_stats(&[], "hamilton");

        assert_eq!(stats.driver_id, "hamilton");
        assert_eq!(stats.total_races, 0);
        assert_eq!(stats.total_wins, 0);
        assert_eq!(stats.total_podiums, 0);
        assert_eq!(stats.total_points, 0.0);
        assert_eq!(stats.dnf_count, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.podium_rate, 0.0);
        assert_eq!(stats.retirement_rate, 0.0);
        assert_eq!(stats.points_per_race, 0.0);
        assert_eq!(stats.avg_finish_position, 0.0);
        assert_eq!(stats.avg_qualifying_position, 0.0);
        assert_eq!(stats.best_finish, 0);
        assert_eq!(stats.worst_finish, 0);
        assert!(stats.season_results.is_empty());
        assert_eq!(stats.career_span, CareerSpan::default());
    }

    #[test]
    fn test_other_drivers_only_is_zeroed() {
        let results = vec![create_test_result("leclerc", "2024", "1", "1")];
        let stats = calculate_driver_stats(&results, "sainz");

        assert_eq!(stats.total_races, 0);
        assert!(!stats.win_rate.is_nan());
        assert!(!stats.points_per_race.is_nan());
    }

    #[test]
    fn test_filters_by_driver() {
        let results = vec![
            create_test_result("leclerc", "2024", "1", "1"),
            create_test_result("sainz", "2024", "1", "2"),
            create_test_result("leclerc", "2024", "2", "3"),
        ];

        let stats = calculate_driver_stats(&results, "leclerc");
        assert_eq!(stats.total_races, 2);
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.total_podiums, 2);
        assert_eq!(stats.best_finish, 1);
        assert_eq!(stats.worst_finish, 3);
        assert_eq!(stats.avg_finish_position, 2.0);
    }

    #[test]
    fn test_totals_and_rates() {
        let results = vec![
            with_points(create_test_result("norris", "2024", "1", "1"), "25"),
            with_points(create_test_result("norris", "2024", "2", "2"), "18"),
            with_points(create_test_result("norris", "2024", "3", "4"), "12.5"),
            with_status(create_test_result("norris", "2024", "4", "18"), "Gearbox"),
        ];

        let stats = calculate_driver_stats(&results, "norris");

        assert_eq!(stats.total_races, 4);
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.total_podiums, 2);
        assert_eq!(stats.total_points, 55.5);
        assert_eq!(stats.dnf_count, 1);
        assert_eq!(stats.win_rate, 25.0);
        assert_eq!(stats.podium_rate, 50.0);
        assert_eq!(stats.retirement_rate, 25.0);
        assert_eq!(stats.points_per_race, 55.5 / 4.0);
    }

    #[test]
    fn test_unclassified_excluded_from_positions() {
        let results = vec![
            create_test_result("stroll", "2023", "1", "8"),
            with_status(create_test_result("stroll", "2023", "2", "R"), "Accident"),
            create_test_result("stroll", "2023", "3", "12"),
        ];

        let stats = calculate_driver_stats(&results, "stroll");

        assert_eq!(stats.total_races, 3);
        assert_eq!(stats.dnf_count, 1);
        assert_eq!(stats.best_finish, 8);
        assert_eq!(stats.worst_finish, 12);
        assert_eq!(stats.avg_finish_position, 10.0);
    }

    #[test]
    fn test_dnf_classification() {
        let results = vec![
            with_status(create_test_result("albon", "2024", "1", "14"), "+1 Lap"),
            with_status(create_test_result("albon", "2024", "2", "19"), "Retired"),
        ];

        let stats = calculate_driver_stats(&results, "albon");
        assert_eq!(stats.dnf_count, 1);
        assert_eq!(stats.retirement_rate, 50.0);
    }

    #[test]
    fn test_malformed_fields_do_not_panic() {
        let mut record = create_test_result("sargeant", "2024", "1", "");
        record.points = "abc".to_string();
        record.grid = Some("".to_string());

        let stats = calculate_driver_stats(&[record], "sargeant");

        assert_eq!(stats.total_races, 1);
        assert_eq!(stats.total_points, 0.0);
        assert_eq!(stats.avg_qualifying_position, 0.0);
        assert_eq!(stats.best_finish, 0);
    }

    #[test]
    fn test_avg_qualifying_skips_pit_lane_starts() {
        let mut first = create_test_result("perez", "2024", "1", "3");
        first.grid = Some("2".to_string());
        let mut second = create_test_result("perez", "2024", "2", "6");
        second.grid = Some("0".to_string());
        let mut third = create_test_result("perez", "2024", "3", "4");
        third.grid = None;
        let mut fourth = create_test_result("perez", "2024", "4", "5");
        fourth.grid = Some("6".to_string());

        let stats = calculate_driver_stats(&[first, second, third, fourth], "perez");
        assert_eq!(stats.avg_qualifying_position, 4.0);
    }

    #[test]
    fn test_win_podium_subset_and_rate_bounds() {
        let positions = ["1", "2", "3", "4", "R", "0", "1", "-1", "15", "x"];
        let results: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let record = create_test_result("ocon", "2022", &i.to_string(), p);
                if i % 3 == 0 {
                    with_status(record, "Engine")
                } else {
                    record
                }
            })
            .collect();

        let stats = calculate_driver_stats(&results, "ocon");

        assert!(stats.total_wins <= stats.total_podiums);
        assert!(stats.total_podiums <= stats.total_races);
        assert_eq!(stats.total_wins, 2);
        assert_eq!(stats.total_podiums, 4);
        for rate in [stats.win_rate, stats.podium_rate, stats.retirement_rate] {
            assert!((0.0..=100.0).contains(&rate));
        }
    }

    #[test]
    fn test_season_grouping_and_ordering() {
        let mut results = vec![
            create_test_result("gasly", "2022", "1", "7"),
            create_test_result("gasly", "2024", "1", "10"),
            create_test_result("gasly", "2023", "1", "3"),
            create_test_result("gasly", "2024", "2", "1"),
        ];
        results[0].constructor_name = "AlphaTauri".to_string();
        results[1].constructor_name = "Alpine".to_string();

        let stats = calculate_driver_stats(&results, "gasly");
        let seasons: Vec<_> = stats.season_results.iter().map(|s| s.season.as_str()).collect();

        assert_eq!(seasons, vec!["2024", "2023", "2022"]);
        assert_eq!(stats.season_results[0].races, 2);
        assert_eq!(stats.season_results[0].wins, 1);
        assert_eq!(stats.season_results[0].win_rate, 50.0);
        assert_eq!(stats.season_results[0].team, "Alpine");
        assert_eq!(stats.season_results[1].podiums, 1);
        assert_eq!(stats.season_results[2].team, "AlphaTauri");
    }

    #[test]
    fn test_results_without_season_count_in_totals_only() {
        let mut unlabeled = create_test_result("bottas", "", "1", "9");
        unlabeled.season = None;
        let results = vec![unlabeled, create_test_result("bottas", "2021", "2", "3")];

        let stats = calculate_driver_stats(&results, "bottas");

        assert_eq!(stats.total_races, 2);
        assert_eq!(stats.season_results.len(), 1);
        assert_eq!(stats.season_results[0].races, 1);
    }

    #[test]
    fn test_non_numeric_seasons_sort_last() {
        let results = vec![
            create_test_result("zhou", "pre-season", "1", "9"),
            create_test_result("zhou", "2023", "1", "9"),
            create_test_result("zhou", "2024", "1", "9"),
        ];

        let rollups = group_by_season(&results);
        let seasons: Vec<_> = rollups.iter().map(|s| s.season.as_str()).collect();
        assert_eq!(seasons, vec!["2024", "2023", "pre-season"]);
    }

    #[test]
    fn test_season_team_defaults_to_unknown() {
        let mut record = create_test_result("hulkenberg", "2020", "1", "7");
        record.constructor_name = String::new();

        let rollups = group_by_season(std::iter::once(&record));
        assert_eq!(rollups[0].team, "Unknown");
    }

    #[test]
    fn test_career_span() {
        let results = vec![
            create_test_result("russell", "2019", "1", "16"),
            create_test_result("russell", "2024", "22", "3"),
        ];

        let stats = calculate_driver_stats_at(&results, "russell", 2026);

        assert_eq!(stats.career_span.first_race, "Race 1");
        assert_eq!(stats.career_span.last_race, "Race 22");
        assert_eq!(stats.career_span.years_active, 7);
    }

    #[test]
    fn test_current_team_and_name() {
        let mut first = create_test_result("hamilton", "2024", "1", "2");
        first.constructor_name = "Mercedes".to_string();
        let mut last = create_test_result("hamilton", "2025", "1", "1");
        last.constructor_name = "Ferrari".to_string();
        last.driver_name = Some("Lewis Hamilton".to_string());

        let stats = calculate_driver_stats(&[first, last], "hamilton");

        assert_eq!(stats.current_team.as_deref(), Some("Ferrari"));
        assert_eq!(stats.display_name(), "Lewis Hamilton");
    }

    #[test]
    fn test_stats_are_deterministic() {
        let results = vec![
            create_test_result("tsunoda", "2023", "1", "10"),
            create_test_result("tsunoda", "2024", "1", "R"),
            create_test_result("tsunoda", "2022", "1", "4"),
        ];

        let first = calculate_driver_stats_at(&results, "tsunoda", 2026);
        let second = calculate_driver_stats_at(&results, "tsunoda", 2026);
        assert_eq!(first, second);
    }

    #[test]
    fn test_h2h_skips_unpaired_races() {
        let driver = vec![create_test_result("a", "2024", "3", "1")];
        let teammate = vec![create_test_result("b", "2024", "4", "2")];

        let h2h = calculate_h2h_record(&driver, &teammate);
        assert_eq!(h2h, HeadToHeadRecord::default());
    }

    #[test]
    fn test_h2h_lower_position_wins() {
        let a = vec![create_test_result("a", "2024", "3", "1")];
        let b = vec![create_test_result("b", "2024", "3", "2")];

        let from_a = calculate_h2h_record(&a, &b);
        assert_eq!((from_a.wins, from_a.losses, from_a.draws), (1, 0, 0));

        let from_b = calculate_h2h_record(&b, &a);
        assert_eq!((from_b.wins, from_b.losses, from_b.draws), (0, 1, 0));
        assert_eq!(from_b, from_a.inverse());
    }

    #[test]
    fn test_h2h_draws_and_unclassified() {
        let a = vec![
            create_test_result("a", "2024", "1", "R"),
            create_test_result("a", "2024", "2", "W"),
            create_test_result("a", "2024", "3", "R"),
        ];
        let b = vec![
            create_test_result("b", "2024", "1", "D"),
            create_test_result("b", "2024", "2", "12"),
            create_test_result("b", "2024", "3", "R"),
        ];

        let h2h = calculate_h2h_record(&a, &b);
        assert_eq!(h2h.wins, 0);
        assert_eq!(h2h.losses, 1);
        assert_eq!(h2h.draws, 2);
    }

    #[test]
    fn test_h2h_last_record_per_side_wins() {
        let a = vec![
            create_test_result("a", "2024", "1", "9"),
            create_test_result("a", "2024", "1", "2"),
        ];
        let b = vec![create_test_result("b", "2024", "1", "5")];

        let h2h = calculate_h2h_record(&a, &b);
        assert_eq!((h2h.wins, h2h.losses, h2h.draws), (1, 0, 0));
    }

    #[test]
    fn test_h2h_same_round_different_season_not_paired() {
        let a = vec![create_test_result("a", "2023", "1", "1")];
        let b = vec![create_test_result("b", "2024", "1", "2")];

        assert_eq!(calculate_h2h_record(&a, &b).total(), 0);
    }

    #[test]
    fn test_compare_drivers_clear_advantage() {
        let d1 = season_of("verstappen", 10, 5);
        let d2 = season_of("perez", 10, 4);

        let comparison = compare_drivers(&d1, &d2);

        assert_eq!(comparison.driver1.driver_id, "verstappen");
        assert_eq!(comparison.driver1.win_rate, 50.0);
        assert_eq!(comparison.driver2.win_rate, 40.0);
        assert_eq!(comparison.advantage, Advantage::Driver1);

        let reversed = compare_drivers(&d2, &d1);
        assert_eq!(reversed.advantage, Advantage::Driver2);
    }

    #[test]
    fn test_compare_drivers_close_is_even() {
        let d1 = season_of("piastri", 50, 21);
        let d2 = season_of("norris", 50, 20);

        let comparison = compare_drivers(&d1, &d2);
        assert!((comparison.driver1.win_rate - 42.0).abs() < 1e-9);
        assert!((comparison.driver2.win_rate - 40.0).abs() < 1e-9);
        assert_eq!(comparison.advantage, Advantage::Even);
    }

    #[test]
    fn test_compare_drivers_empty_side() {
        let d1 = season_of("alonso", 4, 1);
        let comparison = compare_drivers(&d1, &[]);

        assert_eq!(comparison.driver2.driver_id, "");
        assert_eq!(comparison.driver2.win_rate, 0.0);
        assert_eq!(comparison.driver2.wins, 0);
        assert_eq!(comparison.advantage, Advantage::Driver1);
    }

    #[test]
    fn test_advantage_threshold_is_strict() {
        assert_eq!(advantage_between(45.0, 40.0), Advantage::Even);
        assert_eq!(advantage_between(45.1, 40.0), Advantage::Driver1);
        assert_eq!(advantage_between(40.0, 45.0), Advantage::Even);
        assert_eq!(advantage_between(0.0, 0.0), Advantage::Even);
    }

    #[test]
    fn test_consistency_score() {
        let results = vec![
            create_test_result("x", "2024", "1", "2"),
            create_test_result("x", "2024", "2", "4"),
            create_test_result("x", "2024", "3", "R"),
        ];
        assert_eq!(consistency_score(&results), 1.0);
        assert_eq!(consistency_score(&[]), 0.0);
    }

    #[test]
    fn test_recent_form_and_momentum() {
        let results: Vec<_> = ["10", "10", "10", "2", "4"]
            .iter()
            .enumerate()
            .map(|(i, p)| create_test_result("x", "2024", &i.to_string(), p))
            .collect();

        assert_eq!(recent_form(&results, 2), 3.0);
        assert_eq!(recent_form(&results, 50), 7.2);
        assert_eq!(recent_form(&results, 0), 0.0);
        assert!((momentum(&results, 2) - (3.0 - 7.2)).abs() < 1e-9);
    }

    #[test]
    fn test_momentum_without_recent_classified_finish() {
        let results: Vec<_> = ["10", "10", "R", "R"]
            .iter()
            .enumerate()
            .map(|(i, p)| create_test_result("x", "2024", &i.to_string(), p))
            .collect();

        assert_eq!(recent_form(&results, 2), 0.0);
        assert_eq!(momentum(&results, 2), 0.0);
        assert_eq!(momentum(&results, 4), 0.0);
    }

    #[test]
    fn test_poles_and_fastest_laps() {
        let mut results = vec![
            create_test_result("norris", "2023", "1", "2"),
            create_test_result("norris", "2024", "1", "1"),
            create_test_result("norris", "2024", "2", "3"),
        ];
        results[0].fastest_lap_rank = Some("1".to_string());
        results[1].qualifying_position = Some("1".to_string());
        results[1].fastest_lap_rank = Some("1".to_string());
        results[2].qualifying_position = Some("2".to_string());
        results[2].fastest_lap_rank = Some("4".to_string());

        let stats = calculate_driver_stats(&results, "norris");

        assert_eq!(stats.total_poles, 1);
        assert_eq!(stats.total_fastest_laps, 2);
        assert_eq!(stats.season_results[0].season, "2024");
        assert_eq!(stats.season_results[0].poles, 1);
        assert_eq!(stats.season_results[0].fastest_laps, 1);
        assert_eq!(stats.season_results[1].poles, 0);
        assert_eq!(stats.season_results[1].fastest_laps, 1);
    }

    #[test]
    fn test_position_change_and_efficiency() {
        assert_eq!(position_change(3, 10), 7);
        assert_eq!(position_change(10, 3), -7);
        assert_eq!(points_efficiency(50.0, 100.0), 50.0);
        assert_eq!(points_efficiency(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_form_summary() {
        let mut first = with_points(create_test_result("x", "2024", "1", "2"), "18");
        first.grid = Some("6".to_string());
        let mut second = with_points(create_test_result("x", "2024", "2", "8"), "4");
        second.grid = Some("4".to_string());
        let mut third = create_test_result("x", "2024", "3", "R");
        third.grid = Some("1".to_string());

        let form = form_summary(&[first, second, third], 5, 25.0);

        assert_eq!(form.window, 5);
        assert_eq!(form.positions_gained, 0.0);
        assert_eq!(form.recent_form, 5.0);
        assert_eq!(form.momentum, 0.0);
        assert!((form.points_efficiency - 22.0 / 75.0 * 100.0).abs() < 1e-9);

        let empty = form_summary(&[], 5, 25.0);
        assert_eq!(empty, FormSummary { window: 5, ..Default::default() });
    }
}
