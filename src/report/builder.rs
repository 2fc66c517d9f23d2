//! Assembles a [`Report`] from raw result records.

use crate::analysis::{calculate_driver_stats, calculate_h2h_record, compare_drivers, form_summary};
use crate::config::Config;
use crate::models::{ComparisonReport, DriverReport, RaceResultRecord, Report, ReportMetadata};
use tracing::debug;

/// Build the report for one driver, or two when a comparison is requested.
///
/// `records` may hold results for any number of drivers; each requested
/// driver only sees their own.
pub fn build_report(
    records: &[RaceResultRecord],
    driver_ids: &[&str],
    config: &Config,
    metadata: ReportMetadata,
) -> Report {
    let per_driver: Vec<Vec<RaceResultRecord>> = driver_ids
        .iter()
        .map(|id| {
            records
                .iter()
                .filter(|r| r.driver_id == *id)
                .cloned()
                .collect()
        })
        .collect();

    let drivers = driver_ids
        .iter()
        .zip(&per_driver)
        .map(|(id, own)| {
            debug!("Building report section for {} ({} results)", id, own.len());
            DriverReport {
                stats: calculate_driver_stats(records, id),
                form: form_summary(
                    own,
                    config.general.recent_races,
                    config.report.max_points_per_race,
                ),
            }
        })
        .collect();

    let comparison = match per_driver.as_slice() {
        [first, second] => Some(ComparisonReport {
            comparison: compare_drivers(first, second),
            head_to_head: calculate_h2h_record(first, second),
        }),
        _ => None,
    };

    Report {
        metadata,
        drivers,
        comparison,
    }
}
