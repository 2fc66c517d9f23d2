//! Results data sources.
//!
//! Records come either from the Jolpica results API or from a saved JSON
//! file in the same format.

pub mod error;
pub mod jolpica;
pub mod responses;

pub use jolpica::{ClientConfig, JolpicaClient};

use crate::models::RaceResultRecord;
use anyhow::{Context, Result};
use responses::QualifyingRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Load result records from a JSON file on disk.
pub async fn load_results_file(path: &Path) -> Result<Vec<RaceResultRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;

    let records = responses::parse_results_json(&content)
        .with_context(|| format!("Failed to parse results file: {}", path.display()))?;

    info!("Loaded {} results from {}", records.len(), path.display());
    Ok(records)
}

/// Copy qualifying positions onto the race results they belong to,
/// matched on driver, season and round. Returns the number of results
/// that received a position.
pub fn attach_qualifying(
    records: &mut [RaceResultRecord],
    qualifying: Vec<QualifyingRecord>,
) -> usize {
    let positions: HashMap<(String, String, String), String> = qualifying
        .into_iter()
        .filter_map(|q| {
            let season = q.season?.trim().to_string();
            let round = q.round?.trim().to_string();
            if season.is_empty() || round.is_empty() {
                return None;
            }
            Some(((q.driver_id, season, round), q.position))
        })
        .collect();

    let mut matched = 0;
    for record in records.iter_mut() {
        let (Some(season), Some(round)) = (record.season_label(), record.round_label()) else {
            continue;
        };

        let key = (
            record.driver_id.clone(),
            season.to_string(),
            round.to_string(),
        );
        if let Some(position) = positions.get(&key) {
            record.qualifying_position = Some(position.clone());
            matched += 1;
        }
    }

    matched
}
