use anyhow::{Result, bail};

use crate::locations::LocationTable;
use crate::reshape::AlignedSet;

/// One output record per (timestamp, location). Timestamps are Unix
/// seconds; formatting happens at the CSV boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRow {
    pub timestamp: i64,
    pub location_id: usize,
    pub city_name: String,
    pub observed: f32,
    pub predicted_net: f32,
    pub predicted_ambient: f32,
    pub fire_specific: f32,
}

#[derive(Debug, Clone, Default)]
pub struct TimeSeriesTable {
    pub rows: Vec<TimeSeriesRow>,
}

impl TimeSeriesTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Long-format assembly: one contiguous block of rows per location, in
/// ascending location-index order. Every row of a forecast window
/// carries the window timestamp, not a per-step time.
pub fn assemble(aligned: &AlignedSet, locations: &LocationTable) -> Result<TimeSeriesTable> {
    let rows_per_location = aligned.observed.rows();
    for (name, matrix) in [
        ("predicted_net", &aligned.predicted_net),
        ("predicted_ambient", &aligned.predicted_ambient),
    ] {
        if matrix.rows() != rows_per_location || matrix.cols() != aligned.observed.cols() {
            bail!(
                "{} shape {}x{} does not match observed {}x{}",
                name,
                matrix.rows(),
                matrix.cols(),
                rows_per_location,
                aligned.observed.cols()
            );
        }
    }
    if aligned.observed.cols() != aligned.locations {
        bail!(
            "location count mismatch: matrices carry {} columns, expected {}",
            aligned.observed.cols(),
            aligned.locations
        );
    }
    if aligned.timestamps.len() != rows_per_location {
        bail!(
            "time axis length {} does not match {} rows",
            aligned.timestamps.len(),
            rows_per_location
        );
    }

    let mut rows = Vec::with_capacity(rows_per_location * aligned.locations);
    for location_id in 0..aligned.locations {
        let city_name = locations.name(location_id);
        for row in 0..rows_per_location {
            rows.push(TimeSeriesRow {
                timestamp: aligned.timestamps[row],
                location_id,
                city_name: city_name.to_string(),
                observed: aligned.observed.at(row, location_id),
                predicted_net: aligned.predicted_net.at(row, location_id),
                predicted_ambient: aligned.predicted_ambient.at(row, location_id),
                fire_specific: 0.0,
            });
        }
    }

    let mut table = TimeSeriesTable { rows };
    derive_fire_specific(&mut table);
    Ok(table)
}

/// `fire_specific` is always recomputed from the two predicted series,
/// never stored independently.
pub fn derive_fire_specific(table: &mut TimeSeriesTable) {
    for row in &mut table.rows {
        row.fire_specific = row.predicted_net - row.predicted_ambient;
    }
}
