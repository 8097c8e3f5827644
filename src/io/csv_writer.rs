use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;

use crate::locations::LocationTable;
use crate::table::TimeSeriesTable;

pub const TIME_SERIES_HEADER: &str =
    "timestamp,location_id,city_name,observed,predicted_net,predicted_ambient,fire_specific";

/// Overwrites the time series CSV; the table is fully regenerated each
/// run, never appended to.
pub fn write_time_series_csv(path: &Path, table: &TimeSeriesTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "{}", TIME_SERIES_HEADER)?;
    for row in &table.rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{}",
            format_timestamp(row.timestamp)?,
            row.location_id,
            escape_field(&row.city_name),
            row.observed,
            row.predicted_net,
            row.predicted_ambient,
            row.fire_specific
        )?;
    }
    w.flush()?;
    Ok(())
}

/// Dropdown label/value pairs for the charting layer.
pub fn write_locations_csv(path: &Path, locations: &LocationTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "label,value")?;
    for (index, name) in locations.sorted_entries() {
        writeln!(w, "{},{}", escape_field(name), index)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_location_map_csv(path: &Path, locations: &LocationTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "location_id,city_name")?;
    for (index, name) in locations.sorted_entries() {
        writeln!(w, "{},{}", index, escape_field(name))?;
    }
    w.flush()?;
    Ok(())
}

pub fn format_timestamp(secs: i64) -> Result<String> {
    let dt = DateTime::from_timestamp(secs, 0)
        .with_context(|| format!("timestamp {} out of range", secs))?;
    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
