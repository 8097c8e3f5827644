use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::csv_writer;
use crate::pipeline::Stage;

pub struct Stage1Locations;

impl Stage1Locations {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Locations {
    fn name(&self) -> &'static str {
        "stage1_locations"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let table = ctx
            .location_cache
            .get_or_load(&ctx.locations_path)
            .with_context(|| {
                format!(
                    "failed to load location lookup {}",
                    ctx.locations_path.display()
                )
            })?
            .clone();
        info!(
            locations = table.len(),
            path = %ctx.locations_path.display(),
            "location_table_ready"
        );

        // Dropdown/lookup artifacts are best-effort: a failed write
        // warns and the run continues.
        if ctx.write_location_artifacts {
            if let Err(err) =
                csv_writer::write_locations_csv(&ctx.output.locations_csv_path, &table)
            {
                warn!(error = %format!("{err:#}"), "failed to write locations.csv");
                ctx.warnings.push(format!(
                    "failed to write {}: {err:#}",
                    ctx.output.locations_csv_path.display()
                ));
            }
            if let Err(err) =
                csv_writer::write_location_map_csv(&ctx.output.location_map_csv_path, &table)
            {
                warn!(error = %format!("{err:#}"), "failed to write location_map.csv");
                ctx.warnings.push(format!(
                    "failed to write {}: {err:#}",
                    ctx.output.location_map_csv_path.display()
                ));
            }
        }

        ctx.locations = Some(table);
        Ok(())
    }
}
