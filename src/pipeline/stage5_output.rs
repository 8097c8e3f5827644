use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::{csv_writer, json_writer};
use crate::pipeline::Stage;

pub struct Stage5Output;

impl Stage5Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Output {
    fn name(&self) -> &'static str {
        "stage5_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let table = ctx.table.as_ref().context("time series table missing")?;
        let csv_path = ctx.output.csv_path.clone();
        ctx.report.output.csv_path = Some(csv_path.display().to_string());

        // The final persist is the one soft failure in the pipeline:
        // upstream errors abort the run, a failed write here is
        // reported and the run still completes.
        match csv_writer::write_time_series_csv(&csv_path, table) {
            Ok(()) => {
                ctx.report.output.persisted = true;
                ctx.report.output.rows_written = Some(table.len() as u64);
                info!(
                    csv = %csv_path.display(),
                    rows = table.len(),
                    "time_series_persisted"
                );
            }
            Err(err) => {
                warn!(
                    csv = %csv_path.display(),
                    error = %format!("{err:#}"),
                    "failed to persist time series CSV"
                );
                ctx.warnings
                    .push(format!("failed to write {}: {err:#}", csv_path.display()));
                ctx.report.output.persisted = false;
                ctx.report.output.persist_error = Some(format!("{err:#}"));
            }
        }

        if ctx.write_json {
            if let Err(err) = json_writer::write_report(&ctx.output.json_path, ctx) {
                warn!(error = %format!("{err:#}"), "failed to write run report");
                ctx.warnings.push(format!(
                    "failed to write {}: {err:#}",
                    ctx.output.json_path.display()
                ));
            }
        }

        Ok(())
    }
}
