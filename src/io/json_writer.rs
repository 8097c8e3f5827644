use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::schema::v1::RunReportV1;

/// Snapshot of the run report with the warning list folded in.
pub fn build_report(ctx: &Ctx) -> RunReportV1 {
    let mut report = ctx.report.clone();
    report.warnings = ctx.warnings.clone();
    report
}

pub fn write_report(path: &Path, ctx: &Ctx) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &build_report(ctx))?;
    Ok(())
}
