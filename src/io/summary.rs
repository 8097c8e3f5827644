use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let table = ctx.table.as_ref().context("time series table missing")?;
    let aligned = ctx.aligned.as_ref().context("aligned arrays missing")?;

    let mut out = String::new();
    out.push_str(&format!("smoke-signals v{}\n", version));
    out.push_str(&format!("Source: {}\n", ctx.store.describe()));
    out.push_str(&format!(
        "Rows: {} ({} windows x {} steps x {} locations)\n",
        table.len(),
        aligned.min_len,
        ctx.pred_len,
        aligned.locations
    ));
    if ctx.report.output.persisted {
        out.push_str(&format!("Output: {}\n", ctx.output.csv_path.display()));
    } else {
        out.push_str("Output: not persisted (see warnings)\n");
    }
    Ok(out)
}
