use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::table;

pub struct Stage4Table;

impl Stage4Table {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Table {
    fn name(&self) -> &'static str {
        "stage4_table"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let aligned = ctx.aligned.as_ref().context("aligned arrays missing")?;
        let locations = ctx.locations.as_ref().context("location table missing")?;

        let table = table::assemble(aligned, locations)?;
        info!(rows = table.len(), "table_assembled");

        ctx.table = Some(table);
        Ok(())
    }
}
