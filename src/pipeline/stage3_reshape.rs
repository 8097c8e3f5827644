use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::reshape::{self, AlignedSet};

pub struct Stage3Reshape;

impl Stage3Reshape {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Reshape {
    fn name(&self) -> &'static str {
        "stage3_reshape"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // Raw tensors are consumed here; only the 2-D views live on.
        let predict_net = ctx
            .predict_net
            .take()
            .context("predicted-net tensor missing")?;
        let predict_ambient = ctx
            .predict_ambient
            .take()
            .context("predicted-ambient tensor missing")?;
        let label = ctx.label.take().context("label tensor missing")?;
        let time = ctx.time.take().context("time axis missing")?;

        let mut reshaped = reshape::align_and_reshape(
            &[&predict_net, &predict_ambient, &label],
            &time,
            ctx.pred_len,
        )?;
        let observed = reshaped
            .matrices
            .pop()
            .context("missing reshaped label matrix")?;
        let predicted_ambient = reshaped
            .matrices
            .pop()
            .context("missing reshaped ambient matrix")?;
        let predicted_net = reshaped
            .matrices
            .pop()
            .context("missing reshaped net matrix")?;

        let aligned = AlignedSet {
            observed,
            predicted_net,
            predicted_ambient,
            timestamps: reshaped.timestamps,
            min_len: reshaped.min_len,
            locations: reshaped.locations,
        };
        info!(
            min_len = aligned.min_len,
            locations = aligned.locations,
            rows_per_location = aligned.observed.rows(),
            "arrays_aligned"
        );

        ctx.report.alignment.min_len = Some(aligned.min_len as u64);
        ctx.report.alignment.locations = Some(aligned.locations as u64);
        ctx.report.alignment.rows_per_location = Some(aligned.observed.rows() as u64);
        ctx.aligned = Some(aligned);
        Ok(())
    }
}
