use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::schema::v1::TensorMeta;
use crate::tensor::Tensor;

pub struct Stage2Fetch;

impl Stage2Fetch {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Fetch {
    fn name(&self) -> &'static str {
        "stage2_fetch"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let key = ctx.keys.predict_net.clone();
        ctx.predict_net = Some(fetch_tensor(ctx, &key)?);

        let key = ctx.keys.predict_ambient.clone();
        ctx.predict_ambient = Some(fetch_tensor(ctx, &key)?);

        let key = ctx.keys.label.clone();
        ctx.label = Some(fetch_tensor(ctx, &key)?);

        let key = ctx.keys.time.clone();
        let array = ctx
            .store
            .fetch_npy(&key)
            .with_context(|| format!("failed to fetch {} from {}", key, ctx.store.describe()))?;
        info!(key = %key, shape = ?array.shape, "time_axis_fetched");
        ctx.report.input_meta.time_steps = Some(array.len() as u64);
        ctx.time = Some(array.into_timestamps()?);

        Ok(())
    }
}

fn fetch_tensor(ctx: &mut Ctx, key: &str) -> Result<Tensor> {
    let array = ctx
        .store
        .fetch_npy(key)
        .with_context(|| format!("failed to fetch {} from {}", key, ctx.store.describe()))?;
    info!(key = %key, shape = ?array.shape, "tensor_fetched");
    ctx.report.input_meta.tensors.push(TensorMeta {
        key: key.to_string(),
        shape: array.shape.clone(),
    });
    array.into_tensor()
}
