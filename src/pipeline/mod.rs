use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::mem;

pub mod stage0_scaffold;
pub mod stage1_locations;
pub mod stage2_fetch;
pub mod stage3_reshape;
pub mod stage4_table;
pub mod stage5_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            match mem::rss_mb() {
                Some(rss_mb) => info!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    rss_mb,
                    "stage finished"
                ),
                None => info!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage finished"
                ),
            }
        }
        Ok(())
    }
}
