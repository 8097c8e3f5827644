use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use smoke_signals::cli::{Cli, Commands, SourceArgs, StoreArg};
use smoke_signals::ctx::{BlobKeys, Ctx};
use smoke_signals::io;
use smoke_signals::pipeline::Pipeline;
use smoke_signals::pipeline::stage0_scaffold::Stage0Scaffold;
use smoke_signals::pipeline::stage1_locations::Stage1Locations;
use smoke_signals::pipeline::stage2_fetch::Stage2Fetch;
use smoke_signals::pipeline::stage3_reshape::Stage3Reshape;
use smoke_signals::pipeline::stage4_table::Stage4Table;
use smoke_signals::pipeline::stage5_output::Stage5Output;
use smoke_signals::store::gcs::GcsStore;
use smoke_signals::store::{DirStore, ObjectStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let mut ctx = build_ctx(&args.source, args.out, args.json)?;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Locations::new()),
                Box::new(Stage2Fetch::new()),
                Box::new(Stage3Reshape::new()),
                Box::new(Stage4Table::new()),
                Box::new(Stage5Output::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_summary(&ctx)?;
        }
        Commands::Validate(args) => {
            let mut ctx = build_ctx(&args.source, PathBuf::from("."), false)?;
            ctx.write_location_artifacts = false;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage1Locations::new()),
                Box::new(Stage2Fetch::new()),
                Box::new(Stage3Reshape::new()),
                Box::new(Stage4Table::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_validate_summary(&ctx);
        }
    }

    Ok(())
}

fn build_ctx(source: &SourceArgs, out_dir: PathBuf, write_json: bool) -> Result<Ctx> {
    let store = build_store(source)?;
    let keys = BlobKeys {
        predict_net: source.predict_net_key.clone(),
        predict_ambient: source.predict_ambient_key.clone(),
        label: source.label_key.clone(),
        time: source.time_key.clone(),
    };
    Ok(Ctx::new(
        store,
        source.bucket.clone(),
        keys,
        source.locations.clone(),
        out_dir,
        source.pred_len,
        write_json,
        env!("CARGO_PKG_VERSION"),
    ))
}

fn build_store(source: &SourceArgs) -> Result<Box<dyn ObjectStore>> {
    match source.store {
        StoreArg::Gcs => Ok(Box::new(GcsStore::new(&source.bucket))),
        StoreArg::Dir => {
            let root = source
                .store_root
                .as_ref()
                .context("--store dir requires --store-root")?;
            Ok(Box::new(DirStore::new(root.clone())))
        }
    }
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) {
    println!("smoke-signals validate ok");
    for tensor in &ctx.report.input_meta.tensors {
        println!("tensor {}: shape {:?}", tensor.key, tensor.shape);
    }
    if let Some(steps) = ctx.report.input_meta.time_steps {
        println!("time steps: {}", steps);
    }
    if let Some(min_len) = ctx.report.alignment.min_len {
        println!("min_len: {}", min_len);
    }
    if let Some(locations) = ctx.report.alignment.locations {
        println!("locations: {}", locations);
    }
    if let Some(table) = &ctx.table {
        println!("rows: {}", table.len());
    }
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
