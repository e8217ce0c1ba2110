// Entry point: reads the object ntuple and writes radius residual histograms.
use std::error::Error;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use t5_radius::analysis::make_radius_difference_distributions;
use t5_radius::cli::Args;
use t5_radius::ntuple::{RootNtuple, T5Collection};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = args.resolve_config();
    debug!(?cfg, "resolved config");

    let ntuple = RootNtuple::open(&args.input, &cfg.input.tree)?;
    debug!(
        branches = ?ntuple.branch_names(&cfg.input.prefix),
        "{} branches",
        cfg.input.prefix
    );
    let collection = T5Collection::load(&ntuple, &cfg.input.prefix)?;
    drop(ntuple);
    info!("loaded {} {} objects", collection.len(), cfg.input.prefix);

    let ctx = args.plot_context(&cfg);
    let summary = make_radius_difference_distributions(&collection, &cfg, &ctx)?;

    println!(
        "Saved {} plots ({} skipped) to {}",
        summary.written.len(),
        summary.skipped,
        ctx.out_dir
            .as_deref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| ".".to_string())
    );
    Ok(())
}
