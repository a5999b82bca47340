use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pack_core::{
    Circle, Config, PackError, cache,
    config::{EPSILON, GRID_CELL, MAX_GRID_CELLS},
    dataset,
    layout::Layout,
};
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

#[derive(Args, Debug)]
pub struct PackArgs {
    /// JSON list of [name, amount] funder pairs
    pub funders: PathBuf,

    /// JSON list of [name, amount, target, description] user rows
    pub users: PathBuf,

    /// Packing cache; reused verbatim when present
    #[arg(long, default_value = "circles.json")]
    pub cache: PathBuf,

    /// Repack and leave the cache untouched
    #[arg(long)]
    pub no_cache: bool,

    /// Write the layout here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Side length of a spatial grid bucket; raise it for very large amounts
    #[arg(long, default_value_t = GRID_CELL)]
    pub grid_cell: f64,

    /// Largest spatial grid extent, in cells per side
    #[arg(long, default_value_t = MAX_GRID_CELLS)]
    pub max_grid_cells: usize,

    /// Numeric tolerance for ties and collisions
    #[arg(long, default_value_t = EPSILON)]
    pub epsilon: f64,
}

pub fn run(args: PackArgs, quiet: bool) -> Result<()> {
    let cfg = Config {
        grid_cell: args.grid_cell,
        max_grid_cells: args.max_grid_cells,
        epsilon: args.epsilon,
        ..Config::default()
    };
    cfg.validate()?;

    let funders = dataset::read_funders(&args.funders)?;
    let users = dataset::read_users(&args.users)?;
    let entries = dataset::merge(&funders, &users, cfg.noise_floor);
    log::info!(
        "{} entries from {} funders and {} users",
        entries.len(),
        funders.len(),
        users.len()
    );

    let amounts: Vec<f64> = entries.iter().map(|e| e.amount).collect();
    let circles = if args.no_cache {
        pack_with_progress(&amounts, &cfg, quiet)?
    } else {
        cache::load_or_else(&args.cache, amounts.len(), || {
            pack_with_progress(&amounts, &cfg, quiet)
        })?
    };

    let layout = Layout::new(&circles, &entries);
    match &args.output {
        Some(path) => {
            let text = serde_json::to_string_pretty(&layout)?;
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote layout to {}", path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &layout)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Runs the placement loop behind a progress bar.
fn pack_with_progress(amounts: &[f64], cfg: &Config, quiet: bool) -> Result<Vec<Circle>, PackError> {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(amounts.len().saturating_sub(2) as u64)
    };
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} circles [{elapsed}]") {
        bar.set_style(style);
    }

    let circles = pack_core::pack_with(amounts, cfg, |_| bar.inc(1));
    bar.finish_and_clear();
    circles
}
