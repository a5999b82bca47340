//! Command-line entry point for the circle packer.
//!
//! `pack` merges funder and user files, packs them (or reuses the cached
//! packing) and prints the layout as JSON on stdout. `generate` writes
//! random input files. Logs go to stderr.

mod generate;
mod pack;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "circle-pack",
    version,
    about = "Renders names and values into a deterministically packed structure of circles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log only warnings and errors, and hide the progress bar
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge funders and users, pack them and emit the layout
    Pack(pack::PackArgs),
    /// Write random funders.json and users.json files
    Generate(generate::GenerateArgs),
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Commands::Pack(args) => pack::run(args, cli.quiet),
        Commands::Generate(args) => generate::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pack_arguments_parse() {
        let cli = Cli::try_parse_from([
            "circle-pack",
            "pack",
            "f.json",
            "u.json",
            "--no-cache",
            "--grid-cell",
            "16",
            "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        let Commands::Pack(args) = cli.command else {
            panic!("expected pack");
        };
        assert!(args.no_cache);
        assert_eq!(args.grid_cell, 16.0);
        assert_eq!(args.cache.to_str(), Some("circles.json"));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["circle-pack", "-v", "-q", "generate", "out"]).is_err());
    }
}
