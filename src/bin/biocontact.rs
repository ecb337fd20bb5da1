use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod commands;

use commands::DataParameters;
use commands::{interfaces, map, neighbours};

#[derive(Parser, Debug)]
#[command(
    name = "biocontact",
    about = "Maps protein residues onto 3D structures and reports their structural and interface neighbours.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// FASTA file with the protein sequences.
    #[arg(long, value_name = "FASTA", global = true, default_value = "proteins.fasta")]
    sequences: PathBuf,
    /// Two-column table mapping protein identifiers to catalog accessions.
    #[arg(long, value_name = "TSV", global = true)]
    identifiers: Option<PathBuf>,
    /// Catalog of single-protein structures and models.
    #[arg(long, value_name = "TSV", global = true)]
    proteins_catalog: Option<PathBuf>,
    /// Catalog of interaction co-structures.
    #[arg(long, value_name = "TSV", global = true)]
    interactions_catalog: Option<PathBuf>,
    /// Directory holding the structure files named by the catalogs.
    #[arg(long, value_name = "DIR", global = true, default_value = ".")]
    structures: PathBuf,
    /// TOML file with resolver settings.
    #[arg(long, value_name = "TOML", global = true)]
    config: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    /// Number of worker threads (defaults to one per core).
    #[arg(long, value_name = "N", global = true)]
    threads: Option<usize>,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find residues close to the given positions within the protein's own structures.
    Neighbours(neighbours::NeighboursArgs),
    /// Find partner residues close to the given positions across interaction interfaces.
    Interfaces(interfaces::InterfacesArgs),
    /// Show where every residue of a protein lands in one structure.
    Map(map::MapArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);
    commands::configure_threads(cli.threads)?;

    let params = DataParameters {
        sequences: cli.sequences.clone(),
        identifiers: cli.identifiers.clone(),
        proteins_catalog: cli.proteins_catalog.clone(),
        interactions_catalog: cli.interactions_catalog.clone(),
        structures: cli.structures.clone(),
        config: cli.config.clone(),
        output: cli.output.clone(),
    };
    let config = commands::load_config(&params)?;
    let resolver = commands::build_resolver(&params, config)?;

    match cli.command {
        Command::Neighbours(args) => neighbours::run(&resolver, &params, &args)?,
        Command::Interfaces(args) => interfaces::run(&resolver, &params, &args)?,
        Command::Map(args) => map::run(&resolver, &params, &args)?,
    }

    Ok(())
}
