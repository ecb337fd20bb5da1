use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bio_contact::Resolver;
use bio_contact::io::report::write_neighbours;
use bio_contact::ops::resolve_neighbours;

use crate::commands::{DataParameters, batch_progress, load_queries, report_summary, write_output};

/// Resolves structural neighbours of protein positions.
#[derive(Debug, Default, Args)]
pub struct NeighboursArgs {
    /// Residue file (`PROTEIN<TAB>positions` or `PROTEIN:A123B`). When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE")]
    pub residues: Option<PathBuf>,
    /// Report nothing instead of sequence neighbours when no structure helps.
    #[arg(long)]
    pub only_structural: bool,
}

pub fn run(resolver: &Resolver, params: &DataParameters, args: &NeighboursArgs) -> Result<()> {
    let queries = load_queries(args.residues.as_deref())?;
    let only_structural = args.only_structural || resolver.config().only_structural;

    let progress = batch_progress(queries.len(), "Resolving neighbours");
    let report = resolve_neighbours(resolver, &queries, only_structural, || progress.inc(1));
    progress.finish_and_clear();

    write_output(params.output.as_deref(), |writer| {
        write_neighbours(writer, &report.rows).context("Failed to write neighbour table")
    })?;
    report_summary(&report.summary, &report.failures);
    Ok(())
}
