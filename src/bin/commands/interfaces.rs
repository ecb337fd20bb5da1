use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bio_contact::Resolver;
use bio_contact::io::report::write_interfaces;
use bio_contact::ops::resolve_interfaces;

use crate::commands::{DataParameters, batch_progress, load_queries, report_summary, write_output};

/// Resolves partner residues across catalogued interaction interfaces.
#[derive(Debug, Default, Args)]
pub struct InterfacesArgs {
    /// Residue file (`PROTEIN<TAB>positions` or `PROTEIN:A123B`). When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE")]
    pub residues: Option<PathBuf>,
}

pub fn run(resolver: &Resolver, params: &DataParameters, args: &InterfacesArgs) -> Result<()> {
    let queries = load_queries(args.residues.as_deref())?;

    let progress = batch_progress(queries.len(), "Resolving interfaces");
    let report = resolve_interfaces(resolver, &queries, || progress.inc(1));
    progress.finish_and_clear();

    write_output(params.output.as_deref(), |writer| {
        write_interfaces(writer, &report.rows).context("Failed to write interface table")
    })?;
    report_summary(&report.summary, &report.failures);
    Ok(())
}
