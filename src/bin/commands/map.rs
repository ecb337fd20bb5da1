use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use bio_contact::{Resolver, StructurePosition, StructureRef};

use crate::commands::{DataParameters, interactive_stdout_requested, run_with_spinner, write_output};

/// Prints where every residue of a protein lands in one structure.
#[derive(Debug, Default, Args)]
pub struct MapArgs {
    /// Protein identifier, as found in the sequence file.
    #[arg(short, long, value_name = "ID")]
    pub protein: String,
    /// Structure file name, relative to the structure directory.
    #[arg(short, long, value_name = "FILE")]
    pub structure: String,
}

pub fn run(resolver: &Resolver, params: &DataParameters, args: &MapArgs) -> Result<()> {
    let sequence = resolver.protein_sequence(&args.protein)?;
    let structure = StructureRef::new(args.structure.as_str());

    let map = run_with_spinner("Aligning protein to structure", || {
        resolver
            .alignments()
            .pdb_alignment_map(&sequence, &structure)
            .with_context(|| format!("Failed to map {} onto {}", args.protein, structure))
    })?;
    let residues: Vec<char> = sequence.chars().collect();
    let rows: Vec<(usize, char, String)> = map
        .iter()
        .map(|(&position, targets)| {
            let residue = residues.get(position - 1).copied().unwrap_or('?');
            (position, residue, join(targets))
        })
        .collect();
    log::info!(
        "{}: {} of {} positions mapped onto {}",
        args.protein,
        rows.len(),
        residues.len(),
        structure
    );

    if interactive_stdout_requested(params) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Position", "Residue", "Structure positions"]);
        for (position, residue, targets) in &rows {
            table.add_row(row![position, residue, targets]);
        }
        let mut stdout = std::io::stdout().lock();
        table
            .print(&mut stdout)
            .context("Failed to render alignment map")?;
        return Ok(());
    }

    write_output(params.output.as_deref(), |writer| {
        writeln!(writer, "#Position\tResidue\tStructure positions")?;
        for (position, residue, targets) in &rows {
            writeln!(writer, "{}\t{}\t{}", position, residue, targets)?;
        }
        Ok(())
    })
}

fn join(positions: &[StructurePosition]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}
