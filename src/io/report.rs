//! Tab-separated result tables.
//!
//! One row per `(protein, query position)` for neighbour results and one row per
//! `(protein, query position, partner, structure)` for interface results. Residue lists are
//! joined with `;`.

use crate::io::error::Error;
use std::io::Write;

/// Neighbours of one query position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourRow {
    pub protein: String,
    pub position: usize,
    /// Structure that produced the neighbours; `None` for the sequence-adjacency fallback.
    pub structure: Option<String>,
    pub neighbours: Vec<usize>,
}

/// Partner residues near one query position in one interaction structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRow {
    pub protein: String,
    pub position: usize,
    pub partner: String,
    pub structure: String,
    pub partner_residues: Vec<usize>,
}

const NEIGHBOUR_HEADER: &str = "#Protein\tPosition\tStructure\tNeighbours";
const INTERFACE_HEADER: &str = "#Protein\tPosition\tPartner\tStructure\tPartner residues";

/// Placeholder written in the structure column for sequence-adjacency rows.
pub const ADJACENT_STRUCTURE: &str = "-";

pub fn write_neighbours<W: Write + ?Sized>(writer: &mut W, rows: &[NeighbourRow]) -> Result<(), Error> {
    writeln!(writer, "{}", NEIGHBOUR_HEADER).map_err(|e| Error::from_io(e, None))?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            row.protein,
            row.position,
            row.structure.as_deref().unwrap_or(ADJACENT_STRUCTURE),
            join(&row.neighbours)
        )
        .map_err(|e| Error::from_io(e, None))?;
    }
    Ok(())
}

pub fn write_interfaces<W: Write + ?Sized>(writer: &mut W, rows: &[InterfaceRow]) -> Result<(), Error> {
    writeln!(writer, "{}", INTERFACE_HEADER).map_err(|e| Error::from_io(e, None))?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            row.protein,
            row.position,
            row.partner,
            row.structure,
            join(&row.partner_residues)
        )
        .map_err(|e| Error::from_io(e, None))?;
    }
    Ok(())
}

fn join(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_neighbours_marks_fallback_rows() {
        let rows = vec![
            NeighbourRow {
                protein: "ENSP1".into(),
                position: 4,
                structure: Some("P1-EXP-1abc.pdb".into()),
                neighbours: vec![3, 5, 60],
            },
            NeighbourRow {
                protein: "ENSP2".into(),
                position: 1,
                structure: None,
                neighbours: vec![2],
            },
        ];

        let mut out = Vec::new();
        write_neighbours(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#Protein\tPosition\tStructure\tNeighbours\n\
             ENSP1\t4\tP1-EXP-1abc.pdb\t3;5;60\n\
             ENSP2\t1\t-\t2\n"
        );
    }

    #[test]
    fn write_interfaces_emits_one_line_per_row() {
        let rows = vec![InterfaceRow {
            protein: "ENSP1".into(),
            position: 10,
            partner: "P2".into(),
            structure: "P1-P2-EXP.pdb".into(),
            partner_residues: vec![33, 34],
        }];

        let mut out = Vec::new();
        write_interfaces(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("ENSP1\t10\tP2\tP1-P2-EXP.pdb\t33;34\n"));
    }
}
