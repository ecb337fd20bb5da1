//! Readers for Interactome3D-style catalog tables.
//!
//! Both tables are tab-separated with a header line. Columns are located by name so extra or
//! reordered columns are tolerated:
//!
//! | Table        | Required columns                                  | Optional |
//! |--------------|---------------------------------------------------|----------|
//! | proteins     | `UNIPROT_AC`, `CHAIN`, `FILENAME`                 | `TYPE`   |
//! | interactions | `PROT1`, `PROT2`, `CHAIN1`, `CHAIN2`, `FILENAME`  | `TYPE`   |
//!
//! A row is experimental when its `TYPE` is `Structure` or, lacking that column, when the
//! file name carries the `EXP` tag.

use crate::io::error::Error;
use crate::io::table::{normalize_headers, read_rows, require_columns, tsv_reader};
use crate::model::candidate::{InteractionRecord, StructureCandidate};
use crate::model::types::StructureRef;
use serde::Deserialize;
use std::io::Read;

const FORMAT: &str = "catalog";

#[derive(Debug, Deserialize)]
struct StructureRow {
    #[serde(rename = "UNIPROT_AC")]
    accession: String,
    #[serde(rename = "CHAIN", default)]
    chain: String,
    #[serde(rename = "FILENAME")]
    filename: String,
    #[serde(rename = "TYPE", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(rename = "PROT1")]
    first: String,
    #[serde(rename = "PROT2")]
    second: String,
    #[serde(rename = "CHAIN1", default)]
    first_chain: String,
    #[serde(rename = "CHAIN2", default)]
    second_chain: String,
    #[serde(rename = "FILENAME")]
    filename: String,
    #[serde(rename = "TYPE", default)]
    kind: Option<String>,
}

/// Reads a proteins table into `(accession, candidate)` pairs, in file order.
pub fn read_structure_table<R: Read>(
    reader: R,
) -> Result<Vec<(String, StructureCandidate)>, Error> {
    let mut reader = tsv_reader(reader, true, false);
    if !normalize_headers(FORMAT, &mut reader)? {
        return Ok(Vec::new());
    }
    require_columns(FORMAT, &mut reader, &["UNIPROT_AC", "CHAIN", "FILENAME"])?;

    let rows: Vec<StructureRow> = read_rows(FORMAT, &mut reader)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let experimental = is_experimental(row.kind.as_deref(), &row.filename);
            (
                row.accession,
                StructureCandidate {
                    structure: StructureRef::new(row.filename),
                    chain: row.chain,
                    experimental,
                },
            )
        })
        .collect())
}

/// Reads an interactions table into raw records, in file order.
pub fn read_interaction_table<R: Read>(reader: R) -> Result<Vec<InteractionRecord>, Error> {
    let mut reader = tsv_reader(reader, true, false);
    if !normalize_headers(FORMAT, &mut reader)? {
        return Ok(Vec::new());
    }
    require_columns(
        FORMAT,
        &mut reader,
        &["PROT1", "PROT2", "CHAIN1", "CHAIN2", "FILENAME"],
    )?;

    let rows: Vec<InteractionRow> = read_rows(FORMAT, &mut reader)?;
    Ok(rows
        .into_iter()
        .map(|row| InteractionRecord {
            experimental: is_experimental(row.kind.as_deref(), &row.filename),
            first: row.first,
            second: row.second,
            first_chain: row.first_chain,
            second_chain: row.second_chain,
            structure: StructureRef::new(row.filename),
        })
        .collect())
}

fn is_experimental(kind: Option<&str>, filename: &str) -> bool {
    match kind {
        Some(kind) if !kind.is_empty() => {
            kind.eq_ignore_ascii_case("structure") || kind.eq_ignore_ascii_case("exp")
        }
        _ => filename.contains("EXP"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_structure_table_locates_columns_by_name() {
        let table = "UNIPROT_AC\tMODEL\tTYPE\tCHAIN\tFILENAME\n\
                     P04637\t1\tStructure\tA\tP04637-EXP-2ocj.pdb-A.pdb\n\
                     P04637\t2\tModel\tA\tP04637-MDL-model.pdb\n\
                     \t\n\
                     Q00987\t1\tModel\t \tQ00987-MDL-x.pdb\n";

        let entries = read_structure_table(Cursor::new(table)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, "P04637");
        assert_eq!(entries[0].1.structure.as_str(), "P04637-EXP-2ocj.pdb-A.pdb");
        assert!(entries[0].1.experimental);
        assert!(!entries[1].1.experimental);
        assert!(!entries[2].1.has_chain());
    }

    #[test]
    fn read_structure_table_normalizes_commented_lower_case_headers() {
        let table = "#uniprot_ac\tchain\tfilename\n\
                     P04637\tA\t\"P04637-EXP-2ocj.pdb\n";

        let entries = read_structure_table(Cursor::new(table)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1.chain, "A");
        assert_eq!(entries[0].1.structure.as_str(), "\"P04637-EXP-2ocj.pdb");
        assert!(entries[0].1.experimental);
    }

    #[test]
    fn read_structure_table_requires_filename_column() {
        let err = read_structure_table(Cursor::new("UNIPROT_AC\tCHAIN\nP1\tA\n")).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "FILENAME"));
    }

    #[test]
    fn read_interaction_table_uses_filename_tag_without_type_column() {
        let table = "PROT1\tPROT2\tCHAIN1\tCHAIN2\tFILENAME\n\
                     P1\tP2\tA\tB\tP1-P2-EXP-1abc.pdb1-A-0-B-0.pdb\n\
                     P1\tP3\tA\tB\tP1-P3-MDL-1xyz.pdb\n";

        let records = read_interaction_table(Cursor::new(table)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first, "P1");
        assert_eq!(records[0].second, "P2");
        assert!(records[0].experimental);
        assert!(!records[1].experimental);
    }

    #[test]
    fn read_interaction_table_reports_short_rows() {
        let table = "PROT1\tPROT2\tCHAIN1\tCHAIN2\tFILENAME\nP1\tP2\n";
        let err = read_interaction_table(Cursor::new(table)).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 2, .. }));
    }

    #[test]
    fn empty_tables_yield_no_entries() {
        assert!(read_structure_table(Cursor::new("")).unwrap().is_empty());
        assert!(read_interaction_table(Cursor::new("\n")).unwrap().is_empty());
    }
}
