use super::ProteinSource;
use crate::io::{self, fasta};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const IDENTIFIERS: &str = "identifier table";

/// Protein sequences from FASTA plus an identifier-to-accession table.
///
/// Without an identifier table every protein identifier is taken to be its own accession.
#[derive(Debug, Default, Clone)]
pub struct ProteinIndex {
    sequences: HashMap<String, String>,
    accessions: HashMap<String, String>,
    labels: HashMap<String, String>,
}

impl ProteinIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sequence(&mut self, protein: impl Into<String>, sequence: impl Into<String>) {
        self.sequences.insert(protein.into(), sequence.into());
    }

    /// Records `protein -> accession`; the first protein recorded for an accession becomes its
    /// label.
    pub fn add_accession(&mut self, protein: impl Into<String>, accession: impl Into<String>) {
        let (protein, accession) = (protein.into(), accession.into());
        self.labels
            .entry(accession.clone())
            .or_insert_with(|| protein.clone());
        self.accessions.insert(protein, accession);
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn load(fasta_path: &Path, identifiers: Option<&Path>) -> Result<Self, io::Error> {
        let mut index = Self::new();
        let records = fasta::read(io::open(fasta_path)?).map_err(|e| e.with_path(fasta_path))?;
        for (protein, sequence) in records {
            index.add_sequence(protein, sequence);
        }
        if let Some(path) = identifiers {
            let pairs = read_identifier_table(io::open(path)?).map_err(|e| e.with_path(path))?;
            for (protein, accession) in pairs {
                index.add_accession(protein, accession);
            }
        }
        log::info!(
            "Loaded {} protein sequences and {} accession mappings",
            index.sequences.len(),
            index.accessions.len()
        );
        Ok(index)
    }
}

impl ProteinSource for ProteinIndex {
    fn accession(&self, protein: &str) -> Option<String> {
        match self.accessions.get(protein) {
            Some(accession) => Some(accession.clone()),
            None if self.accessions.is_empty() => Some(protein.to_string()),
            None => None,
        }
    }

    fn sequence(&self, protein: &str) -> Option<String> {
        self.sequences.get(protein).cloned()
    }

    fn label(&self, accession: &str) -> String {
        self.labels
            .get(accession)
            .cloned()
            .unwrap_or_else(|| accession.to_string())
    }
}

/// Reads `identifier<TAB>accession` lines; blank lines and `#` comments are skipped and any
/// columns past the second are ignored.
pub fn read_identifier_table<R: Read>(reader: R) -> Result<Vec<(String, String)>, io::Error> {
    let mut reader = io::table::tsv_reader(reader, false, true);
    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| io::table::table_error(IDENTIFIERS, e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        match (record.get(0), record.get(1)) {
            (Some(protein), Some(accession)) if !protein.is_empty() && !accession.is_empty() => {
                pairs.push((protein.to_string(), accession.to_string()));
            }
            _ => {
                return Err(io::Error::parse(
                    IDENTIFIERS,
                    None,
                    io::table::line_of(&record),
                    "Expected '<identifier>\\t<accession>'",
                ));
            }
        }
    }
    Ok(pairs)
}
