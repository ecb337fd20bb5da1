use super::{InteractionCatalog, StructureCatalog};
use crate::io::{self, catalog};
use crate::model::candidate::{InteractionCandidate, InteractionRecord, StructureCandidate};
use crate::ops::Error;
use std::collections::HashMap;
use std::path::Path;

/// In-memory index over a proteins table and an interactions table.
///
/// Interaction rows are indexed under both members: a protein listed first gets the
/// [`InteractionCandidate::forward`] view of the row, a protein listed second the
/// [`InteractionCandidate::reverse`] view. Candidates keep catalog order, forward rows first.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    structures: HashMap<String, Vec<StructureCandidate>>,
    as_first: HashMap<String, Vec<InteractionRecord>>,
    as_second: HashMap<String, Vec<InteractionRecord>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_structure(&mut self, accession: impl Into<String>, candidate: StructureCandidate) {
        self.structures.entry(accession.into()).or_default().push(candidate);
    }

    pub fn add_interaction(&mut self, record: InteractionRecord) {
        self.as_first
            .entry(record.first.clone())
            .or_default()
            .push(record.clone());
        self.as_second
            .entry(record.second.clone())
            .or_default()
            .push(record);
    }

    pub fn load(proteins: Option<&Path>, interactions: Option<&Path>) -> Result<Self, io::Error> {
        let mut index = Self::new();
        if let Some(path) = proteins {
            let entries =
                catalog::read_structure_table(io::open(path)?).map_err(|e| e.with_path(path))?;
            for (accession, candidate) in entries {
                index.add_structure(accession, candidate);
            }
        }
        if let Some(path) = interactions {
            let records =
                catalog::read_interaction_table(io::open(path)?).map_err(|e| e.with_path(path))?;
            for record in records {
                index.add_interaction(record);
            }
        }
        log::info!(
            "Catalog lists structures for {} proteins and interactions for {} proteins",
            index.structures.len(),
            index.as_first.len().max(index.as_second.len())
        );
        Ok(index)
    }
}

impl StructureCatalog for Catalog {
    fn structure_candidates(&self, accession: &str) -> Result<Vec<StructureCandidate>, Error> {
        Ok(self.structures.get(accession).cloned().unwrap_or_default())
    }
}

impl InteractionCatalog for Catalog {
    fn interaction_candidates(&self, accession: &str) -> Result<Vec<InteractionCandidate>, Error> {
        let forward = self
            .as_first
            .get(accession)
            .into_iter()
            .flatten()
            .filter_map(InteractionCandidate::forward);
        let reverse = self
            .as_second
            .get(accession)
            .into_iter()
            .flatten()
            .filter_map(InteractionCandidate::reverse);
        Ok(forward.chain(reverse).collect())
    }
}
