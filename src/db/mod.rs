//! Read-only data sources consulted during resolution.
//!
//! The resolver only talks to these traits. Each has one file-backed implementation here;
//! tests substitute in-memory fakes.

mod catalog;
mod proteins;
mod structures;

pub use catalog::Catalog;
pub use proteins::ProteinIndex;
pub use structures::PdbStore;

use crate::model::candidate::{InteractionCandidate, StructureCandidate};
use crate::model::chain::ChainSequence;
use crate::model::types::{StructurePosition, StructureRef};
use crate::ops::Error;

/// Protein identifiers, accessions and sequences.
pub trait ProteinSource: Send + Sync {
    /// Catalog accession of a protein identifier, if known.
    fn accession(&self, protein: &str) -> Option<String>;

    /// Amino-acid sequence of a protein identifier, if known.
    fn sequence(&self, protein: &str) -> Option<String>;

    /// Name under which a partner accession is reported.
    fn label(&self, accession: &str) -> String {
        accession.to_string()
    }

    /// Sequence of the protein catalogued under `accession`.
    fn accession_sequence(&self, accession: &str) -> Option<String> {
        self.sequence(&self.label(accession))
    }
}

/// Chain sequences and residue contacts of 3D structures.
pub trait StructureSource: Send + Sync {
    /// Every chain with a polymer sequence, in file order.
    fn chain_sequences(&self, structure: &StructureRef) -> Result<Vec<(String, ChainSequence)>, Error>;

    /// Residue pairs closer than `threshold` Å, each unordered pair listed once and no residue
    /// paired with itself.
    fn close_residue_pairs(
        &self,
        structure: &StructureRef,
        threshold: f64,
    ) -> Result<Vec<(StructurePosition, StructurePosition)>, Error>;
}

/// Single-protein structures and models, in catalog order.
pub trait StructureCatalog: Send + Sync {
    fn structure_candidates(&self, accession: &str) -> Result<Vec<StructureCandidate>, Error>;
}

/// Interaction co-structures, normalized to the queried protein's point of view.
pub trait InteractionCatalog: Send + Sync {
    fn interaction_candidates(&self, accession: &str) -> Result<Vec<InteractionCandidate>, Error>;
}
