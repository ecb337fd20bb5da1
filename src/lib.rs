//! # bio-contact
//!
//! **bio-contact** maps residue positions of protein sequences onto experimental and modelled
//! 3D structures and reports which other residues lie close to them in space, either within
//! the same protein or across a protein–protein interface.
//!
//! ## Features
//!
//! - **Sequence-to-structure mapping** – A local Smith-Waterman alignment places each protein
//!   onto every chain of a structure; alignments are computed once per
//!   `(structure, chain, sequence)` and shared between threads.
//! - **Contact graphs** – Residues whose heavy atoms come within a distance threshold are
//!   linked in a per-structure graph built on a uniform spatial grid.
//! - **Candidate search** – Catalogued structures are tried in order until one yields
//!   neighbours, with a sequence-adjacency fallback when none does.
//! - **Interfaces** – Partner residues are collected over every catalogued co-structure and
//!   merged per partner.
//! - **Batch runs** – Many proteins are resolved in parallel with per-protein error isolation.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use bio_contact::db::{Catalog, PdbStore, ProteinIndex};
//! use bio_contact::ops::Resolver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let proteins = ProteinIndex::load(Path::new("proteins.fasta"), None)?;
//! let catalog = Arc::new(Catalog::load(Some(Path::new("proteins.dat")), None)?);
//! let resolver = Resolver::builder(Arc::new(proteins), Arc::new(PdbStore::new("structures")))
//!     .structure_catalog(catalog)
//!     .build();
//!
//! let outcome = resolver.neighbours_for_protein("P1", &[12, 40], false)?;
//! println!("{:?}", outcome.neighbours());
//! # Ok(())
//! # }
//! ```

mod model;
mod utils;

pub mod config;
pub mod db;
pub mod io;
pub mod ops;

pub use model::alignment::{AlignedPair, AlignmentDefect};
pub use model::atom::Atom;
pub use model::candidate::{
    CatalogDirection, InteractionCandidate, InteractionRecord, StructureCandidate,
};
pub use model::chain::{Chain, ChainSequence};
pub use model::residue::Residue;
pub use model::structure::Structure;
pub use model::types::{Point, StandardResidue, StructurePosition, StructureRef};

pub use config::{AlignmentScoring, ResolverConfig};
pub use ops::{NeighbourOutcome, Resolver};
