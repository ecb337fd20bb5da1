//! Resolution of residue neighbourhoods from protein positions.
//!
//! Positions of a protein sequence are placed onto catalogued 3D structures by local
//! alignment, their spatial neighbours are collected from a per-structure contact graph, and
//! the neighbours are translated back into sequence positions. Everything hangs off a shared
//! [`Resolver`], whose caches make repeated queries on the same structures cheap.

mod align;
mod batch;
mod cache;
mod candidates;
mod error;
mod graph;
mod interface;
mod mapping;
mod neighbours;
mod resolver;

#[cfg(test)]
mod fixtures;

pub use align::{AlignError, LocalAligner, SmithWaterman};

pub use mapping::{PositionMap, alignment_map, match_position};

pub use cache::{AlignmentCache, AlignmentKey, ChainMapping};

pub use graph::{Adjacency, GraphCache, NeighbourGraph, build_graph};

pub use neighbours::{CandidateOutcome, SequenceNeighbours, StructuralNeighbours};

pub use candidates::{NeighbourOutcome, adjacent_positions};

pub use interface::{InterfaceHit, InterfaceReport};

pub use batch::{BatchReport, BatchSummary, neighbour_rows, resolve_interfaces, resolve_neighbours};

pub use resolver::{Resolver, ResolverBuilder};

pub use error::Error;
