//! Residue contact graphs built from close-residue pairs.

use super::error::Error;
use crate::db::StructureSource;
use crate::model::types::{StructurePosition, StructureRef};
use crate::utils::memo::SingleFlight;
use once_cell::sync::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub type Adjacency = HashMap<StructurePosition, Vec<StructurePosition>>;

/// Contacts of one structure at one distance threshold.
///
/// Each pair is stored once, under its first member. The reverse edges are derived on first
/// use and never change afterwards.
#[derive(Debug, Default)]
pub struct NeighbourGraph {
    forward: Adjacency,
    inverse: OnceCell<Adjacency>,
}

impl NeighbourGraph {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (StructurePosition, StructurePosition)>) -> Self {
        let mut forward: Adjacency = HashMap::new();
        for (a, b) in pairs {
            let edges = forward.entry(a).or_default();
            if !edges.contains(&b) {
                edges.push(b);
            }
        }
        Self {
            forward,
            inverse: OnceCell::new(),
        }
    }

    pub fn forward(&self) -> &Adjacency {
        &self.forward
    }

    pub fn inverse(&self) -> &Adjacency {
        self.inverse.get_or_init(|| {
            let mut inverse: Adjacency = HashMap::new();
            for (a, neighbours) in &self.forward {
                for b in neighbours {
                    let edges = inverse.entry(b.clone()).or_default();
                    if !edges.contains(a) {
                        edges.push(a.clone());
                    }
                }
            }
            inverse
        })
    }

    /// Forward and reverse neighbours of `position`, deduplicated and sorted.
    pub fn neighbours_of(&self, position: &StructurePosition) -> BTreeSet<StructurePosition> {
        [self.forward.get(position), self.inverse().get(position)]
            .into_iter()
            .flatten()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Builds the contact graph of `structure` at `threshold` Å.
pub fn build_graph(
    source: &dyn StructureSource,
    structure: &StructureRef,
    threshold: f64,
) -> Result<NeighbourGraph, Error> {
    let pairs = source.close_residue_pairs(structure, threshold)?;
    log::debug!(
        "{} residue contacts within {} Å in '{}'",
        pairs.len(),
        threshold,
        structure
    );
    Ok(NeighbourGraph::from_pairs(pairs))
}

/// Shares one graph per `(structure, threshold)` between workers.
pub struct GraphCache {
    structures: Arc<dyn StructureSource>,
    graphs: SingleFlight<(StructureRef, u64), Arc<NeighbourGraph>>,
}

impl GraphCache {
    pub fn new(structures: Arc<dyn StructureSource>) -> Self {
        Self {
            structures,
            graphs: SingleFlight::new(),
        }
    }

    pub fn graph(&self, structure: &StructureRef, threshold: f64) -> Result<Arc<NeighbourGraph>, Error> {
        let key = (structure.clone(), threshold.to_bits());
        self.graphs.get_or_try_init(&key, || {
            build_graph(self.structures.as_ref(), structure, threshold).map(Arc::new)
        })
    }
}
