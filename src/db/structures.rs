use super::StructureSource;
use crate::io;
use crate::model::chain::ChainSequence;
use crate::model::grid::Grid;
use crate::model::structure::Structure;
use crate::model::types::{StructurePosition, StructureRef};
use crate::ops::Error;
use crate::utils::memo::SingleFlight;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Smallest grid cell edge (Å) used for contact searches, whatever the threshold.
const MIN_CELL_SIZE: f64 = 4.0;

/// PDB files under a root directory, parsed on first use and kept in memory.
///
/// A [`StructureRef`] is a file name relative to the root, or an absolute path.
#[derive(Debug)]
pub struct PdbStore {
    root: PathBuf,
    structures: SingleFlight<StructureRef, Arc<Structure>>,
}

impl PdbStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            structures: SingleFlight::new(),
        }
    }

    pub fn path_of(&self, structure: &StructureRef) -> PathBuf {
        let path = Path::new(structure.as_str());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Parsed structure, read from disk on first request.
    pub fn structure(&self, structure: &StructureRef) -> Result<Arc<Structure>, Error> {
        self.structures.get_or_try_init(structure, || {
            let path = self.path_of(structure);
            log::debug!("Reading structure '{}' from {}", structure, path.display());
            io::open(&path)
                .and_then(|reader| io::read_pdb_structure(reader).map_err(|e| e.with_path(&path)))
                .map(Arc::new)
                .map_err(|e| Error::structure(structure.as_str(), e))
        })
    }
}

impl StructureSource for PdbStore {
    fn chain_sequences(&self, structure: &StructureRef) -> Result<Vec<(String, ChainSequence)>, Error> {
        Ok(self.structure(structure)?.chain_sequences())
    }

    fn close_residue_pairs(
        &self,
        structure: &StructureRef,
        threshold: f64,
    ) -> Result<Vec<(StructurePosition, StructurePosition)>, Error> {
        let structure = self.structure(structure)?;
        Ok(close_residue_pairs(&structure, threshold))
    }
}

/// Polymer residue pairs whose closest heavy atoms lie within `threshold` Å.
///
/// Pairs are ordered by the file order of their first and then second residue; each
/// unordered pair appears once.
pub fn close_residue_pairs(
    structure: &Structure,
    threshold: f64,
) -> Vec<(StructurePosition, StructurePosition)> {
    let residues: Vec<StructurePosition> = structure
        .iter_residues_with_chain()
        .filter(|(_, residue)| residue.is_polymer())
        .map(|(chain, residue)| StructurePosition::new(chain.id.as_str(), residue.number.as_str()))
        .collect();

    let atoms: Vec<_> = structure
        .iter_residues_with_chain()
        .filter(|(_, residue)| residue.is_polymer())
        .enumerate()
        .flat_map(|(idx, (_, residue))| residue.iter_heavy_atoms().map(move |atom| (atom.pos, idx)))
        .collect();
    if atoms.is_empty() || threshold.is_nan() || threshold <= 0.0 {
        return Vec::new();
    }

    let grid = Grid::new(atoms, threshold.max(MIN_CELL_SIZE));
    let mut pairs = BTreeSet::new();
    for (pos, idx) in grid.items() {
        for &other in grid.within(pos, threshold) {
            if other > *idx {
                pairs.insert((*idx, other));
            }
        }
    }

    pairs
        .into_iter()
        .map(|(a, b)| (residues[a].clone(), residues[b].clone()))
        .collect()
}
