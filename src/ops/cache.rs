//! Memoized chain sequences and chain-to-protein alignments.
//!
//! Alignments are keyed by structure, chain and a BLAKE3 digest of the protein sequence, and
//! each key is computed at most once however many workers ask for it concurrently. Failed
//! alignments are not stored.

use super::align::LocalAligner;
use super::error::Error;
use super::mapping::{alignment_map, match_position};
use crate::db::StructureSource;
use crate::model::alignment::AlignedPair;
use crate::model::chain::ChainSequence;
use crate::model::types::{StructurePosition, StructureRef};
use crate::utils::memo::SingleFlight;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlignmentKey {
    pub structure: StructureRef,
    pub chain: String,
    pub sequence: blake3::Hash,
}

impl AlignmentKey {
    pub fn new(structure: &StructureRef, chain: &str, protein_sequence: &str) -> Self {
        Self {
            structure: structure.clone(),
            chain: chain.to_string(),
            sequence: blake3::hash(protein_sequence.as_bytes()),
        }
    }
}

/// Query positions of a protein translated into one chain of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMapping {
    pub chain: String,
    /// One entry per query position, in query order.
    pub positions: Vec<Option<StructurePosition>>,
}

impl ChainMapping {
    pub fn mapped_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }
}

pub type ChainSequences = Arc<Vec<(String, ChainSequence)>>;

pub struct AlignmentCache {
    structures: Arc<dyn StructureSource>,
    aligner: Arc<dyn LocalAligner>,
    sequences: SingleFlight<StructureRef, ChainSequences>,
    alignments: SingleFlight<AlignmentKey, Arc<AlignedPair>>,
}

impl AlignmentCache {
    pub fn new(structures: Arc<dyn StructureSource>, aligner: Arc<dyn LocalAligner>) -> Self {
        Self {
            structures,
            aligner,
            sequences: SingleFlight::new(),
            alignments: SingleFlight::new(),
        }
    }

    /// Number of alignments computed so far.
    pub fn alignment_count(&self) -> usize {
        self.alignments.len()
    }

    pub fn chain_sequences(&self, structure: &StructureRef) -> Result<ChainSequences, Error> {
        self.sequences.get_or_try_init(structure, || {
            self.structures.chain_sequences(structure).map(Arc::new)
        })
    }

    fn chain_sequence(&self, structure: &StructureRef, chain: &str) -> Result<ChainSequence, Error> {
        self.chain_sequences(structure)?
            .iter()
            .find(|(id, _)| id == chain)
            .map(|(_, sequence)| sequence.clone())
            .ok_or_else(|| Error::unknown_chain(structure.as_str(), chain))
    }

    pub fn align_protein_to_chain(
        &self,
        structure: &StructureRef,
        chain: &str,
        protein_sequence: &str,
    ) -> Result<Arc<AlignedPair>, Error> {
        let key = AlignmentKey::new(structure, chain, protein_sequence);
        self.alignments.get_or_try_init(&key, || {
            let chain_sequence = self.chain_sequence(structure, chain)?;
            log::debug!(
                "Aligning {} residues of {}:{} against a {}-residue protein",
                chain_sequence.len(),
                structure,
                chain,
                protein_sequence.len()
            );
            let (aligned_chain, aligned_protein) = self
                .aligner
                .align(&chain_sequence.sequence, protein_sequence)
                .map_err(|e| Error::alignment(structure.as_str(), chain, e.to_string()))?;
            AlignedPair::try_new(aligned_chain, aligned_protein)
                .map(Arc::new)
                .map_err(|defect| Error::malformed_alignment(structure.as_str(), chain, defect))
        })
    }

    /// Translates protein positions into every chain of `structure`, in file order.
    pub fn sequence_position_in_pdb(
        &self,
        protein_sequence: &str,
        positions: &[usize],
        structure: &StructureRef,
    ) -> Result<Vec<ChainMapping>, Error> {
        self.chain_sequences(structure)?
            .iter()
            .map(|(chain, sequence)| {
                let pair = self.align_protein_to_chain(structure, chain, protein_sequence)?;
                let positions = match_position(positions, &pair.protein, &pair.chain)
                    .into_iter()
                    .map(|index| index.and_then(|i| sequence.position_at(chain, i)))
                    .collect();
                Ok(ChainMapping {
                    chain: chain.clone(),
                    positions,
                })
            })
            .collect()
    }

    /// Translates residues of one chain into protein positions.
    ///
    /// Residues absent from the chain's sequence map to `None`.
    pub fn pdb_chain_position_in_sequence(
        &self,
        structure: &StructureRef,
        chain: &str,
        residues: &[&str],
        protein_sequence: &str,
    ) -> Result<Vec<(StructurePosition, Option<usize>)>, Error> {
        let sequence = self.chain_sequence(structure, chain)?;
        let pair = self.align_protein_to_chain(structure, chain, protein_sequence)?;

        let indices: Vec<Option<usize>> = residues.iter().map(|r| sequence.index_of(r)).collect();
        let known: Vec<usize> = indices.iter().flatten().copied().collect();
        let mut mapped = match_position(&known, &pair.chain, &pair.protein).into_iter();

        Ok(residues
            .iter()
            .zip(indices)
            .map(|(residue, index)| {
                let position = index.and_then(|_| mapped.next().flatten());
                (StructurePosition::new(chain, *residue), position)
            })
            .collect())
    }

    /// Every protein position with the structure positions it aligns to, across all chains.
    pub fn pdb_alignment_map(
        &self,
        protein_sequence: &str,
        structure: &StructureRef,
    ) -> Result<BTreeMap<usize, Vec<StructurePosition>>, Error> {
        let mut map: BTreeMap<usize, Vec<StructurePosition>> = BTreeMap::new();
        for (chain, sequence) in self.chain_sequences(structure)?.iter() {
            let pair = self.align_protein_to_chain(structure, chain, protein_sequence)?;
            for (protein_index, chain_index) in alignment_map(&pair.protein, &pair.chain) {
                if let Some(position) = sequence.position_at(chain, chain_index) {
                    map.entry(protein_index).or_default().push(position);
                }
            }
        }
        Ok(map)
    }
}
