//! Neighbours of protein positions within a single structure.

use super::cache::ChainMapping;
use super::error::Error;
use super::resolver::Resolver;
use crate::model::types::{StructurePosition, StructureRef};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Neighbouring protein positions keyed by query position.
pub type SequenceNeighbours = BTreeMap<usize, BTreeSet<usize>>;

/// Result of consulting one candidate structure.
///
/// `Empty` means the structure was usable but answered nothing; `Failed` means it could not be
/// used at all. Callers move on to the next candidate in both cases.
#[derive(Debug)]
pub enum CandidateOutcome<T> {
    Found(T),
    Empty,
    Failed(Error),
}

/// Structure positions near each mapped query position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralNeighbours {
    /// Chain the query positions were placed on.
    pub chain: String,
    /// `(query position, neighbouring structure positions)` in query order; unmapped query
    /// positions are absent.
    pub hits: Vec<(usize, BTreeSet<StructurePosition>)>,
}

impl Resolver {
    /// Places `positions` on one chain of `structure` and collects their contacts.
    ///
    /// Without an explicit `chain`, the chain covering the most query positions is used; ties
    /// go to the chain that comes first in the file. Returns `Ok(None)` when no query position
    /// maps onto the chosen chain.
    pub fn structural_neighbours(
        &self,
        protein_sequence: &str,
        positions: &[usize],
        structure: &StructureRef,
        chain: Option<&str>,
        threshold: f64,
    ) -> Result<Option<StructuralNeighbours>, Error> {
        let rows = self
            .alignments
            .sequence_position_in_pdb(protein_sequence, positions, structure)?;
        let chosen = match chain {
            Some(chain) => rows
                .into_iter()
                .find(|row| row.chain == chain)
                .ok_or_else(|| Error::unknown_chain(structure.as_str(), chain))?,
            None => match best_chain(rows) {
                Some(row) => row,
                None => return Ok(None),
            },
        };
        if chosen.mapped_count() == 0 {
            log::debug!(
                "No query position maps onto {}:{}",
                structure,
                chosen.chain
            );
            return Ok(None);
        }

        let graph = self.graphs.graph(structure, threshold)?;
        let hits = positions
            .iter()
            .zip(&chosen.positions)
            .filter_map(|(&position, mapped)| {
                mapped
                    .as_ref()
                    .map(|residue| (position, graph.neighbours_of(residue)))
            })
            .collect();
        Ok(Some(StructuralNeighbours {
            chain: chosen.chain,
            hits,
        }))
    }

    /// Neighbours of `positions` in `structure`, expressed as positions of the same protein.
    ///
    /// Each neighbouring residue is translated through the alignment of the protein against
    /// that residue's own chain. Query positions without any translated neighbour are left out.
    pub fn resolve(
        &self,
        protein_sequence: &str,
        positions: &[usize],
        structure: &StructureRef,
        chain: Option<&str>,
        threshold: f64,
    ) -> CandidateOutcome<SequenceNeighbours> {
        let resolved = self
            .structural_neighbours(protein_sequence, positions, structure, chain, threshold)
            .and_then(|found| match found {
                Some(found) => self
                    .translate_neighbours(structure, &found.hits, protein_sequence, None)
                    .map(Some),
                None => Ok(None),
            });

        match resolved {
            Ok(Some(neighbours)) if !neighbours.is_empty() => CandidateOutcome::Found(neighbours),
            Ok(_) => CandidateOutcome::Empty,
            Err(err) => {
                log::warn!("Skipping structure '{}': {}", structure, err);
                CandidateOutcome::Failed(err)
            }
        }
    }

    /// Translates neighbour residues into positions of `sequence`.
    ///
    /// With `only_chain`, residues on other chains are ignored.
    pub(super) fn translate_neighbours(
        &self,
        structure: &StructureRef,
        hits: &[(usize, BTreeSet<StructurePosition>)],
        sequence: &str,
        only_chain: Option<&str>,
    ) -> Result<SequenceNeighbours, Error> {
        let mut by_chain: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for residue in hits.iter().flat_map(|(_, neighbours)| neighbours) {
            if only_chain.is_none_or(|chain| chain == residue.chain) {
                by_chain
                    .entry(residue.chain.as_str())
                    .or_default()
                    .insert(residue.residue.as_str());
            }
        }

        let mut translated: HashMap<StructurePosition, usize> = HashMap::new();
        for (chain, residues) in by_chain {
            let residues: Vec<&str> = residues.into_iter().collect();
            let mapped = self
                .alignments
                .pdb_chain_position_in_sequence(structure, chain, &residues, sequence)?;
            translated.extend(
                mapped
                    .into_iter()
                    .filter_map(|(residue, position)| Some((residue, position?))),
            );
        }

        let mut result = SequenceNeighbours::new();
        for (position, neighbours) in hits {
            let positions: BTreeSet<usize> = neighbours
                .iter()
                .filter_map(|residue| translated.get(residue).copied())
                .collect();
            if !positions.is_empty() {
                result.entry(*position).or_default().extend(positions);
            }
        }
        Ok(result)
    }
}

/// First chain, in file order, among those with the most mapped positions.
fn best_chain(rows: Vec<ChainMapping>) -> Option<ChainMapping> {
    let mut best: Option<ChainMapping> = None;
    for row in rows {
        if best
            .as_ref()
            .is_none_or(|current| row.mapped_count() > current.mapped_count())
        {
            best = Some(row);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ProteinIndex;
    use crate::ops::fixtures::FakeStructures;
    use std::sync::Arc;

    const PROTEIN: &str = "MKVAWLSTR";

    fn resolver(structures: FakeStructures) -> Resolver {
        Resolver::builder(Arc::new(ProteinIndex::new()), Arc::new(structures)).build()
    }

    fn dimer() -> FakeStructures {
        FakeStructures::new()
            .chain("dimer.pdb", "A", PROTEIN)
            .chain("dimer.pdb", "B", PROTEIN)
            .contact("dimer.pdb", "A:2", "A:7", 4.0)
            .contact("dimer.pdb", "B:3", "A:2", 4.5)
            .contact("dimer.pdb", "A:5", "A:6", 6.0)
    }

    fn set(values: &[usize]) -> BTreeSet<usize> {
        values.iter().copied().collect()
    }

    #[test]
    fn resolve_translates_neighbours_on_their_own_chain() {
        let resolver = resolver(dimer());
        let outcome = resolver.resolve(PROTEIN, &[2], &StructureRef::new("dimer.pdb"), None, 5.0);

        let CandidateOutcome::Found(neighbours) = outcome else {
            panic!("expected neighbours around position 2");
        };
        assert_eq!(neighbours.len(), 1);
        assert_eq!(neighbours[&2], set(&[3, 7]));
    }

    #[test]
    fn resolve_respects_threshold() {
        let resolver = resolver(dimer());
        let reference = StructureRef::new("dimer.pdb");

        assert!(matches!(
            resolver.resolve(PROTEIN, &[5], &reference, None, 5.0),
            CandidateOutcome::Empty
        ));
        let CandidateOutcome::Found(wide) = resolver.resolve(PROTEIN, &[5], &reference, None, 8.0)
        else {
            panic!("expected neighbours within 8 Å");
        };
        assert_eq!(wide[&5], set(&[6]));
    }

    #[test]
    fn best_chain_prefers_coverage_then_file_order() {
        let structures = FakeStructures::new()
            .chain("s.pdb", "A", "MKV")
            .chain("s.pdb", "B", PROTEIN)
            .chain("s.pdb", "C", PROTEIN)
            .contact("s.pdb", "B:2", "B:6", 3.0)
            .contact("s.pdb", "C:2", "C:8", 3.0);
        let resolver = resolver(structures);

        let found = resolver
            .structural_neighbours(PROTEIN, &[2, 6], &StructureRef::new("s.pdb"), None, 5.0)
            .unwrap()
            .unwrap();
        assert_eq!(found.chain, "B");
        assert_eq!(found.hits.len(), 2);
        assert_eq!(
            found.hits[0],
            (2, [StructurePosition::new("B", "6")].into_iter().collect())
        );
    }

    #[test]
    fn explicit_chain_overrides_best_chain() {
        let resolver = resolver(dimer());
        let found = resolver
            .structural_neighbours(PROTEIN, &[3], &StructureRef::new("dimer.pdb"), Some("B"), 5.0)
            .unwrap()
            .unwrap();
        assert_eq!(found.chain, "B");
        assert_eq!(
            found.hits,
            vec![(3, [StructurePosition::new("A", "2")].into_iter().collect())]
        );
    }

    #[test]
    fn unmapped_positions_give_empty_outcome() {
        let structures = FakeStructures::new()
            .chain("s.pdb", "A", "GGGG")
            .contact("s.pdb", "A:1", "A:2", 3.0);
        let resolver = resolver(structures);
        let outcome = resolver.resolve("WWWWW", &[1, 2], &StructureRef::new("s.pdb"), None, 5.0);
        assert!(matches!(outcome, CandidateOutcome::Empty));
    }

    #[test]
    fn structure_failures_are_reported_not_raised() {
        let resolver = resolver(dimer().broken("bad.pdb"));
        let outcome = resolver.resolve(PROTEIN, &[2], &StructureRef::new("bad.pdb"), None, 5.0);
        assert!(matches!(outcome, CandidateOutcome::Failed(Error::Structure { .. })));

        let outcome = resolver.resolve(PROTEIN, &[2], &StructureRef::new("dimer.pdb"), Some("Q"), 5.0);
        assert!(matches!(outcome, CandidateOutcome::Failed(Error::UnknownChain { .. })));
    }
}
