//! Neighbour resolution across the catalogued structures of a protein.

use super::error::Error;
use super::neighbours::{CandidateOutcome, SequenceNeighbours};
use super::resolver::Resolver;
use crate::model::candidate::StructureCandidate;
use crate::model::types::StructureRef;
use std::collections::BTreeSet;

/// Answer to a neighbour query for one protein.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighbourOutcome {
    /// Neighbours found in `structure`, the first candidate that produced any.
    Structural {
        structure: StructureRef,
        neighbours: SequenceNeighbours,
    },
    /// No structure helped; each position is paired with its sequence neighbours.
    Adjacent { neighbours: SequenceNeighbours },
    /// No structure helped and sequence adjacency was not wanted.
    NoData,
}

impl NeighbourOutcome {
    pub fn neighbours(&self) -> Option<&SequenceNeighbours> {
        match self {
            Self::Structural { neighbours, .. } | Self::Adjacent { neighbours } => Some(neighbours),
            Self::NoData => None,
        }
    }

    pub fn structure(&self) -> Option<&StructureRef> {
        match self {
            Self::Structural { structure, .. } => Some(structure),
            _ => None,
        }
    }
}

impl Resolver {
    /// Neighbours of `positions` in the first catalogued structure that yields any.
    ///
    /// Candidates are tried in catalog order and the search stops at the first success.
    /// Failing or empty candidates are skipped. Fails only when the protein's own sequence is
    /// unknown.
    pub fn neighbours_for_protein(
        &self,
        protein: &str,
        positions: &[usize],
        only_structural: bool,
    ) -> Result<NeighbourOutcome, Error> {
        let sequence = self.protein_sequence(protein)?;
        log::info!("Resolving neighbours of {} at {} positions", protein, positions.len());

        let threshold = self.config.neighbour_distance;
        for candidate in self.structure_candidates(protein) {
            if !candidate.has_chain() {
                continue;
            }
            let outcome = self.resolve(
                &sequence,
                positions,
                &candidate.structure,
                Some(candidate.chain.trim()),
                threshold,
            );
            if let CandidateOutcome::Found(neighbours) = outcome {
                log::debug!("{}: neighbours found in '{}'", protein, candidate.structure);
                return Ok(NeighbourOutcome::Structural {
                    structure: candidate.structure,
                    neighbours,
                });
            }
        }

        if only_structural {
            Ok(NeighbourOutcome::NoData)
        } else {
            log::debug!("{}: no structural neighbours, using sequence adjacency", protein);
            Ok(NeighbourOutcome::Adjacent {
                neighbours: adjacent_positions(positions, sequence.len()),
            })
        }
    }

    fn structure_candidates(&self, protein: &str) -> Vec<StructureCandidate> {
        let Some(accession) = self.proteins.accession(protein) else {
            log::debug!("{}: no accession known", protein);
            return Vec::new();
        };
        self.structure_catalog
            .structure_candidates(&accession)
            .unwrap_or_else(|err| {
                log::warn!("{}: structure catalog lookup failed: {}", protein, err);
                Vec::new()
            })
    }
}

/// Pairs each position `p` with `p - 1` (when `p > 1`) and `p + 1` (when `p < length`).
pub fn adjacent_positions(positions: &[usize], length: usize) -> SequenceNeighbours {
    positions
        .iter()
        .map(|&p| {
            let mut neighbours = BTreeSet::new();
            if p > 1 {
                neighbours.insert(p - 1);
            }
            if p < length {
                neighbours.insert(p + 1);
            }
            (p, neighbours)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Catalog, ProteinIndex, StructureSource};
    use crate::ops::fixtures::FakeStructures;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    const PROTEIN: &str = "MKVAWLSTR";

    fn setup(candidates: &[(&str, &str)], structures: FakeStructures) -> (Resolver, Arc<FakeStructures>) {
        let mut proteins = ProteinIndex::new();
        proteins.add_sequence("P1", PROTEIN);
        let mut catalog = Catalog::new();
        for (file, chain) in candidates {
            catalog.add_structure("P1", StructureCandidate::new(*file, *chain, true));
        }
        let structures = Arc::new(structures);
        let source: Arc<dyn StructureSource> = structures.clone();
        let resolver = Resolver::builder(Arc::new(proteins), source)
            .structure_catalog(Arc::new(catalog))
            .build();
        (resolver, structures)
    }

    fn set(values: &[usize]) -> BTreeSet<usize> {
        values.iter().copied().collect()
    }

    #[test]
    fn first_successful_candidate_wins() {
        let structures = FakeStructures::new()
            .chain("first.pdb", "A", PROTEIN)
            .contact("first.pdb", "A:4", "A:8", 3.5)
            .chain("second.pdb", "A", PROTEIN)
            .contact("second.pdb", "A:4", "A:1", 3.5);
        let (resolver, structures) = setup(&[("first.pdb", "A"), ("second.pdb", "A")], structures);

        let outcome = resolver.neighbours_for_protein("P1", &[4], false).unwrap();
        assert_eq!(outcome.structure().map(StructureRef::as_str), Some("first.pdb"));
        assert_eq!(outcome.neighbours().unwrap()[&4], set(&[8]));
        assert_eq!(structures.contact_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn search_stops_at_the_first_non_empty_candidate() {
        let structures = FakeStructures::new()
            .chain("empty.pdb", "A", PROTEIN)
            .chain("hit.pdb", "A", PROTEIN)
            .contact("hit.pdb", "A:4", "A:7", 3.2)
            .chain("later.pdb", "A", PROTEIN)
            .contact("later.pdb", "A:4", "A:2", 3.2);
        let (resolver, structures) = setup(
            &[("empty.pdb", "A"), ("hit.pdb", "A"), ("later.pdb", "A")],
            structures,
        );

        let outcome = resolver.neighbours_for_protein("P1", &[4], false).unwrap();
        assert_eq!(
            outcome,
            NeighbourOutcome::Structural {
                structure: StructureRef::new("hit.pdb"),
                neighbours: [(4, set(&[7]))].into_iter().collect(),
            }
        );
        assert_eq!(structures.contact_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failing_blank_and_empty_candidates_are_skipped() {
        let structures = FakeStructures::new()
            .broken("broken.pdb")
            .chain("blank.pdb", "A", PROTEIN)
            .contact("blank.pdb", "A:4", "A:2", 3.0)
            .chain("empty.pdb", "A", PROTEIN)
            .chain("good.pdb", "A", PROTEIN)
            .contact("good.pdb", "A:5", "A:4", 3.0);
        let (resolver, _) = setup(
            &[
                ("broken.pdb", "A"),
                ("blank.pdb", " "),
                ("empty.pdb", "A"),
                ("good.pdb", "A"),
            ],
            structures,
        );

        let outcome = resolver.neighbours_for_protein("P1", &[4], true).unwrap();
        assert_eq!(
            outcome,
            NeighbourOutcome::Structural {
                structure: StructureRef::new("good.pdb"),
                neighbours: [(4, set(&[5]))].into_iter().collect(),
            }
        );
    }

    #[test]
    fn fallback_uses_sequence_adjacency_within_bounds() {
        let (resolver, _) = setup(&[], FakeStructures::new());
        let outcome = resolver.neighbours_for_protein("P1", &[1, 5, 9], false).unwrap();
        assert_eq!(
            outcome,
            NeighbourOutcome::Adjacent {
                neighbours: [(1, set(&[2])), (5, set(&[4, 6])), (9, set(&[8]))]
                    .into_iter()
                    .collect(),
            }
        );
    }

    #[test]
    fn only_structural_reports_no_data() {
        let (resolver, _) = setup(&[("empty.pdb", "A")], FakeStructures::new().chain("empty.pdb", "A", PROTEIN));
        let outcome = resolver.neighbours_for_protein("P1", &[3], true).unwrap();
        assert_eq!(outcome, NeighbourOutcome::NoData);
        assert!(outcome.neighbours().is_none());
    }

    #[test]
    fn unknown_protein_is_an_error() {
        let (resolver, _) = setup(&[], FakeStructures::new());
        assert!(matches!(
            resolver.neighbours_for_protein("P404", &[1], false),
            Err(Error::UnknownProtein { .. })
        ));
    }

    #[test]
    fn adjacent_positions_of_single_residue_protein_is_empty() {
        assert_eq!(adjacent_positions(&[1], 1)[&1], BTreeSet::new());
    }
}
