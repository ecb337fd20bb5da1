//! Partner residues across protein–protein interfaces.
//!
//! Every catalogued co-structure of the protein is consulted and the findings are merged per
//! partner; unlike [`Resolver::neighbours_for_protein`] there is no first-success cut-off, since
//! different co-structures cover different parts of an interface.

use super::error::Error;
use super::neighbours::{CandidateOutcome, SequenceNeighbours};
use super::resolver::Resolver;
use crate::model::candidate::InteractionCandidate;
use crate::model::types::StructureRef;
use std::collections::{BTreeMap, BTreeSet};

/// Partner residues found near one query position in one co-structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceHit {
    pub position: usize,
    pub partner: String,
    pub structure: StructureRef,
    pub partner_residues: BTreeSet<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceReport {
    /// Partner label to the union of its residues over every co-structure.
    pub partners: BTreeMap<String, BTreeSet<usize>>,
    /// Individual findings, in candidate order.
    pub hits: Vec<InterfaceHit>,
}

impl InterfaceReport {
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

impl Resolver {
    /// Residues of interaction partners lying within the interface distance of `positions`.
    ///
    /// A protein without catalogued interactions gets an empty report. Fails only when the
    /// protein's own sequence is unknown.
    pub fn interface_neighbours(
        &self,
        protein: &str,
        positions: &[usize],
    ) -> Result<InterfaceReport, Error> {
        let sequence = self.protein_sequence(protein)?;
        log::info!(
            "Resolving interface neighbours of {} at {} positions",
            protein,
            positions.len()
        );

        let threshold = self.config.interface_distance;
        let mut report = InterfaceReport::default();
        for candidate in self.interaction_candidates(protein) {
            if candidate.self_chain.trim().is_empty() || candidate.partner_chain.trim().is_empty() {
                continue;
            }
            let CandidateOutcome::Found(found) =
                self.interface_candidate(&sequence, positions, &candidate, threshold)
            else {
                continue;
            };

            let partner = self.proteins.label(&candidate.partner);
            let merged = report.partners.entry(partner.clone()).or_default();
            for (position, residues) in found {
                merged.extend(residues.iter().copied());
                report.hits.push(InterfaceHit {
                    position,
                    partner: partner.clone(),
                    structure: candidate.structure.clone(),
                    partner_residues: residues,
                });
            }
        }
        Ok(report)
    }

    fn interaction_candidates(&self, protein: &str) -> Vec<InteractionCandidate> {
        let Some(accession) = self.proteins.accession(protein) else {
            log::debug!("{}: no accession known", protein);
            return Vec::new();
        };
        self.interaction_catalog
            .interaction_candidates(&accession)
            .unwrap_or_else(|err| {
                log::warn!("{}: interaction catalog lookup failed: {}", protein, err);
                Vec::new()
            })
    }

    /// Partner positions near each query position in one co-structure.
    fn interface_candidate(
        &self,
        sequence: &str,
        positions: &[usize],
        candidate: &InteractionCandidate,
        threshold: f64,
    ) -> CandidateOutcome<SequenceNeighbours> {
        match self.partner_neighbours(sequence, positions, candidate, threshold) {
            Ok(found) if !found.is_empty() => CandidateOutcome::Found(found),
            Ok(_) => CandidateOutcome::Empty,
            Err(err) => {
                log::warn!("Skipping interaction structure '{}': {}", candidate.structure, err);
                CandidateOutcome::Failed(err)
            }
        }
    }

    fn partner_neighbours(
        &self,
        sequence: &str,
        positions: &[usize],
        candidate: &InteractionCandidate,
        threshold: f64,
    ) -> Result<SequenceNeighbours, Error> {
        let structure = &candidate.structure;
        let partner_sequence = self
            .proteins
            .accession_sequence(&candidate.partner)
            .ok_or_else(|| Error::unknown_protein(candidate.partner.as_str()))?;
        let Some(found) = self.structural_neighbours(
            sequence,
            positions,
            structure,
            Some(candidate.self_chain.trim()),
            threshold,
        )?
        else {
            return Ok(SequenceNeighbours::new());
        };
        self.translate_neighbours(
            structure,
            &found.hits,
            &partner_sequence,
            Some(candidate.partner_chain.trim()),
        )
    }
}
