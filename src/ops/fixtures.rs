//! In-memory collaborators for resolver tests.

use super::align::{AlignError, LocalAligner, SmithWaterman};
use super::error::Error;
use crate::db::StructureSource;
use crate::io;
use crate::model::chain::ChainSequence;
use crate::model::types::{StructurePosition, StructureRef};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeStructures {
    chains: HashMap<StructureRef, Vec<(String, ChainSequence)>>,
    contacts: HashMap<StructureRef, Vec<(StructurePosition, StructurePosition, f64)>>,
    broken: HashSet<StructureRef>,
    pub contact_calls: AtomicUsize,
}

impl FakeStructures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chain whose residues are numbered from 1.
    pub fn chain(mut self, structure: &str, chain: &str, sequence: &str) -> Self {
        self.chains
            .entry(StructureRef::new(structure))
            .or_default()
            .push((chain.to_string(), ChainSequence::numbered(sequence)));
        self
    }

    pub fn chain_with_residues(
        mut self,
        structure: &str,
        chain: &str,
        sequence: &str,
        residues: &[&str],
    ) -> Self {
        let residues = residues.iter().map(|r| r.to_string()).collect();
        self.chains
            .entry(StructureRef::new(structure))
            .or_default()
            .push((chain.to_string(), ChainSequence::new(sequence, residues)));
        self
    }

    /// Records a contact between two `chain:residue` positions at `distance` Å.
    pub fn contact(mut self, structure: &str, a: &str, b: &str, distance: f64) -> Self {
        let parse = |s: &str| s.parse::<StructurePosition>().unwrap();
        self.contacts
            .entry(StructureRef::new(structure))
            .or_default()
            .push((parse(a), parse(b), distance));
        self
    }

    /// Makes every request for `structure` fail.
    pub fn broken(mut self, structure: &str) -> Self {
        self.broken.insert(StructureRef::new(structure));
        self
    }

    fn check(&self, structure: &StructureRef) -> Result<(), Error> {
        if self.broken.contains(structure) {
            return Err(Error::structure(
                structure.as_str(),
                io::Error::inconsistent_data("PDB", None, "corrupt coordinates"),
            ));
        }
        Ok(())
    }
}

impl StructureSource for FakeStructures {
    fn chain_sequences(&self, structure: &StructureRef) -> Result<Vec<(String, ChainSequence)>, Error> {
        self.check(structure)?;
        Ok(self.chains.get(structure).cloned().unwrap_or_default())
    }

    fn close_residue_pairs(
        &self,
        structure: &StructureRef,
        threshold: f64,
    ) -> Result<Vec<(StructurePosition, StructurePosition)>, Error> {
        self.contact_calls.fetch_add(1, Ordering::SeqCst);
        self.check(structure)?;
        Ok(self
            .contacts
            .get(structure)
            .into_iter()
            .flatten()
            .filter(|(_, _, d)| *d <= threshold)
            .map(|(a, b, _)| (a.clone(), b.clone()))
            .collect())
    }
}

/// Smith-Waterman wrapper that counts calls and can stall each one.
#[derive(Default)]
pub struct CountingAligner {
    inner: SmithWaterman,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl CountingAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocalAligner for CountingAligner {
    fn align(&self, chain: &str, protein: &str) -> Result<(String, String), AlignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.align(chain, protein)
    }
}

/// Aligner returning rows that pair a gap with a gap.
pub struct MalformedAligner;

impl LocalAligner for MalformedAligner {
    fn align(&self, chain: &str, protein: &str) -> Result<(String, String), AlignError> {
        Ok((format!("{}-", chain), format!("{}-", protein)))
    }
}
