use super::chain::{Chain, ChainSequence};
use super::residue::Residue;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Structure {
    chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chain(&mut self, chain: Chain) {
        debug_assert!(
            self.chain(&chain.id).is_none(),
            "Attempted to add a duplicate chain ID '{}'",
            chain.id
        );
        self.chains.push(chain);
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter_chains(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    pub fn iter_residues_with_chain(&self) -> impl Iterator<Item = (&Chain, &Residue)> {
        self.chains
            .iter()
            .flat_map(|c| c.iter_residues().map(move |r| (c, r)))
    }

    /// Sequences of every chain holding at least one polymer residue, in file order.
    pub fn chain_sequences(&self) -> Vec<(String, ChainSequence)> {
        self.chains
            .iter()
            .map(|c| (c.id.clone(), c.sequence()))
            .filter(|(_, seq)| !seq.is_empty())
            .collect()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ chains: {}, residues: {} }}",
            self.chain_count(),
            self.residue_count()
        )
    }
}

impl FromIterator<Chain> for Structure {
    fn from_iter<I: IntoIterator<Item = Chain>>(iter: I) -> Self {
        let mut structure = Structure::new();
        for chain in iter {
            structure.add_chain(chain);
        }
        structure
    }
}
