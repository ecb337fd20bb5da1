use super::residue::Residue;
use super::types::StructurePosition;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,
    residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            residues: Vec::new(),
        }
    }

    pub fn add_residue(&mut self, residue: Residue) {
        debug_assert!(
            self.residue(&residue.number).is_none(),
            "Attempted to add a duplicate residue '{}' to chain '{}'",
            residue.number,
            self.id
        );
        self.residues.push(residue);
    }

    pub fn residue(&self, number: &str) -> Option<&Residue> {
        self.residues.iter().find(|r| r.number == number)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn iter_residues(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    /// One-letter sequence of the polymer residues, paired with their residue tokens.
    pub fn sequence(&self) -> ChainSequence {
        let polymer: Vec<&Residue> = self.residues.iter().filter(|r| r.is_polymer()).collect();
        ChainSequence {
            sequence: polymer.iter().map(|r| r.one_letter()).collect(),
            residues: polymer.iter().map(|r| r.number.clone()).collect(),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {{ id: \"{}\", residues: {} }}",
            self.id,
            self.residue_count()
        )
    }
}

/// Sequence of one structural chain together with the residue token behind each letter.
///
/// The `n`-th letter of `sequence` (1-based) is residue `residues[n - 1]`, which is how a
/// chain-sequence index produced by an alignment becomes a [`StructurePosition`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainSequence {
    pub sequence: String,
    pub residues: Vec<String>,
}

impl ChainSequence {
    pub fn new(sequence: impl Into<String>, residues: Vec<String>) -> Self {
        let sequence = sequence.into();
        debug_assert_eq!(sequence.chars().count(), residues.len());
        Self { sequence, residues }
    }

    /// Builds a chain sequence whose residues are numbered `1..=len`.
    pub fn numbered(sequence: &str) -> Self {
        Self {
            sequence: sequence.to_string(),
            residues: (1..=sequence.chars().count()).map(|n| n.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residue token at a 1-based chain-sequence index.
    pub fn residue_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.residues.get(i))
            .map(String::as_str)
    }

    /// 1-based chain-sequence index of a residue token.
    pub fn index_of(&self, residue: &str) -> Option<usize> {
        self.residues.iter().position(|r| r == residue).map(|i| i + 1)
    }

    pub fn position_at(&self, chain: &str, index: usize) -> Option<StructurePosition> {
        self.residue_at(index)
            .map(|residue| StructurePosition::new(chain, residue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_with(residues: &[(&str, &str, bool)]) -> Chain {
        let mut chain = Chain::new("A");
        for (number, name, hetero) in residues {
            chain.add_residue(Residue::new(number, name, *hetero));
        }
        chain
    }

    #[test]
    fn chain_new_creates_empty_chain() {
        let chain = Chain::new("B");
        assert_eq!(chain.id, "B");
        assert!(chain.is_empty());
    }

    #[test]
    fn chain_residue_finds_by_token() {
        let chain = chain_with(&[("10", "MET", false), ("10A", "LYS", false)]);
        assert_eq!(chain.residue("10A").map(|r| r.name.as_str()), Some("LYS"));
        assert!(chain.residue("11").is_none());
    }

    #[test]
    fn sequence_skips_ligands_and_keeps_residue_tokens() {
        let chain = chain_with(&[
            ("1", "MET", false),
            ("2", "LYS", false),
            ("2A", "VAL", false),
            ("3", "MSE", true),
            ("501", "HOH", true),
            ("502", "HEM", true),
        ]);

        let sequence = chain.sequence();
        assert_eq!(sequence.sequence, "MKVM");
        assert_eq!(sequence.residues, vec!["1", "2", "2A", "3"]);
    }

    #[test]
    fn chain_sequence_translates_indices_both_ways() {
        let sequence = ChainSequence::new("MKV", vec!["5".into(), "6".into(), "6A".into()]);

        assert_eq!(sequence.residue_at(3), Some("6A"));
        assert_eq!(sequence.residue_at(0), None);
        assert_eq!(sequence.residue_at(4), None);
        assert_eq!(sequence.index_of("6"), Some(2));
        assert_eq!(sequence.index_of("7"), None);
        assert_eq!(
            sequence.position_at("C", 1),
            Some(StructurePosition::new("C", "5"))
        );
    }

    #[test]
    fn numbered_sequence_counts_from_one() {
        let sequence = ChainSequence::numbered("ACD");
        assert_eq!(sequence.residues, vec!["1", "2", "3"]);
        assert_eq!(sequence.len(), 3);
    }
}
