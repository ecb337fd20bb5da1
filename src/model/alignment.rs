use super::types::GAP;
use thiserror::Error;

/// Structural problem found in a pair of aligned strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentDefect {
    #[error("aligned strings differ in length ({chain} vs {protein})")]
    LengthMismatch { chain: usize, protein: usize },

    #[error("column {column} pairs a gap with a gap")]
    DoubleGap { column: usize },
}

/// Local alignment between a structure chain's sequence and a protein sequence.
///
/// Both strings have the same length and use [`GAP`] as gap marker; no column holds a gap on
/// both sides. Removing the gaps from `chain` yields the chain sequence and removing them from
/// `protein` yields the protein sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub chain: String,
    pub protein: String,
}

impl AlignedPair {
    pub fn try_new(
        chain: impl Into<String>,
        protein: impl Into<String>,
    ) -> Result<Self, AlignmentDefect> {
        let pair = Self {
            chain: chain.into(),
            protein: protein.into(),
        };
        pair.validate()?;
        Ok(pair)
    }

    pub fn validate(&self) -> Result<(), AlignmentDefect> {
        let (chain, protein) = (self.chain.as_bytes(), self.protein.as_bytes());
        if chain.len() != protein.len() {
            return Err(AlignmentDefect::LengthMismatch {
                chain: chain.len(),
                protein: protein.len(),
            });
        }
        match chain
            .iter()
            .zip(protein)
            .position(|(&c, &p)| c == GAP && p == GAP)
        {
            Some(column) => Err(AlignmentDefect::DoubleGap { column: column + 1 }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of columns pairing two residues.
    pub fn aligned_columns(&self) -> usize {
        self.chain
            .bytes()
            .zip(self.protein.bytes())
            .filter(|&(c, p)| c != GAP && p != GAP)
            .count()
    }
}
