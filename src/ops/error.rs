use crate::io;
use crate::model::alignment::AlignmentDefect;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("alignment of chain '{chain}' in '{structure}' failed: {reason}")]
    Alignment {
        structure: String,
        chain: String,
        reason: String,
    },

    #[error("aligner returned a malformed alignment for chain '{chain}' in '{structure}': {source}")]
    MalformedAlignment {
        structure: String,
        chain: String,
        #[source]
        source: AlignmentDefect,
    },

    #[error("structure '{structure}' has no chain '{chain}'")]
    UnknownChain { structure: String, chain: String },

    #[error("no sequence known for protein '{protein}'")]
    UnknownProtein { protein: String },

    #[error("cannot load structure '{structure}': {source}")]
    Structure {
        structure: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn alignment(
        structure: impl Into<String>,
        chain: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Alignment {
            structure: structure.into(),
            chain: chain.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_alignment(
        structure: impl Into<String>,
        chain: impl Into<String>,
        source: AlignmentDefect,
    ) -> Self {
        Self::MalformedAlignment {
            structure: structure.into(),
            chain: chain.into(),
            source,
        }
    }

    pub fn unknown_chain(structure: impl Into<String>, chain: impl Into<String>) -> Self {
        Self::UnknownChain {
            structure: structure.into(),
            chain: chain.into(),
        }
    }

    pub fn unknown_protein(protein: impl Into<String>) -> Self {
        Self::UnknownProtein {
            protein: protein.into(),
        }
    }

    pub fn structure(structure: impl Into<String>, source: io::Error) -> Self {
        Self::Structure {
            structure: structure.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_structure_and_chain() {
        let err = Error::unknown_chain("1abc.pdb", "C");
        assert_eq!(err.to_string(), "structure '1abc.pdb' has no chain 'C'");

        let err = Error::malformed_alignment("1abc.pdb", "A", AlignmentDefect::DoubleGap { column: 3 });
        assert!(err.to_string().contains("column 3 pairs a gap with a gap"));
    }
}
