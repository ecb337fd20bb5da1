//! Catalog entries naming the structures that may answer a neighbour query.
//!
//! A [`StructureCandidate`] covers a single protein; an [`InteractionCandidate`] is a
//! co-structure of the protein with a partner. Interaction catalogs list each pair once, so
//! a protein can appear as the first or the second member; both layouts are normalized into
//! the same self/partner shape by [`InteractionCandidate::forward`] and
//! [`InteractionCandidate::reverse`].

use super::types::StructureRef;

/// Chain carrying the first catalogued protein in relabelled co-structures.
pub const FIRST_MEMBER_CHAIN: &str = "A";
/// Chain carrying the second catalogued protein in relabelled co-structures.
pub const SECOND_MEMBER_CHAIN: &str = "B";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureCandidate {
    pub structure: StructureRef,
    pub chain: String,
    /// `true` for experimentally solved structures, `false` for computational models.
    pub experimental: bool,
}

impl StructureCandidate {
    pub fn new(structure: impl Into<String>, chain: impl Into<String>, experimental: bool) -> Self {
        Self {
            structure: StructureRef::new(structure),
            chain: chain.into(),
            experimental,
        }
    }

    pub fn has_chain(&self) -> bool {
        !self.chain.trim().is_empty()
    }
}

/// Which member of the catalogued pair the queried protein is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogDirection {
    Forward,
    Reverse,
}

/// An interaction structure seen from the queried protein.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionCandidate {
    pub partner: String,
    pub self_chain: String,
    pub partner_chain: String,
    pub structure: StructureRef,
    pub experimental: bool,
}

/// One catalog row of an interaction table, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub first: String,
    pub second: String,
    pub first_chain: String,
    pub second_chain: String,
    pub structure: StructureRef,
    pub experimental: bool,
}

impl InteractionCandidate {
    /// Adapter for rows where the queried protein is the first member.
    ///
    /// Returns `None` when either catalogued chain is blank.
    pub fn forward(record: &InteractionRecord) -> Option<Self> {
        Self::normalize(record, CatalogDirection::Forward)
    }

    /// Adapter for rows where the queried protein is the second member.
    pub fn reverse(record: &InteractionRecord) -> Option<Self> {
        Self::normalize(record, CatalogDirection::Reverse)
    }

    fn normalize(record: &InteractionRecord, direction: CatalogDirection) -> Option<Self> {
        if record.first_chain.trim().is_empty() || record.second_chain.trim().is_empty() {
            return None;
        }
        // Co-structures are relabelled so the first member is chain A and the second chain B.
        let (partner, self_chain, partner_chain) = match direction {
            CatalogDirection::Forward => (&record.second, FIRST_MEMBER_CHAIN, SECOND_MEMBER_CHAIN),
            CatalogDirection::Reverse => (&record.first, SECOND_MEMBER_CHAIN, FIRST_MEMBER_CHAIN),
        };
        Some(Self {
            partner: partner.clone(),
            self_chain: self_chain.to_string(),
            partner_chain: partner_chain.to_string(),
            structure: record.structure.clone(),
            experimental: record.experimental,
        })
    }
}
