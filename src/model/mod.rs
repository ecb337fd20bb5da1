//! Core data structures for structures, alignments, and catalog candidates.
//!
//! Structures are read by the I/O layer and turned into chain sequences and close-residue
//! pairs; alignments and candidates flow through the resolution operations in `ops`.

pub mod alignment;
pub mod atom;
pub mod candidate;
pub mod chain;
pub mod grid;
pub mod residue;
pub mod structure;
pub mod types;
