//! Atom representation carrying only what contact detection needs: a label, a position,
//! and whether the atom is a hydrogen.
//!
//! Atoms are produced by the PDB reader and consumed by the close-residue search, which
//! measures heavy-atom distances between residues.

use super::types::Point;
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with a Cartesian position in ångströms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in crystallographic or modeling files (e.g., `CA`).
    pub name: SmolStr,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
    /// `true` for hydrogen and deuterium atoms.
    pub hydrogen: bool,
}

impl Atom {
    /// Creates a new atom from a name, position, and hydrogen flag.
    pub fn new(name: &str, pos: Point, hydrogen: bool) -> Self {
        Self {
            name: SmolStr::new(name),
            pos,
            hydrogen,
        }
    }

    /// Computes the squared Euclidean distance to another atom.
    ///
    /// Prefer this when comparing against cutoffs, as it avoids the square root.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", pos: [{:.3}, {:.3}, {:.3}] }}",
            self.name, self.pos.x, self.pos.y, self.pos.z
        )
    }
}
