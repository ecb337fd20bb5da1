use super::atom::Atom;
use super::types::{StandardResidue, UNKNOWN_RESIDUE};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// Opaque residue token: sequence number followed by the insertion code, if any.
    pub number: String,
    pub name: String,
    pub standard_name: Option<StandardResidue>,
    /// Read from `HETATM` records.
    pub hetero: bool,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(number: &str, name: &str, hetero: bool) -> Self {
        Self {
            number: number.to_string(),
            name: name.to_string(),
            standard_name: StandardResidue::from_pdb_name(name),
            hetero,
            atoms: Vec::new(),
        }
    }

    pub fn is_standard(&self) -> bool {
        self.standard_name.is_some()
    }

    /// Polymer residues contribute a letter to the chain sequence; ligands and waters do not.
    pub fn is_polymer(&self) -> bool {
        !self.hetero || self.is_standard()
    }

    pub fn one_letter(&self) -> char {
        self.standard_name
            .map(|std| std.one_letter())
            .unwrap_or(UNKNOWN_RESIDUE)
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom(&atom.name).is_none(),
            "Attempted to add a duplicate atom name '{}' to residue '{}'",
            atom.name,
            self.name
        );
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_heavy_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|a| !a.hydrogen)
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Residue {{ number: \"{}\", name: \"{}\", atoms: {} }}",
            self.number,
            self.name,
            self.atom_count()
        )
    }
}
