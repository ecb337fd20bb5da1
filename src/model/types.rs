use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

/// Gap marker used in aligned sequence strings.
pub const GAP: u8 = b'-';

/// One-letter code emitted for residues without a standard amino-acid mapping.
pub const UNKNOWN_RESIDUE: char = 'X';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardResidue {
    ALA,
    ARG,
    ASN,
    ASP,
    CYS,
    GLN,
    GLU,
    GLY,
    HIS,
    ILE,
    LEU,
    LYS,
    MET,
    PHE,
    PRO,
    SER,
    THR,
    TRP,
    TYR,
    VAL,
}

impl StandardResidue {
    pub fn one_letter(&self) -> char {
        match self {
            StandardResidue::ALA => 'A',
            StandardResidue::ARG => 'R',
            StandardResidue::ASN => 'N',
            StandardResidue::ASP => 'D',
            StandardResidue::CYS => 'C',
            StandardResidue::GLN => 'Q',
            StandardResidue::GLU => 'E',
            StandardResidue::GLY => 'G',
            StandardResidue::HIS => 'H',
            StandardResidue::ILE => 'I',
            StandardResidue::LEU => 'L',
            StandardResidue::LYS => 'K',
            StandardResidue::MET => 'M',
            StandardResidue::PHE => 'F',
            StandardResidue::PRO => 'P',
            StandardResidue::SER => 'S',
            StandardResidue::THR => 'T',
            StandardResidue::TRP => 'W',
            StandardResidue::TYR => 'Y',
            StandardResidue::VAL => 'V',
        }
    }

    /// Resolves a residue name as found in coordinate files, including the common
    /// protonation-state and modified-residue aliases.
    pub fn from_pdb_name(name: &str) -> Option<Self> {
        let canonical = match name {
            "ARN" => "ARG",
            "ASH" => "ASP",
            "CYM" | "CYX" | "CSO" | "CME" | "CSD" => "CYS",
            "GLH" => "GLU",
            "HID" | "HIE" | "HIP" | "HSD" | "HSE" | "HSP" => "HIS",
            "LYN" => "LYS",
            "TYM" | "PTR" => "TYR",
            "MSE" => "MET",
            "SEP" => "SER",
            "TPO" => "THR",
            other => other,
        };
        Self::from_str(canonical).ok()
    }
}

impl fmt::Display for StandardResidue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = match self {
            StandardResidue::ALA => "ALA",
            StandardResidue::ARG => "ARG",
            StandardResidue::ASN => "ASN",
            StandardResidue::ASP => "ASP",
            StandardResidue::CYS => "CYS",
            StandardResidue::GLN => "GLN",
            StandardResidue::GLU => "GLU",
            StandardResidue::GLY => "GLY",
            StandardResidue::HIS => "HIS",
            StandardResidue::ILE => "ILE",
            StandardResidue::LEU => "LEU",
            StandardResidue::LYS => "LYS",
            StandardResidue::MET => "MET",
            StandardResidue::PHE => "PHE",
            StandardResidue::PRO => "PRO",
            StandardResidue::SER => "SER",
            StandardResidue::THR => "THR",
            StandardResidue::TRP => "TRP",
            StandardResidue::TYR => "TYR",
            StandardResidue::VAL => "VAL",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for StandardResidue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALA" => Ok(StandardResidue::ALA),
            "ARG" => Ok(StandardResidue::ARG),
            "ASN" => Ok(StandardResidue::ASN),
            "ASP" => Ok(StandardResidue::ASP),
            "CYS" => Ok(StandardResidue::CYS),
            "GLN" => Ok(StandardResidue::GLN),
            "GLU" => Ok(StandardResidue::GLU),
            "GLY" => Ok(StandardResidue::GLY),
            "HIS" => Ok(StandardResidue::HIS),
            "ILE" => Ok(StandardResidue::ILE),
            "LEU" => Ok(StandardResidue::LEU),
            "LYS" => Ok(StandardResidue::LYS),
            "MET" => Ok(StandardResidue::MET),
            "PHE" => Ok(StandardResidue::PHE),
            "PRO" => Ok(StandardResidue::PRO),
            "SER" => Ok(StandardResidue::SER),
            "THR" => Ok(StandardResidue::THR),
            "TRP" => Ok(StandardResidue::TRP),
            "TYR" => Ok(StandardResidue::TYR),
            "VAL" => Ok(StandardResidue::VAL),
            _ => Err(format!("Invalid standard residue: {}", s)),
        }
    }
}

/// A residue addressed in structural coordinates.
///
/// Residue numbering in coordinate files is neither guaranteed numeric nor contiguous
/// (insertion codes, gaps, renumbered models), so the residue is kept as an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructurePosition {
    pub chain: String,
    pub residue: String,
}

impl StructurePosition {
    pub fn new(chain: impl Into<String>, residue: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            residue: residue.into(),
        }
    }
}

impl fmt::Display for StructurePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.residue)
    }
}

impl FromStr for StructurePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((chain, residue)) if !residue.is_empty() => Ok(Self::new(chain, residue)),
            _ => Err(format!("Invalid structure position: {}", s)),
        }
    }
}

/// Identifier (catalog file name or filesystem path) of one structure or model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructureRef(String);

impl StructureRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StructureRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
