mod error;
pub(crate) mod table;

pub mod catalog;
pub mod fasta;
pub mod pdb;
pub mod report;
pub mod residues;

pub use pdb::read as read_pdb_structure;

pub use error::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opens a file for buffered reading, tagging failures with its path.
pub fn open(path: &Path) -> Result<BufReader<File>, Error> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::from_io(e, Some(path.to_path_buf())))
}
