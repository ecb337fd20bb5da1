use crate::io::error::Error;
use crate::model::{
    atom::Atom, chain::Chain, residue::Residue, structure::Structure, types::Point,
};
use std::collections::HashMap;
use std::io::BufRead;

const FORMAT: &str = "PDB";

struct TempResidue {
    number: String,
    raw_name: String,
    is_hetatm: bool,
    atom_order: Vec<String>,
    atoms: HashMap<String, (f64, Atom)>,
}

#[derive(Default)]
struct TempChain {
    residue_index: HashMap<String, usize>,
    residues: Vec<TempResidue>,
}

/// Reads the first model of a PDB stream.
///
/// Residues keep their original numbering (sequence number plus insertion code) as an opaque
/// token, and chains and residues keep the order in which they first appear. When alternate
/// locations exist, the conformer with the highest occupancy wins.
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut chain_order: Vec<String> = Vec::new();
    let mut chain_map: HashMap<String, TempChain> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;

        if line.starts_with("ENDMDL") {
            break;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");

        if is_atom || is_hetatm {
            parse_atom_record(&line, line_num, is_hetatm, &mut chain_order, &mut chain_map)?;
        }
    }

    let mut structure = Structure::new();
    for chain_id in chain_order {
        let Some(temp_chain) = chain_map.remove(&chain_id) else {
            continue;
        };
        let mut chain = Chain::new(&chain_id);

        for mut temp_res in temp_chain.residues {
            let mut residue = Residue::new(&temp_res.number, &temp_res.raw_name, temp_res.is_hetatm);
            for name in &temp_res.atom_order {
                if let Some((_, atom)) = temp_res.atoms.remove(name) {
                    residue.add_atom(atom);
                }
            }
            chain.add_residue(residue);
        }
        structure.add_chain(chain);
    }

    Ok(structure)
}

fn parse_atom_record(
    line: &str,
    line_num: usize,
    is_hetatm: bool,
    chain_order: &mut Vec<String>,
    chain_map: &mut HashMap<String, TempChain>,
) -> Result<(), Error> {
    if line.len() < 54 || !line.is_ascii() {
        return Err(Error::parse(FORMAT, None, line_num, "Atom record too short"));
    }

    let atom_name = line[12..16].trim().to_string();
    let res_name = line[17..20].trim().to_string();
    let chain_id = line[21..22].trim().to_string();
    let res_seq = line[22..26].trim();
    let i_code = line[26..27].trim();

    if res_seq.is_empty() || res_seq.parse::<i32>().is_err() {
        return Err(Error::parse(
            FORMAT,
            None,
            line_num,
            "Invalid residue sequence number",
        ));
    }

    let coord = |range: std::ops::Range<usize>, axis: &str| {
        line[range]
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::parse(FORMAT, None, line_num, format!("Invalid {} coordinate", axis)))
    };
    let pos = Point::new(coord(30..38, "X")?, coord(38..46, "Y")?, coord(46..54, "Z")?);

    let occupancy = line
        .get(54..60)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(1.0);
    let element = line.get(76..78).map(str::trim).unwrap_or("");
    let hydrogen = is_hydrogen(element, &atom_name);

    if !chain_map.contains_key(&chain_id) {
        chain_map.insert(chain_id.clone(), TempChain::default());
        chain_order.push(chain_id.clone());
    }
    let Some(chain) = chain_map.get_mut(&chain_id) else {
        return Ok(());
    };

    let number = format!("{}{}", res_seq, i_code);
    let slot = match chain.residue_index.get(&number) {
        Some(&slot) => slot,
        None => {
            chain.residues.push(TempResidue {
                number: number.clone(),
                raw_name: res_name,
                is_hetatm,
                atom_order: Vec::new(),
                atoms: HashMap::new(),
            });
            chain.residue_index.insert(number, chain.residues.len() - 1);
            chain.residues.len() - 1
        }
    };
    let temp_res = &mut chain.residues[slot];

    let replace = match temp_res.atoms.get(&atom_name) {
        Some((old_occ, _)) => occupancy > *old_occ,
        None => {
            temp_res.atom_order.push(atom_name.clone());
            true
        }
    };
    if replace {
        let atom = Atom::new(&atom_name, pos, hydrogen);
        temp_res.atoms.insert(atom_name, (occupancy, atom));
    }

    Ok(())
}

fn is_hydrogen(element: &str, atom_name: &str) -> bool {
    if !element.is_empty() {
        return element.eq_ignore_ascii_case("H") || element.eq_ignore_ascii_case("D");
    }
    let symbol = atom_name.trim_start_matches(|c: char| c.is_ascii_digit());
    symbol.starts_with('H') || symbol.starts_with('D')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn atom_line(
        record: &str,
        serial: usize,
        name: &str,
        alt: char,
        res: &str,
        chain: char,
        seq: i32,
        icode: char,
        x: f64,
        occ: f64,
        element: &str,
    ) -> String {
        format!(
            "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record, serial, name, alt, res, chain, seq, icode, x, 0.0, 0.0, occ, 0.0, element
        )
    }

    #[test]
    fn read_keeps_chain_and_residue_order() {
        let pdb = [
            atom_line("ATOM", 1, "CA", ' ', "MET", 'B', 5, ' ', 1.0, 1.0, "C"),
            atom_line("ATOM", 2, "CA", ' ', "LYS", 'B', 3, ' ', 2.0, 1.0, "C"),
            atom_line("ATOM", 3, "CA", ' ', "GLY", 'A', 1, ' ', 3.0, 1.0, "C"),
        ]
        .join("\n");

        let structure = read(Cursor::new(pdb)).unwrap();
        let chains: Vec<_> = structure.iter_chains().map(|c| c.id.clone()).collect();
        assert_eq!(chains, vec!["B", "A"]);

        let b = structure.chain("B").unwrap();
        let numbers: Vec<_> = b.iter_residues().map(|r| r.number.clone()).collect();
        assert_eq!(numbers, vec!["5", "3"]);
    }

    #[test]
    fn read_keeps_insertion_codes_in_residue_tokens() {
        let pdb = [
            atom_line("ATOM", 1, "CA", ' ', "ALA", 'A', 52, ' ', 1.0, 1.0, "C"),
            atom_line("ATOM", 2, "CA", ' ', "SER", 'A', 52, 'A', 2.0, 1.0, "C"),
        ]
        .join("\n");

        let structure = read(Cursor::new(pdb)).unwrap();
        assert_eq!(structure.chain("A").unwrap().sequence().residues, vec!["52", "52A"]);
        assert_eq!(structure.chain("A").and_then(|c| c.residue("52A")).unwrap().name, "SER");
    }

    #[test]
    fn read_prefers_highest_occupancy_alternate_location() {
        let pdb = [
            atom_line("ATOM", 1, "CA", 'A', "VAL", 'A', 1, ' ', 1.0, 0.40, "C"),
            atom_line("ATOM", 2, "CA", 'B', "VAL", 'A', 1, ' ', 9.0, 0.60, "C"),
        ]
        .join("\n");

        let structure = read(Cursor::new(pdb)).unwrap();
        let atom = structure.chain("A").and_then(|c| c.residue("1")).unwrap().atom("CA").unwrap();
        assert!((atom.pos.x - 9.0).abs() < 1e-9);
    }

    #[test]
    fn read_stops_after_first_model() {
        let pdb = [
            "MODEL        1".to_string(),
            atom_line("ATOM", 1, "CA", ' ', "ALA", 'A', 1, ' ', 1.0, 1.0, "C"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line("ATOM", 1, "CA", ' ', "ALA", 'A', 2, ' ', 1.0, 1.0, "C"),
            "ENDMDL".to_string(),
        ]
        .join("\n");

        let structure = read(Cursor::new(pdb)).unwrap();
        assert_eq!(structure.residue_count(), 1);
    }

    #[test]
    fn read_flags_hydrogens_and_hetero_groups() {
        let pdb = [
            atom_line("ATOM", 1, "N", ' ', "GLY", 'A', 1, ' ', 1.0, 1.0, "N"),
            atom_line("ATOM", 2, "H", ' ', "GLY", 'A', 1, ' ', 1.5, 1.0, "H"),
            atom_line("HETATM", 3, "O", ' ', "HOH", 'A', 101, ' ', 5.0, 1.0, "O"),
        ]
        .join("\n");

        let structure = read(Cursor::new(pdb)).unwrap();
        let gly = structure.chain("A").and_then(|c| c.residue("1")).unwrap();
        assert_eq!(gly.iter_heavy_atoms().count(), 1);
        assert!(structure.chain("A").and_then(|c| c.residue("101")).unwrap().hetero);
        assert_eq!(structure.chain("A").unwrap().sequence().sequence, "G");
    }

    #[test]
    fn read_rejects_bad_coordinates() {
        let mut line = atom_line("ATOM", 1, "CA", ' ', "ALA", 'A', 1, ' ', 1.0, 1.0, "C");
        line.replace_range(30..38, "   abc  ");

        let err = read(Cursor::new(line)).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 1, .. }));
    }

    #[test]
    fn hydrogen_detection_falls_back_to_atom_name() {
        assert!(is_hydrogen("", "1HB"));
        assert!(is_hydrogen("", "HA"));
        assert!(!is_hydrogen("", "CA"));
        assert!(!is_hydrogen("C", "HA"));
    }
}
