use crate::io::error::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

const FORMAT: &str = "residues";

/// Query positions of one protein, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueQuery {
    pub protein: String,
    pub positions: Vec<usize>,
}

/// Reads residue queries from a line-oriented stream.
///
/// Two line shapes are accepted and may be mixed:
///
/// - `PROTEIN<TAB>12,40;41 57`: a protein followed by positions separated by commas,
///   semicolons, `|`, or whitespace;
/// - `PROTEIN:A123B`: a mutated isoform; its position is queried unless the change is
///   synonymous.
///
/// Blank lines and lines starting with `#` are ignored. Queries for the same protein are
/// merged; the result is ordered by protein identifier.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<ResidueQuery>, Error> {
    let mut residues: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('\t') {
            Some((protein, positions)) => {
                let entry = residues.entry(protein.trim().to_string()).or_default();
                for token in positions
                    .split(|c: char| c == ',' || c == ';' || c == '|' || c.is_whitespace())
                    .filter(|t| !t.is_empty())
                {
                    let position = token.parse::<usize>().ok().filter(|&p| p > 0).ok_or_else(|| {
                        Error::parse(
                            FORMAT,
                            None,
                            line_number,
                            format!("Invalid residue position '{}'", token),
                        )
                    })?;
                    entry.insert(position);
                }
            }
            None => match parse_mutated_isoform(line) {
                Some(MutatedIsoform::Change { protein, position }) => {
                    residues.entry(protein).or_default().insert(position);
                }
                Some(MutatedIsoform::Synonymous) => {}
                None => {
                    return Err(Error::parse(
                        FORMAT,
                        None,
                        line_number,
                        format!("Unrecognized residue line '{}'", line),
                    ));
                }
            },
        }
    }

    Ok(residues
        .into_iter()
        .filter(|(_, positions)| !positions.is_empty())
        .map(|(protein, positions)| ResidueQuery {
            protein,
            positions: positions.into_iter().collect(),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutatedIsoform {
    Change { protein: String, position: usize },
    Synonymous,
}

/// Parses a `PROTEIN:A123B` mutated-isoform token.
///
/// Returns `None` when the token is not a single amino-acid substitution.
pub fn parse_mutated_isoform(token: &str) -> Option<MutatedIsoform> {
    let (protein, change) = token.split_once(':')?;
    let protein = protein.trim();
    let change = change.trim().as_bytes();
    if protein.is_empty() || change.len() < 3 {
        return None;
    }

    let (reference, rest) = change.split_first()?;
    let (alternative, digits) = rest.split_last()?;
    if !reference.is_ascii_uppercase()
        || !(alternative.is_ascii_uppercase() || *alternative == b'*')
        || !digits.iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    let position: usize = std::str::from_utf8(digits).ok()?.parse().ok()?;
    if position == 0 {
        return None;
    }

    if reference == alternative {
        Some(MutatedIsoform::Synonymous)
    } else {
        Some(MutatedIsoform::Change {
            protein: protein.to_string(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_merges_sorts_and_deduplicates_positions() {
        let input = "# protein\tpositions\nENSP2\t40,12;12\nENSP1\t7 3\nENSP2\t5\n";
        let queries = read(Cursor::new(input)).unwrap();
        assert_eq!(
            queries,
            vec![
                ResidueQuery {
                    protein: "ENSP1".into(),
                    positions: vec![3, 7]
                },
                ResidueQuery {
                    protein: "ENSP2".into(),
                    positions: vec![5, 12, 40]
                },
            ]
        );
    }

    #[test]
    fn read_accepts_mutated_isoforms_and_drops_synonymous_changes() {
        let input = "ENSP1:R175H\nENSP1:G12G\nENSP3:L3L\nENSP1:Q4*\n";
        let queries = read(Cursor::new(input)).unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].positions, vec![4, 175]);
    }

    #[test]
    fn read_rejects_bad_positions() {
        let err = read(Cursor::new("ENSP1\t4,x\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 1, .. }));
        assert!(read(Cursor::new("ENSP1\t0\n")).is_err());
        assert!(read(Cursor::new("garbage\n")).is_err());
    }

    #[test]
    fn parse_mutated_isoform_handles_edge_cases() {
        assert_eq!(
            parse_mutated_isoform("ENSP1:V600E"),
            Some(MutatedIsoform::Change {
                protein: "ENSP1".into(),
                position: 600
            })
        );
        assert_eq!(parse_mutated_isoform("ENSP1:V600V"), Some(MutatedIsoform::Synonymous));
        assert_eq!(parse_mutated_isoform("ENSP1:600E"), None);
        assert_eq!(parse_mutated_isoform("ENSP1:VE"), None);
        assert_eq!(parse_mutated_isoform("ENSP1:V0E"), None);
        assert_eq!(parse_mutated_isoform(":V6E"), None);
    }
}
