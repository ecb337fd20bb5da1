//! Translation of residue indices through a pairwise alignment.
//!
//! Both functions walk the two aligned rows column by column, keeping one 1-based counter per
//! row that advances only on that row's residues. A column maps the current source counter to
//! the current target counter when both rows hold a residue there.

use crate::model::types::GAP;
use std::collections::{BTreeMap, HashMap};

/// Source index to target index, defined on residue/residue columns only.
pub type PositionMap = BTreeMap<usize, usize>;

/// One step of the synchronized walk: `(source index, target index)`, each `None` on a gap.
fn walk<'a>(
    source: &'a str,
    target: &'a str,
) -> impl Iterator<Item = (Option<usize>, Option<usize>)> + use<'a> {
    let (mut s, mut t) = (0, 0);
    source
        .bytes()
        .zip(target.bytes())
        .filter(|&(a, b)| !(a == GAP && b == GAP))
        .map(move |(a, b)| {
            let source_index = (a != GAP).then(|| {
                s += 1;
                s
            });
            let target_index = (b != GAP).then(|| {
                t += 1;
                t
            });
            (source_index, target_index)
        })
}

/// Maps each 1-based `positions` entry of the ungapped source to the target.
///
/// The output has one entry per input position, in input order. A position whose column has a
/// gap in the target, or which lies beyond the ungapped source, maps to `None`.
pub fn match_position(positions: &[usize], source: &str, target: &str) -> Vec<Option<usize>> {
    let columns: HashMap<usize, Option<usize>> = walk(source, target)
        .filter_map(|(s, t)| s.map(|s| (s, t)))
        .collect();
    positions
        .iter()
        .map(|p| columns.get(p).copied().flatten())
        .collect()
}

/// Complete mapping of every residue/residue column.
pub fn alignment_map(source: &str, target: &str) -> PositionMap {
    walk(source, target)
        .filter_map(|(s, t)| Some((s?, t?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protein_to_chain_example() {
        // Chain "MKVL" aligned against protein "MKVAL".
        let (chain, protein) = ("MKV-L", "MKVAL");
        assert_eq!(
            match_position(&[1, 2, 3, 4, 5], protein, chain),
            vec![Some(1), Some(2), Some(3), None, Some(4)]
        );
        assert_eq!(
            match_position(&[1, 2, 3, 4], chain, protein),
            vec![Some(1), Some(2), Some(3), Some(5)]
        );
    }

    #[test]
    fn positions_beyond_sequence_are_none() {
        assert_eq!(match_position(&[6, 0], "MKVAL", "MKVAL"), vec![None, None]);
    }

    #[test]
    fn output_follows_input_order_with_repeats() {
        assert_eq!(
            match_position(&[3, 1, 3], "A-BC", "AXBC"),
            vec![Some(4), Some(1), Some(4)]
        );
    }

    #[test]
    fn alignment_map_covers_residue_columns_only() {
        let map = alignment_map("MKVAL", "MKV-L");
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            vec![(1, 1), (2, 2), (3, 3), (5, 4)]
        );
    }

    #[test]
    fn double_gap_columns_do_not_advance_counters() {
        assert_eq!(match_position(&[2], "A--B", "A-CB"), vec![Some(3)]);
        assert_eq!(
            alignment_map("A--B", "A-CB").into_iter().collect::<Vec<_>>(),
            vec![(1, 1), (2, 3)]
        );
    }

    #[test]
    fn round_trip_through_both_directions() {
        let (chain, protein) = ("--GMKV-LS", "PPGMKVALS");
        let forward = alignment_map(protein, chain);
        let backward = alignment_map(chain, protein);
        for (p, c) in &forward {
            assert_eq!(backward.get(c), Some(p));
            assert_eq!(match_position(&[*p], protein, chain), vec![Some(*c)]);
        }
        assert_eq!(forward.len(), backward.len());
    }
}
