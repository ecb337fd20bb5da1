//! Local alignment of a structure chain's sequence against a protein sequence.
//!
//! [`SmithWaterman`] runs the affine-gap formulation keeping only two score rows, records one
//! traceback byte per cell, traces back from the best cell and then pads the local region with the unaligned flanks of both inputs (each flank
//! against gaps), so removing the gaps from either output row gives back the full input.

use crate::config::AlignmentScoring;
use crate::model::types::GAP;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    #[error("cannot align an empty sequence")]
    EmptySequence,

    #[error("aligner failure: {0}")]
    Backend(String),
}

/// Local alignment primitive.
///
/// Returns the aligned chain row and the aligned protein row, in that order. Callers validate
/// the rows before use.
pub trait LocalAligner: Send + Sync {
    fn align(&self, chain: &str, protein: &str) -> Result<(String, String), AlignError>;
}

#[derive(Debug, Clone, Default)]
pub struct SmithWaterman {
    scoring: AlignmentScoring,
}

/// Unreachable score for gap states that have no predecessor.
const NEG: i32 = i32::MIN / 4;

// Low two bits of a traceback byte: where the cell's best score came from.
const STOP: u8 = 0;
const DIAG: u8 = 1;
const FROM_E: u8 = 2;
const FROM_F: u8 = 3;
const SOURCE: u8 = 0b11;
// Set when the gap state of the cell extends the gap of its predecessor rather than opening one.
const E_EXTEND: u8 = 1 << 2;
const F_EXTEND: u8 = 1 << 3;

#[derive(Clone, Copy, PartialEq)]
enum State {
    H,
    E,
    F,
}

impl SmithWaterman {
    pub fn new(scoring: AlignmentScoring) -> Self {
        Self { scoring }
    }

    fn score_pair(&self, a: u8, b: u8) -> i32 {
        if a.eq_ignore_ascii_case(&b) {
            self.scoring.match_score
        } else {
            self.scoring.mismatch_score
        }
    }

    /// Best local region as `(query_start, query_end, target_start, target_end)` plus its
    /// aligned rows.
    fn local(&self, query: &[u8], target: &[u8]) -> ((usize, usize, usize, usize), Vec<u8>, Vec<u8>) {
        let (m, n) = (query.len(), target.len());
        let cols = n + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        let (gap_open, gap_extend) = (self.scoring.gap_open, self.scoring.gap_extend);

        let mut h_prev = vec![0i32; cols];
        let mut h_cur = vec![0i32; cols];
        // F: gap in the target row, consuming query[i-1]; carried down each column.
        let mut f = vec![NEG; cols];
        let mut trace = vec![STOP; (m + 1) * cols];

        let (mut best, mut best_i, mut best_j) = (0, 0, 0);
        for i in 1..=m {
            // E: gap in the query row, consuming target[j-1]; carried along the row.
            let mut e = NEG;
            for j in 1..=n {
                let mut bits = 0;

                let (e_open, e_ext) = (h_cur[j - 1] + gap_open, e + gap_extend);
                if e_ext > e_open {
                    bits |= E_EXTEND;
                }
                e = e_open.max(e_ext);

                let (f_open, f_ext) = (h_prev[j] + gap_open, f[j] + gap_extend);
                if f_ext > f_open {
                    bits |= F_EXTEND;
                }
                f[j] = f_open.max(f_ext);

                let diag = h_prev[j - 1] + self.score_pair(query[i - 1], target[j - 1]);
                let score = diag.max(e).max(f[j]).max(0);
                bits |= if score == 0 {
                    STOP
                } else if score == diag {
                    DIAG
                } else if score == e {
                    FROM_E
                } else {
                    FROM_F
                };
                h_cur[j] = score;
                trace[idx(i, j)] = bits;
                if score > best {
                    (best, best_i, best_j) = (score, i, j);
                }
            }
            std::mem::swap(&mut h_prev, &mut h_cur);
        }

        if best == 0 {
            return ((0, 0, 0, 0), Vec::new(), Vec::new());
        }

        let (mut aligned_query, mut aligned_target) = (Vec::new(), Vec::new());
        let (mut i, mut j) = (best_i, best_j);
        let mut state = State::H;
        loop {
            match state {
                State::H => {
                    if i == 0 || j == 0 {
                        break;
                    }
                    match trace[idx(i, j)] & SOURCE {
                        DIAG => {
                            aligned_query.push(query[i - 1]);
                            aligned_target.push(target[j - 1]);
                            i -= 1;
                            j -= 1;
                        }
                        FROM_E => state = State::E,
                        FROM_F => state = State::F,
                        _ => break,
                    }
                }
                State::E => {
                    aligned_query.push(GAP);
                    aligned_target.push(target[j - 1]);
                    if trace[idx(i, j)] & E_EXTEND == 0 {
                        state = State::H;
                    }
                    j -= 1;
                }
                State::F => {
                    aligned_query.push(query[i - 1]);
                    aligned_target.push(GAP);
                    if trace[idx(i, j)] & F_EXTEND == 0 {
                        state = State::H;
                    }
                    i -= 1;
                }
            }
        }

        aligned_query.reverse();
        aligned_target.reverse();
        ((i, best_i, j, best_j), aligned_query, aligned_target)
    }
}

impl LocalAligner for SmithWaterman {
    fn align(&self, chain: &str, protein: &str) -> Result<(String, String), AlignError> {
        if chain.is_empty() || protein.is_empty() {
            return Err(AlignError::EmptySequence);
        }
        let (query, target) = (chain.as_bytes(), protein.as_bytes());
        let ((qs, qe, ts, te), core_query, core_target) = self.local(query, target);

        let width = query.len() + target.len();
        let mut row_query = Vec::with_capacity(width);
        let mut row_target = Vec::with_capacity(width);

        push_flank(&query[..qs], &target[..ts], &mut row_query, &mut row_target);
        row_query.extend_from_slice(&core_query);
        row_target.extend_from_slice(&core_target);
        push_flank(&query[qe..], &target[te..], &mut row_query, &mut row_target);

        let into_string =
            |row: Vec<u8>| String::from_utf8(row).map_err(|e| AlignError::Backend(e.to_string()));
        Ok((into_string(row_query)?, into_string(row_target)?))
    }
}

/// Appends `q` against gaps, then gaps against `t`.
fn push_flank(q: &[u8], t: &[u8], row_query: &mut Vec<u8>, row_target: &mut Vec<u8>) {
    row_query.extend_from_slice(q);
    row_target.extend(std::iter::repeat_n(GAP, q.len()));
    row_query.extend(std::iter::repeat_n(GAP, t.len()));
    row_target.extend_from_slice(t);
}
