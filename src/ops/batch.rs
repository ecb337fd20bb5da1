//! Batch resolution over many proteins.
//!
//! Proteins are independent units of work: each is resolved completely by one worker and
//! contributes either all of its rows or none. With the `parallel` feature the work is spread
//! over the current rayon pool.

use super::candidates::NeighbourOutcome;
use super::error::Error;
use super::resolver::Resolver;
use crate::io::report::{InterfaceRow, NeighbourRow};
use crate::io::residues::ResidueQuery;
use crate::utils::parallel::*;

/// How many proteins ended in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Proteins that produced at least one row.
    pub resolved: usize,
    /// Proteins whose query could not be run at all.
    pub failed: usize,
    /// Proteins that ran but produced no rows.
    pub skipped: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.resolved + self.failed + self.skipped
    }
}

#[derive(Debug)]
pub struct BatchReport<R> {
    /// Rows in query order.
    pub rows: Vec<R>,
    pub summary: BatchSummary,
    /// `(protein, error)` for every failed protein.
    pub failures: Vec<(String, Error)>,
}

enum ProteinResult<R> {
    Rows(Vec<R>),
    Skipped,
    Failed(Error),
}

/// Resolves neighbours for every query.
///
/// `on_done` is invoked once per finished protein, from whichever worker finished it.
pub fn resolve_neighbours<F>(
    resolver: &Resolver,
    queries: &[ResidueQuery],
    only_structural: bool,
    on_done: F,
) -> BatchReport<NeighbourRow>
where
    F: Fn() + Send + Sync,
{
    run(queries, on_done, |query| {
        let outcome =
            resolver.neighbours_for_protein(&query.protein, &query.positions, only_structural)?;
        Ok(neighbour_rows(&query.protein, &outcome))
    })
}

/// Resolves interface partners for every query.
pub fn resolve_interfaces<F>(
    resolver: &Resolver,
    queries: &[ResidueQuery],
    on_done: F,
) -> BatchReport<InterfaceRow>
where
    F: Fn() + Send + Sync,
{
    run(queries, on_done, |query| {
        let report = resolver.interface_neighbours(&query.protein, &query.positions)?;
        Ok(report
            .hits
            .into_iter()
            .map(|hit| InterfaceRow {
                protein: query.protein.clone(),
                position: hit.position,
                partner: hit.partner,
                structure: hit.structure.as_str().to_string(),
                partner_residues: hit.partner_residues.into_iter().collect(),
            })
            .collect())
    })
}

/// Flattens a neighbour outcome into report rows, one per query position.
pub fn neighbour_rows(protein: &str, outcome: &NeighbourOutcome) -> Vec<NeighbourRow> {
    let Some(neighbours) = outcome.neighbours() else {
        return Vec::new();
    };
    let structure = outcome.structure().map(|s| s.as_str().to_string());
    neighbours
        .iter()
        .map(|(&position, set)| NeighbourRow {
            protein: protein.to_string(),
            position,
            structure: structure.clone(),
            neighbours: set.iter().copied().collect(),
        })
        .collect()
}

fn run<R, F, Q>(queries: &[ResidueQuery], on_done: F, query: Q) -> BatchReport<R>
where
    R: Send,
    F: Fn() + Send + Sync,
    Q: Fn(&ResidueQuery) -> Result<Vec<R>, Error> + Send + Sync,
{
    let results: Vec<(&str, ProteinResult<R>)> = queries
        .par_iter()
        .map(|q| {
            let result = match query(q) {
                Ok(rows) if rows.is_empty() => ProteinResult::Skipped,
                Ok(rows) => ProteinResult::Rows(rows),
                Err(err) => {
                    log::warn!("{}: {}", q.protein, err);
                    ProteinResult::Failed(err)
                }
            };
            on_done();
            (q.protein.as_str(), result)
        })
        .collect();

    let mut report = BatchReport {
        rows: Vec::new(),
        summary: BatchSummary::default(),
        failures: Vec::new(),
    };
    for (protein, result) in results {
        match result {
            ProteinResult::Rows(rows) => {
                report.summary.resolved += 1;
                report.rows.extend(rows);
            }
            ProteinResult::Skipped => report.summary.skipped += 1,
            ProteinResult::Failed(err) => {
                report.summary.failed += 1;
                report.failures.push((protein.to_string(), err));
            }
        }
    }
    log::info!(
        "Batch finished: {} resolved, {} failed, {} skipped",
        report.summary.resolved,
        report.summary.failed,
        report.summary.skipped
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Catalog, ProteinIndex};
    use crate::model::candidate::{InteractionRecord, StructureCandidate};
    use crate::model::types::StructureRef;
    use crate::ops::fixtures::FakeStructures;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const P1: &str = "MKVAWLSTR";
    const P2: &str = "DEFGHIKLP";

    fn query(protein: &str, positions: &[usize]) -> ResidueQuery {
        ResidueQuery {
            protein: protein.into(),
            positions: positions.to_vec(),
        }
    }

    fn resolver() -> Resolver {
        let mut proteins = ProteinIndex::new();
        proteins.add_sequence("P1", P1);
        proteins.add_sequence("P2", P2);

        let mut catalog = Catalog::new();
        catalog.add_structure("P1", StructureCandidate::new("p1.pdb", "A", true));
        catalog.add_interaction(InteractionRecord {
            first: "P1".into(),
            second: "P2".into(),
            first_chain: "A".into(),
            second_chain: "B".into(),
            structure: StructureRef::new("x.pdb"),
            experimental: true,
        });
        let catalog = Arc::new(catalog);

        let structures = FakeStructures::new()
            .chain("p1.pdb", "A", P1)
            .contact("p1.pdb", "A:2", "A:7", 4.0)
            .chain("x.pdb", "A", P1)
            .chain("x.pdb", "B", P2)
            .contact("x.pdb", "A:3", "B:6", 6.5);

        Resolver::builder(Arc::new(proteins), Arc::new(structures))
            .structure_catalog(catalog.clone())
            .interaction_catalog(catalog)
            .build()
    }

    #[test]
    fn neighbour_batch_counts_each_protein_once() {
        let resolver = resolver();
        let done = AtomicUsize::new(0);
        let queries = [query("P1", &[2, 7]), query("P2", &[1]), query("P404", &[1])];

        let report = resolve_neighbours(&resolver, &queries, true, || {
            done.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert_eq!(
            report.summary,
            BatchSummary {
                resolved: 1,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "P404");
        assert_eq!(
            report.rows,
            vec![
                NeighbourRow {
                    protein: "P1".into(),
                    position: 2,
                    structure: Some("p1.pdb".into()),
                    neighbours: vec![7],
                },
                NeighbourRow {
                    protein: "P1".into(),
                    position: 7,
                    structure: Some("p1.pdb".into()),
                    neighbours: vec![2],
                },
            ]
        );
    }

    #[test]
    fn adjacency_rows_have_no_structure() {
        let resolver = resolver();
        let report = resolve_neighbours(&resolver, &[query("P2", &[1])], false, || {});
        assert_eq!(report.summary.resolved, 1);
        assert_eq!(
            report.rows,
            vec![NeighbourRow {
                protein: "P2".into(),
                position: 1,
                structure: None,
                neighbours: vec![2],
            }]
        );
    }

    #[test]
    fn interface_batch_reports_partner_rows() {
        let resolver = resolver();
        let queries = [query("P1", &[3]), query("P2", &[9])];
        let report = resolve_interfaces(&resolver, &queries, || {});

        assert_eq!(report.summary.resolved, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.total(), 2);
        assert_eq!(
            report.rows,
            vec![InterfaceRow {
                protein: "P1".into(),
                position: 3,
                partner: "P2".into(),
                structure: "x.pdb".into(),
                partner_residues: vec![6],
            }]
        );
    }
}
