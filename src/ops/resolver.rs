use super::align::{LocalAligner, SmithWaterman};
use super::cache::AlignmentCache;
use super::error::Error;
use super::graph::GraphCache;
use crate::config::ResolverConfig;
use crate::db::{Catalog, InteractionCatalog, ProteinSource, StructureCatalog, StructureSource};
use std::sync::Arc;

/// Entry point for neighbour and interface queries.
///
/// Holds the injected data sources together with the alignment and contact-graph caches.
/// Every method takes `&self`, so one resolver is shared by all batch workers.
pub struct Resolver {
    pub(super) proteins: Arc<dyn ProteinSource>,
    pub(super) structure_catalog: Arc<dyn StructureCatalog>,
    pub(super) interaction_catalog: Arc<dyn InteractionCatalog>,
    pub(super) config: ResolverConfig,
    pub(super) alignments: AlignmentCache,
    pub(super) graphs: GraphCache,
}

impl Resolver {
    pub fn builder(
        proteins: Arc<dyn ProteinSource>,
        structures: Arc<dyn StructureSource>,
    ) -> ResolverBuilder {
        ResolverBuilder::new(proteins, structures)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn alignments(&self) -> &AlignmentCache {
        &self.alignments
    }

    pub fn proteins(&self) -> &dyn ProteinSource {
        self.proteins.as_ref()
    }

    /// Sequence of `protein`; the only lookup whose failure aborts a query.
    pub fn protein_sequence(&self, protein: &str) -> Result<String, Error> {
        self.proteins
            .sequence(protein)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::unknown_protein(protein))
    }
}

pub struct ResolverBuilder {
    proteins: Arc<dyn ProteinSource>,
    structures: Arc<dyn StructureSource>,
    aligner: Option<Arc<dyn LocalAligner>>,
    structure_catalog: Option<Arc<dyn StructureCatalog>>,
    interaction_catalog: Option<Arc<dyn InteractionCatalog>>,
    config: ResolverConfig,
}

impl ResolverBuilder {
    pub fn new(proteins: Arc<dyn ProteinSource>, structures: Arc<dyn StructureSource>) -> Self {
        Self {
            proteins,
            structures,
            aligner: None,
            structure_catalog: None,
            interaction_catalog: None,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the default Smith-Waterman aligner.
    pub fn aligner(mut self, aligner: Arc<dyn LocalAligner>) -> Self {
        self.aligner = Some(aligner);
        self
    }

    pub fn structure_catalog(mut self, catalog: Arc<dyn StructureCatalog>) -> Self {
        self.structure_catalog = Some(catalog);
        self
    }

    pub fn interaction_catalog(mut self, catalog: Arc<dyn InteractionCatalog>) -> Self {
        self.interaction_catalog = Some(catalog);
        self
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Resolver {
        let aligner = self
            .aligner
            .unwrap_or_else(|| Arc::new(SmithWaterman::new(self.config.alignment)) as Arc<dyn LocalAligner>);
        Resolver {
            proteins: self.proteins,
            structure_catalog: self
                .structure_catalog
                .unwrap_or_else(|| Arc::new(Catalog::new()) as Arc<dyn StructureCatalog>),
            interaction_catalog: self
                .interaction_catalog
                .unwrap_or_else(|| Arc::new(Catalog::new()) as Arc<dyn InteractionCatalog>),
            alignments: AlignmentCache::new(Arc::clone(&self.structures), aligner),
            graphs: GraphCache::new(self.structures),
            config: self.config,
        }
    }
}
