//! Resolver settings loaded from TOML.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shortest contact distance (Å) accepted; anything below is closer than bonded atoms.
pub const MIN_DISTANCE: f64 = 0.5;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration{}: {source}", path.as_ref().map(|p| format!(" in '{}'", p.display())).unwrap_or_default())]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {details}")]
    Invalid { details: String },
}

/// Scoring scheme of the local aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AlignmentScoring {
    pub match_score: i32,
    pub mismatch_score: i32,
    /// Penalty for opening a gap (negative).
    pub gap_open: i32,
    /// Penalty for extending an open gap by one column (negative).
    pub gap_extend: i32,
}

impl Default for AlignmentScoring {
    fn default() -> Self {
        Self {
            match_score: 5,
            mismatch_score: -4,
            gap_open: -10,
            gap_extend: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ResolverConfig {
    /// Contact distance (Å) for intra-structure neighbours.
    pub neighbour_distance: f64,
    /// Contact distance (Å) across an interaction interface.
    pub interface_distance: f64,
    /// Report no data instead of falling back to sequence adjacency.
    pub only_structural: bool,
    pub alignment: AlignmentScoring,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            neighbour_distance: 5.0,
            interface_distance: 8.0,
            only_structural: false,
            alignment: AlignmentScoring::default(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neighbour_distance(mut self, distance: f64) -> Self {
        self.neighbour_distance = distance;
        self
    }

    pub fn interface_distance(mut self, distance: f64) -> Self {
        self.interface_distance = distance;
        self
    }

    pub fn only_structural(mut self, only_structural: bool) -> Self {
        self.only_structural = only_structural;
        self
    }

    pub fn alignment(mut self, scoring: AlignmentScoring) -> Self {
        self.alignment = scoring;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self =
            toml::from_str(content).map_err(|source| Error::Toml { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::Toml {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both distances are finite and at least [`MIN_DISTANCE`], and that gap
    /// penalties are not rewards.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("neighbour_distance", self.neighbour_distance),
            ("interface_distance", self.interface_distance),
        ] {
            if !(value.is_finite() && value >= MIN_DISTANCE) {
                return Err(Error::Invalid {
                    details: format!(
                        "{} must be a finite distance of at least {} Å, got {}",
                        name, MIN_DISTANCE, value
                    ),
                });
            }
        }
        if self.alignment.gap_open > 0 || self.alignment.gap_extend > 0 {
            return Err(Error::Invalid {
                details: "gap penalties must not be positive".to_string(),
            });
        }
        Ok(())
    }
}
