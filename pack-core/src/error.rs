//! Error types for pack-core.

use std::path::PathBuf;
use thiserror::Error;

/// Error of a load-or-pack run: the packing failed or its result could
/// not be cached.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Packing failed: {0}")]
    Pack(#[from] PackError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Failures of the placement loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackError {
    /// Fewer than the two entries needed to seed a packing.
    #[error("need at least 2 entries to seed a packing, found {found}")]
    TooFewEntries { found: usize },

    /// Not a single circle pair admits a tangent position, even unfiltered.
    #[error("entry {index} (radius {radius}) has no tangent candidate")]
    NoCandidates { index: usize, radius: f64 },

    /// Tangent positions exist but every one overlaps a placed circle.
    #[error("entry {index} (radius {radius}): all {candidates} candidate positions collide")]
    AllCandidatesCollide {
        index: usize,
        radius: f64,
        candidates: usize,
    },

    /// The spatial grid would need more cells per side than allowed.
    #[error(
        "entry {index} needs a {cells}x{cells} cell grid, over the limit of {limit}; use a larger grid cell"
    )]
    GridTooLarge {
        index: usize,
        cells: usize,
        limit: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Cache write failures. Reads never error; they fall back to recomputation.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("failed to write cache {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cache {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reading or writing funder/user files.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
