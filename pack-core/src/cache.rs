//! Persisted packing results.
//!
//! The artifact is a JSON array of `[x, y, radius]` triples, index-aligned
//! with the merged entries. A present artifact is used as-is: if the inputs
//! changed, the artifact has to be deleted by hand.

use crate::{
    config::Config,
    error::{CacheError, Error, PackError},
    geometry::Circle,
    packer,
};
use std::{fs, io::ErrorKind, path::Path};

/// Reads a cached packing. Any failure means "no cache".
pub fn load(path: &Path) -> Option<Vec<Circle>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("no cache at {}", path.display());
            return None;
        }
        Err(e) => {
            log::warn!("ignoring unreadable cache {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(circles) => Some(circles),
        Err(e) => {
            log::warn!("ignoring corrupt cache {}: {e}", path.display());
            None
        }
    }
}

/// Writes a packing to `path`, replacing any previous artifact.
pub fn save(path: &Path, circles: &[Circle]) -> Result<(), CacheError> {
    let text = serde_json::to_string_pretty(circles).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the cached packing if there is one, otherwise runs `compute`
/// and saves its result.
///
/// `expected` is the number of entries the caller is about to pair the
/// circles with; a cache of another length is still returned, with a
/// warning.
pub fn load_or_else<F>(path: &Path, expected: usize, compute: F) -> Result<Vec<Circle>, Error>
where
    F: FnOnce() -> Result<Vec<Circle>, PackError>,
{
    if let Some(circles) = load(path) {
        if circles.len() != expected {
            log::warn!(
                "cache {} holds {} circles for {expected} entries; delete it to repack",
                path.display(),
                circles.len(),
            );
        }
        log::info!("using cached packing from {}", path.display());
        return Ok(circles);
    }

    let circles = compute()?;
    save(path, &circles)?;
    log::info!("saved packing to {}", path.display());
    Ok(circles)
}

/// [`load_or_else`] with a plain [`packer::pack`] over `amounts`.
pub fn load_or_pack(path: &Path, amounts: &[f64], cfg: &Config) -> Result<Vec<Circle>, Error> {
    load_or_else(path, amounts.len(), || packer::pack(amounts, cfg))
}
