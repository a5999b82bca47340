//! Deterministic circle packing for signed amounts.
//!
//! Main components:
//! - [`geometry`] — circles, distances and circle-circle intersections.
//! - [`proximity`] — sorted pairwise gaps for tangency candidates.
//! - [`grid`] — growable bucket grid for collision filtering.
//! - [`packer`] — the placement loop tying the indexes together.
//! - [`dataset`] — funder/user inputs and the merge into one sequence.
//! - [`cache`] — persisted packings.
//! - [`layout`] — circle/entry pairs handed to renderers.
//! - [`config`] — tunables for the grid and numeric tolerance.
//! - [`error`] — error types.
//! - [`types`] — shared type aliases and IDs.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod packer;
pub mod proximity;
pub mod types;

pub use config::Config;
pub use error::{Error, PackError};
pub use geometry::Circle;
pub use packer::{Packer, pack, pack_with};
