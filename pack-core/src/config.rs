use crate::error::PackError;

/// Side length of a [`crate::grid::SpatialGrid`] bucket.
pub const GRID_CELL: f64 = 8.0;

/// Default bound on grid cells per side (about 100 MB of empty buckets).
pub const MAX_GRID_CELLS: usize = 2048;

/// Numeric tolerance shared by the geometry kernel and collision checks.
pub const EPSILON: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub grid_cell: f64,
    /// Cell widths added around a circle's bounding box when it is stored.
    pub grid_padding: usize,
    /// Upper bound on grid cells per side. Arena memory grows with its
    /// square, so very large circles need a larger `grid_cell`.
    pub max_grid_cells: usize,
    pub epsilon: f64,
    /// Entries with `|amount|` below this are dropped before packing.
    pub noise_floor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_cell: GRID_CELL,
            grid_padding: 2,
            max_grid_cells: MAX_GRID_CELLS,
            epsilon: EPSILON,
            noise_floor: 1.0,
        }
    }
}

impl Config {
    /// Rejects settings the grid and kernel cannot work with.
    pub fn validate(&self) -> Result<(), PackError> {
        if !(self.grid_cell.is_finite() && self.grid_cell > 0.0) {
            return Err(PackError::InvalidConfig(format!(
                "grid_cell must be a positive number, got {}",
                self.grid_cell
            )));
        }
        if self.max_grid_cells == 0 {
            return Err(PackError::InvalidConfig(
                "max_grid_cells must be at least 1".to_string(),
            ));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(PackError::InvalidConfig(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
