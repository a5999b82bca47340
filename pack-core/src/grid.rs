use crate::{error::PackError, geometry::Circle, types::CircleId};
use glam::I64Vec2;

/// Extent, in cells per side, of a freshly created grid.
const INITIAL_CELLS: usize = 4;

/// Inclusive rectangle of cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRange {
    min: I64Vec2,
    max: I64Vec2,
}

impl CellRange {
    fn contains(&self, other: &CellRange) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        min.cmple(max).all().then_some(CellRange { min, max })
    }
}

/// Sparse bucket grid mapping square regions to the circles overlapping
/// them.
///
/// Buckets live in one flat arena addressed by integer cell coordinates
/// relative to `origin` (the cell coordinate of bucket `0`). When a circle
/// falls outside the covered area the arena doubles in both directions and
/// the old buckets are moved to their shifted slots, so ids stored in the
/// grid are never invalidated. Growth stops at `max_cells` per side.
#[derive(Debug)]
pub struct SpatialGrid {
    cell: f64,
    padding: i64,
    max_cells: usize,
    origin: I64Vec2,
    width: usize,
    height: usize,
    buckets: Vec<Vec<CircleId>>,
}

impl SpatialGrid {
    /// Creates an empty grid centered on the origin.
    ///
    /// ### Parameters
    /// - `cell` - Side length of one bucket, in world units.
    /// - `padding` - Cell widths added on every side of a stored circle's
    ///   bounding box.
    /// - `max_cells` - Largest extent, in cells per side, the grid may grow to.
    pub fn new(cell: f64, padding: usize, max_cells: usize) -> Self {
        let half = (INITIAL_CELLS / 2) as i64;
        Self {
            cell,
            padding: padding as i64,
            max_cells,
            origin: I64Vec2::splat(-half),
            width: INITIAL_CELLS,
            height: INITIAL_CELLS,
            buckets: vec![Vec::new(); INITIAL_CELLS * INITIAL_CELLS],
        }
    }

    /// Current size of the arena, in cells.
    pub fn extent(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Stores circle `id` in every bucket its padded bounding box touches,
    /// growing the grid first if needed.
    ///
    /// ### Errors
    /// [`PackError::GridTooLarge`] if covering the circle would take more
    /// than `max_cells` per side. Nothing is stored in that case.
    pub fn insert(&mut self, id: CircleId, circle: &Circle) -> Result<(), PackError> {
        let range = self.footprint(circle, self.padding);
        while !self.coverage().contains(&range) {
            let cells = self.width.max(self.height) * 2;
            if cells > self.max_cells {
                return Err(PackError::GridTooLarge {
                    index: id,
                    cells,
                    limit: self.max_cells,
                });
            }
            self.grow();
        }
        for y in range.min.y..=range.max.y {
            for x in range.min.x..=range.max.x {
                let slot = self.slot(I64Vec2::new(x, y));
                self.buckets[slot].push(id);
            }
        }
        Ok(())
    }

    /// Returns the ids of every circle sharing a bucket with `trial`'s
    /// bounding box, each id once and in ascending order.
    ///
    /// This is a superset of the circles that can overlap `trial`; the
    /// caller still runs the exact collision test.
    pub fn query(&self, trial: &Circle) -> Vec<CircleId> {
        let Some(range) = self.footprint(trial, 0).intersect(&self.coverage()) else {
            return Vec::new();
        };

        let mut ids = Vec::new();
        for y in range.min.y..=range.max.y {
            for x in range.min.x..=range.max.x {
                ids.extend_from_slice(&self.buckets[self.slot(I64Vec2::new(x, y))]);
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn coverage(&self) -> CellRange {
        CellRange {
            min: self.origin,
            max: self.origin + I64Vec2::new(self.width as i64 - 1, self.height as i64 - 1),
        }
    }

    fn cell_of(&self, v: f64) -> i64 {
        (v / self.cell).floor() as i64
    }

    fn footprint(&self, circle: &Circle, padding: i64) -> CellRange {
        let pad = I64Vec2::splat(padding);
        let min = I64Vec2::new(
            self.cell_of(circle.pos.x - circle.radius),
            self.cell_of(circle.pos.y - circle.radius),
        );
        let max = I64Vec2::new(
            self.cell_of(circle.pos.x + circle.radius),
            self.cell_of(circle.pos.y + circle.radius),
        );
        CellRange {
            min: min - pad,
            max: max + pad,
        }
    }

    /// Arena index of an in-coverage cell.
    fn slot(&self, cell: I64Vec2) -> usize {
        let local = cell - self.origin;
        local.x as usize + local.y as usize * self.width
    }

    /// Doubles the extent, keeping the old buckets centered in the new arena.
    fn grow(&mut self) {
        let (old_w, old_h) = (self.width, self.height);
        let (new_w, new_h) = (old_w * 2, old_h * 2);
        let shift = (old_w / 2, old_h / 2);

        let mut buckets = vec![Vec::new(); new_w * new_h];
        for y in 0..old_h {
            for x in 0..old_w {
                let dst = (x + shift.0) + (y + shift.1) * new_w;
                buckets[dst] = std::mem::take(&mut self.buckets[x + y * old_w]);
            }
        }

        log::trace!("spatial grid grew to {new_w}x{new_h} cells");
        self.origin -= I64Vec2::new(shift.0 as i64, shift.1 as i64);
        self.width = new_w;
        self.height = new_h;
        self.buckets = buckets;
    }
}
