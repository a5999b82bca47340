use crate::{
    geometry::Circle,
    types::{CircleId, CirclePair},
};
use ordered_float::OrderedFloat;
use std::collections::BTreeSet;

/// All pairwise edge-to-edge gaps of the placed circles, sorted ascending.
///
/// Only pairs whose gap is at most the new circle's diameter can host it
/// tangent to both, so the packer asks this index for that prefix instead
/// of running the intersection test over every pair.
#[derive(Debug, Default)]
pub struct ProximityIndex {
    pairs: BTreeSet<(OrderedFloat<f64>, CirclePair)>,
    members: usize,
}

impl ProximityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Adds circle `id` and its gap to every circle placed before it.
    ///
    /// Gaps are floored at `0`, so slightly overlapping tangent pairs sort
    /// alongside exact ones.
    ///
    /// ### Parameters
    /// - `id` - Id of the new circle; must equal the number of circles
    ///   already indexed.
    /// - `placed` - Every placed circle, including the new one at `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of order or out of bounds for `placed`.
    pub fn insert(&mut self, id: CircleId, placed: &[Circle]) {
        assert_eq!(id, self.members, "circles must be indexed in order");
        let new = &placed[id];
        for (other, c) in placed[..id].iter().enumerate() {
            self.pairs
                .insert((OrderedFloat(c.gap(new).max(0.0)), (other, id)));
        }
        self.members += 1;
    }

    /// Returns every pair whose gap is `<= max_gap`.
    ///
    /// Pairs come back ordered by member ids (lower id first, then higher),
    /// not by gap, so candidate generation is independent of float ties.
    pub fn query(&self, max_gap: f64) -> Vec<CirclePair> {
        let mut out: Vec<CirclePair> = self
            .pairs
            .iter()
            .take_while(|(gap, _)| gap.0 <= max_gap)
            .map(|&(_, pair)| pair)
            .collect();
        out.sort_unstable();
        out
    }

    /// Every indexed pair, in member order.
    pub fn all_pairs(&self) -> Vec<CirclePair> {
        self.query(f64::INFINITY)
    }
}
