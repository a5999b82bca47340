//! The placement loop.
//!
//! Every new amount goes through four steps:
//! 1. **Propose** — the [`ProximityIndex`] yields the circle pairs close
//!    enough to host the new radius, and [`intersections`] turns each pair
//!    into tangent candidate centers.
//! 2. **Filter** — each candidate is checked against the nearby circles the
//!    [`SpatialGrid`] reports; colliding candidates are dropped.
//! 3. **Select** — funders take the valid position closest to the origin,
//!    users the one closest to the last funder.
//! 4. **Commit** — the circle is appended and both indexes are updated.
//!
//! The first two circles are seeded directly: circle 0 at the origin and
//! circle 1 tangent on top of it.

use crate::{
    config::Config,
    error::PackError,
    geometry::{Circle, distance, intersections, radius_from_area},
    grid::SpatialGrid,
    proximity::ProximityIndex,
    types::{CircleId, CirclePair},
};
use glam::DVec2;

#[derive(Debug)]
pub struct Packer {
    cfg: Config,
    circles: Vec<Circle>,
    proximity: ProximityIndex,
    grid: SpatialGrid,
    last_funder: CircleId,
}

impl Packer {
    /// Starts a packing from its first two amounts.
    ///
    /// Circle 0 sits at the origin and circle 1 directly above it, touching.
    /// The last funder starts out as circle 0 regardless of either sign.
    pub fn seed(first: f64, second: f64, cfg: Config) -> Result<Self, PackError> {
        cfg.validate()?;

        let r0 = radius_from_area(first);
        let r1 = radius_from_area(second);

        let mut packer = Self::empty(cfg);
        packer.commit(Circle::new(DVec2::ZERO, r0))?;
        packer.commit(Circle::new(DVec2::new(0.0, r0 + r1), r1))?;
        Ok(packer)
    }

    fn empty(cfg: Config) -> Self {
        Self {
            cfg,
            circles: Vec::new(),
            proximity: ProximityIndex::new(),
            grid: SpatialGrid::new(cfg.grid_cell, cfg.grid_padding, cfg.max_grid_cells),
            last_funder: 0,
        }
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn into_circles(self) -> Vec<Circle> {
        self.circles
    }

    pub fn last_funder(&self) -> CircleId {
        self.last_funder
    }

    /// Tangent candidates for a circle of `radius`, drawn from the pairs
    /// whose gap is at most its diameter.
    pub fn propose(&self, radius: f64) -> Vec<DVec2> {
        // ε keeps exactly-touching pairs from being lost to rounding.
        let pairs = self.proximity.query(2.0 * radius + self.cfg.epsilon);
        self.candidates(&pairs, radius)
    }

    /// Tangent candidates for a circle of `radius` over the given pairs, in
    /// pair order.
    pub fn candidates(&self, pairs: &[CirclePair], radius: f64) -> Vec<DVec2> {
        pairs
            .iter()
            .flat_map(|&(a, b)| {
                intersections(
                    &self.circles[a],
                    &self.circles[b],
                    radius,
                    self.cfg.epsilon,
                )
            })
            .collect()
    }

    /// Keeps the candidates where a circle of `radius` overlaps nothing.
    pub fn filter(&self, radius: f64, candidates: &[DVec2]) -> Vec<DVec2> {
        candidates
            .iter()
            .copied()
            .filter(|&pos| {
                let trial = Circle::new(pos, radius);
                self.grid
                    .query(&trial)
                    .into_iter()
                    .all(|id| !trial.collides(&self.circles[id], self.cfg.epsilon))
            })
            .collect()
    }

    /// Places the circle for `amount` and returns its id.
    ///
    /// ### Errors
    /// - [`PackError::NoCandidates`] if no pair at all admits the radius.
    /// - [`PackError::AllCandidatesCollide`] if every tangent position
    ///   overlaps an existing circle.
    /// - [`PackError::GridTooLarge`] if the circle is too big for the grid.
    ///
    /// Nothing is placed when an error is returned.
    pub fn place(&mut self, amount: f64) -> Result<CircleId, PackError> {
        let index = self.circles.len();
        let radius = radius_from_area(amount);

        let mut candidates = self.propose(radius);
        if candidates.is_empty() {
            log::debug!("entry {index}: no nearby pair fits radius {radius}, trying all pairs");
            candidates = self.candidates(&self.proximity.all_pairs(), radius);
            if candidates.is_empty() {
                return Err(PackError::NoCandidates { index, radius });
            }
        }

        let valid = self.filter(radius, &candidates);

        let funder = amount > 0.0;
        let target = if funder {
            DVec2::ZERO
        } else {
            self.circles[self.last_funder].pos
        };
        let pos = closest_to(&valid, target).ok_or(PackError::AllCandidatesCollide {
            index,
            radius,
            candidates: candidates.len(),
        })?;

        let id = self.commit(Circle::new(pos, radius))?;
        if funder {
            self.last_funder = id;
        }

        log::debug!(
            "entry {index}: {} at ({:.3}, {:.3}) r={radius:.3}, {} of {} candidates valid",
            if funder { "funder" } else { "user" },
            pos.x,
            pos.y,
            valid.len(),
            candidates.len(),
        );
        Ok(id)
    }

    fn commit(&mut self, circle: Circle) -> Result<CircleId, PackError> {
        let id = self.circles.len();
        self.grid.insert(id, &circle)?;
        self.circles.push(circle);
        self.proximity.insert(id, &self.circles);
        Ok(id)
    }
}

/// First position with the smallest distance to `target`.
fn closest_to(positions: &[DVec2], target: DVec2) -> Option<DVec2> {
    let mut best: Option<(DVec2, f64)> = None;
    for &p in positions {
        let d = distance(p, target);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((p, d)),
        }
    }
    best.map(|(p, _)| p)
}

/// Packs a whole amount sequence, one circle per amount, index-aligned.
///
/// ### Errors
/// [`PackError::TooFewEntries`] for fewer than two amounts, otherwise
/// whatever [`Packer::place`] reports for the first entry that fails.
pub fn pack(amounts: &[f64], cfg: &Config) -> Result<Vec<Circle>, PackError> {
    pack_with(amounts, cfg, |_| {})
}

/// [`pack`], calling `on_placed` with the id of every circle placed after
/// the two seeds.
pub fn pack_with<F>(
    amounts: &[f64],
    cfg: &Config,
    mut on_placed: F,
) -> Result<Vec<Circle>, PackError>
where
    F: FnMut(CircleId),
{
    let [first, second, rest @ ..] = amounts else {
        return Err(PackError::TooFewEntries {
            found: amounts.len(),
        });
    };

    let mut packer = Packer::seed(*first, *second, *cfg)?;
    for &amount in rest {
        let id = packer.place(amount)?;
        on_placed(id);
    }

    log::info!("packed {} circles", packer.circles.len());
    Ok(packer.into_circles())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn seed_places_two_tangent_circles_on_the_axis() {
        let circles = pack(&[100.0, 100.0], &Config::default()).unwrap();
        let r = (100.0 / PI).sqrt();

        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].pos, DVec2::ZERO);
        assert_close(circles[0].radius, r);
        assert_eq!(circles[1].pos.x, 0.0);
        assert_close(circles[1].pos.y, 2.0 * r);
        assert_close(circles[1].radius, r);
        assert!(circles[0].gap(&circles[1]).abs() < 1e-12);
    }

    #[test]
    fn too_few_entries_is_an_error() {
        let cfg = Config::default();
        assert_eq!(
            pack(&[], &cfg),
            Err(PackError::TooFewEntries { found: 0 })
        );
        assert_eq!(
            pack(&[10.0], &cfg),
            Err(PackError::TooFewEntries { found: 1 })
        );
    }

    #[test]
    fn seed_rejects_invalid_config() {
        let mut cfg = Config::default();
        cfg.grid_cell = -1.0;
        assert!(matches!(
            Packer::seed(10.0, 10.0, cfg),
            Err(PackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn users_settle_beside_the_seed() {
        let circles = pack(&[100.0, 100.0, -20.0, -35.0], &Config::default()).unwrap();

        // Both tangent points of the seed pair are equally far out; the
        // first one (to the right) wins.
        assert_close(circles[2].pos.x, 5.902270703751474);
        assert_close(circles[2].pos.y, 5.641895835477563);
        assert_close(circles[2].radius, (20.0 / PI).sqrt());

        assert_close(circles[3].pos.x, -6.9859773593024155);
        assert_close(circles[3].pos.y, 5.641895835477563);
        assert_close(circles[3].radius, (35.0 / PI).sqrt());
    }

    #[test]
    fn funder_updates_last_funder() {
        let mut packer = Packer::seed(100.0, 100.0, Config::default()).unwrap();
        assert_eq!(packer.last_funder(), 0);

        let user = packer.place(-20.0).unwrap();
        assert_eq!(user, 2);
        assert_eq!(packer.last_funder(), 0);

        let funder = packer.place(60.0).unwrap();
        assert_eq!(funder, 3);
        assert_eq!(packer.last_funder(), 3);

        let next = packer.place(-5.0).unwrap();
        let gap = packer.circles()[next].gap(&packer.circles()[funder]);
        assert!(gap.abs() < 1e-4, "user should touch its funder, gap {gap}");
    }

    #[test]
    fn propose_uses_only_close_pairs() {
        let mut packer = Packer::seed(100.0, 100.0, Config::default()).unwrap();
        packer.place(-20.0).unwrap();

        let radius = radius_from_area(1.0);
        let near = packer.propose(radius);
        let all = packer.candidates(&packer.proximity.all_pairs(), radius);
        assert!(!near.is_empty());
        assert!(near.len() <= all.len());
        for p in &near {
            assert!(all.contains(p));
        }
    }

    #[test]
    fn filter_drops_overlapping_positions() {
        let packer = Packer::seed(100.0, 100.0, Config::default()).unwrap();
        let inside = DVec2::new(0.0, 1.0);
        let outside = DVec2::new(50.0, 0.0);

        assert_eq!(packer.filter(1.0, &[inside, outside]), vec![outside]);
    }

    #[test]
    fn closest_to_prefers_first_minimum() {
        let a = DVec2::new(1.0, 0.0);
        let b = DVec2::new(-1.0, 0.0);
        let c = DVec2::new(3.0, 0.0);
        assert_eq!(closest_to(&[c, a, b], DVec2::ZERO), Some(a));
        assert_eq!(closest_to(&[c, b, a], DVec2::ZERO), Some(b));
        assert_eq!(closest_to(&[a, c], DVec2::new(3.0, 0.5)), Some(c));
        assert_eq!(closest_to(&[], DVec2::ZERO), None);
    }

    #[test]
    fn pack_with_reports_each_placement() {
        let amounts = [100.0, 100.0, -20.0, 60.0, -5.0];
        let mut seen = Vec::new();
        let circles = pack_with(&amounts, &Config::default(), |id| seen.push(id)).unwrap();

        assert_eq!(seen, vec![2, 3, 4]);
        assert_eq!(circles, pack(&amounts, &Config::default()).unwrap());
    }

    #[test]
    fn covered_candidates_fail_without_placing() {
        let mut packer = Packer::seed(100.0, 100.0, Config::default()).unwrap();
        // A big circle over the seed pair hides every tangent point.
        packer
            .commit(Circle::new(DVec2::new(0.0, 5.64), 20.0))
            .unwrap();

        let err = packer.place(-1.0).unwrap_err();
        assert!(
            matches!(
                err,
                PackError::AllCandidatesCollide {
                    index: 3,
                    candidates,
                    ..
                } if candidates > 0
            ),
            "unexpected {err:?}"
        );
        assert_eq!(packer.circles().len(), 3);
        assert_eq!(packer.last_funder(), 0);
    }

    #[test]
    fn isolated_circles_have_no_candidates() {
        let mut packer = Packer::empty(Config::default());
        packer.commit(Circle::new(DVec2::ZERO, 1.0)).unwrap();
        packer
            .commit(Circle::new(DVec2::new(100.0, 0.0), 1.0))
            .unwrap();

        // Radius 1: the pair is too far apart even for the all-pairs retry.
        assert!(packer.propose(1.0).is_empty());
        assert_eq!(
            packer.place(PI),
            Err(PackError::NoCandidates {
                index: 2,
                radius: 1.0,
            })
        );
        assert_eq!(packer.circles().len(), 2);
    }

    #[test]
    fn oversized_circle_is_refused_by_the_grid() {
        let mut cfg = Config::default();
        cfg.max_grid_cells = 64;
        let mut packer = Packer::seed(100.0, 100.0, cfg).unwrap();

        // Radius 1000 needs far more than 64 cells of 8 units.
        let err = packer.place(PI * 1.0e6).unwrap_err();
        assert!(matches!(
            err,
            PackError::GridTooLarge {
                index: 2,
                limit: 64,
                ..
            }
        ));
        assert_eq!(packer.circles().len(), 2);
        assert_eq!(packer.proximity.len(), 1);
    }
}
