//! What downstream renderers receive: circles paired with their entries and
//! the size of a square canvas that holds them all.

use crate::{dataset::Entry, geometry::Circle};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Funder,
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub name: String,
    pub amount: f64,
    pub target: Option<String>,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub canvas_size: f64,
    pub items: Vec<Placement>,
}

impl Layout {
    /// Pairs `circles[i]` with `entries[i]`. Extra items on either side are
    /// left out, which only happens with a stale cache.
    pub fn new(circles: &[Circle], entries: &[Entry]) -> Self {
        let items = circles
            .iter()
            .zip(entries)
            .map(|(c, e)| Placement {
                name: e.name.clone(),
                amount: e.amount,
                target: e.target.clone(),
                description: e.description.clone(),
                x: c.pos.x,
                y: c.pos.y,
                radius: c.radius,
                role: if e.is_funder() { Role::Funder } else { Role::User },
            })
            .collect();

        Self {
            canvas_size: canvas_size(circles),
            items,
        }
    }
}

/// Side of the smallest origin-centered square containing every circle.
pub fn canvas_size(circles: &[Circle]) -> f64 {
    2.0 * circles.iter().map(Circle::reach).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn entry(name: &str, amount: f64) -> Entry {
        Entry {
            name: name.to_string(),
            amount,
            target: None,
            description: None,
        }
    }

    #[test]
    fn canvas_size_covers_farthest_edge() {
        let circles = vec![
            Circle::new(DVec2::new(0.0, 0.0), 2.0),
            Circle::new(DVec2::new(3.0, 4.0), 1.0),
        ];
        assert_eq!(canvas_size(&circles), 12.0);
        assert_eq!(canvas_size(&[]), 0.0);
    }

    #[test]
    fn layout_pairs_circles_with_entries() {
        let circles = vec![
            Circle::new(DVec2::new(0.0, 0.0), 1.0),
            Circle::new(DVec2::new(0.0, 2.0), 1.0),
        ];
        let entries = vec![entry("A", 10.0), entry("X", -3.0), entry("extra", 4.0)];

        let layout = Layout::new(&circles, &entries);
        assert_eq!(layout.canvas_size, 6.0);
        assert_eq!(layout.items.len(), 2);
        assert_eq!(layout.items[0].role, Role::Funder);
        assert_eq!(layout.items[1].role, Role::User);
        assert_eq!(layout.items[1].name, "X");
        assert_eq!(layout.items[1].y, 2.0);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Funder).unwrap(), "\"funder\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
