//! Pairwise intersection detection between bodies

use glam::DVec2;
use std::collections::BTreeMap;

use super::geometry::{circles_intersect_properly, intersect_circles};
use super::state::{Body, BodyId};

/// Crossing points per body, keyed by neighbor
///
/// Every pair appears under both bodies with the same two points.
pub type IntersectionMap = BTreeMap<BodyId, BTreeMap<BodyId, [DVec2; 2]>>;

/// Find all pairs of non-newborn bodies whose boundaries cross
///
/// Disjoint and fully-contained pairs are omitted.
pub fn find_intersections(bodies: &[Body]) -> IntersectionMap {
    let mut map = IntersectionMap::new();

    for (i, a) in bodies.iter().enumerate() {
        if a.state.is_newborn() {
            continue;
        }
        for b in &bodies[i + 1..] {
            if b.state.is_newborn() {
                continue;
            }
            if !circles_intersect_properly(a.position, a.radius, b.position, b.radius) {
                continue;
            }
            let Some(points) = intersect_circles(a.position, a.radius, b.position, b.radius) else {
                continue;
            };

            map.entry(a.id).or_default().insert(b.id, points);
            map.entry(b.id).or_default().insert(a.id, points);
        }
    }

    map
}
