//! Angular intervals on a body's boundary circle
//!
//! An arc is `[start, end]` in radians with `0 ≤ start ≤ end ≤ 2π`, measured
//! on the body's own circle (see [`super::geometry::point_to_angle`]).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::TAU;

use super::collision::IntersectionMap;
use super::geometry::{angle_to_point, point_to_angle};
use super::state::{Body, BodyId};

/// A non-wrapping angular interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub start: f64,
    pub end: f64,
}

impl ArcSegment {
    pub const FULL: ArcSegment = ArcSegment { start: 0.0, end: TAU };

    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(start <= end, "arc start {start} after end {end}");
        Self { start, end }
    }

    /// Angular extent
    #[inline]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        self.start + self.span() / 2.0
    }

    pub fn contains_angle(&self, theta: f64) -> bool {
        theta >= self.start && theta <= self.end
    }

    /// Whether the two arcs overlap, touch, or nest
    #[inline]
    pub fn touches(&self, other: &ArcSegment) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Fuse overlapping, touching, and nested arcs into a minimal sorted set
pub fn merge_arcs(mut arcs: Vec<ArcSegment>) -> Vec<ArcSegment> {
    arcs.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<ArcSegment> = Vec::with_capacity(arcs.len());
    for arc in arcs {
        match merged.last_mut() {
            Some(last) if last.touches(&arc) => last.end = last.end.max(arc.end),
            _ => merged.push(arc),
        }
    }
    merged
}

/// Arcs of `body` cut by a heavier-or-equal neighbor crossing it at `points`
///
/// The chord between the crossing points splits the boundary in two. If the
/// midpoint of the short-angle side lies outside the neighbor, that side is
/// returned; otherwise the complement, split at zero.
pub fn neighbor_arcs(body: &Body, neighbor: &Body, points: &[DVec2; 2]) -> Vec<ArcSegment> {
    let a = point_to_angle(points[0], body.position);
    let b = point_to_angle(points[1], body.position);
    let near = ArcSegment::new(a.min(b), a.max(b));

    let mid = angle_to_point(near.midpoint(), body.position, body.radius);
    if mid.distance(neighbor.position) > neighbor.radius {
        vec![near]
    } else {
        vec![ArcSegment::new(0.0, near.start), ArcSegment::new(near.end, TAU)]
    }
}

/// Merged arcs for every body with at least one recorded intersection
///
/// Only neighbors at least as heavy as the body contribute. A body whose
/// neighbors are all lighter resolves to the full circle.
pub fn resolve_arcs(
    bodies: &[Body],
    intersections: &IntersectionMap,
) -> BTreeMap<BodyId, Vec<ArcSegment>> {
    let lookup = |id: BodyId| -> &Body {
        bodies
            .iter()
            .find(|b| b.id == id)
            .unwrap_or_else(|| panic!("intersection references unknown body {id}"))
    };

    intersections
        .iter()
        .map(|(&id, neighbors)| {
            let body = lookup(id);
            let mut arcs = Vec::new();
            for (&other_id, points) in neighbors {
                let other = lookup(other_id);
                if other.mass < body.mass {
                    continue;
                }
                arcs.extend(neighbor_arcs(body, other, points));
            }

            let mut merged = merge_arcs(arcs);
            if merged.is_empty() {
                merged.push(ArcSegment::FULL);
            }
            (id, merged)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::find_intersections;
    use crate::sim::color::Rgba;
    use crate::sim::geometry::intersect_circles;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn arc(start: f64, end: f64) -> ArcSegment {
        ArcSegment::new(start, end)
    }

    fn body(id: u64, x: f64, y: f64, mass: f64) -> Body {
        Body::new(BodyId(id), DVec2::new(x, y), DVec2::ZERO, mass, Rgba::new(120, 120, 120, 255))
    }

    #[test]
    fn test_merge_overlapping() {
        assert_eq!(merge_arcs(vec![arc(0.0, 1.0), arc(0.5, 2.0)]), vec![arc(0.0, 2.0)]);
    }

    #[test]
    fn test_merge_touching() {
        assert_eq!(merge_arcs(vec![arc(1.0, 2.0), arc(0.0, 1.0)]), vec![arc(0.0, 2.0)]);
    }

    #[test]
    fn test_merge_nested() {
        assert_eq!(merge_arcs(vec![arc(0.0, 3.0), arc(1.0, 2.0)]), vec![arc(0.0, 3.0)]);
    }

    #[test]
    fn test_merge_keeps_gaps() {
        let merged = merge_arcs(vec![arc(4.0, 5.0), arc(0.0, 1.0), arc(0.5, 1.5)]);
        assert_eq!(merged, vec![arc(0.0, 1.5), arc(4.0, 5.0)]);
    }

    #[test]
    fn test_neighbor_arc_near_side() {
        // Small body to the left, heavier neighbor to the right with its
        // center outside the small circle
        let small = body(1, 100.0, 100.0, 200.0);
        let big = body(2, 100.0 + small.radius + 10.0, 100.0, 400.0);
        let points = intersect_circles(
            small.position,
            small.radius,
            big.position,
            big.radius,
        )
        .unwrap();
        let arcs = neighbor_arcs(&small, &big, &points);
        // Crossing points sit at 2π/3 and 4π/3; the side through π is
        // outside the neighbor
        assert_eq!(arcs.len(), 1);
        assert!(arcs[0].contains_angle(PI));
    }

    #[test]
    fn test_neighbor_arc_wraps_when_midpoint_inside() {
        // Neighbor straddles angle π so the sorted interval's midpoint lies
        // inside it and the complement comes back in two pieces
        let small = body(1, 100.0, 100.0, 200.0);
        let big = body(2, 100.0 - small.radius - 10.0, 100.0, 400.0);
        let points = intersect_circles(
            small.position,
            small.radius,
            big.position,
            big.radius,
        )
        .unwrap();
        let arcs = neighbor_arcs(&small, &big, &points);
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0].start, 0.0);
        assert_eq!(arcs[1].end, TAU);
    }

    #[test]
    fn test_resolve_lighter_neighbors_only_give_full_circle() {
        let heavy = body(1, 100.0, 100.0, 400.0);
        let light = body(2, 130.0, 100.0, 150.0);
        let bodies = vec![heavy, light];
        let intersections = find_intersections(&bodies);
        let arcs = resolve_arcs(&bodies, &intersections);

        assert_eq!(arcs[&BodyId(1)], vec![ArcSegment::FULL]);
        let light_arcs = &arcs[&BodyId(2)];
        assert!(!light_arcs.is_empty());
        assert!(light_arcs.iter().all(|a| a.span() < TAU));
    }

    proptest! {
        #[test]
        fn prop_merged_arcs_are_sorted_disjoint_and_cover_inputs(
            raw in proptest::collection::vec((0.0..TAU, 0.0..TAU), 0..12)
        ) {
            let arcs: Vec<_> = raw.iter().map(|&(a, b)| arc(a.min(b), a.max(b))).collect();
            let merged = merge_arcs(arcs.clone());

            for pair in merged.windows(2) {
                prop_assert!(pair[0].end < pair[1].start);
            }
            for a in &arcs {
                prop_assert!(merged.iter().any(|m| m.start <= a.start && a.end <= m.end));
            }
        }
    }
}
