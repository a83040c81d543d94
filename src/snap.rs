// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::geometry::{Heading, Location, PolylineSnap, Rectangle};
use crate::{Graph, RoutingError, TransportMode};

/// How far the ambiguity walk follows a road from the snapped edge, in meters.
const ONE_MILE: f64 = 1609.344;

/// Tolerances of the [Snapper].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Edges further than this from the snapped location (in meters) are ignored.
    pub maximum_snap_distance: f64,

    /// When a heading is provided, edges whose local heading deviates from it
    /// by more than this many degrees are ignored. Must be within `[0, 180]`.
    pub maximum_heading_deviation: f64,

    /// Only edges navigable by this mode are considered.
    pub mode: TransportMode,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            maximum_snap_distance: 50.0,
            maximum_heading_deviation: 45.0,
            mode: TransportMode::Car,
        }
    }
}

impl SnapOptions {
    pub fn validate(&self) -> Result<(), RoutingError> {
        let distance = self.maximum_snap_distance;
        if !distance.is_finite() || distance <= 0.0 {
            return Err(RoutingError::invalid_option(
                "maximum_snap_distance",
                format!("must be a positive number of meters, got {}", distance),
            ));
        }

        let deviation = self.maximum_heading_deviation;
        if !(0.0..=180.0).contains(&deviation) {
            return Err(RoutingError::invalid_option(
                "maximum_heading_deviation",
                format!("must be within [0, 180] degrees, got {}", deviation),
            ));
        }

        Ok(())
    }
}

/// Result of snapping a location onto a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnap<E> {
    /// The closest eligible edge.
    pub edge: E,

    /// Projection of the location onto [GraphSnap::edge].
    pub snap: PolylineSnap,

    /// All eligible edges near the location (including [GraphSnap::edge]),
    /// with projections onto each of them.
    pub candidates: BTreeMap<E, PolylineSnap>,
}

impl<E: Copy + Ord> GraphSnap<E> {
    /// Returns the endpoint of the snapped edge closer (along the edge) to the snapped point.
    pub fn nearest_vertex<G>(&self, graph: &G) -> G::Vertex
    where
        G: Graph<Edge = E>,
    {
        if self.snap.offset < 0.5 {
            graph.from_vertex(self.edge)
        } else {
            graph.to_vertex(self.edge)
        }
    }

    /// Checks whether the snapped location could plausibly lie on more than one road.
    ///
    /// Starting from the snapped edge, the road is followed forward for up to a mile,
    /// for as long as it neither branches, merges, turns around nor loops.
    /// Every edge along the way (and its reverse twin) is crossed out from the candidates.
    /// The snap is ambiguous if any candidates are left afterwards.
    pub fn is_ambiguous<G>(&self, graph: &G) -> bool
    where
        G: Graph<Edge = E>,
    {
        let mut remaining: BTreeSet<E> = self.candidates.keys().copied().collect();
        let mut visited = HashSet::new();
        visited.insert(graph.from_vertex(self.edge));

        let mut edge = self.edge;
        let mut walked = 0.0;

        loop {
            let from = graph.from_vertex(edge);
            let to = graph.to_vertex(edge);

            remaining.remove(&edge);
            for twin in graph.outgoing(to).filter(|&e| graph.to_vertex(e) == from) {
                remaining.remove(&twin);
            }

            walked += graph.length(edge);
            if remaining.is_empty() || walked > ONE_MILE || !visited.insert(to) {
                break;
            }

            let mut onward = graph.outgoing(to).filter(|&e| graph.to_vertex(e) != from);
            let (Some(next), None) = (onward.next(), onward.next()) else {
                break;
            };

            let next_to = graph.to_vertex(next);
            let merges = graph
                .incoming(to)
                .any(|e| e != edge && graph.from_vertex(e) != next_to);
            if merges {
                break;
            }

            edge = next;
        }

        !remaining.is_empty()
    }
}

/// Matches raw locations to the nearest eligible edges of a [Graph].
pub struct Snapper<'g, G: Graph> {
    graph: &'g G,
    options: SnapOptions,
}

impl<'g, G: Graph> Snapper<'g, G> {
    pub fn new(graph: &'g G, options: SnapOptions) -> Result<Self, RoutingError> {
        options.validate()?;
        Ok(Self { graph, options })
    }

    pub fn options(&self) -> &SnapOptions {
        &self.options
    }

    /// Snaps `location` onto the closest edge navigable by the configured mode.
    ///
    /// If `heading` is provided, edges going in a substantially different direction
    /// at the snapped point are ignored. Returns `None` if no edge is close enough.
    pub fn snap(&self, location: Location, heading: Option<Heading>) -> Option<GraphSnap<G::Edge>> {
        let bounds = Rectangle::around(location, self.options.maximum_snap_distance);

        let mut candidates = BTreeMap::new();
        for edge in self.graph.edges_intersecting(&bounds) {
            if !self.graph.is_navigable(edge, self.options.mode) {
                continue;
            }

            let snap = self.graph.shape(edge).snap(location);
            if snap.distance > self.options.maximum_snap_distance {
                continue;
            }

            if let Some(h) = heading {
                if snap.heading.difference(h) > self.options.maximum_heading_deviation {
                    continue;
                }
            }

            candidates.insert(edge, snap);
        }

        let mut primary: Option<(G::Edge, PolylineSnap)> = None;
        for (&edge, &snap) in &candidates {
            if primary.map_or(true, |(_, best)| snap.distance < best.distance) {
                primary = Some((edge, snap));
            }
        }

        let Some((edge, snap)) = primary else {
            log::debug!("no edge to snap {} onto", location);
            return None;
        };

        log::debug!(
            "snapped {} onto {:?} at offset {:.3}, {:.1} m away ({} candidates)",
            location,
            edge,
            snap.offset,
            snap.distance,
            candidates.len()
        );

        Some(GraphSnap {
            edge,
            snap,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polyline;
    use crate::testing::vertex;
    use crate::{EdgeId, MemoryGraph};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn origin() -> Location {
        Location::new(52.0, 21.0)
    }

    /// Single two-way road going east from the origin, 100 m long.
    fn street() -> (MemoryGraph, EdgeId, EdgeId) {
        let mut g = MemoryGraph::new();
        g.set_vertex(vertex(1), origin());
        g.set_vertex(vertex(2), origin().offset(0.0, 100.0));
        let (east, west) = g.add_two_way_edge(vertex(1), vertex(2)).unwrap();
        (g, east, west)
    }

    #[test]
    fn snaps_onto_straight_edge() {
        let (g, east, _) = street();
        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();

        let on_line = snapper.snap(origin().offset(0.0, 30.0), Some(Heading::EAST)).unwrap();
        assert_eq!(on_line.edge, east);
        assert_almost_eq!(on_line.snap.offset, 0.3, 1e-3);
        assert_almost_eq!(on_line.snap.distance, 0.0, 1e-3);
        assert_eq!(on_line.nearest_vertex(&g), vertex(1));

        let off_line = snapper.snap(origin().offset(20.0, 70.0), Some(Heading::EAST)).unwrap();
        assert_eq!(off_line.edge, east);
        assert_almost_eq!(off_line.snap.offset, 0.7, 1e-3);
        assert_almost_eq!(off_line.snap.distance, 20.0, 1e-2);
        assert_eq!(off_line.nearest_vertex(&g), vertex(2));

        // Without a heading both directions of the street are candidates
        let any = snapper.snap(origin().offset(20.0, 70.0), None).unwrap();
        assert_eq!(any.candidates.len(), 2);
        assert_almost_eq!(any.snap.distance, 20.0, 1e-2);
    }

    #[test]
    fn nothing_within_distance() {
        let (g, _, _) = street();
        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        assert_eq!(snapper.snap(origin().offset(80.0, 50.0), None), None);
    }

    #[test]
    fn heading_selects_direction() {
        let (g, east, west) = street();
        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        let at = origin().offset(5.0, 50.0);

        let going_east = snapper.snap(at, Some(Heading::degrees(80.0))).unwrap();
        assert_eq!(going_east.edge, east);
        assert_eq!(going_east.candidates.len(), 1);

        let going_west = snapper.snap(at, Some(Heading::WEST)).unwrap();
        assert_eq!(going_west.edge, west);

        assert_eq!(snapper.snap(at, Some(Heading::NORTH)), None);
    }

    #[test]
    fn transport_mode_filter() {
        let mut g = MemoryGraph::new();
        g.set_vertex(vertex(1), origin());
        g.set_vertex(vertex(2), origin().offset(0.0, 100.0));
        let shape = Polyline::segment(origin(), origin().offset(0.0, 100.0));
        let footway = g
            .add_shaped_edge(vertex(1), vertex(2), shape, &[TransportMode::Foot])
            .unwrap();

        let at = origin().offset(3.0, 40.0);
        let car = Snapper::new(&g, SnapOptions::default()).unwrap();
        assert_eq!(car.options().mode, TransportMode::Car);
        assert_eq!(car.snap(at, None), None);

        let pedestrian = Snapper::new(
            &g,
            SnapOptions {
                mode: TransportMode::Foot,
                ..SnapOptions::default()
            },
        )
        .unwrap();
        assert_eq!(pedestrian.options().mode, TransportMode::Foot);
        assert_eq!(pedestrian.snap(at, None).unwrap().edge, footway);
    }

    #[test]
    fn two_way_street_is_not_ambiguous() {
        let (g, _, _) = street();
        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        let snap = snapper.snap(origin().offset(2.0, 50.0), None).unwrap();
        assert!(!snap.is_ambiguous(&g));
    }

    #[test]
    fn consecutive_segments_are_not_ambiguous() {
        // 1 -> 2 -> 3, a single one-way road split in two edges
        let mut g = MemoryGraph::new();
        g.set_vertex(vertex(1), origin());
        g.set_vertex(vertex(2), origin().offset(0.0, 100.0));
        g.set_vertex(vertex(3), origin().offset(0.0, 200.0));
        let first = g.add_edge(vertex(1), vertex(2)).unwrap();
        g.add_edge(vertex(2), vertex(3)).unwrap();

        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        let snap = snapper.snap(origin().offset(1.0, 60.0), None).unwrap();
        assert_eq!(snap.edge, first);
        assert_eq!(snap.candidates.len(), 2);
        assert!(!snap.is_ambiguous(&g));
    }

    #[test]
    fn parallel_streets_are_ambiguous() {
        let (mut g, east, west) = street();
        let north = origin().offset(20.0, 0.0);
        g.set_vertex(vertex(3), north);
        g.set_vertex(vertex(4), north.offset(0.0, 100.0));
        g.add_two_way_edge(vertex(3), vertex(4)).unwrap();

        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        let snap = snapper.snap(origin().offset(8.0, 50.0), None).unwrap();
        assert!(snap.edge == east || snap.edge == west);
        assert_eq!(snap.candidates.len(), 4);
        assert!(snap.is_ambiguous(&g));
    }

    #[test]
    fn equidistant_parallel_streets_are_ambiguous() {
        let north = origin().offset(20.0, 0.0);
        let mut g = MemoryGraph::new();
        g.set_vertex(vertex(1), origin());
        g.set_vertex(vertex(2), origin().offset(0.0, 100.0));
        g.set_vertex(vertex(3), north);
        g.set_vertex(vertex(4), north.offset(0.0, 100.0));
        let south_street = g.add_edge(vertex(1), vertex(2)).unwrap();
        let north_street = g.add_edge(vertex(3), vertex(4)).unwrap();

        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        let snap = snapper.snap(origin().offset(10.0, 50.0), None).unwrap();
        assert!(snap.edge == south_street || snap.edge == north_street);
        assert_eq!(snap.candidates.len(), 2);
        let (a, b) = (&snap.candidates[&south_street], &snap.candidates[&north_street]);
        assert!((a.distance - b.distance).abs() < 0.01);
        assert!(snap.is_ambiguous(&g));
    }

    #[test]
    fn branching_road_stops_walk() {
        // 1 -> 2 then splits into 2 -> 3 and 2 -> 4; both branches are close to the point
        let mut g = MemoryGraph::new();
        g.set_vertex(vertex(1), origin());
        g.set_vertex(vertex(2), origin().offset(0.0, 100.0));
        g.set_vertex(vertex(3), origin().offset(30.0, 150.0));
        g.set_vertex(vertex(4), origin().offset(-30.0, 150.0));
        g.add_edge(vertex(1), vertex(2)).unwrap();
        g.add_edge(vertex(2), vertex(3)).unwrap();
        g.add_edge(vertex(2), vertex(4)).unwrap();

        let snapper = Snapper::new(&g, SnapOptions::default()).unwrap();
        let snap = snapper.snap(origin().offset(0.0, 90.0), None).unwrap();
        assert_eq!(g.to_vertex(snap.edge), vertex(2));
        assert!(snap.is_ambiguous(&g));
    }

    #[test]
    fn invalid_options() {
        let (g, _, _) = street();
        for options in [
            SnapOptions {
                maximum_snap_distance: 0.0,
                ..SnapOptions::default()
            },
            SnapOptions {
                maximum_snap_distance: f64::INFINITY,
                ..SnapOptions::default()
            },
            SnapOptions {
                maximum_heading_deviation: 200.0,
                ..SnapOptions::default()
            },
            SnapOptions {
                maximum_heading_deviation: f64::NAN,
                ..SnapOptions::default()
            },
        ] {
            assert!(matches!(
                Snapper::new(&g, options),
                Err(RoutingError::InvalidOption { .. })
            ));
        }
    }
}
