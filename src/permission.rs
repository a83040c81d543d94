// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Pluggable gates deciding whether edges and whole routes may be used.

use crate::{Graph, GraphRoute};

/// Answer of an [EdgePermissionGate] for a single edge.
///
/// There is no rejecting variant. The search relaxes edges with
/// either answer; to make an edge impassable, a [CostFunction](crate::CostFunction)
/// has to return [Cost::MAXIMUM](crate::Cost::MAXIMUM) for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgePermission {
    Yes,
    Maybe,
}

/// Decides whether a single edge may be used by the search.
pub trait EdgePermissionGate<G: Graph> {
    fn permission(&self, graph: &G, edge: G::Edge) -> EdgePermission;
}

/// Decides whether a fully assembled candidate route may be returned.
///
/// Only consulted when a route is about to be accepted, never per edge.
pub trait RoutePermission<G: Graph> {
    fn allows(&self, graph: &G, route: &GraphRoute<G>) -> bool;
}

/// Answers [EdgePermission::Yes] for every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowAllEdges;

impl<G: Graph> EdgePermissionGate<G> for AllowAllEdges {
    fn permission(&self, _: &G, _: G::Edge) -> EdgePermission {
        EdgePermission::Yes
    }
}

/// Allows every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowAllRoutes;

impl<G: Graph> RoutePermission<G> for AllowAllRoutes {
    fn allows(&self, _: &G, _: &GraphRoute<G>) -> bool {
        true
    }
}

impl<G, F> EdgePermissionGate<G> for F
where
    G: Graph,
    F: Fn(&G, G::Edge) -> EdgePermission,
{
    fn permission(&self, graph: &G, edge: G::Edge) -> EdgePermission {
        self(graph, edge)
    }
}

/// Adapts a closure into a [RoutePermission].
#[derive(Clone, Copy)]
pub struct RouteFilter<F>(pub F);

impl<G, F> RoutePermission<G> for RouteFilter<F>
where
    G: Graph,
    F: Fn(&G, &GraphRoute<G>) -> bool,
{
    fn allows(&self, graph: &G, route: &GraphRoute<G>) -> bool {
        (self.0)(graph, route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{grid, vertex};
    use crate::{EdgeId, MemoryGraph, Route};

    #[test]
    fn closures_act_as_gates() {
        let g = grid(1, 3, 100.0);
        let gate = |g: &MemoryGraph, e: EdgeId| {
            if g.from_vertex(e) == vertex(1) {
                EdgePermission::Yes
            } else {
                EdgePermission::Maybe
            }
        };
        assert_eq!(gate.permission(&g, EdgeId(0)), EdgePermission::Yes);
        assert_eq!(gate.permission(&g, EdgeId(1)), EdgePermission::Maybe);
        assert_eq!(AllowAllEdges.permission(&g, EdgeId(1)), EdgePermission::Yes);
    }

    #[test]
    fn route_filter() {
        let g = grid(1, 3, 100.0);
        let short_only = RouteFilter(|_: &MemoryGraph, r: &GraphRoute<MemoryGraph>| r.len() < 2);
        let short = Route {
            from: vertex(1),
            to: vertex(2),
            edges: vec![EdgeId(0)],
        };
        let long = Route {
            from: vertex(1),
            to: vertex(3),
            edges: vec![EdgeId(0), EdgeId(2)],
        };

        assert!(short_only.allows(&g, &short));
        assert!(!short_only.allows(&g, &long));
        assert!(AllowAllRoutes.allows(&g, &long));
    }
}
