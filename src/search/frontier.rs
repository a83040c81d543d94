// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use super::request::SearchFunctions;
use crate::{
    Cost, CostFunction, EdgePermission, EdgePermissionGate, Graph, GraphRoute, LevelPromoter,
    Route, RoutingRequest,
};

/// Which way a frontier traverses edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the origin along outgoing edges.
    Forward,

    /// From the destination along incoming edges, against their direction.
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// The endpoint of `edge` a frontier reaches by relaxing it.
    fn far_end<G: Graph>(self, graph: &G, edge: G::Edge) -> G::Vertex {
        match self {
            Direction::Forward => graph.to_vertex(edge),
            Direction::Backward => graph.from_vertex(edge),
        }
    }

    /// The endpoint of `edge` a frontier relaxes it from.
    fn near_end<G: Graph>(self, graph: &G, edge: G::Edge) -> G::Vertex {
        match self {
            Direction::Forward => graph.from_vertex(edge),
            Direction::Backward => graph.to_vertex(edge),
        }
    }
}

/// Result of [Frontier::execute].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierStatus {
    /// The requested number of vertices was settled and more remain open.
    Continue,

    /// No more vertices are reachable.
    Exhausted,

    /// The request's limiter refused to continue.
    Stopped,
}

#[derive(Debug)]
pub(crate) struct Step<V> {
    pub(crate) status: FrontierStatus,
    pub(crate) settled: Vec<V>,
}

#[derive(Debug, Clone, Copy)]
struct OpenItem<V> {
    vertex: V,
    cost: Cost,
    distance: f64,
    score: Cost,
    sequence: u64,
}

impl<V> PartialEq for OpenItem<V> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.sequence == other.sequence
    }
}

impl<V> Eq for OpenItem<V> {}

impl<V> PartialOrd for OpenItem<V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<V> Ord for OpenItem<V> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Ties go to the item pushed first.
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// One direction of an incremental Dijkstra/A* search.
///
/// Vertices are popped from the open queue in order of their real cost plus
/// the heuristic estimate. Once settled, the cost of a vertex never changes.
pub(crate) struct Frontier<'f, G: Graph> {
    graph: &'f G,
    direction: Direction,
    origin: G::Vertex,
    cost_function: &'f dyn CostFunction<G>,
    heuristic: Option<&'f dyn CostFunction<G>>,
    edge_permission: &'f dyn EdgePermissionGate<G>,
    promoter: &'f dyn LevelPromoter<G>,

    // Contrary to the textbook definition, the queue may hold multiple items for the same vertex.
    // Only the one matching `tentative` is considered, the rest are skipped when popped.
    open: BinaryHeap<OpenItem<G::Vertex>>,
    tentative: HashMap<G::Vertex, Cost>,
    predecessor: HashMap<G::Vertex, G::Edge>,
    settled: HashMap<G::Vertex, Cost>,
    sequence: u64,
}

impl<'f, G: Graph> Frontier<'f, G> {
    pub(crate) fn new(
        graph: &'f G,
        direction: Direction,
        origin: G::Vertex,
        functions: SearchFunctions<'f, G>,
        promoter: &'f dyn LevelPromoter<G>,
    ) -> Self {
        let heuristic = match direction {
            Direction::Forward => functions.forward_heuristic,
            Direction::Backward => functions.backward_heuristic,
        };

        let mut frontier = Self {
            graph,
            direction,
            origin,
            cost_function: functions.cost,
            heuristic,
            edge_permission: functions.edge_permission,
            promoter,
            open: BinaryHeap::default(),
            tentative: HashMap::default(),
            predecessor: HashMap::default(),
            settled: HashMap::default(),
            sequence: 0,
        };

        frontier.tentative.insert(origin, Cost::ZERO);
        frontier.push(origin, Cost::ZERO, 0.0, Cost::ZERO);
        frontier
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn is_settled(&self, vertex: G::Vertex) -> bool {
        self.settled.contains_key(&vertex)
    }

    pub(crate) fn settled_cost(&self, vertex: G::Vertex) -> Option<Cost> {
        self.settled.get(&vertex).copied()
    }

    pub(crate) fn settled_count(&self) -> usize {
        self.settled.len()
    }

    /// Settles up to `levels` vertices.
    ///
    /// The request's limiter is consulted before every settlement.
    pub(crate) fn execute(
        &mut self,
        request: &mut RoutingRequest<'_, G>,
        levels: usize,
    ) -> Step<G::Vertex> {
        let mut settled = Vec::with_capacity(levels);

        while settled.len() < levels {
            let Some(item) = self.open.pop() else {
                return Step {
                    status: FrontierStatus::Exhausted,
                    settled,
                };
            };

            if self.is_settled(item.vertex) || self.is_stale(&item) {
                continue;
            }

            if !request.can_continue(item.cost, item.distance) {
                self.open.push(item);
                return Step {
                    status: FrontierStatus::Stopped,
                    settled,
                };
            }

            self.settle(item, request);
            settled.push(item.vertex);
        }

        let status = if self.open.is_empty() {
            FrontierStatus::Exhausted
        } else {
            FrontierStatus::Continue
        };
        Step { status, settled }
    }

    /// Rebuilds the route between the origin and a reached vertex, in traversal order:
    /// origin → vertex for forward frontiers, vertex → origin for backward ones.
    ///
    /// Returns `None` if the vertex was never reached.
    pub(crate) fn route_to(&self, vertex: G::Vertex) -> Option<GraphRoute<G>> {
        let mut edges = Vec::new();
        let mut at = vertex;

        while at != self.origin {
            let edge = *self.predecessor.get(&at)?;
            edges.push(edge);
            at = self.direction.near_end(self.graph, edge);

            assert!(
                edges.len() <= self.predecessor.len(),
                "cyclic predecessor chain while reconstructing route to {:?}",
                vertex
            );
        }

        Some(match self.direction {
            Direction::Forward => {
                edges.reverse();
                Route {
                    from: self.origin,
                    to: vertex,
                    edges,
                }
            }
            Direction::Backward => Route {
                from: vertex,
                to: self.origin,
                edges,
            },
        })
    }

    fn is_stale(&self, item: &OpenItem<G::Vertex>) -> bool {
        self.tentative
            .get(&item.vertex)
            .is_some_and(|&known| item.cost > known)
    }

    fn push(&mut self, vertex: G::Vertex, cost: Cost, distance: f64, score: Cost) {
        self.open.push(OpenItem {
            vertex,
            cost,
            distance,
            score,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    fn settle(&mut self, item: OpenItem<G::Vertex>, request: &mut RoutingRequest<'_, G>) {
        debug_assert!(!self.settled.contains_key(&item.vertex));
        self.settled.insert(item.vertex, item.cost);
        request.on_settled(item.vertex, item.cost);

        let graph = self.graph;
        match self.direction {
            Direction::Forward => self.relax_all(graph.outgoing(item.vertex), &item, request),
            Direction::Backward => self.relax_all(graph.incoming(item.vertex), &item, request),
        }
    }

    fn relax_all<I: Iterator<Item = G::Edge>>(
        &mut self,
        edges: I,
        from: &OpenItem<G::Vertex>,
        request: &mut RoutingRequest<'_, G>,
    ) {
        for edge in edges {
            self.relax(edge, from, request);
        }
    }

    fn relax(
        &mut self,
        edge: G::Edge,
        from: &OpenItem<G::Vertex>,
        request: &mut RoutingRequest<'_, G>,
    ) {
        let graph = self.graph;
        let far = self.direction.far_end(graph, edge);
        if self.is_settled(far) {
            return;
        }

        if self.edge_permission.permission(graph, edge) == EdgePermission::Maybe {
            log::trace!("relaxing {:?} with uncertain permission", edge);
        }

        if !self.promoter.admits(graph, edge, from.cost) {
            return;
        }

        let edge_cost = self.cost_function.cost(graph, edge);
        if edge_cost.is_maximum() {
            return;
        }

        // Check if this is the cheapest way to the far end
        let cost = from.cost + edge_cost;
        if cost.is_maximum()
            || self
                .tentative
                .get(&far)
                .is_some_and(|&known| cost >= known)
        {
            return;
        }

        self.tentative.insert(far, cost);
        self.predecessor.insert(far, edge);

        let score = match self.heuristic {
            Some(h) => cost + h.cost(graph, edge),
            None => cost,
        };
        self.push(far, cost, from.distance + graph.length(edge), score);

        if request.is_debugging() {
            if let Some(route) = self.route_to(far) {
                request.on_relaxed(&route, cost);
            }
        }
    }
}
