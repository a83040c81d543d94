// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::{Cost, CostFunction, Graph};

/// A sequence of consecutive edges leading from one vertex to another.
///
/// A route from a vertex to itself has no edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route<V, E> {
    pub from: V,
    pub to: V,
    pub edges: Vec<E>,
}

/// [Route] over the vertices and edges of a [Graph].
pub type GraphRoute<G> = Route<<G as Graph>::Vertex, <G as Graph>::Edge>;

impl<V: Copy + PartialEq, E: Copy> Route<V, E> {
    pub fn empty(at: V) -> Self {
        Self {
            from: at,
            to: at,
            edges: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Appends `other` to this route. Returns `None` if `other` doesn't start
    /// where this route ends.
    pub fn concatenate(mut self, other: Route<V, E>) -> Option<Self> {
        if self.to != other.from {
            return None;
        }
        self.edges.extend(other.edges);
        self.to = other.to;
        Some(self)
    }

    /// All vertices visited by the route, including both ends.
    pub fn vertices<G>(&self, graph: &G) -> Vec<V>
    where
        G: Graph<Vertex = V, Edge = E>,
    {
        let mut vertices = Vec::with_capacity(self.edges.len() + 1);
        vertices.push(self.from);
        vertices.extend(self.edges.iter().map(|&e| graph.to_vertex(e)));
        vertices
    }

    /// Total length in meters.
    pub fn length<G>(&self, graph: &G) -> f64
    where
        G: Graph<Vertex = V, Edge = E>,
    {
        self.edges.iter().map(|&e| graph.length(e)).sum()
    }

    /// Sum of the costs of all edges, as assigned by `function`.
    pub fn cost<G, C>(&self, graph: &G, function: &C) -> Cost
    where
        G: Graph<Vertex = V, Edge = E>,
        C: CostFunction<G> + ?Sized,
    {
        self.edges
            .iter()
            .fold(Cost::ZERO, |acc, &e| acc + function.cost(graph, e))
    }
}

/// Outcome of a routing request.
///
/// A failed response (no route) is expected whenever the destination is
/// unreachable under the request's permissions, or the request's limiter
/// ran out of budget. The effort metrics help telling the two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingResponse<V, E> {
    /// The best route found, if any.
    pub route: Option<Route<V, E>>,

    /// Cost of [RoutingResponse::route].
    pub cost: Option<Cost>,

    /// Time spent on the search.
    pub elapsed: Duration,

    /// Number of vertices settled, summed over all frontiers.
    pub vertices_settled: usize,

    /// Number of accepted meets between the forward and backward search.
    /// Always zero for single-direction routers.
    pub meets: usize,
}

/// [RoutingResponse] over the vertices and edges of a [Graph].
pub type GraphResponse<G> = RoutingResponse<<G as Graph>::Vertex, <G as Graph>::Edge>;

impl<V, E> RoutingResponse<V, E> {
    pub fn is_success(&self) -> bool {
        self.route.is_some()
    }
}
