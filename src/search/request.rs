// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::time::{Duration, Instant};

use crate::{
    AllowAllEdges, AllowAllRoutes, Cost, CostFunction, Debugger, EdgePermissionGate, Graph,
    GraphResponse, GraphRoute, Limiter, NullDebugger, Progress, RoutePermission, RoutingError,
    RoutingResponse, Unlimited,
};

/// Stateless functions steering a search, shared by reference.
pub(crate) struct SearchFunctions<'a, G: Graph> {
    pub(crate) cost: &'a dyn CostFunction<G>,
    pub(crate) forward_heuristic: Option<&'a dyn CostFunction<G>>,
    pub(crate) backward_heuristic: Option<&'a dyn CostFunction<G>>,
    pub(crate) edge_permission: &'a dyn EdgePermissionGate<G>,
    pub(crate) route_permission: &'a dyn RoutePermission<G>,
}

impl<G: Graph> Clone for SearchFunctions<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Graph> Copy for SearchFunctions<'_, G> {}

/// A single routing problem: where to go, how to weigh edges, and how much
/// effort may be spent.
///
/// A request is consumed by a [Router](crate::Router) and must not be reused.
/// Build it with [RoutingRequest::builder].
pub struct RoutingRequest<'a, G: Graph> {
    start: G::Vertex,
    end: G::Vertex,
    functions: SearchFunctions<'a, G>,
    limiter: Box<dyn Limiter + 'a>,
    debugger: Box<dyn Debugger<G> + 'a>,
    started: Option<Instant>,
    vertices_settled: usize,
}

impl<'a, G: Graph> RoutingRequest<'a, G> {
    pub fn builder(start: G::Vertex, end: G::Vertex) -> RoutingRequestBuilder<'a, G> {
        RoutingRequestBuilder {
            start,
            end,
            cost_function: None,
            forward_heuristic: None,
            backward_heuristic: None,
            edge_permission: &AllowAllEdges,
            route_permission: &AllowAllRoutes,
            limiter: Box::new(Unlimited),
            debugger: Box::new(NullDebugger),
        }
    }

    pub fn start(&self) -> G::Vertex {
        self.start
    }

    pub fn end(&self) -> G::Vertex {
        self.end
    }

    /// When the search began, if it already did.
    pub fn started_at(&self) -> Option<Instant> {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    pub fn vertices_settled(&self) -> usize {
        self.vertices_settled
    }

    pub(crate) fn functions(&self) -> SearchFunctions<'a, G> {
        self.functions
    }

    /// Starts the limiter's budget, records the start time and notifies the debugger.
    pub fn on_start_routing(&mut self) {
        self.limiter.start();
        self.started = Some(Instant::now());
        self.vertices_settled = 0;
        self.debugger.on_start(self.start, self.end);
    }

    /// Notifies the debugger that the search is over.
    pub fn on_end_routing(&mut self, response: &GraphResponse<G>) {
        self.debugger.on_end(response);
    }

    /// Builds the response for the current state of the request.
    pub(crate) fn respond(
        &self,
        route: Option<(GraphRoute<G>, Cost)>,
        meets: usize,
    ) -> GraphResponse<G> {
        let (route, cost) = match route {
            Some((route, cost)) => (Some(route), Some(cost)),
            None => (None, None),
        };

        RoutingResponse {
            route,
            cost,
            elapsed: self.elapsed(),
            vertices_settled: self.vertices_settled,
            meets,
        }
    }

    pub(crate) fn can_continue(&mut self, cost: Cost, distance: f64) -> bool {
        let progress = Progress {
            vertices_settled: self.vertices_settled,
            elapsed: self.elapsed(),
            cost,
            distance,
        };
        self.limiter.can_continue(&progress)
    }

    pub(crate) fn is_debugging(&self) -> bool {
        self.debugger.is_active()
    }

    pub(crate) fn on_settled(&mut self, vertex: G::Vertex, cost: Cost) {
        self.vertices_settled += 1;
        self.debugger.on_settled(vertex, cost);
    }

    pub(crate) fn on_relaxed(&mut self, route: &GraphRoute<G>, cost: Cost) {
        self.debugger.on_relaxed(route, cost);
    }
}

/// Builder for [RoutingRequest]s. Only the cost function is mandatory.
pub struct RoutingRequestBuilder<'a, G: Graph> {
    start: G::Vertex,
    end: G::Vertex,
    cost_function: Option<&'a dyn CostFunction<G>>,
    forward_heuristic: Option<&'a dyn CostFunction<G>>,
    backward_heuristic: Option<&'a dyn CostFunction<G>>,
    edge_permission: &'a dyn EdgePermissionGate<G>,
    route_permission: &'a dyn RoutePermission<G>,
    limiter: Box<dyn Limiter + 'a>,
    debugger: Box<dyn Debugger<G> + 'a>,
}

impl<'a, G: Graph> RoutingRequestBuilder<'a, G> {
    /// Function assigning the real, accumulated cost to edges.
    /// Must never return a negative cost.
    pub fn cost_function(mut self, f: &'a dyn CostFunction<G>) -> Self {
        self.cost_function = Some(f);
        self
    }

    /// Estimate of the remaining cost from the far end of an edge to the end vertex.
    /// Only orders the forward search; never part of the route cost.
    pub fn forward_heuristic(mut self, f: &'a dyn CostFunction<G>) -> Self {
        self.forward_heuristic = Some(f);
        self
    }

    /// Estimate of the remaining cost from the far end of an edge back to the start vertex.
    /// Only orders the backward search; never part of the route cost.
    pub fn backward_heuristic(mut self, f: &'a dyn CostFunction<G>) -> Self {
        self.backward_heuristic = Some(f);
        self
    }

    pub fn edge_permission(mut self, gate: &'a dyn EdgePermissionGate<G>) -> Self {
        self.edge_permission = gate;
        self
    }

    pub fn route_permission(mut self, gate: &'a dyn RoutePermission<G>) -> Self {
        self.route_permission = gate;
        self
    }

    pub fn limiter(mut self, limiter: impl Limiter + 'a) -> Self {
        self.limiter = Box::new(limiter);
        self
    }

    pub fn debugger(mut self, debugger: impl Debugger<G> + 'a) -> Self {
        self.debugger = Box::new(debugger);
        self
    }

    pub fn build(self) -> Result<RoutingRequest<'a, G>, RoutingError> {
        let cost = self.cost_function.ok_or(RoutingError::MissingCostFunction)?;
        Ok(RoutingRequest {
            start: self.start,
            end: self.end,
            functions: SearchFunctions {
                cost,
                forward_heuristic: self.forward_heuristic,
                backward_heuristic: self.backward_heuristic,
                edge_permission: self.edge_permission,
                route_permission: self.route_permission,
            },
            limiter: self.limiter,
            debugger: self.debugger,
            started: None,
            vertices_settled: 0,
        })
    }
}
