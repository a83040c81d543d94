// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Cost, Graph, GraphResponse, GraphRoute};

/// Observer of a single routing request, for diagnostics only.
///
/// All callbacks are invoked synchronously on the routing thread.
/// Implementations must not block, and have no way to influence the search.
pub trait Debugger<G: Graph> {
    /// Whether the debugger wants to be notified at all. When `false`, the search
    /// skips building the routes passed to [Debugger::on_relaxed].
    fn is_active(&self) -> bool {
        true
    }

    fn on_start(&mut self, _start: G::Vertex, _end: G::Vertex) {}

    /// Called after a cheaper route to `route.to` has been found.
    fn on_relaxed(&mut self, _route: &GraphRoute<G>, _cost: Cost) {}

    /// Called when the minimal cost of `vertex` becomes final.
    fn on_settled(&mut self, _vertex: G::Vertex, _cost: Cost) {}

    fn on_end(&mut self, _response: &GraphResponse<G>) {}
}

impl<G: Graph, D: Debugger<G> + ?Sized> Debugger<G> for &mut D {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn on_start(&mut self, start: G::Vertex, end: G::Vertex) {
        (**self).on_start(start, end)
    }

    fn on_relaxed(&mut self, route: &GraphRoute<G>, cost: Cost) {
        (**self).on_relaxed(route, cost)
    }

    fn on_settled(&mut self, vertex: G::Vertex, cost: Cost) {
        (**self).on_settled(vertex, cost)
    }

    fn on_end(&mut self, response: &GraphResponse<G>) {
        (**self).on_end(response)
    }
}

/// Ignores all events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NullDebugger;

impl<G: Graph> Debugger<G> for NullDebugger {
    fn is_active(&self) -> bool {
        false
    }
}

/// Forwards all events to the [log] crate at the trace level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogDebugger;

impl<G: Graph> Debugger<G> for LogDebugger {
    fn is_active(&self) -> bool {
        log::log_enabled!(log::Level::Trace)
    }

    fn on_start(&mut self, start: G::Vertex, end: G::Vertex) {
        log::trace!("routing from {:?} to {:?}", start, end);
    }

    fn on_relaxed(&mut self, route: &GraphRoute<G>, cost: Cost) {
        log::trace!(
            "relaxed {:?} via {} edges, cost {}",
            route.to,
            route.len(),
            cost
        );
    }

    fn on_settled(&mut self, vertex: G::Vertex, cost: Cost) {
        log::trace!("settled {:?} at cost {}", vertex, cost);
    }

    fn on_end(&mut self, response: &GraphResponse<G>) {
        log::trace!(
            "routing finished: success={} settled={} elapsed={:?}",
            response.is_success(),
            response.vertices_settled,
            response.elapsed
        );
    }
}
