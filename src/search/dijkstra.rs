// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::frontier::{Direction, Frontier, FrontierStatus};
use crate::{Graph, GraphResponse, LevelPromoter, NoPromotion, Router, RoutingError, RoutingRequest};

/// Finds routes with a single forward search from the start vertex,
/// guided by the request's forward heuristic (if any).
///
/// Slower than the [BidirectionalRouter](crate::BidirectionalRouter) on large graphs,
/// but the route is optimal whenever the heuristic never overestimates.
pub struct DijkstraRouter<'g, G: Graph> {
    graph: &'g G,
    promoter: Box<dyn LevelPromoter<G> + 'g>,
}

impl<'g, G: Graph> DijkstraRouter<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            promoter: Box::new(NoPromotion),
        }
    }

    pub fn with_promoter(mut self, promoter: impl LevelPromoter<G> + 'g) -> Self {
        self.promoter = Box::new(promoter);
        self
    }
}

impl<'g, G: Graph> Router<G> for DijkstraRouter<'g, G> {
    fn find_route(
        &self,
        mut request: RoutingRequest<'_, G>,
    ) -> Result<GraphResponse<G>, RoutingError> {
        let (start, end) = (request.start(), request.end());
        for v in [start, end] {
            if !self.graph.contains_vertex(v) {
                return Err(RoutingError::InvalidReference(format!("{:?}", v)));
            }
        }

        request.on_start_routing();
        log::debug!("dijkstra routing from {:?} to {:?}", start, end);

        let functions = request.functions();
        let mut frontier = Frontier::new(
            self.graph,
            Direction::Forward,
            start,
            functions,
            self.promoter.as_ref(),
        );

        loop {
            let step = frontier.execute(&mut request, 1);
            if frontier.is_settled(end) {
                break;
            }

            match step.status {
                FrontierStatus::Continue => {}
                FrontierStatus::Exhausted => break,
                FrontierStatus::Stopped => {
                    log::warn!(
                        "routing from {:?} to {:?} stopped by limiter after settling {} vertices",
                        start,
                        end,
                        request.vertices_settled()
                    );
                    break;
                }
            }
        }

        let found = frontier
            .settled_cost(end)
            .and_then(|cost| frontier.route_to(end).map(|route| (route, cost)))
            .filter(|(route, _)| {
                let allowed = functions.route_permission.allows(self.graph, route);
                if !allowed {
                    log::debug!("route from {:?} to {:?} rejected by route permission", start, end);
                }
                allowed
            });

        let response = request.respond(found, 0);
        request.on_end_routing(&response);
        log::debug!(
            "routing from {:?} to {:?} finished: success={} settled={} elapsed={:?}",
            start,
            end,
            response.is_success(),
            response.vertices_settled,
            response.elapsed,
        );
        Ok(response)
    }
}
