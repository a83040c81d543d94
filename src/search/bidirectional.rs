// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::frontier::{Direction, Frontier, FrontierStatus};
use super::meet::Meet;
use crate::{
    Graph, GraphResponse, LevelPromoter, NoPromotion, Router, RoutingError, RoutingRequest,
};

/// Termination policy of the [BidirectionalRouter].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterOptions {
    /// Stop once more than this many meets have been found.
    pub maximum_meets: usize,

    /// Stop once a meet costs at least this many times the best meet found so far.
    ///
    /// Must be at least `1.0`. Exactly `1.0` stops at the very first meet.
    pub maximum_first_meet_cost_multiple: f64,

    /// How many vertices a frontier settles before the other one takes its turn.
    pub levels_per_step: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            maximum_meets: 16,
            maximum_first_meet_cost_multiple: 1.5,
            levels_per_step: 1,
        }
    }
}

impl RouterOptions {
    pub fn validate(&self) -> Result<(), RoutingError> {
        if self.maximum_meets == 0 {
            return Err(RoutingError::invalid_option(
                "maximum_meets",
                "must be at least 1",
            ));
        }

        let multiple = self.maximum_first_meet_cost_multiple;
        if !multiple.is_finite() || multiple < 1.0 {
            return Err(RoutingError::invalid_option(
                "maximum_first_meet_cost_multiple",
                format!("must be a finite number not less than 1, got {}", multiple),
            ));
        }

        if self.levels_per_step == 0 {
            return Err(RoutingError::invalid_option(
                "levels_per_step",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Why the coordinator stopped looking for a better meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// The same route was discovered again.
    Converged,

    /// Too many meets were found.
    TooManyMeets,

    /// A meet was much more expensive than the best one.
    TooExpensive,
}

/// Finds routes by alternately expanding a forward search from the start vertex
/// and a backward search from the end vertex, until they meet.
///
/// After the first meet the search continues for a bounded amount of time looking
/// for a cheaper one, as governed by [RouterOptions]. This bounds the running time,
/// but the returned route is not guaranteed to be the global optimum.
pub struct BidirectionalRouter<'g, G: Graph> {
    graph: &'g G,
    options: RouterOptions,
    promoter: Box<dyn LevelPromoter<G> + 'g>,
}

impl<'g, G: Graph> BidirectionalRouter<'g, G> {
    pub fn new(graph: &'g G, options: RouterOptions) -> Result<Self, RoutingError> {
        options.validate()?;
        Ok(Self {
            graph,
            options,
            promoter: Box::new(NoPromotion),
        })
    }

    /// Replaces the [LevelPromoter] used by both frontiers.
    pub fn with_promoter(mut self, promoter: impl LevelPromoter<G> + 'g) -> Self {
        self.promoter = Box::new(promoter);
        self
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Records a new meet, returning a verdict if the search should stop.
    fn evaluate(
        &self,
        meet: Meet<G::Vertex, G::Edge>,
        best: &mut Option<Meet<G::Vertex, G::Edge>>,
        meets: &mut usize,
    ) -> Option<Verdict> {
        *meets += 1;

        let repeated = best.as_ref().is_some_and(|b| *b == meet);
        if best.as_ref().map_or(true, |b| meet.is_cheaper_than(b)) {
            *best = Some(meet.clone());
        }

        if repeated {
            return Some(Verdict::Converged);
        }

        if *meets > self.options.maximum_meets {
            return Some(Verdict::TooManyMeets);
        }

        let best_cost = best.as_ref().map(|b| b.cost).unwrap_or(meet.cost);
        if meet.cost.value() >= best_cost.value() * self.options.maximum_first_meet_cost_multiple {
            return Some(Verdict::TooExpensive);
        }

        None
    }
}

impl<'g, G: Graph> Router<G> for BidirectionalRouter<'g, G> {
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
        log::debug!("bidirectional routing from {:?} to {:?}", start, end);

        let functions = request.functions();
        let route_permission = functions.route_permission;
        let promoter = self.promoter.as_ref();
        let mut forward = Frontier::new(self.graph, Direction::Forward, start, functions, promoter);
        let mut backward = Frontier::new(self.graph, Direction::Backward, end, functions, promoter);

        let mut best: Option<Meet<G::Vertex, G::Edge>> = None;
        let mut meets: usize = 0;
        let mut direction = Direction::Forward;

        loop {
            let step = match direction {
                Direction::Forward => forward.execute(&mut request, self.options.levels_per_step),
                Direction::Backward => backward.execute(&mut request, self.options.levels_per_step),
            };
            let other = match direction {
                Direction::Forward => &backward,
                Direction::Backward => &forward,
            };

            let mut verdict = None;
            for &vertex in &step.settled {
                if !other.is_settled(vertex) {
                    continue;
                }

                let Some(meet) = Meet::assemble(&forward, &backward, vertex) else {
                    continue;
                };

                if !route_permission.allows(self.graph, &meet.route) {
                    log::debug!("route through {:?} rejected by route permission", vertex);
                    continue;
                }

                verdict = self.evaluate(meet, &mut best, &mut meets);
                if verdict.is_some() {
                    break;
                }
            }

            if let Some(verdict) = verdict {
                log::debug!("stopping after {} meets: {:?}", meets, verdict);
                break;
            }

            match step.status {
                FrontierStatus::Continue => {}
                FrontierStatus::Stopped => {
                    log::warn!(
                        "routing from {:?} to {:?} stopped by limiter after settling {} vertices",
                        start,
                        end,
                        request.vertices_settled()
                    );
                    break;
                }
                FrontierStatus::Exhausted => {
                    // The other frontier may not have settled its own origin yet
                    // (e.g. when start == end), so it gets a chance to meet this one.
                    if best.is_some() || other.settled_count() > 0 {
                        break;
                    }
                }
            }

            direction = direction.reversed();
        }

        let response = request.respond(best.map(|m| (m.route, m.cost)), meets);
        request.on_end_routing(&response);
        log::debug!(
            "routing from {:?} to {:?} finished: success={} settled={} meets={} elapsed={:?}",
            start,
            end,
            response.is_success(),
            response.vertices_settled,
            response.meets,
            response.elapsed,
        );
        Ok(response)
    }
}
